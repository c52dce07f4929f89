//! Events emitted by the activation controller.
//!
//! Hooks are consumed by integrations outside the editor, telemetry events
//! feed product analytics, and messages are surfaced to the user.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::WorkflowId;

/// Hook fired after an activation change has been persisted.
///
/// The variant encodes the scope of the change: whether the workflow was the
/// one currently in focus or one toggled indirectly (e.g. from a list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookEvent {
  /// The workflow in focus changed state.
  ActiveChangeCurrent { workflow_id: WorkflowId, active: bool },

  /// Some other workflow changed state.
  ActiveChange { workflow_id: WorkflowId, active: bool },
}

impl HookEvent {
  pub const ACTIVE_CHANGE_CURRENT: &'static str = "workflow.activeChangeCurrent";
  pub const ACTIVE_CHANGE: &'static str = "workflow.activeChange";

  /// Build the hook for a change, picking the variant from its scope.
  pub fn for_scope(is_current: bool, workflow_id: WorkflowId, active: bool) -> Self {
    if is_current {
      HookEvent::ActiveChangeCurrent {
        workflow_id,
        active,
      }
    } else {
      HookEvent::ActiveChange {
        workflow_id,
        active,
      }
    }
  }

  pub fn name(&self) -> &'static str {
    match self {
      HookEvent::ActiveChangeCurrent { .. } => Self::ACTIVE_CHANGE_CURRENT,
      HookEvent::ActiveChange { .. } => Self::ACTIVE_CHANGE,
    }
  }

  pub fn payload(&self) -> serde_json::Value {
    match self {
      HookEvent::ActiveChangeCurrent {
        workflow_id,
        active,
      }
      | HookEvent::ActiveChange {
        workflow_id,
        active,
      } => json!({ "workflowId": workflow_id, "active": active }),
    }
  }
}

/// Telemetry events tracked around a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TelemetryEvent {
  /// An activation is about to be persisted. Fired before the outcome is known.
  ActivationAttempted,

  /// A transition was persisted.
  ActivationStatusSet {
    workflow_identity: WorkflowId,
    is_active: bool,
  },
}

impl TelemetryEvent {
  pub fn name(&self) -> &'static str {
    match self {
      TelemetryEvent::ActivationAttempted => "workflow activation attempted",
      TelemetryEvent::ActivationStatusSet { .. } => "workflow activation status set",
    }
  }

  /// Event properties, if the event carries any.
  pub fn properties(&self) -> Option<serde_json::Value> {
    match self {
      TelemetryEvent::ActivationAttempted => None,
      TelemetryEvent::ActivationStatusSet {
        workflow_identity,
        is_active,
      } => Some(json!({
        "workflow_identity": workflow_identity,
        "is_active": is_active,
      })),
    }
  }
}

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
  Info,
  Success,
  Warning,
  Error,
}

/// A user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
  pub title: String,
  pub message: String,
  pub kind: MessageKind,
}
