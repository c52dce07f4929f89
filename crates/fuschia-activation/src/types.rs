use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a persisted workflow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowId(String);

impl WorkflowId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for WorkflowId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for WorkflowId {
  fn from(id: &str) -> Self {
    Self::new(id)
  }
}

impl From<String> for WorkflowId {
  fn from(id: String) -> Self {
    Self(id)
  }
}

/// Read-only snapshot of what the invoking context is focused on.
///
/// `current` is `None` while the open workflow has never been saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionContext {
  pub current: Option<WorkflowId>,
  pub has_unresolved_issues: bool,
}

impl SelectionContext {
  /// Whether `workflow_id` is the workflow currently in focus.
  pub fn is_current(&self, workflow_id: &WorkflowId) -> bool {
    self.current.as_ref() == Some(workflow_id)
  }
}

/// A single activation or deactivation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
  pub target: Option<WorkflowId>,
  pub desired_state: bool,
}

/// Arguments handed to the persistence gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationUpdate {
  pub workflow_id: WorkflowId,
  pub active: bool,
}

/// Broadcast to local listeners once a transition has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationChanged {
  pub workflow_id: WorkflowId,
  pub active: bool,
}

/// Human-readable name of the state a transition is heading to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
  Activated,
  Deactivated,
}

impl From<bool> for TargetState {
  fn from(active: bool) -> Self {
    if active {
      TargetState::Activated
    } else {
      TargetState::Deactivated
    }
  }
}

impl fmt::Display for TargetState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TargetState::Activated => f.write_str("activated"),
      TargetState::Deactivated => f.write_str("deactivated"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_target_state_names() {
    assert_eq!(TargetState::from(true).to_string(), "activated");
    assert_eq!(TargetState::from(false).to_string(), "deactivated");
  }

  #[test]
  fn test_selection_is_current() {
    let selection = SelectionContext {
      current: Some(WorkflowId::from("wf_1")),
      has_unresolved_issues: false,
    };

    assert!(selection.is_current(&"wf_1".into()));
    assert!(!selection.is_current(&"wf_2".into()));
    assert!(!SelectionContext::default().is_current(&"wf_1".into()));
  }

  #[test]
  fn test_workflow_id_serializes_as_string() {
    let id = WorkflowId::from("wf_123");
    assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!("wf_123"));
  }
}
