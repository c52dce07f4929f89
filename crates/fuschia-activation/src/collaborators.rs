//! Traits for everything the controller depends on but does not own.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
  ActivationUpdate, GatewayError, HookEvent, Message, SelectionContext, TelemetryEvent,
};

/// Source of the current selection and its validation state.
pub trait EntityStore: Send + Sync {
  /// Snapshot of the workflow in focus.
  fn selection(&self) -> SelectionContext;
}

/// Saves the workflow in focus so that it gets an identifier.
#[async_trait]
pub trait WorkflowSaver: Send + Sync {
  /// Returns `true` once saved. Implementations surface their own errors.
  async fn save_current_workflow(&self) -> bool;
}

/// Remote update of a workflow's activation state.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
  async fn update_activation(&self, update: &ActivationUpdate) -> Result<(), GatewayError>;
}

/// User-facing notifications.
pub trait NotificationSink: Send + Sync {
  fn show_message(&self, message: Message);

  /// Report `error`, prefixed with `title`.
  fn show_error(&self, error: &(dyn std::error::Error + Send + Sync), title: &str);

  fn open_modal(&self, key: &str);
}

/// Telemetry and external hook dispatch. Both are fire-and-forget.
pub trait EventEmitter: Send + Sync {
  fn track(&self, event: TelemetryEvent);

  fn run_hook(&self, event: HookEvent);
}

/// Durable "the user has already seen the activation modal" flag.
pub trait ActivationModalFlag: Send + Sync {
  fn has_seen_activation_modal(&self) -> bool;
}

/// Refreshes prompt and announcement data shown to the user.
pub trait PromptRefresher: Send + Sync {
  fn refresh_prompts(&self);
}

/// Handles to every collaborator of an [`ActivationController`](crate::ActivationController).
#[derive(Clone)]
pub struct Collaborators {
  pub entities: Arc<dyn EntityStore>,
  pub saver: Arc<dyn WorkflowSaver>,
  pub gateway: Arc<dyn PersistenceGateway>,
  pub notifications: Arc<dyn NotificationSink>,
  pub events: Arc<dyn EventEmitter>,
  pub modal_flag: Arc<dyn ActivationModalFlag>,
  pub prompts: Arc<dyn PromptRefresher>,
}
