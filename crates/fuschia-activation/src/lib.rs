//! Fuschia Activation
//!
//! This crate owns the transition of a workflow between active and inactive.
//! The [`ActivationController`] coordinates:
//! - Saving a workflow that has no identifier yet
//! - Blocking activation of a workflow with unresolved issues
//! - Persisting the new state through a [`PersistenceGateway`]
//! - Firing hooks, telemetry and a local change event once persisted
//!
//! Everything the controller talks to is supplied through [`Collaborators`].

mod collaborators;
mod config;
mod controller;
mod error;
mod events;
mod types;

pub use collaborators::{
  ActivationModalFlag, Collaborators, EntityStore, EventEmitter, NotificationSink,
  PersistenceGateway, PromptRefresher, WorkflowSaver,
};
pub use config::{ConcurrencyMode, ControllerConfig, IssueGate};
pub use controller::ActivationController;
pub use error::{ActivationError, GatewayError};
pub use events::{HookEvent, Message, MessageKind, TelemetryEvent};
pub use types::{
  ActivationChanged, ActivationUpdate, SelectionContext, TargetState, TransitionRequest,
  WorkflowId,
};
