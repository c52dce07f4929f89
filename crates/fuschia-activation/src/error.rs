//! Error types for activation transitions.

use thiserror::Error;

use crate::{TargetState, WorkflowId};

/// Errors returned by a persistence gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
  /// The workflow does not exist in the backend.
  #[error("workflow not found: {0}")]
  NotFound(String),

  /// The backend refused the update.
  #[error("update rejected: {0}")]
  Rejected(String),

  /// The backend failed.
  #[error("backend error: {0}")]
  Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Reasons a transition ended without changing state.
///
/// Each of these is terminal for the attempt; callers retry by invoking the
/// controller again.
#[derive(Debug, Error)]
pub enum ActivationError {
  /// The open workflow could not be saved, so it has no identifier yet.
  #[error("workflow was not saved")]
  NotSaved,

  /// The workflow in focus has unresolved node issues.
  #[error("workflow '{workflow_id}' has unresolved issues")]
  UnresolvedIssues { workflow_id: WorkflowId },

  /// The backend rejected the new state.
  #[error("workflow '{workflow_id}' could not be {state}: {source}")]
  Persistence {
    workflow_id: WorkflowId,
    state: TargetState,
    #[source]
    source: GatewayError,
  },
}
