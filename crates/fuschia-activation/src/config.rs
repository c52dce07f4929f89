use serde::{Deserialize, Serialize};

/// Which transitions the unresolved-issues gate blocks.
///
/// The gate only ever applies to the workflow currently in focus. Workflows
/// toggled from elsewhere are never checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueGate {
  /// Block activation only. Deactivating a broken workflow is always allowed.
  #[default]
  ActivationOnly,

  /// Block activation and deactivation alike. Node issues are checked
  /// regardless of direction, which is how the editor has always gated the
  /// workflow in focus; pick this to keep that behaviour.
  AllTransitions,
}

impl IssueGate {
  pub fn blocks(&self, desired_state: bool) -> bool {
    match self {
      IssueGate::ActivationOnly => desired_state,
      IssueGate::AllTransitions => true,
    }
  }
}

/// How overlapping transitions on one controller interact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyMode {
  /// The in-flight flag is only observable; overlapping calls run interleaved.
  #[default]
  Advisory,

  /// Transitions are serialized: a second call waits for the first to settle.
  Exclusive,
}

/// Configuration for an [`ActivationController`](crate::ActivationController).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
  /// Modal opened the first time the user activates the workflow in focus.
  pub modal_key: String,

  pub issue_gate: IssueGate,

  pub concurrency: ConcurrencyMode,

  /// Capacity of the local activation-changed broadcast channel.
  pub event_buffer: usize,
}

impl Default for ControllerConfig {
  fn default() -> Self {
    Self {
      modal_key: "activation".to_string(),
      issue_gate: IssueGate::default(),
      concurrency: ConcurrencyMode::default(),
      event_buffer: 16,
    }
  }
}
