//! The activation state transition.

use tokio::sync::{Mutex, MutexGuard, broadcast, watch};
use tracing::{debug, info, warn};

use crate::{
  ActivationChanged, ActivationError, ActivationUpdate, Collaborators, ConcurrencyMode,
  ControllerConfig, HookEvent, Message, MessageKind, TargetState, TelemetryEvent,
  TransitionRequest, WorkflowId,
};

/// Toggles workflows between active and inactive.
///
/// A transition either persists the new state and then fires its side
/// effects (hook, telemetry, local event, modal or prompt refresh), or ends
/// early with at most one user-facing notification. Listeners never observe
/// a change that was not persisted.
///
/// # Usage
///
/// ```ignore
/// let controller = ActivationController::new(collaborators, ControllerConfig::default());
/// let mut changes = controller.subscribe();
///
/// controller.activate().await?;
/// let change = changes.recv().await?;
/// ```
pub struct ActivationController {
  collaborators: Collaborators,
  config: ControllerConfig,
  in_flight: watch::Sender<bool>,
  changes: broadcast::Sender<ActivationChanged>,
  exclusive: Mutex<()>,
}

/// Marks a transition as in progress for as long as it is alive.
struct InFlight<'a> {
  flag: &'a watch::Sender<bool>,
  _exclusive: Option<MutexGuard<'a, ()>>,
}

impl Drop for InFlight<'_> {
  fn drop(&mut self) {
    self.flag.send_replace(false);
  }
}

impl ActivationController {
  pub fn new(collaborators: Collaborators, config: ControllerConfig) -> Self {
    let (in_flight, _) = watch::channel(false);
    let (changes, _) = broadcast::channel(config.event_buffer.max(1));
    Self {
      collaborators,
      config,
      in_flight,
      changes,
      exclusive: Mutex::new(()),
    }
  }

  pub fn config(&self) -> &ControllerConfig {
    &self.config
  }

  /// Whether a transition is currently in progress.
  ///
  /// In [`ConcurrencyMode::Advisory`] this is a hint for disabling triggers,
  /// not a lock: the first overlapping call to settle clears it.
  pub fn is_transitioning(&self) -> bool {
    *self.in_flight.borrow()
  }

  /// Observe the in-progress flag.
  pub fn watch_transitioning(&self) -> watch::Receiver<bool> {
    self.in_flight.subscribe()
  }

  /// Subscribe to persisted activation changes.
  pub fn subscribe(&self) -> broadcast::Receiver<ActivationChanged> {
    self.changes.subscribe()
  }

  /// Activate the workflow in focus, saving it first if it has no identifier.
  pub async fn activate(&self) -> Result<ActivationChanged, ActivationError> {
    let current = self.collaborators.entities.selection().current;
    self.set_activation(current, true).await
  }

  pub async fn deactivate(
    &self,
    workflow_id: WorkflowId,
  ) -> Result<ActivationChanged, ActivationError> {
    self.set_activation(Some(workflow_id), false).await
  }

  pub async fn set_activation(
    &self,
    target: Option<WorkflowId>,
    desired_state: bool,
  ) -> Result<ActivationChanged, ActivationError> {
    self
      .transition(TransitionRequest {
        target,
        desired_state,
      })
      .await
  }

  /// Run a transition to completion.
  pub async fn transition(
    &self,
    request: TransitionRequest,
  ) -> Result<ActivationChanged, ActivationError> {
    let in_flight = self.begin().await;
    let desired_state = request.desired_state;
    let issues_exist = self.collaborators.entities.selection().has_unresolved_issues;

    let workflow_id = match request.target {
      Some(workflow_id) => workflow_id,
      None => self.save_current().await?,
    };

    let is_current = self
      .collaborators
      .entities
      .selection()
      .is_current(&workflow_id);

    if is_current && issues_exist && self.config.issue_gate.blocks(desired_state) {
      debug!(
        workflow_id = %workflow_id,
        active = desired_state,
        "transition blocked by unresolved issues"
      );
      self
        .collaborators
        .notifications
        .show_message(issues_message(desired_state));
      return Err(ActivationError::UnresolvedIssues { workflow_id });
    }

    if desired_state {
      self
        .collaborators
        .events
        .track(TelemetryEvent::ActivationAttempted);
    }

    let update = ActivationUpdate {
      workflow_id: workflow_id.clone(),
      active: desired_state,
    };
    if let Err(source) = self.collaborators.gateway.update_activation(&update).await {
      let state = TargetState::from(desired_state);
      warn!(
        workflow_id = %workflow_id,
        error = %source,
        "failed to persist activation state"
      );
      self
        .collaborators
        .notifications
        .show_error(&source, &format!("Workflow could not be {state}:"));
      return Err(ActivationError::Persistence {
        workflow_id,
        state,
        source,
      });
    }

    self.collaborators.events.run_hook(HookEvent::for_scope(
      is_current,
      workflow_id.clone(),
      desired_state,
    ));
    self
      .collaborators
      .events
      .track(TelemetryEvent::ActivationStatusSet {
        workflow_identity: workflow_id.clone(),
        is_active: desired_state,
      });

    let change = ActivationChanged {
      workflow_id,
      active: desired_state,
    };
    // Errs only when nobody is subscribed
    let _ = self.changes.send(change.clone());
    drop(in_flight);

    info!(
      workflow_id = %change.workflow_id,
      active = change.active,
      current = is_current,
      "workflow activation changed"
    );

    if is_current {
      if desired_state && !self.collaborators.modal_flag.has_seen_activation_modal() {
        self
          .collaborators
          .notifications
          .open_modal(&self.config.modal_key);
      } else {
        self.collaborators.prompts.refresh_prompts();
      }
    }

    Ok(change)
  }

  async fn begin(&self) -> InFlight<'_> {
    let exclusive = match self.config.concurrency {
      ConcurrencyMode::Advisory => None,
      ConcurrencyMode::Exclusive => Some(self.exclusive.lock().await),
    };
    self.in_flight.send_replace(true);
    InFlight {
      flag: &self.in_flight,
      _exclusive: exclusive,
    }
  }

  /// Save the workflow in focus and return the identifier it was given.
  async fn save_current(&self) -> Result<WorkflowId, ActivationError> {
    if !self.collaborators.saver.save_current_workflow().await {
      debug!("workflow not saved, abandoning transition");
      return Err(ActivationError::NotSaved);
    }

    match self.collaborators.entities.selection().current {
      Some(workflow_id) => Ok(workflow_id),
      None => {
        warn!("workflow reported as saved but has no identifier");
        Err(ActivationError::NotSaved)
      }
    }
  }
}

fn issues_message(desired_state: bool) -> Message {
  let (title, verb) = if desired_state {
    ("Problem activating workflow", "activate")
  } else {
    ("Problem deactivating workflow", "deactivate")
  };
  Message {
    title: title.to_string(),
    message: format!("Please resolve outstanding issues before you {verb} it"),
    kind: MessageKind::Error,
  }
}
