//! Terminal-backed collaborators for the activation controller.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use fuschia_activation::{
  ActivationModalFlag, ActivationUpdate, EntityStore, EventEmitter, GatewayError, HookEvent,
  Message, MessageKind, NotificationSink, PersistenceGateway, PromptRefresher, SelectionContext,
  TelemetryEvent, WorkflowId, WorkflowSaver,
};
use fuschia_store::{SqliteStore, Store};
use tracing::{debug, error, info};

/// One CLI invocation's view of the workflow in focus.
///
/// The selection and the modal flag are loaded up front because the
/// controller reads them synchronously.
pub struct CliSession {
  store: SqliteStore,
  selection: Mutex<SelectionContext>,
  draft_name: String,
  seen_modal: bool,
  modal_opened: AtomicBool,
  prompts_refreshed: AtomicBool,
}

impl CliSession {
  /// Load the session state.
  ///
  /// `open` is the workflow in focus. When it is `None` the focus is an
  /// unsaved draft named `draft_name`.
  pub async fn load(
    store: SqliteStore,
    open: Option<&str>,
    draft_name: String,
    flag_key: &str,
  ) -> Result<Self, fuschia_store::Error> {
    let selection = match open {
      Some(workflow_id) => {
        let record = store.get_workflow(workflow_id).await?;
        SelectionContext {
          has_unresolved_issues: record.has_unresolved_issues(),
          current: Some(WorkflowId::new(record.workflow_id)),
        }
      }
      None => SelectionContext::default(),
    };
    let seen_modal = store.get_setting(flag_key).await?.as_deref() == Some("true");

    Ok(Self {
      store,
      selection: Mutex::new(selection),
      draft_name,
      seen_modal,
      modal_opened: AtomicBool::new(false),
      prompts_refreshed: AtomicBool::new(false),
    })
  }

  /// Whether the activation modal was shown during this session.
  pub fn modal_opened(&self) -> bool {
    self.modal_opened.load(Ordering::SeqCst)
  }

  /// Whether prompt data was refreshed during this session.
  pub fn prompts_refreshed(&self) -> bool {
    self.prompts_refreshed.load(Ordering::SeqCst)
  }

  fn lock_selection(&self) -> std::sync::MutexGuard<'_, SelectionContext> {
    self
      .selection
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

impl EntityStore for CliSession {
  fn selection(&self) -> SelectionContext {
    self.lock_selection().clone()
  }
}

#[async_trait]
impl WorkflowSaver for CliSession {
  async fn save_current_workflow(&self) -> bool {
    match self.store.create_workflow(&self.draft_name).await {
      Ok(record) => {
        eprintln!("Saved workflow '{}' as {}", record.name, record.workflow_id);
        self.lock_selection().current = Some(WorkflowId::new(record.workflow_id));
        true
      }
      Err(e) => {
        error!(name = %self.draft_name, error = %e, "failed to save workflow");
        eprintln!("Problem saving workflow: {}", e);
        false
      }
    }
  }
}

#[async_trait]
impl PersistenceGateway for CliSession {
  async fn update_activation(&self, update: &ActivationUpdate) -> Result<(), GatewayError> {
    self
      .store
      .set_active(update.workflow_id.as_str(), update.active)
      .await
      .map_err(|e| match e {
        fuschia_store::Error::NotFound(id) => GatewayError::NotFound(id),
        other => GatewayError::Backend(Box::new(other)),
      })
  }
}

impl NotificationSink for CliSession {
  fn show_message(&self, message: Message) {
    let label = match message.kind {
      MessageKind::Info => "info",
      MessageKind::Success => "ok",
      MessageKind::Warning => "warning",
      MessageKind::Error => "error",
    };
    eprintln!("[{}] {}: {}", label, message.title, message.message);
  }

  fn show_error(&self, error: &(dyn std::error::Error + Send + Sync), title: &str) {
    eprintln!("[error] {} {}", title, error);
  }

  fn open_modal(&self, key: &str) {
    debug!(modal = key, "opening modal");
    eprintln!();
    eprintln!("Your workflow is now active.");
    eprintln!("It will run automatically whenever its trigger fires.");
    eprintln!("Manual runs from the editor are not affected by this setting.");
    self.modal_opened.store(true, Ordering::SeqCst);
  }
}

impl EventEmitter for CliSession {
  fn track(&self, event: TelemetryEvent) {
    debug!(
      target: "fuschia::telemetry",
      event = event.name(),
      properties = ?event.properties(),
      "telemetry"
    );
  }

  fn run_hook(&self, event: HookEvent) {
    info!(
      target: "fuschia::hooks",
      hook = event.name(),
      payload = %event.payload(),
      "hook"
    );
  }
}

impl ActivationModalFlag for CliSession {
  fn has_seen_activation_modal(&self) -> bool {
    self.seen_modal
  }
}

impl PromptRefresher for CliSession {
  fn refresh_prompts(&self) {
    debug!("refreshing prompts");
    self.prompts_refreshed.store(true, Ordering::SeqCst);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  async fn test_store() -> SqliteStore {
    let store = SqliteStore::in_memory().await.unwrap();
    store.migrate().await.unwrap();
    store
  }

  #[tokio::test]
  async fn test_load_open_workflow_reads_issues() {
    let store = test_store().await;
    let record = store.create_workflow("wf").await.unwrap();
    store
      .set_unresolved_issues(&record.workflow_id, 2)
      .await
      .unwrap();

    let session = CliSession::load(store, Some(record.workflow_id.as_str()), "draft".into(), "seen")
      .await
      .unwrap();

    let selection = session.selection();
    assert_eq!(selection.current, Some(WorkflowId::new(record.workflow_id)));
    assert!(selection.has_unresolved_issues);
    assert!(!session.has_seen_activation_modal());
  }

  #[tokio::test]
  async fn test_save_assigns_identifier() {
    let store = test_store().await;
    let session = CliSession::load(store.clone(), None, "draft".into(), "seen")
      .await
      .unwrap();

    assert!(session.selection().current.is_none());
    assert!(session.save_current_workflow().await);

    let current = session.selection().current.unwrap();
    let record = store.get_workflow(current.as_str()).await.unwrap();
    assert_eq!(record.name, "draft");
  }

  #[tokio::test]
  async fn test_gateway_maps_missing_workflow() {
    let store = test_store().await;
    let session = CliSession::load(store, None, "draft".into(), "seen")
      .await
      .unwrap();

    let result = session
      .update_activation(&ActivationUpdate {
        workflow_id: "missing".into(),
        active: true,
      })
      .await;

    assert!(matches!(result, Err(GatewayError::NotFound(_))));
  }

  #[tokio::test]
  async fn test_seen_flag_loaded_from_settings() {
    let store = test_store().await;
    store.set_setting("seen", "true").await.unwrap();

    let session = CliSession::load(store, None, "draft".into(), "seen")
      .await
      .unwrap();

    assert!(session.has_seen_activation_modal());
  }
}
