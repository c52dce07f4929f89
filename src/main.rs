use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use fuschia_activation::{
  ActivationChanged, ActivationController, ActivationError, Collaborators, WorkflowId,
};
use fuschia_store::{SqliteStore, Store};

mod config;
mod session;

use config::AppConfig;
use session::CliSession;

/// Fuschia - workflow activation management
#[derive(Parser)]
#[command(name = "fuschia")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.fuschia)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Manage workflows
  Workflow {
    #[command(subcommand)]
    action: WorkflowCommand,
  },

  /// Manage user settings
  Settings {
    #[command(subcommand)]
    action: SettingsCommand,
  },
}

#[derive(Subcommand)]
enum WorkflowCommand {
  /// Create a new, inactive workflow
  Create { name: String },

  /// List workflows and their activation state
  List,

  /// Record the number of unresolved node issues for a workflow
  Issues { workflow_id: String, count: i64 },

  /// Activate a workflow
  ///
  /// Without a workflow ID the open workflow is activated. If nothing is
  /// open, a new draft is saved first.
  Activate {
    workflow_id: Option<String>,

    /// The workflow currently open in the editor
    #[arg(long)]
    open: Option<String>,

    /// Name for the draft saved when nothing is open
    #[arg(long, default_value = "My workflow")]
    name: String,
  },

  /// Deactivate a workflow
  Deactivate {
    workflow_id: String,

    /// The workflow currently open in the editor
    #[arg(long)]
    open: Option<String>,
  },
}

#[derive(Subcommand)]
enum SettingsCommand {
  /// Show the activation notice again on the next activation
  ResetActivationAlert,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".fuschia"),
  };

  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async {
    match cli.command {
      Some(Commands::Workflow { action }) => run_workflow_command(action, &data_dir).await,
      Some(Commands::Settings { action }) => run_settings_command(action, &data_dir).await,
      None => {
        println!("fuschia - use --help to see available commands");
        Ok(())
      }
    }
  })
}

async fn open_store(data_dir: &Path, config: &AppConfig) -> Result<SqliteStore> {
  tokio::fs::create_dir_all(data_dir)
    .await
    .with_context(|| format!("failed to create data directory: {}", data_dir.display()))?;

  let url = config.database_url(data_dir);
  let store = SqliteStore::connect(&url)
    .await
    .with_context(|| format!("failed to open database: {}", url))?;
  store.migrate().await.context("failed to migrate database")?;
  Ok(store)
}

async fn run_workflow_command(action: WorkflowCommand, data_dir: &Path) -> Result<()> {
  let config = AppConfig::load(data_dir).await?;
  let store = open_store(data_dir, &config).await?;

  match action {
    WorkflowCommand::Create { name } => {
      let record = store.create_workflow(&name).await?;
      println!("{}", record.workflow_id);
    }
    WorkflowCommand::List => {
      for record in store.list_workflows().await? {
        let state = if record.active { "active" } else { "inactive" };
        println!(
          "{}\t{}\t{}\tissues={}",
          record.workflow_id, state, record.name, record.unresolved_issues
        );
      }
    }
    WorkflowCommand::Issues { workflow_id, count } => {
      store
        .set_unresolved_issues(&workflow_id, count)
        .await
        .with_context(|| format!("failed to update workflow '{}'", workflow_id))?;
    }
    WorkflowCommand::Activate {
      workflow_id,
      open,
      name,
    } => {
      let target = workflow_id.map(WorkflowId::new);
      let targets_open = target.is_none();
      transition(&config, store, open, name, move |controller| async move {
        if targets_open {
          controller.activate().await
        } else {
          controller.set_activation(target, true).await
        }
      })
      .await?
      .report();
    }
    WorkflowCommand::Deactivate { workflow_id, open } => {
      let target = WorkflowId::new(workflow_id);
      transition(
        &config,
        store,
        open,
        String::new(),
        move |controller| async move { controller.deactivate(target).await },
      )
      .await?
      .report();
    }
  }

  Ok(())
}

/// What a CLI transition did besides changing state.
#[derive(Debug)]
struct TransitionSummary {
  change: ActivationChanged,
  modal_opened: bool,
  prompts_refreshed: bool,
}

impl TransitionSummary {
  fn report(&self) {
    debug!(
      modal_opened = self.modal_opened,
      prompts_refreshed = self.prompts_refreshed,
      "transition finished"
    );
    let state = if self.change.active { "active" } else { "inactive" };
    println!("{}\t{}", self.change.workflow_id, state);
  }
}

/// Run one transition against a fresh session and record the modal flag.
async fn transition<F, Fut>(
  config: &AppConfig,
  store: SqliteStore,
  open: Option<String>,
  draft_name: String,
  run: F,
) -> Result<TransitionSummary>
where
  F: FnOnce(Arc<ActivationController>) -> Fut,
  Fut: std::future::Future<Output = Result<ActivationChanged, ActivationError>>,
{
  let flag_key = config.activation_flag_key();
  let session = Arc::new(
    CliSession::load(store.clone(), open.as_deref(), draft_name, flag_key)
      .await
      .context("failed to load open workflow")?,
  );

  let collaborators = Collaborators {
    entities: session.clone(),
    saver: session.clone(),
    gateway: session.clone(),
    notifications: session.clone(),
    events: session.clone(),
    modal_flag: session.clone(),
    prompts: session.clone(),
  };
  let controller = Arc::new(ActivationController::new(
    collaborators,
    config.controller.clone(),
  ));

  let change = run(controller).await.context("workflow activation failed")?;

  if session.modal_opened() {
    store
      .set_setting(flag_key, "true")
      .await
      .context("failed to record activation notice")?;
  }

  Ok(TransitionSummary {
    change,
    modal_opened: session.modal_opened(),
    prompts_refreshed: session.prompts_refreshed(),
  })
}

async fn run_settings_command(action: SettingsCommand, data_dir: &Path) -> Result<()> {
  let config = AppConfig::load(data_dir).await?;
  let store = open_store(data_dir, &config).await?;

  match action {
    SettingsCommand::ResetActivationAlert => {
      store.delete_setting(config.activation_flag_key()).await?;
    }
  }

  Ok(())
}
