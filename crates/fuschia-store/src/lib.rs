//! Fuschia Store
//!
//! This crate provides the storage trait and implementations for workflow
//! records and user settings. Data is persisted to SQLite.
//!
//! The [`Store`] trait defines operations for:
//! - Creating workflows and assigning their identifiers
//! - Updating a workflow's activation state
//! - Reading and writing durable settings flags

mod sqlite;
mod types;

pub use sqlite::SqliteStore;
pub use types::WorkflowRecord;

use async_trait::async_trait;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// The requested record was not found.
  #[error("not found: {0}")]
  NotFound(String),

  /// A database error occurred.
  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),

  /// Applying migrations failed.
  #[error("migration error: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Storage trait for workflows and settings.
#[async_trait]
pub trait Store: Send + Sync {
  /// Create a new, inactive workflow with a freshly assigned identifier.
  async fn create_workflow(&self, name: &str) -> Result<WorkflowRecord, Error>;

  /// Get a workflow by ID.
  async fn get_workflow(&self, workflow_id: &str) -> Result<WorkflowRecord, Error>;

  /// List all workflows, newest first.
  async fn list_workflows(&self) -> Result<Vec<WorkflowRecord>, Error>;

  /// Set whether a workflow is active.
  async fn set_active(&self, workflow_id: &str, active: bool) -> Result<(), Error>;

  /// Record how many unresolved node issues a workflow has.
  async fn set_unresolved_issues(&self, workflow_id: &str, count: i64) -> Result<(), Error>;

  /// Get a setting value.
  async fn get_setting(&self, key: &str) -> Result<Option<String>, Error>;

  /// Insert or replace a setting value.
  async fn set_setting(&self, key: &str, value: &str) -> Result<(), Error>;

  /// Remove a setting.
  async fn delete_setting(&self, key: &str) -> Result<(), Error>;
}
