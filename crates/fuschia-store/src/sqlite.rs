use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::debug;

use crate::{Error, Store, WorkflowRecord};

/// SQLite-based store implementation.
#[derive(Debug, Clone)]
pub struct SqliteStore {
  pool: SqlitePool,
}

impl SqliteStore {
  /// Create a new SQLite store with the given connection pool.
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }

  /// Open the database at `url`, creating the file if it does not exist.
  pub async fn connect(url: &str) -> Result<Self, Error> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
      .max_connections(4)
      .connect_with(options)
      .await?;
    Ok(Self::new(pool))
  }

  /// Open a private in-memory database.
  ///
  /// Every connection to `:memory:` gets its own database, so the pool is
  /// pinned to a single connection that is never recycled.
  pub async fn in_memory() -> Result<Self, Error> {
    let pool = SqlitePoolOptions::new()
      .max_connections(1)
      .min_connections(1)
      .idle_timeout(None)
      .max_lifetime(None)
      .connect("sqlite::memory:")
      .await?;
    Ok(Self::new(pool))
  }

  /// Run database migrations.
  pub async fn migrate(&self) -> Result<(), Error> {
    sqlx::migrate!("../../migrations").run(&self.pool).await?;
    Ok(())
  }
}

#[async_trait]
impl Store for SqliteStore {
  async fn create_workflow(&self, name: &str) -> Result<WorkflowRecord, Error> {
    let now = Utc::now();
    let record = WorkflowRecord {
      workflow_id: uuid::Uuid::new_v4().to_string(),
      name: name.to_string(),
      active: false,
      unresolved_issues: 0,
      created_at: now,
      updated_at: now,
    };

    sqlx::query(
      r#"
            INSERT INTO workflows (workflow_id, name, active, unresolved_issues, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
    )
    .bind(&record.workflow_id)
    .bind(&record.name)
    .bind(record.active)
    .bind(record.unresolved_issues)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(&self.pool)
    .await?;

    debug!(workflow_id = %record.workflow_id, name = %record.name, "workflow created");
    Ok(record)
  }

  async fn get_workflow(&self, workflow_id: &str) -> Result<WorkflowRecord, Error> {
    sqlx::query_as(
      r#"
            SELECT workflow_id, name, active, unresolved_issues, created_at, updated_at
            FROM workflows
            WHERE workflow_id = ?
            "#,
    )
    .bind(workflow_id)
    .fetch_optional(&self.pool)
    .await?
    .ok_or_else(|| Error::NotFound(workflow_id.to_string()))
  }

  async fn list_workflows(&self) -> Result<Vec<WorkflowRecord>, Error> {
    let records = sqlx::query_as(
      r#"
            SELECT workflow_id, name, active, unresolved_issues, created_at, updated_at
            FROM workflows
            ORDER BY created_at DESC
            "#,
    )
    .fetch_all(&self.pool)
    .await?;

    Ok(records)
  }

  async fn set_active(&self, workflow_id: &str, active: bool) -> Result<(), Error> {
    let result = sqlx::query(
      r#"
            UPDATE workflows
            SET active = ?, updated_at = ?
            WHERE workflow_id = ?
            "#,
    )
    .bind(active)
    .bind(Utc::now())
    .bind(workflow_id)
    .execute(&self.pool)
    .await?;

    if result.rows_affected() == 0 {
      return Err(Error::NotFound(workflow_id.to_string()));
    }
    Ok(())
  }

  async fn set_unresolved_issues(&self, workflow_id: &str, count: i64) -> Result<(), Error> {
    let result = sqlx::query(
      r#"
            UPDATE workflows
            SET unresolved_issues = ?, updated_at = ?
            WHERE workflow_id = ?
            "#,
    )
    .bind(count)
    .bind(Utc::now())
    .bind(workflow_id)
    .execute(&self.pool)
    .await?;

    if result.rows_affected() == 0 {
      return Err(Error::NotFound(workflow_id.to_string()));
    }
    Ok(())
  }

  async fn get_setting(&self, key: &str) -> Result<Option<String>, Error> {
    let value = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
      .bind(key)
      .fetch_optional(&self.pool)
      .await?;

    Ok(value)
  }

  async fn set_setting(&self, key: &str, value: &str) -> Result<(), Error> {
    sqlx::query(
      r#"
            INSERT INTO settings (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
    )
    .bind(key)
    .bind(value)
    .execute(&self.pool)
    .await?;

    Ok(())
  }

  async fn delete_setting(&self, key: &str) -> Result<(), Error> {
    sqlx::query("DELETE FROM settings WHERE key = ?")
      .bind(key)
      .execute(&self.pool)
      .await?;

    Ok(())
  }
}
