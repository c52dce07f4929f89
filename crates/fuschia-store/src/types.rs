use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A workflow as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct WorkflowRecord {
  pub workflow_id: String,
  pub name: String,
  pub active: bool,
  /// Number of node issues that must be fixed before the workflow can run.
  pub unresolved_issues: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl WorkflowRecord {
  pub fn has_unresolved_issues(&self) -> bool {
    self.unresolved_issues > 0
  }
}
