use std::path::Path;

use anyhow::{Context, Result};
use fuschia_activation::ControllerConfig;
use serde::{Deserialize, Serialize};

/// Settings read from `<data-dir>/config.json`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// Database URL (default: `sqlite://<data-dir>/fuschia.db`)
  pub database_url: Option<String>,

  /// Settings key recording that the activation notice was shown.
  pub activation_flag_key: Option<String>,

  pub controller: ControllerConfig,
}

impl AppConfig {
  pub const FILE_NAME: &'static str = "config.json";
  const DEFAULT_FLAG_KEY: &'static str = "hide_activation_alert";

  /// Load the config from `data_dir`, falling back to defaults if absent.
  pub async fn load(data_dir: &Path) -> Result<Self> {
    let path = data_dir.join(Self::FILE_NAME);
    let exists = tokio::fs::try_exists(&path)
      .await
      .with_context(|| format!("failed to check config file: {}", path.display()))?;
    if !exists {
      return Ok(Self::default());
    }

    let content = tokio::fs::read_to_string(&path)
      .await
      .with_context(|| format!("failed to read config file: {}", path.display()))?;

    serde_json::from_str(&content)
      .with_context(|| format!("failed to parse config file: {}", path.display()))
  }

  pub fn database_url(&self, data_dir: &Path) -> String {
    self
      .database_url
      .clone()
      .unwrap_or_else(|| format!("sqlite://{}", data_dir.join("fuschia.db").display()))
  }

  pub fn activation_flag_key(&self) -> &str {
    self
      .activation_flag_key
      .as_deref()
      .unwrap_or(Self::DEFAULT_FLAG_KEY)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use fuschia_activation::{ConcurrencyMode, IssueGate};

  #[tokio::test]
  async fn test_missing_file_uses_defaults() {
    let temp_dir = tempfile::tempdir().unwrap();

    let config = AppConfig::load(temp_dir.path()).await.unwrap();

    assert_eq!(config, AppConfig::default());
    assert_eq!(config.activation_flag_key(), "hide_activation_alert");
    assert!(config.database_url(temp_dir.path()).ends_with("fuschia.db"));
  }

  #[tokio::test]
  async fn test_load_from_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(
      temp_dir.path().join(AppConfig::FILE_NAME),
      r#"{
        "database_url": "sqlite::memory:",
        "controller": { "concurrency": "exclusive", "issue_gate": "all_transitions" }
      }"#,
    )
    .unwrap();

    let config = AppConfig::load(temp_dir.path()).await.unwrap();

    assert_eq!(config.database_url(temp_dir.path()), "sqlite::memory:");
    assert_eq!(config.controller.concurrency, ConcurrencyMode::Exclusive);
    assert_eq!(config.controller.issue_gate, IssueGate::AllTransitions);
  }

  #[tokio::test]
  async fn test_unreadable_data_dir_is_an_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let not_a_dir = temp_dir.path().join("data");
    std::fs::write(&not_a_dir, "").unwrap();

    let error = AppConfig::load(&not_a_dir).await.unwrap_err();

    assert!(error.to_string().starts_with("failed to check config file"));
  }

  #[tokio::test]
  async fn test_invalid_file_is_an_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(temp_dir.path().join(AppConfig::FILE_NAME), "not json").unwrap();

    assert!(AppConfig::load(temp_dir.path()).await.is_err());
  }
}
