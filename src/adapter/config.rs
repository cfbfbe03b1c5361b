//! Configuration File
//!
//! JSON設定ファイルの読み込み

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::application::dto::warehouse_config::{TableNames, WarehouseConfig};

/// Default server-side wait per query/getQueryResults request (milliseconds)
pub const DEFAULT_QUERY_TIMEOUT_MS: i64 = 60_000;

fn default_query_timeout_ms() -> i64 {
    DEFAULT_QUERY_TIMEOUT_MS
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub project_id: String,
    pub dataset: String,

    // Authentication (falls back to ambient credentials when absent)
    #[serde(default)]
    pub service_account_key_path: Option<String>,

    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: i64,

    #[serde(default)]
    pub tables: TableNames,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        let config: Config =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;
        Ok(config)
    }

    pub fn warehouse_config(&self) -> WarehouseConfig {
        WarehouseConfig::new(&self.project_id, &self.dataset).with_tables(self.tables.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_minimal() {
        let file = write_config(r#"{"project_id": "sec-prod", "dataset": "telemetry"}"#);

        let config = Config::load(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.project_id, "sec-prod");
        assert_eq!(config.dataset, "telemetry");
        assert!(config.service_account_key_path.is_none());
        assert_eq!(config.query_timeout_ms, DEFAULT_QUERY_TIMEOUT_MS);
        assert_eq!(config.tables, TableNames::default());
    }

    #[test]
    fn test_load_full() {
        let file = write_config(
            r#"{
  "project_id": "sec-prod",
  "dataset": "telemetry",
  "service_account_key_path": "~/.config/gcloud/sa.json",
  "query_timeout_ms": 5000,
  "tables": {"logs": "audit_stream", "reports": "report_index"}
}"#,
        );

        let config = Config::load(file.path().to_str().unwrap()).unwrap();

        assert_eq!(
            config.service_account_key_path.as_deref(),
            Some("~/.config/gcloud/sa.json")
        );
        assert_eq!(config.query_timeout_ms, 5000);
        assert_eq!(config.tables.logs, "audit_stream");
        assert_eq!(config.tables.anomaly_predictions, "anomaly_predictions");
        assert_eq!(config.tables.reports, "report_index");
    }

    #[test]
    fn test_warehouse_config() {
        let file = write_config(
            r#"{"project_id": "p", "dataset": "d", "tables": {"threat_intel": "ioc"}}"#,
        );

        let warehouse = Config::load(file.path().to_str().unwrap())
            .unwrap()
            .warehouse_config();

        assert_eq!(warehouse.threat_intel_table().to_string(), "p.d.ioc");
        assert_eq!(warehouse.logs_table().to_string(), "p.d.logs");
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/sentinel-bq/config.json");
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("Failed to read config file"));
    }

    #[test]
    fn test_load_missing_dataset() {
        let file = write_config(r#"{"project_id": "p"}"#);
        let result = Config::load(file.path().to_str().unwrap());
        assert!(result.is_err());
    }
}
