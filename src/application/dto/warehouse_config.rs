//! # Warehouse Configuration DTO
//!
//! ファサードの設定（ファサードの生存期間中は不変）

use serde::{Deserialize, Serialize};

use crate::domain::entities::table_ref::TableRef;

/// テーブル名
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TableNames {
    /// セキュリティ・監査ログ
    pub logs: String,
    /// 異常検知の予測結果
    pub anomaly_predictions: String,
    /// 集約済み脅威インテリジェンス
    pub threat_intel: String,
    /// レポートメタデータ
    pub reports: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            logs: "logs".to_string(),
            anomaly_predictions: "anomaly_predictions".to_string(),
            threat_intel: "threat_intel".to_string(),
            reports: "reports".to_string(),
        }
    }
}

/// ウェアハウス設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseConfig {
    /// GCPプロジェクトID
    pub project_id: String,
    /// BigQueryデータセット名
    pub dataset: String,
    /// テーブル名
    pub tables: TableNames,
}

impl WarehouseConfig {
    /// 既定のテーブル名で設定を作成します。
    ///
    /// # 例
    ///
    /// ```
    /// use sentinel_bq::application::dto::warehouse_config::WarehouseConfig;
    ///
    /// let config = WarehouseConfig::new("sec-prod", "telemetry");
    ///
    /// assert_eq!(config.logs_table().to_string(), "sec-prod.telemetry.logs");
    /// assert_eq!(
    ///     config.anomalies_table().to_string(),
    ///     "sec-prod.telemetry.anomaly_predictions"
    /// );
    /// ```
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
            tables: TableNames::default(),
        }
    }

    /// テーブル名を差し替える
    pub fn with_tables(mut self, tables: TableNames) -> Self {
        self.tables = tables;
        self
    }

    fn table(&self, name: &str) -> TableRef {
        TableRef::new(&self.project_id, &self.dataset, name)
    }

    pub fn logs_table(&self) -> TableRef {
        self.table(&self.tables.logs)
    }

    pub fn anomalies_table(&self) -> TableRef {
        self.table(&self.tables.anomaly_predictions)
    }

    pub fn threat_intel_table(&self) -> TableRef {
        self.table(&self.tables.threat_intel)
    }

    pub fn reports_table(&self) -> TableRef {
        self.table(&self.tables.reports)
    }
}
