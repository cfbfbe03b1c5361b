//! # Insert Records Use Case
//!
//! 脅威インテリジェンス・異常検知結果・レポートメタデータの挿入ユースケース

use std::sync::Arc;

use log::{debug, error, info};
use serde::Serialize;
use serde_json::Value;

use crate::application::dto::warehouse_config::WarehouseConfig;
use crate::domain::entities::record::{InsertRowError, Record};
use crate::domain::entities::report_metadata::ReportMetadata;
use crate::domain::entities::table_ref::TableRef;
use crate::domain::error::WarehouseError;
use crate::domain::repositories::query_tracer::QueryTracer;
use crate::domain::repositories::warehouse_client::WarehouseClient;

/// レコード挿入ユースケース
///
/// 行単位のエラーが1件でもあればバッチ全体を失敗として扱う。
/// リトライや部分成功の報告は行わない。
pub struct InsertRecordsUseCase<W: WarehouseClient + ?Sized> {
    client: Arc<W>,
    tracer: Arc<dyn QueryTracer>,
    config: Arc<WarehouseConfig>,
}

impl<W: WarehouseClient + ?Sized> InsertRecordsUseCase<W> {
    /// 新しいユースケースを作成
    pub fn new(
        client: Arc<W>,
        tracer: Arc<dyn QueryTracer>,
        config: Arc<WarehouseConfig>,
    ) -> Self {
        Self {
            client,
            tracer,
            config,
        }
    }

    /// 集約済みの脅威インテリジェンスを保存する
    ///
    /// 各要素はJSONオブジェクトにシリアライズできなければならない
    ///
    /// # Errors
    ///
    /// シリアライズ失敗、挿入リクエストの失敗、行単位エラーのいずれか
    pub async fn insert_threat_intel<T: Serialize>(
        &self,
        items: &[T],
    ) -> Result<(), WarehouseError> {
        let rows = items
            .iter()
            .enumerate()
            .map(|(index, item)| to_record(index, item))
            .collect::<Result<Vec<_>, _>>()?;

        let table = self.config.threat_intel_table();
        debug!("Inserting {} threat intel rows into {}", rows.len(), table);

        let errors = self.insert_batch(&table, rows).await?;
        if errors.is_empty() {
            return Ok(());
        }

        self.tracer
            .trace("BQ insert_threat_intel errors", &errors_payload(&errors));
        Err(WarehouseError::InsertRejected {
            operation: "insert_threat_intel",
            table: table.to_string(),
            errors,
        })
    }

    /// 異常検知の予測結果を保存する
    ///
    /// # Errors
    ///
    /// 挿入リクエストの失敗または行単位エラー
    pub async fn insert_anomalies(&self, records: Vec<Record>) -> Result<(), WarehouseError> {
        let table = self.config.anomalies_table();
        let errors = self.insert_batch(&table, records).await?;
        Self::reject_on_errors("insert_anomalies", &table, errors)
    }

    /// レポートメタデータを1行として保存する
    ///
    /// # Errors
    ///
    /// 挿入リクエストの失敗または行単位エラー
    pub async fn insert_report_metadata(
        &self,
        report_id: &str,
        title: &str,
        generated_at: &str,
        sections: &[String],
        gcs_uri: &str,
    ) -> Result<(), WarehouseError> {
        let report = ReportMetadata::new(
            report_id,
            title,
            generated_at,
            sections.to_vec(),
            gcs_uri,
        );
        let record = to_record(0, &report)?;

        let table = self.config.reports_table();
        let errors = self.insert_batch(&table, vec![record]).await?;
        Self::reject_on_errors("insert_report_metadata", &table, errors)?;

        info!("Stored report metadata {} in {}", report_id, table);
        Ok(())
    }

    async fn insert_batch(
        &self,
        table: &TableRef,
        rows: Vec<Record>,
    ) -> Result<Vec<InsertRowError>, WarehouseError> {
        if rows.is_empty() {
            debug!("No rows to insert into {}", table);
            return Ok(Vec::new());
        }
        Ok(self.client.insert_rows(table, rows).await?)
    }

    fn reject_on_errors(
        operation: &'static str,
        table: &TableRef,
        errors: Vec<InsertRowError>,
    ) -> Result<(), WarehouseError> {
        if errors.is_empty() {
            return Ok(());
        }

        error!("Failed to {} into {}: {:?}", operation, table, errors);
        Err(WarehouseError::InsertRejected {
            operation,
            table: table.to_string(),
            errors,
        })
    }
}

fn to_record<T: Serialize + ?Sized>(index: usize, item: &T) -> Result<Record, WarehouseError> {
    match serde_json::to_value(item)? {
        Value::Object(map) => Ok(map),
        _ => Err(WarehouseError::NotAnObject { index }),
    }
}

fn errors_payload(errors: &[InsertRowError]) -> Value {
    Value::Array(
        errors
            .iter()
            .map(|e| serde_json::json!({ "index": e.index, "detail": e.detail }))
            .collect(),
    )
}
