//! # Warehouse Facade
//!
//! エージェント群（コンプライアンス、異常検知、脅威インテリジェンス、レポート）が
//! 使うデータアクセスの窓口

use std::sync::Arc;

use serde::Serialize;

use crate::application::dto::warehouse_config::WarehouseConfig;
use crate::application::use_cases::insert_records::InsertRecordsUseCase;
use crate::application::use_cases::query_records::QueryRecordsUseCase;
use crate::domain::entities::log_filter::LogFilter;
use crate::domain::entities::record::Record;
use crate::domain::error::WarehouseError;
use crate::domain::repositories::query_tracer::QueryTracer;
use crate::domain::repositories::warehouse_client::WarehouseClient;

/// ウェアハウスファサード
///
/// 状態は不変の設定と共有クライアントのみ。複数タスクから同時に呼び出してよい。
pub struct WarehouseFacade<W: WarehouseClient + ?Sized> {
    config: Arc<WarehouseConfig>,
    queries: QueryRecordsUseCase<W>,
    inserts: InsertRecordsUseCase<W>,
}

impl<W: WarehouseClient + ?Sized> WarehouseFacade<W> {
    /// 依存性を注入してファサードを作成
    ///
    /// # Arguments
    ///
    /// * `config` - プロジェクトID・データセット・テーブル名
    /// * `client` - ウェアハウスクライアント
    /// * `tracer` - クエリ・結果のトレース出力先
    pub fn new(config: WarehouseConfig, client: Arc<W>, tracer: Arc<dyn QueryTracer>) -> Self {
        let config = Arc::new(config);
        Self {
            queries: QueryRecordsUseCase::new(client.clone(), tracer.clone(), config.clone()),
            inserts: InsertRecordsUseCase::new(client, tracer, config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &WarehouseConfig {
        &self.config
    }

    pub async fn query_logs(
        &self,
        filter: &LogFilter,
        limit: u32,
    ) -> Result<Vec<Record>, WarehouseError> {
        self.queries.query_logs(filter, limit).await
    }

    pub async fn query_audit_logs(&self, limit: u32) -> Result<Vec<Record>, WarehouseError> {
        self.queries.query_audit_logs(limit).await
    }

    pub async fn query_security_logs(&self, limit: u32) -> Result<Vec<Record>, WarehouseError> {
        self.queries.query_security_logs(limit).await
    }

    pub async fn query_behavior_anomalies(
        &self,
        threshold: f64,
    ) -> Result<Vec<Record>, WarehouseError> {
        self.queries.query_behavior_anomalies(threshold).await
    }

    pub async fn insert_threat_intel<T: Serialize>(
        &self,
        items: &[T],
    ) -> Result<(), WarehouseError> {
        self.inserts.insert_threat_intel(items).await
    }

    pub async fn insert_anomalies(&self, records: Vec<Record>) -> Result<(), WarehouseError> {
        self.inserts.insert_anomalies(records).await
    }

    pub async fn insert_report_metadata(
        &self,
        report_id: &str,
        title: &str,
        generated_at: &str,
        sections: &[String],
        gcs_uri: &str,
    ) -> Result<(), WarehouseError> {
        self.inserts
            .insert_report_metadata(report_id, title, generated_at, sections, gcs_uri)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::query_statement::QueryStatement;
    use crate::domain::entities::table_ref::TableRef;
    use crate::domain::repositories::query_tracer::MockQueryTracer;
    use crate::domain::repositories::warehouse_client::MockWarehouseClient;

    #[test]
    fn test_config_is_exposed() {
        let facade = WarehouseFacade::new(
            WarehouseConfig::new("sec-prod", "telemetry"),
            Arc::new(MockWarehouseClient::new()),
            Arc::new(MockQueryTracer::new()),
        );

        assert_eq!(facade.config().project_id, "sec-prod");
        assert_eq!(facade.config().dataset, "telemetry");
    }

    #[tokio::test]
    async fn test_facade_shares_one_client() {
        let mut client = MockWarehouseClient::new();
        client
            .expect_run_query()
            .withf(|s: &QueryStatement| s.sql.contains("`sec-prod.telemetry.logs`"))
            .times(1)
            .returning(|_| Ok(vec![]));
        client
            .expect_insert_rows()
            .withf(|table: &TableRef, _: &Vec<Record>| table.table == "reports")
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let facade = WarehouseFacade::new(
            WarehouseConfig::new("sec-prod", "telemetry"),
            Arc::new(client),
            Arc::new(MockQueryTracer::new()),
        );

        facade.query_audit_logs(5).await.unwrap();
        facade
            .insert_report_metadata("r1", "Weekly", "2025-01-01T00:00:00Z", &[], "gs://b/o")
            .await
            .unwrap();
    }

    #[test]
    fn test_facade_accepts_trait_object_client() {
        let client: Arc<dyn WarehouseClient> = Arc::new(MockWarehouseClient::new());
        let facade = WarehouseFacade::new(
            WarehouseConfig::new("p", "d"),
            client,
            Arc::new(MockQueryTracer::new()),
        );

        assert_eq!(facade.config().logs_table().to_string(), "p.d.logs");
    }
}
