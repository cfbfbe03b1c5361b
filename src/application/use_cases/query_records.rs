//! # Query Records Use Case
//!
//! ログ・異常検知結果の取得ユースケース

use std::sync::Arc;

use log::debug;
use serde_json::{json, Value};

use crate::application::dto::warehouse_config::WarehouseConfig;
use crate::domain::entities::log_filter::LogFilter;
use crate::domain::entities::query_statement::QueryStatement;
use crate::domain::entities::record::Record;
use crate::domain::error::WarehouseError;
use crate::domain::repositories::query_tracer::QueryTracer;
use crate::domain::repositories::warehouse_client::WarehouseClient;
use crate::domain::services::query_builder::QueryBuilder;

/// 監査ログを示す `log_type` の値
pub const AUDIT_LOG_TYPE: &str = "AUDIT";

/// レコード取得ユースケース
pub struct QueryRecordsUseCase<W: WarehouseClient + ?Sized> {
    client: Arc<W>,
    tracer: Arc<dyn QueryTracer>,
    config: Arc<WarehouseConfig>,
}

impl<W: WarehouseClient + ?Sized> QueryRecordsUseCase<W> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `client` - ウェアハウスクライアント
    /// * `tracer` - クエリ・結果のトレース出力先
    /// * `config` - ウェアハウス設定
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

    /// ログテーブルをフィルタ付きで検索する（timestamp 降順）
    ///
    /// # Errors
    ///
    /// フィルタが不正な場合、またはクエリ実行に失敗した場合
    pub async fn query_logs(
        &self,
        filter: &LogFilter,
        limit: u32,
    ) -> Result<Vec<Record>, WarehouseError> {
        let statement = QueryBuilder::logs_query(&self.config.logs_table(), filter, limit)?;
        debug!("BQ query_logs query: {}", statement.sql);

        let rows = self.client.run_query(&statement).await?;
        debug!("BQ query_logs returned {} rows", rows.len());
        Ok(rows)
    }

    /// 監査ログ（`log_type = 'AUDIT'`）を取得する
    pub async fn query_audit_logs(&self, limit: u32) -> Result<Vec<Record>, WarehouseError> {
        self.query_logs(&LogFilter::all().eq("log_type", AUDIT_LOG_TYPE), limit)
            .await
    }

    /// 全種別のログを取得する（フォレンジック用途）
    pub async fn query_security_logs(&self, limit: u32) -> Result<Vec<Record>, WarehouseError> {
        self.query_logs(&LogFilter::all(), limit).await
    }

    /// 異常スコアが閾値を超える予測結果を最大10件取得する
    ///
    /// # Errors
    ///
    /// 閾値が有限数でない場合、またはクエリ実行に失敗した場合
    pub async fn query_behavior_anomalies(
        &self,
        threshold: f64,
    ) -> Result<Vec<Record>, WarehouseError> {
        let statement = QueryBuilder::anomalies_query(&self.config.anomalies_table(), threshold)?;
        self.tracer
            .trace("BQ anomaly query", &statement_payload(&statement));

        let rows = self.client.run_query(&statement).await?;

        let results = Value::Array(rows.iter().cloned().map(Value::Object).collect());
        self.tracer.trace("BQ anomaly results", &results);
        Ok(rows)
    }
}

fn statement_payload(statement: &QueryStatement) -> Value {
    let params: serde_json::Map<String, Value> = statement
        .params
        .iter()
        .map(|p| (p.name.clone(), Value::String(p.value.to_api_string())))
        .collect();
    json!({ "sql": statement.sql, "params": params })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::query_statement::ParamValue;
    use crate::domain::repositories::query_tracer::MockQueryTracer;
    use crate::domain::repositories::warehouse_client::MockWarehouseClient;
    use std::sync::Mutex;

    /// 呼び出されたトレースを記録するだけのトレーサー
    #[derive(Default)]
    struct RecordingTracer {
        entries: Mutex<Vec<(String, Value)>>,
    }

    impl QueryTracer for RecordingTracer {
        fn trace(&self, label: &str, payload: &Value) {
            self.entries
                .lock()
                .unwrap()
                .push((label.to_string(), payload.clone()));
        }
    }

    fn config() -> Arc<WarehouseConfig> {
        Arc::new(WarehouseConfig::new("sec-prod", "telemetry"))
    }

    fn row(pairs: &[(&str, Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn use_case(
        client: MockWarehouseClient,
        tracer: Arc<dyn QueryTracer>,
    ) -> QueryRecordsUseCase<MockWarehouseClient> {
        QueryRecordsUseCase::new(Arc::new(client), tracer, config())
    }

    fn silent_tracer() -> Arc<dyn QueryTracer> {
        // ログ検索系はトレーサーを呼ばない
        Arc::new(MockQueryTracer::new())
    }

    #[tokio::test]
    async fn test_query_logs_builds_statement() {
        let mut client = MockWarehouseClient::new();
        client
            .expect_run_query()
            .withf(|s: &QueryStatement| {
                s.sql.contains("FROM `sec-prod.telemetry.logs`")
                    && s.sql.contains("WHERE `source` = @p0\n")
                    && s.sql.contains("ORDER BY timestamp DESC")
                    && s.sql.ends_with("LIMIT 50")
                    && s.param("p0") == Some(&ParamValue::from("cloudtrail"))
            })
            .times(1)
            .returning(|_| Ok(vec![]));

        let result = use_case(client, silent_tracer())
            .query_logs(&LogFilter::all().eq("source", "cloudtrail"), 50)
            .await;

        assert!(result.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_logs_preserves_all_columns() {
        let returned = vec![
            row(&[
                ("timestamp", json!("2025-01-01T00:00:00Z")),
                ("log_type", json!("AUDIT")),
                ("principal", json!("alice@example.com")),
                ("details", json!({"action": "SetIamPolicy"})),
                ("tags", json!(["iam", "critical"])),
                ("bytes", Value::Null),
            ]),
            row(&[("timestamp", json!("2024-12-31T23:59:59Z")), ("zz_last", json!(1))]),
        ];
        let expected = returned.clone();

        let mut client = MockWarehouseClient::new();
        client
            .expect_run_query()
            .times(1)
            .returning(move |_| Ok(returned.clone()));

        let rows = use_case(client, silent_tracer())
            .query_logs(&LogFilter::all(), 10)
            .await
            .unwrap();

        assert_eq!(rows, expected);
        let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["timestamp", "log_type", "principal", "details", "tags", "bytes"]
        );
    }

    #[tokio::test]
    async fn test_query_logs_invalid_filter_skips_remote_call() {
        // run_query の期待値なし: 呼ばれたらパニック
        let client = MockWarehouseClient::new();

        let result = use_case(client, silent_tracer())
            .query_logs(&LogFilter::all().eq("x; DROP", "y"), 10)
            .await;

        assert!(matches!(result, Err(WarehouseError::InvalidFilter(_))));
    }

    #[tokio::test]
    async fn test_query_logs_remote_error_propagates() {
        let mut client = MockWarehouseClient::new();
        client
            .expect_run_query()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("400 Syntax error: Unexpected keyword")));

        let err = use_case(client, silent_tracer())
            .query_logs(&LogFilter::all(), 10)
            .await
            .unwrap_err();

        assert!(matches!(err, WarehouseError::Remote(_)));
        assert!(err.to_string().contains("Syntax error"));
    }

    #[tokio::test]
    async fn test_query_audit_logs_uses_audit_condition() {
        let mut client = MockWarehouseClient::new();
        client
            .expect_run_query()
            .withf(|s: &QueryStatement| {
                s.sql.contains("WHERE `log_type` = @p0\n")
                    && s.sql.ends_with("LIMIT 1000")
                    && s.param("p0") == Some(&ParamValue::String(AUDIT_LOG_TYPE.to_string()))
            })
            .times(1)
            .returning(|_| Ok(vec![]));

        use_case(client, silent_tracer())
            .query_audit_logs(1000)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_query_security_logs_matches_all() {
        let mut client = MockWarehouseClient::new();
        client
            .expect_run_query()
            .withf(|s: &QueryStatement| s.sql.contains("WHERE TRUE\n") && s.params.is_empty())
            .times(1)
            .returning(|_| Ok(vec![]));

        use_case(client, silent_tracer())
            .query_security_logs(200)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_query_behavior_anomalies_capped_and_traced() {
        let returned = vec![row(&[
            ("entity_id", json!("vm-17")),
            ("anomaly_score", json!(0.97)),
            ("timestamp", json!("2025-01-01T00:00:00Z")),
        ])];
        let expected = returned.clone();

        let mut client = MockWarehouseClient::new();
        client
            .expect_run_query()
            .withf(|s: &QueryStatement| {
                s.sql.contains("FROM `sec-prod.telemetry.anomaly_predictions`")
                    && s.sql.contains("anomaly_score > @threshold")
                    && s.sql.ends_with("LIMIT 10")
                    && s.param("threshold") == Some(&ParamValue::Float64(0.9))
            })
            .times(1)
            .returning(move |_| Ok(returned.clone()));

        let tracer = Arc::new(RecordingTracer::default());
        let rows = use_case(client, tracer.clone())
            .query_behavior_anomalies(0.9)
            .await
            .unwrap();

        assert_eq!(rows, expected);

        let entries = tracer.entries.lock().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "BQ anomaly query");
        assert_eq!(entries[0].1["params"]["threshold"], "0.9");
        assert!(entries[0].1["sql"].as_str().unwrap().contains("LIMIT 10"));
        assert_eq!(entries[1].0, "BQ anomaly results");
        assert_eq!(entries[1].1[0]["entity_id"], "vm-17");
    }

    #[tokio::test]
    async fn test_query_behavior_anomalies_rejects_nan() {
        let client = MockWarehouseClient::new();

        let result = use_case(client, silent_tracer())
            .query_behavior_anomalies(f64::NAN)
            .await;

        assert!(matches!(result, Err(WarehouseError::InvalidFilter(_))));
    }
}
