//! Facade Bootstrap
//!
//! 設定から本番用のファサードを組み立てる（依存性注入）

use anyhow::Result;
use log::info;
use std::sync::Arc;

use crate::adapter::auth::create_bigquery_client;
use crate::adapter::bigquery::BigQueryWarehouseClient;
use crate::adapter::config::Config;
use crate::adapter::log_tracer::LogQueryTracer;
use crate::application::WarehouseFacade;

/// BigQuery に接続したファサード
pub type BigQueryFacade = WarehouseFacade<BigQueryWarehouseClient>;

/// 設定ファイルを読み込んで接続する
#[cfg_attr(coverage_nightly, coverage(off))]
pub async fn connect_from_file(path: &str) -> Result<BigQueryFacade> {
    let config = Config::load(path)?;
    connect(&config).await
}

/// 認証してBigQueryクライアントを作成し、ファサードを返す
#[cfg_attr(coverage_nightly, coverage(off))]
pub async fn connect(config: &Config) -> Result<BigQueryFacade> {
    let client = create_bigquery_client(config.service_account_key_path.as_deref()).await?;
    info!(
        "Connected to BigQuery (project: {}, dataset: {})",
        config.project_id, config.dataset
    );

    let warehouse = BigQueryWarehouseClient::new(
        client,
        config.project_id.clone(),
        config.query_timeout_ms,
    );

    Ok(WarehouseFacade::new(
        config.warehouse_config(),
        Arc::new(warehouse),
        Arc::new(LogQueryTracer::new()),
    ))
}
