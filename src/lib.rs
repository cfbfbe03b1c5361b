//! # Sentinel BQ
//!
//! セキュリティエージェント群（コンプライアンス、異常検知、脅威インテリジェンス、
//! レポート）向けの BigQuery データアクセスファサード
//!
//! このプロジェクトはクリーンアーキテクチャを採用しており、以下の4層で構成されています：
//!
//! - **Domain層**: レコード、クエリ組み立て、ポート（外部依存なし）
//! - **Application層**: ユースケースとファサード
//! - **Adapter層**: BigQuery、設定ファイル、ログとの統合
//! - **Driver層**: 依存性注入
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use sentinel_bq::domain::entities::log_filter::LogFilter;
//!
//! let facade = sentinel_bq::driver::connect_from_file("./config.json").await?;
//!
//! let audit = facade.query_audit_logs(100).await?;
//! let failed_logins = facade
//!     .query_logs(&LogFilter::all().eq("event", "login_failed"), 50)
//!     .await?;
//! let anomalies = facade.query_behavior_anomalies(0.8).await?;
//! # let _ = (audit, failed_logins, anomalies);
//! # Ok(())
//! # }
//! ```

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
// カバレッジ計測時に外部サービス依存コードを除外するために使用
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

// Domain層（純粋なビジネスロジック）
pub mod domain;

// Application層（ユースケース）
pub mod application;

// Adapter層（Infrastructure）
pub mod adapter;

// Driver層（依存性注入）
pub mod driver;

pub use application::dto::warehouse_config::{TableNames, WarehouseConfig};
pub use application::WarehouseFacade;
pub use domain::entities::log_filter::LogFilter;
pub use domain::entities::record::{InsertRowError, Record};
pub use domain::error::WarehouseError;
