//! Adapter Layer
//!
//! 外部システム（BigQuery, 設定ファイル, ログ）との統合

pub mod auth;
pub mod bigquery;
pub mod config;
pub mod log_tracer;
