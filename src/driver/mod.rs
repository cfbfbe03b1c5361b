//! # Driver Layer
//!
//! 全てを組み立てる（依存性注入）
//!
//! ## 構成要素
//!
//! - **bootstrap**: 設定ファイルから BigQuery 接続済みのファサードを作成

pub mod bootstrap;

pub use bootstrap::{connect, connect_from_file, BigQueryFacade};
