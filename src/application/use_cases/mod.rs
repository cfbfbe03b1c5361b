//! # Use Cases
//!
//! アプリケーション固有のビジネスフロー
//!
//! - **query_records**: ログ・異常検知結果の取得
//! - **insert_records**: 各種レコードの挿入

pub mod insert_records;
pub mod query_records;
