//! # Domain Entities
//!
//! ビジネスエンティティとバリューオブジェクトを定義するモジュール
//!
//! ## エンティティ
//!
//! - **Record**: 結果行・挿入行のマッピング
//! - **ReportMetadata**: レポートメタデータ
//! - **TableRef / QueryStatement / LogFilter**: クエリを組み立てるバリューオブジェクト

pub mod log_filter;
pub mod query_statement;
pub mod record;
pub mod report_metadata;
pub mod table_ref;
