//! # Domain Layer
//!
//! このモジュールはビジネスの核心的なルールとエンティティを定義します。
//!
//! ## 特徴
//!
//! - 外部依存を持たない（Rust標準ライブラリと最小限の依存のみ）
//! - フレームワークに依存しない
//! - BigQueryの型について何も知らない
//!
//! ## 構成要素
//!
//! - **entities**: レコード、テーブル参照、クエリ、フィルタ
//! - **repositories**: WarehouseClient / QueryTracer trait
//! - **services**: クエリ組み立て
//! - **error**: ファサードのエラー型

pub mod entities;
pub mod error;
pub mod repositories;
pub mod services;
