//! # Warehouse Error
//!
//! ファサードが返すエラー種別

use thiserror::Error;

use crate::domain::entities::record::InsertRowError;

/// ファサード操作のエラー
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// ウェアハウスクライアント側の失敗（クエリ不正、ネットワーク、認証など）
    ///
    /// 変換せずにそのまま伝播する
    #[error(transparent)]
    Remote(#[from] anyhow::Error),

    /// insertAll が行単位のエラーを返した
    #[error("BigQuery {operation} errors on {table}: [{}]", format_row_errors(.errors))]
    InsertRejected {
        operation: &'static str,
        table: String,
        errors: Vec<InsertRowError>,
    },

    /// フィルタ条件または閾値が不正
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// シリアライズ結果がJSONオブジェクトではない
    #[error("record {index} did not serialize to a JSON object")]
    NotAnObject { index: usize },

    #[error("failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_row_errors(errors: &[InsertRowError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
