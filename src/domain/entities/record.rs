//! # Record
//!
//! 行マッピングと行単位の挿入エラー

use std::fmt;

/// 1行分のレコード（列名 -> 値）
///
/// `serde_json` の `preserve_order` により列順を保持する
pub type Record = serde_json::Map<String, serde_json::Value>;

/// insertAll の行単位エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertRowError {
    /// バッチ内の行インデックス
    pub index: usize,
    /// ウェアハウスが返したエラー内容
    pub detail: String,
}

impl InsertRowError {
    pub fn new(index: usize, detail: impl Into<String>) -> Self {
        Self {
            index,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for InsertRowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.index, self.detail)
    }
}
