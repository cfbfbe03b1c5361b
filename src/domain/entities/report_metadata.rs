//! # ReportMetadata Entity
//!
//! 生成済みレポートのメタデータ（後から一覧・検索するために保存）

use serde::{Deserialize, Serialize};

/// レポートメタデータ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub report_id: String,
    pub title: String,
    /// 生成日時（呼び出し側が用意した文字列をそのまま保存）
    pub generated_at: String,
    /// セクション名（順序を保持）
    pub sections: Vec<String>,
    /// レポート本体の GCS URI
    pub gcs_uri: String,
}

impl ReportMetadata {
    pub fn new(
        report_id: impl Into<String>,
        title: impl Into<String>,
        generated_at: impl Into<String>,
        sections: Vec<String>,
        gcs_uri: impl Into<String>,
    ) -> Self {
        Self {
            report_id: report_id.into(),
            title: title.into(),
            generated_at: generated_at.into(),
            sections,
            gcs_uri: gcs_uri.into(),
        }
    }
}
