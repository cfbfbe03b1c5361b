//! # Query Builder Service
//!
//! ログ・異常検知テーブル向けのクエリ組み立て

use crate::domain::entities::log_filter::LogFilter;
use crate::domain::entities::query_statement::{QueryParam, QueryStatement};
use crate::domain::entities::table_ref::TableRef;
use crate::domain::error::WarehouseError;

/// 異常検知クエリの取得上限（呼び出し側からは変更できない）
pub const ANOMALY_RESULT_CAP: u32 = 10;

/// 閾値パラメータ名
pub const THRESHOLD_PARAM: &str = "threshold";

/// クエリ組み立てサービス
pub struct QueryBuilder;

impl QueryBuilder {
    /// ログテーブルの検索クエリ
    ///
    /// `SELECT * ... WHERE <filter> ORDER BY timestamp DESC LIMIT <limit>`
    ///
    /// # Errors
    ///
    /// フィルタの列名が不正な場合
    pub fn logs_query(
        table: &TableRef,
        filter: &LogFilter,
        limit: u32,
    ) -> Result<QueryStatement, WarehouseError> {
        let rendered = filter.render()?;
        let sql = format!(
            "SELECT *\nFROM {}\nWHERE {}\nORDER BY timestamp DESC\nLIMIT {}",
            table.to_sql(),
            rendered.clause,
            limit
        );
        Ok(QueryStatement::new(sql, rendered.params))
    }

    /// 異常スコアが閾値を超える行の検索クエリ
    ///
    /// 取得件数は常に `ANOMALY_RESULT_CAP` 件まで
    ///
    /// # Errors
    ///
    /// 閾値が有限数でない場合
    pub fn anomalies_query(
        table: &TableRef,
        threshold: f64,
    ) -> Result<QueryStatement, WarehouseError> {
        if !threshold.is_finite() {
            return Err(WarehouseError::InvalidFilter(format!(
                "anomaly threshold must be finite, got {}",
                threshold
            )));
        }

        let sql = format!(
            "SELECT *\nFROM {}\nWHERE anomaly_score > @{}\nORDER BY timestamp DESC\nLIMIT {}",
            table.to_sql(),
            THRESHOLD_PARAM,
            ANOMALY_RESULT_CAP
        );
        Ok(QueryStatement::new(
            sql,
            vec![QueryParam::new(THRESHOLD_PARAM, threshold)],
        ))
    }
}
