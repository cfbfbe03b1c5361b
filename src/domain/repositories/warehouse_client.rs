//! # Warehouse Client Trait
//!
//! クエリ実行と行挿入を抽象化（唯一の外部依存）

use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::query_statement::QueryStatement;
use crate::domain::entities::record::{InsertRowError, Record};
use crate::domain::entities::table_ref::TableRef;

/// ウェアハウスクライアント
///
/// 本番ではBigQueryクライアント、テストではモックを使う
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WarehouseClient: Send + Sync {
    /// クエリを実行し、結果全体をレコードとして返す
    ///
    /// # Errors
    ///
    /// クエリ不正・ネットワーク・認証などの失敗
    async fn run_query(&self, statement: &QueryStatement) -> Result<Vec<Record>>;

    /// 行をまとめて挿入する
    ///
    /// # Returns
    ///
    /// 行単位のエラー（全行成功なら空）
    ///
    /// # Errors
    ///
    /// リクエスト自体が失敗した場合
    async fn insert_rows(
        &self,
        table: &TableRef,
        rows: Vec<Record>,
    ) -> Result<Vec<InsertRowError>>;
}
