//! # LogFilter Value Object
//!
//! ログ検索条件。自由形式のSQL断片は受け付けず、
//! `列 演算子 @パラメータ` の AND 結合としてのみ表現する。

use std::fmt;

use super::query_statement::{ParamValue, QueryParam};
use crate::domain::error::WarehouseError;

/// 比較演算子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Comparison::Eq => "=",
            Comparison::NotEq => "!=",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        };
        f.write_str(op)
    }
}

/// 単一条件
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub op: Comparison,
    pub value: ParamValue,
}

/// ログ検索フィルタ
///
/// 条件が空の場合は全件一致（`TRUE`）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogFilter {
    conditions: Vec<Condition>,
}

/// レンダリング結果（WHERE句本文とバインドするパラメータ）
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFilter {
    pub clause: String,
    pub params: Vec<QueryParam>,
}

impl LogFilter {
    /// 全件一致フィルタ
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        column: impl Into<String>,
        op: Comparison,
        value: impl Into<ParamValue>,
    ) -> Self {
        self.conditions.push(Condition {
            column: column.into(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn eq(self, column: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.with(column, Comparison::Eq, value)
    }

    pub fn not_eq(self, column: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.with(column, Comparison::NotEq, value)
    }

    pub fn lt(self, column: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.with(column, Comparison::Lt, value)
    }

    pub fn le(self, column: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.with(column, Comparison::Le, value)
    }

    pub fn gt(self, column: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.with(column, Comparison::Gt, value)
    }

    pub fn ge(self, column: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.with(column, Comparison::Ge, value)
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// WHERE句本文を生成する
    ///
    /// パラメータ名は `p0`, `p1`, ... の順に振られる
    ///
    /// # Errors
    ///
    /// 列名が識別子として不正な場合に `InvalidFilter` を返す
    pub fn render(&self) -> Result<RenderedFilter, WarehouseError> {
        if self.conditions.is_empty() {
            return Ok(RenderedFilter {
                clause: "TRUE".to_string(),
                params: Vec::new(),
            });
        }

        let mut parts = Vec::with_capacity(self.conditions.len());
        let mut params = Vec::with_capacity(self.conditions.len());

        for (i, condition) in self.conditions.iter().enumerate() {
            if !is_column_path(&condition.column) {
                return Err(WarehouseError::InvalidFilter(format!(
                    "column name {:?} is not an identifier",
                    condition.column
                )));
            }
            let name = format!("p{}", i);
            parts.push(format!(
                "{} {} @{}",
                quote_column_path(&condition.column),
                condition.op,
                name
            ));
            params.push(QueryParam::new(name, condition.value.clone()));
        }

        Ok(RenderedFilter {
            clause: parts.join(" AND "),
            params,
        })
    }
}

/// `a`, `a_b`, `payload.actor.id` のような識別子パスか
fn is_column_path(column: &str) -> bool {
    !column.is_empty() && column.split('.').all(is_identifier)
}

/// 予約語（`order`, `hash` など）でも通るよう各セグメントをバッククォートで囲む
fn quote_column_path(column: &str) -> String {
    column
        .split('.')
        .map(|segment| format!("`{}`", segment))
        .collect::<Vec<_>>()
        .join(".")
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
