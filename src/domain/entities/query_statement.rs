//! # QueryStatement Value Object
//!
//! SQL本文と名前付きパラメータの組

use chrono::{DateTime, SecondsFormat, Utc};

/// クエリパラメータの値
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    String(String),
    Int64(i64),
    Float64(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

impl ParamValue {
    /// BigQuery のパラメータ型名
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::String(_) => "STRING",
            ParamValue::Int64(_) => "INT64",
            ParamValue::Float64(_) => "FLOAT64",
            ParamValue::Bool(_) => "BOOL",
            ParamValue::Timestamp(_) => "TIMESTAMP",
        }
    }

    /// REST API に渡す文字列表現
    pub fn to_api_string(&self) -> String {
        match self {
            ParamValue::String(s) => s.clone(),
            ParamValue::Int64(v) => v.to_string(),
            ParamValue::Float64(v) => v.to_string(),
            ParamValue::Bool(v) => v.to_string(),
            ParamValue::Timestamp(ts) => ts.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int64(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float64(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(value: DateTime<Utc>) -> Self {
        ParamValue::Timestamp(value)
    }
}

/// 名前付きクエリパラメータ（SQL中では `@name` で参照）
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParam {
    pub name: String,
    pub value: ParamValue,
}

impl QueryParam {
    pub fn new(name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// 実行するクエリ
#[derive(Debug, Clone, PartialEq)]
pub struct QueryStatement {
    pub sql: String,
    pub params: Vec<QueryParam>,
}

impl QueryStatement {
    pub fn new(sql: impl Into<String>, params: Vec<QueryParam>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// 名前でパラメータを探す
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }
}
