//! # Query Tracer Trait
//!
//! クエリ本文や結果ペイロードのトレース出力先

#[cfg(test)]
use mockall::automock;

/// トレース出力先
///
/// プロセス全体のロガーではなく、ファサード構築時に注入する
#[cfg_attr(test, automock)]
pub trait QueryTracer: Send + Sync {
    fn trace(&self, label: &str, payload: &serde_json::Value);
}
