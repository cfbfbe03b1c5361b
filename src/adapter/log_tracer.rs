//! Log-backed Query Tracer
//!
//! QueryTracer implementation writing to the `log` facade

use log::{debug, log_enabled, Level};

use crate::domain::repositories::query_tracer::QueryTracer;

/// Log target used for query traces
pub const TRACE_TARGET: &str = "sentinel_bq::trace";

/// Writes traces at debug level under [`TRACE_TARGET`]
#[derive(Debug, Default, Clone, Copy)]
pub struct LogQueryTracer;

impl LogQueryTracer {
    pub fn new() -> Self {
        Self
    }
}

impl QueryTracer for LogQueryTracer {
    fn trace(&self, label: &str, payload: &serde_json::Value) {
        // Skip the serialization when nobody listens
        if log_enabled!(target: TRACE_TARGET, Level::Debug) {
            debug!(target: TRACE_TARGET, "{}: {}", label, payload);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trace_without_logger_is_harmless() {
        let tracer = LogQueryTracer::new();
        tracer.trace("BQ anomaly query", &json!({"sql": "SELECT 1"}));
    }

    #[test]
    fn test_usable_as_trait_object() {
        let tracer: std::sync::Arc<dyn QueryTracer> = std::sync::Arc::new(LogQueryTracer);
        tracer.trace("BQ anomaly results", &json!([]));
    }
}
