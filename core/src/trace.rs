//! The ordered record of every node one evaluation visited.
//!
//! Purely additive: one entry per visited node, in exact visitation order,
//! from the synthetic `initialize` action to the terminal handler. Given the
//! same predicate answers the sequence is reproducible, which is what the
//! determinism tests lean on.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    pub node: String,
    /// Raw decision result; `None` for actions and handlers.
    pub result: Option<Value>,
    pub duration: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, node: impl Into<String>, result: Option<Value>, duration: Duration) {
        self.entries.push(TraceEntry {
            node: node.into(),
            result,
            duration,
        });
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The visited node names, in order.
    pub fn nodes(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.node.as_str()).collect()
    }

    /// One `"<node>: <result>"` line per entry, for response-header exposure.
    pub fn header_values(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| match &e.result {
                Some(result) => format!("{}: {}", e.node, result),
                None => format!("{}: null", e.node),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records_in_visitation_order() {
        let mut trace = Trace::new();
        trace.record("initialize", None, Duration::from_micros(3));
        trace.record("service_available", Some(json!(true)), Duration::from_micros(1));
        trace.record("handle_ok", None, Duration::from_micros(8));

        assert_eq!(trace.nodes(), vec!["initialize", "service_available", "handle_ok"]);
        assert_eq!(trace.entries()[1].result, Some(json!(true)));
    }

    #[test]
    fn header_values_render_results() {
        let mut trace = Trace::new();
        trace.record("exists", Some(json!(false)), Duration::ZERO);
        trace.record("handle_not_found", None, Duration::ZERO);

        assert_eq!(
            trace.header_values(),
            vec!["exists: false".to_string(), "handle_not_found: null".to_string()]
        );
    }
}
