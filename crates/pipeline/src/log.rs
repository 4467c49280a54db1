//! Per-request diagnostic log.
//!
//! Every node opens a [`LogRecord`] when it starts handling an input, appends
//! text lines to it, and attaches it to the outcome it returns. Records from
//! successive nodes are merged by concatenation into a [`DiagnosticLog`] in
//! traversal order, so the final log reads top to bottom as the request's
//! journey through the chain.
//!
//! Building the log has no side effects: nothing here prints or persists.
//! Callers render the final log with [`std::fmt::Display`] or serialize it.

use serde::{Deserialize, Serialize};

use crate::{NodeInstanceId, NodeName, ObjectName};

/// Marks the success transition in a summary line.
pub const SUCCESS_ARROW: &str = "-->";
/// Marks the skipped/empty transition in a summary line.
pub const SKIPPED_ARROW: &str = "~~>";

/// Logical position of a node in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogOrder {
    RequestSenderNode,
    ResponseProcessorNode,
    HttpErrorProcessorNode,
    ResponseDataParserNode,
    TransformNode,
    /// Position of a caller-defined node.
    Custom(u32),
}

impl std::fmt::Display for LogOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestSenderNode => f.write_str("requestSenderNode"),
            Self::ResponseProcessorNode => f.write_str("responseProcessorNode"),
            Self::HttpErrorProcessorNode => f.write_str("httpErrorProcessorNode"),
            Self::ResponseDataParserNode => f.write_str("responseDataParserNode"),
            Self::TransformNode => f.write_str("transformNode"),
            Self::Custom(n) => write!(f, "custom({n})"),
        }
    }
}

// ---------------------------------------------------------------------------

/// The lines one node contributed while handling one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    order: LogOrder,
    name: NodeName,
    id: NodeInstanceId,
    lines: Vec<String>,
}

impl LogRecord {
    /// Opens an empty record for the node identified by `object`.
    pub fn new(object: &ObjectName, order: LogOrder) -> Self {
        Self {
            order,
            name: object.name.clone(),
            id: object.id,
            lines: Vec::new(),
        }
    }

    /// Appends one line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Appends the one-line summary of an exchange:
    /// `<METHOD> <URL> <arrow> <status>`.
    pub fn push_transition(&mut self, method: &str, url: &str, arrow: &str, status: u16) {
        self.lines.push(format!("{method} {url} {arrow} {status}"));
    }

    pub fn order(&self) -> LogOrder {
        self.order
    }

    pub fn name(&self) -> &NodeName {
        &self.name
    }

    pub fn id(&self) -> NodeInstanceId {
        self.id
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl std::fmt::Display for LogRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} ({})", self.order, self.name, self.id)?;
        for line in &self.lines {
            write!(f, "\n\t{line}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------

/// Ordered records of every node a request passed through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticLog {
    records: Vec<LogRecord>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `earlier` ahead of every record already in this log.
    ///
    /// Used by a node to put its own record in front of the log its
    /// successor returned.
    pub fn prepend(&mut self, earlier: DiagnosticLog) {
        if earlier.records.is_empty() {
            return;
        }
        let later = std::mem::replace(&mut self.records, earlier.records);
        self.records.extend(later);
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    /// Total number of lines across all records.
    pub fn entry_count(&self) -> usize {
        self.records.iter().map(LogRecord::len).sum()
    }

    /// Every line across all records, in order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .flat_map(|r| r.lines.iter().map(String::as_str))
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<LogRecord> for DiagnosticLog {
    fn from(record: LogRecord) -> Self {
        Self {
            records: vec![record],
        }
    }
}

impl std::fmt::Display for DiagnosticLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, record) in self.records.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{record}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct First;
    struct Second;

    fn record_of<N>(order: LogOrder, lines: &[&str]) -> LogRecord {
        let mut record = LogRecord::new(&ObjectName::of::<N>(), order);
        for line in lines {
            record.push(*line);
        }
        record
    }

    #[test]
    fn prepend_keeps_earlier_records_first() {
        let mut log = DiagnosticLog::from(record_of::<Second>(LogOrder::Custom(2), &["b1"]));
        log.prepend(DiagnosticLog::from(record_of::<First>(
            LogOrder::Custom(1),
            &["a1", "a2"],
        )));

        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines, vec!["a1", "a2", "b1"]);
        assert_eq!(log.entry_count(), 3);
        assert_eq!(log.records()[0].name().as_str(), "First");
    }

    #[test]
    fn prepend_of_empty_log_is_a_no_op() {
        let mut log = DiagnosticLog::from(record_of::<First>(LogOrder::Custom(1), &["a"]));
        let before = log.clone();
        log.prepend(DiagnosticLog::new());
        assert_eq!(log, before);
    }

    #[test]
    fn record_renders_header_and_tab_indented_lines() {
        let mut record = record_of::<First>(LogOrder::ResponseProcessorNode, &["Request success!"]);
        record.push_transition("GET", "https://example.com", SUCCESS_ARROW, 200);

        let rendered = record.to_string();
        let mut lines = rendered.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("[responseProcessorNode] First ("));
        assert_eq!(lines.next(), Some("\tRequest success!"));
        assert_eq!(lines.next(), Some("\tGET https://example.com --> 200"));
    }

    #[test]
    fn log_round_trips_through_json() {
        let log = DiagnosticLog::from(record_of::<First>(LogOrder::TransformNode, &["x"]));
        let json = serde_json::to_string(&log).unwrap();
        let back: DiagnosticLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }
}
