//! JSON-line logger
//!
//! Each event becomes one line on stderr:
//!
//! ```text
//! {"event":"QUERY_REJECTED","severity":"WARN","code":"QUERY_INVALID","message":"..."}
//! ```
//!
//! `event` and `severity` lead, the remaining fields follow sorted by key.
//! Stdout carries command output only.

use std::fmt;
use std::io::{self, Write};

use serde_json::Value;

use super::events::Event;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Per-query progress (received, validated)
    Trace,
    Info,
    /// Rejected queries, abandoned scopes
    Warn,
    /// Failed load scopes
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rendered log line
#[derive(Debug, Clone)]
pub struct LogLine<'a> {
    severity: Severity,
    event: &'a str,
    fields: Vec<(&'a str, &'a str)>,
}

impl<'a> LogLine<'a> {
    pub fn new(severity: Severity, event: &'a str, fields: &[(&'a str, &'a str)]) -> Self {
        let mut fields = fields.to_vec();
        fields.sort_by_key(|(key, _)| *key);
        Self {
            severity,
            event,
            fields,
        }
    }

    /// Line for a typed event at the event's own severity
    pub fn for_event(event: Event, fields: &[(&'a str, &'a str)]) -> Self {
        Self::new(event.severity(), event.as_str(), fields)
    }

    /// JSON text including the trailing newline
    pub fn render(&self) -> String {
        let mut line = format!(
            "{{\"event\":{},\"severity\":\"{}\"",
            quote(self.event),
            self.severity
        );
        for (key, value) in &self.fields {
            line.push(',');
            line.push_str(&quote(key));
            line.push(':');
            line.push_str(&quote(value));
        }
        line.push_str("}\n");
        line
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.render().as_bytes())?;
        writer.flush()
    }
}

fn quote(s: &str) -> String {
    Value::from(s).to_string()
}

/// Stderr sink for log lines
pub struct Logger;

impl Logger {
    /// Write errors on stderr are dropped.
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let _ = LogLine::new(severity, event, fields).write_to(&mut io::stderr().lock());
    }

    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }
}
