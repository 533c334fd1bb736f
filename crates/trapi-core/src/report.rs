//! # Validation Reporter
//!
//! An accumulating, leveled sink for validation findings. Validators record
//! findings with [`ValidationReporter::report`] and continue; nothing here
//! fails fast. One reporter corresponds to one validation run and should be
//! discarded afterwards rather than reused for an unrelated instance.
//!
//! ## Serialized Shape
//!
//! ```json
//! {
//!   "info":    [{"code": "info.compliant", "message": "..."}],
//!   "warning": [],
//!   "error":   [{"code": "error.validation", "message": "...", "context": {...}}]
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codes::{MessageCode, MessageLevel};

/// Interpolation values attached to a message.
pub type Context = BTreeMap<String, Value>;

/// A single recorded finding. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub code: MessageCode,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: Context,
}

impl ValidationMessage {
    /// Create a message from a code and its context.
    pub fn new(code: MessageCode, context: Context) -> Self {
        Self { code, context }
    }

    /// Level derived from the code prefix.
    pub fn level(&self) -> MessageLevel {
        self.code.level()
    }

    /// Human-readable text with context values interpolated.
    pub fn render(&self) -> String {
        interpolate(self.code.template(), &self.context)
    }
}

/// A message as it appears in a serialized [`Report`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedMessage {
    pub code: MessageCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: Context,
}

impl From<&ValidationMessage> for RenderedMessage {
    fn from(msg: &ValidationMessage) -> Self {
        Self {
            code: msg.code,
            message: msg.render(),
            context: msg.context.clone(),
        }
    }
}

/// Structured report of every finding from one run, grouped by level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub info: Vec<RenderedMessage>,
    pub warning: Vec<RenderedMessage>,
    pub error: Vec<RenderedMessage>,
}

impl Report {
    /// Whether the report holds no messages at all.
    pub fn is_empty(&self) -> bool {
        self.info.is_empty() && self.warning.is_empty() && self.error.is_empty()
    }
}

/// Accumulates validation messages for one validation run.
#[derive(Debug, Clone)]
pub struct ValidationReporter {
    prefix: String,
    trapi_version: Option<String>,
    info: Vec<ValidationMessage>,
    warning: Vec<ValidationMessage>,
    error: Vec<ValidationMessage>,
}

impl ValidationReporter {
    /// Create an empty reporter. `prefix` names the run in [`dump`](Self::dump) output.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            trapi_version: None,
            info: Vec::new(),
            warning: Vec::new(),
            error: Vec::new(),
        }
    }

    /// Attach the resolved TRAPI version this run validates against.
    pub fn with_trapi_version(mut self, version: impl Into<String>) -> Self {
        self.trapi_version = Some(version.into());
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn trapi_version(&self) -> Option<&str> {
        self.trapi_version.as_deref()
    }

    /// Record a message that carries no context.
    pub fn report(&mut self, code: MessageCode) {
        self.push(ValidationMessage::new(code, Context::new()));
    }

    /// Record a message with interpolation context.
    ///
    /// ```
    /// use trapi_core::{MessageCode, ValidationReporter};
    ///
    /// let mut reporter = ValidationReporter::new("Mapping check");
    /// reporter.report_with_context(MessageCode::UnusedNode, [("node_id", "n1")]);
    /// assert!(reporter.has_warnings());
    /// ```
    pub fn report_with_context<I, K, V>(&mut self, code: MessageCode, context: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let context = context
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.push(ValidationMessage::new(code, context));
    }

    fn push(&mut self, message: ValidationMessage) {
        match message.level() {
            MessageLevel::Info => self.info.push(message),
            MessageLevel::Warning => self.warning.push(message),
            MessageLevel::Error => self.error.push(message),
        }
    }

    /// Messages recorded at `level`, in insertion order.
    pub fn messages(&self, level: MessageLevel) -> &[ValidationMessage] {
        match level {
            MessageLevel::Info => &self.info,
            MessageLevel::Warning => &self.warning,
            MessageLevel::Error => &self.error,
        }
    }

    /// Whether any message exists, optionally restricted to one level.
    pub fn has_messages(&self, level: Option<MessageLevel>) -> bool {
        match level {
            Some(level) => !self.messages(level).is_empty(),
            None => MessageLevel::ALL.iter().any(|l| !self.messages(*l).is_empty()),
        }
    }

    pub fn has_information(&self) -> bool {
        self.has_messages(Some(MessageLevel::Info))
    }

    pub fn has_warnings(&self) -> bool {
        self.has_messages(Some(MessageLevel::Warning))
    }

    pub fn has_errors(&self) -> bool {
        self.has_messages(Some(MessageLevel::Error))
    }

    /// Append every message of `other` after this reporter's own messages.
    pub fn merge(&mut self, other: ValidationReporter) {
        self.info.extend(other.info);
        self.warning.extend(other.warning);
        self.error.extend(other.error);
        if self.trapi_version.is_none() {
            self.trapi_version = other.trapi_version;
        }
    }

    /// Render every message into a structured [`Report`].
    pub fn to_report(&self) -> Report {
        Report {
            info: self.info.iter().map(RenderedMessage::from).collect(),
            warning: self.warning.iter().map(RenderedMessage::from).collect(),
            error: self.error.iter().map(RenderedMessage::from).collect(),
        }
    }

    /// The report as a JSON value with `info`, `warning` and `error` keys.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if a context value cannot be serialized.
    pub fn to_dict(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self.to_report())
    }

    /// Multi-line human-readable rendering of the report.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        match &self.trapi_version {
            Some(version) => {
                let _ = writeln!(out, "{} (TRAPI {version}):", self.prefix);
            }
            None => {
                let _ = writeln!(out, "{}:", self.prefix);
            }
        }
        if !self.has_messages(None) {
            let _ = writeln!(out, "  no messages");
            return out;
        }
        for level in MessageLevel::ALL {
            for msg in self.messages(level) {
                let _ = writeln!(out, "  [{level}] {}: {}", msg.code, msg.render());
            }
        }
        out
    }
}

/// Fill `{key}` placeholders from `context`. Unknown placeholders stay verbatim.
fn interpolate(template: &str, context: &Context) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match context.get(key) {
                    Some(Value::String(s)) => out.push_str(s),
                    Some(other) => out.push_str(&other.to_string()),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
