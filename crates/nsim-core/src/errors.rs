//! Structured error types shared across NSIM crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`NsimError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (field names, offending values, paths).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Looks up a context entry by key.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }
}

/// Canonical error type for the NSIM toolkit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum NsimError {
    /// The experiment record is absent a field, mistyped, or violates an invariant.
    #[error("malformed record: {0}")]
    MalformedRecord(ErrorInfo),
    /// Curve construction or evaluation errors.
    #[error("geometry error: {0}")]
    Geometry(ErrorInfo),
    /// Sweep configuration errors.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Filesystem errors.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Serialization errors unrelated to record validity.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        let mut entries = self.context.iter();
        if let Some((key, value)) = entries.next() {
            write!(f, " ({key}={value}")?;
            for (key, value) in entries {
                write!(f, ", {key}={value}")?;
            }
            write!(f, ")")?;
        }
        match &self.hint {
            Some(hint) => write!(f, "; hint: {hint}"),
            None => Ok(()),
        }
    }
}

impl NsimError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            NsimError::MalformedRecord(info)
            | NsimError::Geometry(info)
            | NsimError::Config(info)
            | NsimError::Io(info)
            | NsimError::Serde(info) => info,
        }
    }

    /// Returns true when the error rejects an experiment record.
    pub fn is_malformed(&self) -> bool {
        matches!(self, NsimError::MalformedRecord(_))
    }

    /// Wraps an I/O failure, recording the path that triggered it.
    pub fn io(code: &str, path: &std::path::Path, err: std::io::Error) -> Self {
        NsimError::Io(
            ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
        )
    }
}
