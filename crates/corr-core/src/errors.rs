//! Error surface of the resampling and subduction stages.
//!
//! Every failure carries a stable code plus free-form context. Stages tag
//! errors with the squared total momentum they were processing, so a batch
//! over several momenta reports which one aborted.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Context key under which the squared total momentum is recorded.
pub const MOMENTUM_KEY: &str = "p";

/// Diagnostic payload of a [`CorrError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable code, e.g. `qn-count` or `unknown-irrep`.
    pub code: String,
    /// Diagnostic message.
    pub message: String,
    /// Momentum, irrep, array shapes and file paths involved.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// What to change in the configuration or inputs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a payload with no context.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Records an array shape under `key`.
    pub fn with_shape(self, key: impl Into<String>, shape: &[usize]) -> Self {
        self.with_context(key, format!("{shape:?}"))
    }

    /// Records the squared total momentum, keeping an existing entry.
    pub fn at_momentum(mut self, p: i32) -> Self {
        self.context
            .entry(MOMENTUM_KEY.to_string())
            .or_insert_with(|| p.to_string());
        self
    }

    /// Squared total momentum recorded in the context, if any.
    pub fn momentum(&self) -> Option<i32> {
        self.context.get(MOMENTUM_KEY)?.parse().ok()
    }

    /// Sets a remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        for (key, value) in &self.context {
            write!(f, " {key}={value}")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}

/// Error type of every fallible operation in the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum CorrError {
    /// Invalid configuration values, including empty configuration axes.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Data and quantum numbers disagree; fatal for the current momentum.
    #[error("consistency error: {0}")]
    Consistency(ErrorInfo),
    /// Coefficient tables missing or malformed.
    #[error("coefficient error: {0}")]
    Coefficients(ErrorInfo),
    /// Binning and bootstrap failures.
    #[error("resample error: {0}")]
    Resample(ErrorInfo),
    /// Reading or writing stage files failed.
    #[error("storage error: {0}")]
    Storage(ErrorInfo),
    /// Encoding or decoding of arrays and quantum numbers failed.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl CorrError {
    /// Payload of the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            CorrError::Config(info)
            | CorrError::Consistency(info)
            | CorrError::Coefficients(info)
            | CorrError::Resample(info)
            | CorrError::Storage(info)
            | CorrError::Serde(info) => info,
        }
    }

    /// Returns true for data/metadata mismatches.
    pub fn is_consistency(&self) -> bool {
        matches!(self, CorrError::Consistency(_))
    }

    /// Tags the error with the momentum whose processing failed.
    pub fn at_momentum(self, p: i32) -> Self {
        match self {
            CorrError::Config(info) => CorrError::Config(info.at_momentum(p)),
            CorrError::Consistency(info) => CorrError::Consistency(info.at_momentum(p)),
            CorrError::Coefficients(info) => CorrError::Coefficients(info.at_momentum(p)),
            CorrError::Resample(info) => CorrError::Resample(info.at_momentum(p)),
            CorrError::Storage(info) => CorrError::Storage(info.at_momentum(p)),
            CorrError::Serde(info) => CorrError::Serde(info.at_momentum(p)),
        }
    }
}
