//! Diagnostics produced while compiling.
//!
//! Compilers never print. They return their diagnostics next to their output and the
//! [`crate::execution::ProjectCompiler`] forwards them to the configured observer.

use std::fmt;

use serde::Serialize;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    /// Informational event.
    Info,
    /// Recovered data-shape problem (field error, skipped block, ...).
    Warning,
    /// A whole stage degraded to an empty output.
    Error,
    /// Infrastructure failure (typically I/O while loading a table).
    Critical,
}

/// The pipeline stage a diagnostic originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Load,
    Sectors,
    Results,
    Actions,
    Completion,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Load => "load",
            Stage::Sectors => "sectors",
            Stage::Results => "results",
            Stage::Actions => "actions",
            Stage::Completion => "completion",
        };
        f.write_str(s)
    }
}

/// A single reported problem or notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub stage: Stage,
    /// Zero-based row of the input table, when the problem is tied to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, stage: Stage, row: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            severity,
            stage,
            row,
            message: message.into(),
        }
    }

    pub fn warning(stage: Stage, row: usize, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, stage, Some(row), message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "[{}][{:?}] row {}: {}", self.stage, self.severity, row, self.message),
            None => write!(f, "[{}][{:?}] {}", self.stage, self.severity, self.message),
        }
    }
}

/// A compiler output together with the diagnostics raised while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Compiled<T> {
    pub fn new(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }
}
