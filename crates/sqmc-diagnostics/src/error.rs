//! sqmc error types

use crate::{ErrorCode, SQM0001};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Error - translation cannot proceed
    Error,
    /// Warning - potential issue but translation can continue
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message suitable for reporting to a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            help: None,
        }
    }

    /// Create a new warning diagnostic
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            help: None,
        }
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render with terminal colors
    #[cfg(feature = "colored")]
    pub fn to_colored_string(&self) -> String {
        use colored::Colorize;

        let severity = match self.severity {
            Severity::Error => self.severity.to_string().red().bold(),
            Severity::Warning => self.severity.to_string().yellow().bold(),
        };
        let mut out = format!("{}[{}]: {}", severity, self.code, self.message.bold());
        if let Some(help) = &self.help {
            out.push_str(&format!("\n  {} {}", "help:".cyan(), help));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)?;
        if let Some(help) = &self.help {
            write!(f, " ({})", help)?;
        }
        Ok(())
    }
}

/// Main sqmc error type
///
/// Assertion failures signal a contract violation by whoever produced the
/// semantic tree (or a bug in the translator) and must never be retried.
#[derive(Debug, Clone, Error)]
pub enum SqmError {
    /// Internal consistency failure
    #[error("{code}: assertion failure: {message}")]
    AssertionFailure { code: ErrorCode, message: String },

    /// Error attributable to the query definition
    #[error("{code}: {message}")]
    Query {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },

    /// Construct that is declared but not implemented
    #[error("{code}: not yet implemented: {feature}")]
    NotYetImplemented { code: ErrorCode, feature: String },

    /// Metamodel lookup or mapping definition error
    #[error("{code}: {message}")]
    Mapping { code: ErrorCode, message: String },

    /// System error (I/O, configuration)
    #[error("{code}: {message}")]
    System {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },
}

impl SqmError {
    /// Create an assertion failure
    pub fn assertion(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::AssertionFailure {
            code,
            message: message.into(),
        }
    }

    /// Create a query definition error
    pub fn query(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Query {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Create a not-yet-implemented error
    pub fn not_yet_implemented(code: ErrorCode, feature: impl Into<String>) -> Self {
        Self::NotYetImplemented {
            code,
            feature: feature.into(),
        }
    }

    /// Create a mapping error
    pub fn mapping(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Mapping {
            code,
            message: message.into(),
        }
    }

    /// Create a system error
    pub fn system(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::System {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Attach context (the underlying cause) to query and system errors
    pub fn with_context(mut self, cause: impl Into<String>) -> Self {
        match &mut self {
            Self::Query { context, .. } | Self::System { context, .. } => {
                *context = Some(cause.into());
            }
            _ => {}
        }
        self
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::AssertionFailure { code, .. }
            | Self::Query { code, .. }
            | Self::NotYetImplemented { code, .. }
            | Self::Mapping { code, .. }
            | Self::System { code, .. } => *code,
        }
    }

    /// Get the attached context, if any
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Query { context, .. } | Self::System { context, .. } => context.as_deref(),
            _ => None,
        }
    }

    /// Whether this error indicates a broken contract rather than a bad query
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::AssertionFailure { .. })
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let message = match self {
            Self::AssertionFailure { message, .. } => format!("assertion failure: {}", message),
            Self::NotYetImplemented { feature, .. } => format!("not yet implemented: {}", feature),
            Self::Query { message, .. }
            | Self::Mapping { message, .. }
            | Self::System { message, .. } => message.clone(),
        };
        let diag = Diagnostic::error(self.code(), message);
        match self.context().or(self.code().info().help) {
            Some(help) => diag.with_help(help),
            None => diag,
        }
    }
}

impl Default for SqmError {
    fn default() -> Self {
        Self::assertion(SQM0001, "unspecified failure")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SQM0002, SQM0100, SQM0101, SQM0200};

    #[test]
    fn test_query_error_with_context() {
        let err = SqmError::query(SQM0101, "Could not render literal value [x (String)] into SQL")
            .with_context("incompatible value");

        assert!(matches!(err, SqmError::Query { .. }));
        assert_eq!(err.code(), SQM0101);
        assert_eq!(err.context(), Some("incompatible value"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_assertion_is_fatal() {
        let err = SqmError::assertion(SQM0002, "popped scope #2, expected #1");
        assert!(err.is_fatal());
        assert!(err.to_string().starts_with("SQM0002: assertion failure"));
    }

    #[test]
    fn test_context_ignored_on_assertions() {
        let err = SqmError::assertion(SQM0002, "mismatch").with_context("ignored");
        assert_eq!(err.context(), None);
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = SqmError::query(SQM0100, "Unable to determine type of parameter :id")
            .to_diagnostic();

        let text = diag.to_string();
        assert!(text.contains("SQM0100"));
        assert!(text.contains(":id"));
        assert!(diag.help.is_some());
    }

    #[test]
    fn test_not_yet_implemented_message() {
        let err = SqmError::not_yet_implemented(SQM0200, "entity join");
        assert_eq!(err.to_string(), "SQM0200: not yet implemented: entity join");
    }
}
