//! REPL error types

use std::fmt;

use thiserror::Error;

use crate::engine::EvalError;

/// Result type for REPL operations
pub type ReplResult<T> = Result<T, ReplError>;

/// Errors raised while running a session
#[derive(Debug, Error)]
pub enum ReplError {
    /// Malformed prompt template
    #[error("Invalid prompt template: {reason} at position {position}")]
    InvalidTemplate { reason: TemplateFault, position: usize },

    /// Command line names an unregistered command
    #[error("No such command: {0}")]
    UnknownCommand(String),

    /// Hot-swap names an evaluator that is not registered
    #[error("No such engine: {0}")]
    UnknownEvaluator(String),

    /// The evaluator rejected the input
    #[error(transparent)]
    Evaluation(EvalError),

    /// Any other failure during command handling or evaluation
    #[error("{0}")]
    Unexpected(anyhow::Error),

    /// Console transport failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What went wrong in a prompt template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFault {
    /// `$` followed by an unknown directive
    UnknownDirective(char),
    /// `$` as the last character
    DanglingEscape,
}

impl fmt::Display for TemplateFault {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            TemplateFault::UnknownDirective(c) => write!(f, "unknown directive '${}'", c),
            TemplateFault::DanglingEscape => write!(f, "'$' without directive"),
        }
    }
}

impl ReplError {
    /// Wrap an unexpected failure
    pub fn unexpected(err: impl Into<anyhow::Error>) -> Self {
        ReplError::Unexpected(err.into())
    }

    /// One-line message shown in the transcript
    pub fn report(&self) -> String {
        match self {
            ReplError::Unexpected(e) => format!("Caught exception: {}", e),
            other => other.to_string(),
        }
    }

    /// Full diagnostic detail, as printed by `stacktrace`
    pub fn detail(&self) -> String {
        match self {
            ReplError::Unexpected(e) => format!("{:?}", e),
            ReplError::Evaluation(EvalError::Internal(e)) => format!("{:?}", e),
            other => format!("{}\n{:#?}", other, other),
        }
    }
}

impl From<EvalError> for ReplError {
    fn from(err: EvalError) -> Self {
        match err {
            EvalError::Internal(e) => ReplError::Unexpected(e),
            structured => ReplError::Evaluation(structured),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_command_carries_token() {
        let err = ReplError::UnknownCommand("frobnicate".to_string());
        assert_eq!(err.report(), "No such command: frobnicate");
    }

    #[test]
    fn test_evaluation_reports_message_only() {
        let err: ReplError = EvalError::runtime("division by zero").into();
        assert!(matches!(err, ReplError::Evaluation(_)));
        assert_eq!(err.report(), "division by zero");
    }

    #[test]
    fn test_internal_eval_error_becomes_unexpected() {
        let err: ReplError = EvalError::Internal(anyhow::anyhow!("stack exhausted")).into();
        assert!(matches!(err, ReplError::Unexpected(_)));
        assert_eq!(err.report(), "Caught exception: stack exhausted");
    }

    #[test]
    fn test_detail_includes_cause_chain() {
        let inner = anyhow::anyhow!("invalid digit found in string");
        let err = ReplError::unexpected(inner.context("parsing stream.limit"));
        assert_eq!(err.report(), "Caught exception: parsing stream.limit");
        let detail = err.detail();
        assert!(detail.contains("parsing stream.limit"));
        assert!(detail.contains("invalid digit"));
    }

    #[test]
    fn test_template_fault_display() {
        let err = ReplError::InvalidTemplate {
            reason: TemplateFault::UnknownDirective('x'),
            position: 3,
        };
        assert_eq!(
            err.to_string(),
            "Invalid prompt template: unknown directive '$x' at position 3"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: ReplError = io_err.into();
        assert!(matches!(err, ReplError::Io(_)));
    }
}
