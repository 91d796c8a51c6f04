//! Diagnostics shared by every pipeline stage
//!
//! Lexical, indentation and syntax faults are all recorded as [`Diagnostic`]s
//! in one ordered list per parse. Nothing in the pipeline prints or aborts on
//! a fault; the caller decides how to present the list.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// Pipeline stage that detected a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Lexical,
    Indentation,
    Syntax,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Lexical => write!(f, "lexical"),
            Phase::Indentation => write!(f, "indentation"),
            Phase::Syntax => write!(f, "syntax"),
        }
    }
}

/// A recorded fault with its position in the source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{phase} error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct Diagnostic {
    pub message: String,
    pub location: SourceLocation,
    pub phase: Phase,
}

impl Diagnostic {
    pub fn new(phase: Phase, message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
            phase,
        }
    }

    pub fn lexical(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(Phase::Lexical, message, location)
    }

    pub fn indentation(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(Phase::Indentation, message, location)
    }

    pub fn syntax(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(Phase::Syntax, message, location)
    }
}

/// Grammar mismatch raised while parsing a single production.
///
/// Grammar functions return this as their `Err` type; the statement loops
/// convert it into a syntax [`Diagnostic`] and apply the recovery policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl ParseError {
    pub fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

impl From<ParseError> for Diagnostic {
    fn from(err: ParseError) -> Self {
        Diagnostic::syntax(err.message, err.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::indentation("inconsistent indentation", SourceLocation::new(3, 5));
        assert_eq!(
            diag.to_string(),
            "indentation error at line 3, column 5: inconsistent indentation"
        );
    }

    #[test]
    fn test_parse_error_converts_to_syntax_diagnostic() {
        let err = ParseError::new("expected ':'", SourceLocation::new(1, 9));
        let diag: Diagnostic = err.into();
        assert_eq!(diag.phase, Phase::Syntax);
        assert_eq!(diag.location, SourceLocation::new(1, 9));
        assert_eq!(diag.message, "expected ':'");
    }
}
