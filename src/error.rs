//! Error types for the nanoscript compiler

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single compile failure inside one compilation unit
///
/// Diagnostics are created once and never mutated; the first one produced
/// aborts compilation of the unit it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Line number where the failure was detected (1-indexed)
    pub line: usize,
    /// Human-readable description, possibly with a suggested replacement
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic for the given 1-based line
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Diagnostic {
            line,
            message: message.into(),
        }
    }
}

/// nanoscript compiler errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Structural or syntax error inside one compilation unit
    ///
    /// **Triggered by:** illegal indentation, unbalanced brackets, malformed
    /// block headers, reserved tokens
    /// **Example:** `var x = 1` (suggests `let`)
    #[error("Syntax error at line {line}: {message}")]
    SyntaxError {
        /// Line number where error occurred (1-indexed)
        line: usize,
        /// Error description
        message: String,
    },

    /// Failure attributed to a named source file of a program
    ///
    /// The line is already corrected for the position of the section inside
    /// a multi-section mode file.
    #[error("{}", format_source_error(.source_id, .line, .message))]
    SourceError {
        /// Identifier of the failing source (a script or mode file)
        source_id: String,
        /// Line inside that source (1-indexed), when one applies
        line: Option<usize>,
        /// Error description
        message: String,
    },

    /// A source identifier could not be supplied by the source provider
    #[error("Missing source: {0}")]
    MissingSource(String),

    /// Malformed game manifest
    #[error("Manifest error: {0}")]
    ManifestError(String),
}

fn format_source_error(source_id: &str, line: &Option<usize>, message: &str) -> String {
    match line {
        Some(line) => format!("{}:{}: {}", source_id, line, message),
        None => format!("{}: {}", source_id, message),
    }
}

impl Error {
    /// Create a syntax error for a 1-based line
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Error::SyntaxError {
            line,
            message: message.into(),
        }
    }

    /// The unit-local diagnostic carried by a syntax error
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        match self {
            Error::SyntaxError { line, message } => Some(Diagnostic::new(*line, message.clone())),
            _ => None,
        }
    }

    /// Attribute a unit error to a named source, shifting its line by the
    /// number of source lines that precede the unit inside that file
    pub fn in_source(self, source_id: &str, line_offset: usize) -> Self {
        match self {
            Error::SyntaxError { line, message } => Error::SourceError {
                source_id: source_id.to_string(),
                line: Some(line + line_offset),
                message,
            },
            Error::SourceError {
                line, message, ..
            } => Error::SourceError {
                source_id: source_id.to_string(),
                line: line.map(|l| l + line_offset),
                message,
            },
            other => other,
        }
    }

    /// Create a source error that has no meaningful line
    pub fn source(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Error::SourceError {
            source_id: source_id.into(),
            line: None,
            message: message.into(),
        }
    }
}

/// Result type for nanoscript operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = Error::syntax(3, "Inconsistent indentation");
        assert_eq!(err.to_string(), "Syntax error at line 3: Inconsistent indentation");
        assert_eq!(
            err.diagnostic(),
            Some(Diagnostic::new(3, "Inconsistent indentation"))
        );
    }

    #[test]
    fn test_in_source_applies_offset() {
        let err = Error::syntax(2, "Illegal block statement").in_source("Play.pyx", 10);
        assert_eq!(
            err,
            Error::SourceError {
                source_id: "Play.pyx".to_string(),
                line: Some(12),
                message: "Illegal block statement".to_string(),
            }
        );
        assert_eq!(err.to_string(), "Play.pyx:12: Illegal block statement");
    }

    #[test]
    fn test_source_error_without_line() {
        let err = Error::source("game.json", "No start mode");
        assert_eq!(err.to_string(), "game.json: No start mode");
        assert!(err.diagnostic().is_none());
    }
}
