//! Error types for the NFA compiler
//!
//! This module provides error handling using the `thiserror` crate.
//! Errors are categorized by the stage that raised them: grouping errors come
//! from the postfix converter, everything else from the construction engine.
//! Both reach callers as [`CompileError::MalformedPattern`].

use thiserror::Error;

/// The main error type for pattern compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// The pattern could not be turned into an automaton
    #[error("malformed pattern '{pattern}': {kind}")]
    MalformedPattern {
        /// The pattern as it was given, before preprocessing
        pattern: String,
        /// What was wrong with it
        kind: Malformed,
    },
}

impl CompileError {
    /// Create a malformed-pattern error for `pattern`
    pub fn malformed(pattern: &str, kind: impl Into<Malformed>) -> Self {
        CompileError::MalformedPattern {
            pattern: pattern.to_string(),
            kind: kind.into(),
        }
    }

    /// The offending pattern
    pub fn pattern(&self) -> &str {
        match self {
            CompileError::MalformedPattern { pattern, .. } => pattern,
        }
    }

    /// The specific reason the pattern was rejected
    pub fn kind(&self) -> &Malformed {
        match self {
            CompileError::MalformedPattern { kind, .. } => kind,
        }
    }
}

/// Specific kinds of malformed postfix streams
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Malformed {
    /// An operator found fewer operands on the stack than it needs
    #[error("operator '{operator}' at position {position} needs {needed} operand(s), found {found}")]
    StackUnderflow {
        /// The operator token
        operator: char,
        /// Index of the operator in the postfix stream
        position: usize,
        /// Operands the operator consumes
        needed: usize,
        /// Operands that were available
        found: usize,
    },

    /// More than one automaton was left once the stream was exhausted
    #[error("{count} operands left unconsumed")]
    LeftoverOperands {
        /// Number of automata left on the stack
        count: usize,
    },

    /// The postfix stream was empty
    #[error("empty pattern")]
    Empty,

    /// Parentheses did not balance
    #[error(transparent)]
    Grouping(#[from] GroupingError),
}

/// Errors raised by the infix-to-postfix converter
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingError {
    /// A `(` was never closed
    #[error("unclosed group opened at position {position}")]
    UnmatchedOpen {
        /// Position of the `(` in the preprocessed pattern
        position: usize,
    },

    /// A `)` had no matching `(`
    #[error("unmatched ')' at position {position}")]
    UnmatchedClose {
        /// Position of the `)` in the preprocessed pattern
        position: usize,
    },
}

/// Result type alias for compilation
pub type Result<T> = std::result::Result<T, CompileError>;
