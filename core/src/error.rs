//! Error types shared by the parser and the evaluator.

use thiserror::Error;

/// Errors raised while evaluating a syntax tree.
///
/// Errors propagate unchanged through every composite node; nothing in the
/// evaluator wraps or annotates them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("{0} is not callable")]
    NotCallable(String),

    #[error("{form} takes {expected} arguments, got {got}")]
    Arity {
        form: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("expected parameter name, got {got}")]
    ExpectedParameterName { got: String },

    /// Raised by native builtin or macro logic, passed through verbatim.
    #[error("{0}")]
    Native(String),

    #[error("call depth limit of {limit} exceeded")]
    StackExhausted { limit: usize },
}

impl EvalError {
    pub fn native(message: impl Into<String>) -> Self {
        EvalError::Native(message.into())
    }
}

/// Malformed source text, tagged with the position it was detected at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{source_name}:{line}:{column}: {message}")]
pub struct SyntaxError {
    pub source_name: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
    incomplete: bool,
}

impl SyntaxError {
    pub(crate) fn new(
        source_name: &str,
        (line, column): (usize, usize),
        message: impl Into<String>,
    ) -> Self {
        SyntaxError {
            source_name: source_name.to_string(),
            line,
            column,
            message: message.into(),
            incomplete: false,
        }
    }

    pub(crate) fn unexpected_eof(source_name: &str, position: (usize, usize)) -> Self {
        let mut err = Self::new(source_name, position, "unexpected end of input");
        err.incomplete = true;
        err
    }

    /// True when the input ended in the middle of a form, i.e. more text
    /// could still make it valid.
    pub fn is_incomplete(&self) -> bool {
        self.incomplete
    }
}

/// Any failure of a parse-then-evaluate run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}
