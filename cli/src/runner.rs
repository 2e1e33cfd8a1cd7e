//! One-shot evaluation of whole sources against a shared environment.

use std::fs;
use std::io::{self, Read};

use ok::{Environment, Error, EvalError, SyntaxError, Value, eval_str};
use thiserror::Error;
use tracing::debug;

/// A named unit of source text.
pub struct Source {
    pub name: String,
    pub text: String,
}

impl Source {
    pub fn from_file(path: &str) -> Result<Self, RunError> {
        let text = fs::read_to_string(path).map_err(|source| RunError::Read {
            name: path.to_string(),
            source,
        })?;
        Ok(Source {
            name: path.to_string(),
            text,
        })
    }

    pub fn from_stdin() -> Result<Self, RunError> {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| RunError::Read {
                name: "<stdin>".to_string(),
                source,
            })?;
        Ok(Source {
            name: "<stdin>".to_string(),
            text,
        })
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },

    /// Already carries the source name and position.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("{name}: {error}")]
    Eval { name: String, error: EvalError },
}

/// Evaluate each source in order, stopping at the first failure.
///
/// Returns the value of the last source, or nil when there were none.
pub fn run_sources(sources: &[Source], env: &mut Environment) -> Result<Value, RunError> {
    let mut last = Value::Nil;
    for source in sources {
        debug!(name = %source.name, bytes = source.text.len(), "evaluating source");
        last = eval_str(&source.name, &source.text, env).map_err(|error| match error {
            Error::Syntax(err) => RunError::Syntax(err),
            Error::Eval(error) => RunError::Eval {
                name: source.name.clone(),
                error,
            },
        })?;
    }
    Ok(last)
}
