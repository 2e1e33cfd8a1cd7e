//! Core of the ok language
//!
//! Source text is parsed into a syntax tree of [`Node`]s and evaluated
//! against an [`Environment`], a stack of scopes. Calls distinguish between
//! ordinary callables, which receive evaluated arguments, and macros, which
//! receive the raw argument nodes and return a replacement node.
//!
//! Functions do not capture their defining scope: a function body runs on
//! top of the caller's scope stack at invocation time.
//!
//! ```
//! let mut env = ok::default_environment();
//! let value = ok::eval_str("<doc>", "(let f (func a b a)) (f 1 2)", &mut env).unwrap();
//! assert_eq!(value, ok::Value::Number(1));
//! ```

pub mod ast;
pub mod balance;
pub mod builtins;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
mod stack;
pub mod value;

pub use ast::{Branch, Node};
pub use balance::analyze_balance;
pub use builtins::default_environment;
pub use environment::{DEFAULT_MAX_CALL_DEPTH, Environment, Scope};
pub use error::{Error, EvalError, SyntaxError};
pub use interpreter::{apply, call, evaluate};
pub use parser::{MAX_NESTING_DEPTH, parse};
pub use value::{Builtin, Func, Macro, Value};

/// Parse `input` and evaluate it against `env`.
pub fn eval_str(source_name: &str, input: &str, env: &mut Environment) -> Result<Value, Error> {
    let root = parse(source_name, input)?;
    Ok(evaluate(&root, env)?)
}
