//! Runtime values.
//!
//! The set of value variants is closed. Every variant answers the same four
//! queries (type name, render, truthiness, nil test); on top of that a value
//! may carry one of two capabilities that the call protocol inspects:
//! *callable* (`Func`, `Builtin`) receives evaluated arguments, *expander*
//! (`Macro`) receives the raw argument nodes.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use rustc_hash::FxHasher;

use crate::ast::Node;
use crate::environment::Environment;
use crate::error::EvalError;

/// Signature of native logic behind a [`Builtin`].
pub type NativeFn = dyn Fn(&mut Environment, &[Value]) -> Result<Value, EvalError>;

/// Signature of native logic behind a [`Macro`].
pub type ExpandFn = dyn Fn(&mut Environment, &[Node]) -> Result<Node, EvalError>;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(i64),
    String(String),
    Array(Rc<[Value]>),
    Func(Rc<Func>),
    Builtin(Builtin),
    Macro(Macro),
}

/// A user-defined function.
///
/// There is no captured environment: the body runs on top of whatever scope
/// stack the caller has at invocation time.
#[derive(Clone, Debug, PartialEq)]
pub struct Func {
    pub params: Vec<String>,
    pub body: Node,
}

/// Native function receiving evaluated arguments.
#[derive(Clone)]
pub struct Builtin {
    name: Rc<str>,
    func: Rc<NativeFn>,
}

impl Builtin {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&mut Environment, &[Value]) -> Result<Value, EvalError> + 'static,
    {
        Builtin {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, env: &mut Environment, args: &[Value]) -> Result<Value, EvalError> {
        (self.func)(env, args)
    }
}

/// Native expander receiving unevaluated argument nodes and producing the
/// node that replaces the call.
#[derive(Clone)]
pub struct Macro {
    name: Rc<str>,
    expand: Rc<ExpandFn>,
}

impl Macro {
    pub fn new<F>(name: &str, expand: F) -> Self
    where
        F: Fn(&mut Environment, &[Node]) -> Result<Node, EvalError> + 'static,
    {
        Macro {
            name: name.into(),
            expand: Rc::new(expand),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expand(&self, env: &mut Environment, args: &[Node]) -> Result<Node, EvalError> {
        (self.expand)(env, args)
    }
}

// Native values have no introspectable state; identity is the only equality.
impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl PartialEq for Macro {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.expand, &other.expand)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Builtin").field(&self.name).finish()
    }
}

impl fmt::Debug for Macro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Macro").field(&self.name).finish()
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Func(_) => "func",
            Value::Builtin(_) => "builtin",
            Value::Macro(_) => "macro",
        }
    }

    pub fn truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0,
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Func(_) | Value::Builtin(_) | Value::Macro(_) => true,
        }
    }

    /// Only `Nil` is nil; `false` and `0` are falsy but not nil.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn array(items: impl Into<Rc<[Value]>>) -> Self {
        Value::Array(items.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items.into())
    }
}

impl From<Func> for Value {
    fn from(func: Func) -> Self {
        Value::Func(Rc::new(func))
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Longest function body rendering shown verbatim before it is digested.
const MAX_CODE_DISPLAY: usize = 32;

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = format!("{{ {} }}", self.body);
        let code = if code.len() > MAX_CODE_DISPLAY {
            let mut hasher = FxHasher::default();
            code.hash(&mut hasher);
            format!("{:016x}", hasher.finish())
        } else {
            code
        };
        write!(f, "(({}) => {code})@func", self.params.join(", "))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}@bool"),
            Value::Number(n) => write!(f, "{n}@number"),
            Value::String(s) => write!(f, "{s:?}@string"),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]@array")
            }
            Value::Func(func) => write!(f, "{func}"),
            Value::Builtin(b) => write!(f, "{}@builtin", b.name()),
            Value::Macro(m) => write!(f, "{}@macro", m.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Nil.type_name(), "nil");
        assert_eq!(Value::from(true).type_name(), "bool");
        assert_eq!(Value::Number(3).type_name(), "number");
        assert_eq!(Value::from("x").type_name(), "string");
        assert_eq!(Value::array(Vec::new()).type_name(), "array");
        let id = Builtin::new("id", |_, _| Ok(Value::Nil));
        assert_eq!(Value::Builtin(id).type_name(), "builtin");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Nil.truthy());
        assert!(!Value::from(false).truthy());
        assert!(!Value::Number(0).truthy());
        assert!(Value::Number(-1).truthy());
        assert!(!Value::from("").truthy());
        assert!(Value::from("a").truthy());
        assert!(!Value::array(Vec::new()).truthy());
        assert!(Value::array(vec![Value::Nil]).truthy());
        let func = Func {
            params: vec![],
            body: Node::nil(),
        };
        assert!(Value::from(func).truthy());
    }

    #[test]
    fn test_nil_is_distinct_from_falsy() {
        assert!(Value::Nil.is_nil());
        assert!(!Value::from(false).is_nil());
        assert!(!Value::Number(0).is_nil());
    }

    #[test]
    fn test_render() {
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::from(true).to_string(), "true@bool");
        assert_eq!(Value::Number(42).to_string(), "42@number");
        assert_eq!(Value::from("five").to_string(), "\"five\"@string");
        let list = Value::array(vec![Value::Number(1), Value::Number(2)]);
        assert_eq!(list.to_string(), "[1@number 2@number]@array");
    }

    #[test]
    fn test_func_render_digests_long_bodies() {
        let short = Func {
            params: vec!["a".into(), "b".into()],
            body: Node::reference("a"),
        };
        assert_eq!(short.to_string(), "((a, b) => { a })@func");

        let long = Func {
            params: vec!["x".into()],
            body: Node::call(
                "some_rather_long_function_name",
                vec![Node::reference("x"), Node::reference("another_long_name")],
            ),
        };
        let rendered = long.to_string();
        assert!(rendered.starts_with("((x) => "));
        assert!(rendered.len() <= "((x) => )@func".len() + MAX_CODE_DISPLAY);
        assert!(!rendered.contains("some_rather_long_function_name"));
    }

    #[test]
    fn test_native_equality_is_identity() {
        let a = Builtin::new("a", |_, _| Ok(Value::Nil));
        let b = Builtin::new("a", |_, _| Ok(Value::Nil));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
