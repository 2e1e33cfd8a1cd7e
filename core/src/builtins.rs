//! Built-in forms installed into the base scope of a default environment.

use crate::ast::{Branch, Node};
use crate::environment::{Environment, Scope};
use crate::error::EvalError;
use crate::value::{Builtin, Func, Macro, Value};

/// Build a fresh two-scope environment: the built-in forms in scope 0 and an
/// empty user scope on top.
///
/// Every call returns an independent environment.
pub fn default_environment() -> Environment {
    let mut base = Scope::default();
    define_macro(&mut base, "func", expand_func);
    define_macro(&mut base, "switch", expand_switch);
    define_macro(&mut base, "let", expand_let);
    define_builtin(&mut base, "id", id);
    define_builtin(&mut base, "list", list);

    Environment::with_scopes(vec![base, Scope::default()])
}

fn define_macro(
    scope: &mut Scope,
    name: &str,
    expand: fn(&mut Environment, &[Node]) -> Result<Node, EvalError>,
) {
    scope.insert(name.to_string(), Value::Macro(Macro::new(name, expand)));
}

fn define_builtin(
    scope: &mut Scope,
    name: &str,
    func: fn(&mut Environment, &[Value]) -> Result<Value, EvalError>,
) {
    scope.insert(name.to_string(), Value::Builtin(Builtin::new(name, func)));
}

// ============================================================================
// Macros
// ============================================================================

/// `(func p1 ... pN body)`: every argument but the last names a parameter.
fn expand_func(_env: &mut Environment, args: &[Node]) -> Result<Node, EvalError> {
    let Some((body, params)) = args.split_last() else {
        return Ok(Node::Const(Value::from(Func {
            params: Vec::new(),
            body: Node::nil(),
        })));
    };

    let params = params
        .iter()
        .map(parameter_name)
        .collect::<Result<Vec<_>, _>>()?;

    // Const, so the function value is not evaluated again
    Ok(Node::Const(Value::from(Func {
        params,
        body: body.clone(),
    })))
}

/// `(switch c1 b1 c2 b2 ...)`: a trailing unpaired condition gets a nil body.
fn expand_switch(_env: &mut Environment, args: &[Node]) -> Result<Node, EvalError> {
    let branches = args
        .chunks(2)
        .map(|pair| Branch {
            cond: pair[0].clone(),
            body: pair.get(1).cloned().unwrap_or_else(Node::nil),
        })
        .collect();
    Ok(Node::Switch(branches))
}

/// `(let name value)`
fn expand_let(_env: &mut Environment, args: &[Node]) -> Result<Node, EvalError> {
    let [name, value] = args else {
        return Err(EvalError::Arity {
            form: "let",
            expected: 2,
            got: args.len(),
        });
    };
    Ok(Node::assign(parameter_name(name)?, value.clone()))
}

fn parameter_name(node: &Node) -> Result<String, EvalError> {
    node.as_ref_name()
        .map(str::to_string)
        .ok_or_else(|| EvalError::ExpectedParameterName {
            got: node.to_string(),
        })
}

// ============================================================================
// Builtins
// ============================================================================

fn id(_env: &mut Environment, args: &[Value]) -> Result<Value, EvalError> {
    Ok(args.first().cloned().unwrap_or(Value::Nil))
}

fn list(_env: &mut Environment, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::array(args.to_vec()))
}
