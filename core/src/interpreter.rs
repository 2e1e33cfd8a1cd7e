//! Tree-walking evaluator.
//!
//! Errors from sub-evaluations are returned unchanged; every composite node
//! stops at the first one.

use tracing::trace;

use crate::ast::{Branch, Node};
use crate::environment::{Environment, Scope};
use crate::error::EvalError;
use crate::stack::ensure_sufficient_stack;
use crate::value::{Func, Value};

// ============================================================================
// Evaluator
// ============================================================================

/// Evaluate a root node against an environment.
pub fn evaluate(root: &Node, env: &mut Environment) -> Result<Value, EvalError> {
    root.eval(env)
}

impl Node {
    pub fn eval(&self, env: &mut Environment) -> Result<Value, EvalError> {
        ensure_sufficient_stack(|| self.eval_inner(env))
    }

    fn eval_inner(&self, env: &mut Environment) -> Result<Value, EvalError> {
        match self {
            Node::Const(value) => Ok(value.clone()),

            // Permissive lookup: unbound is nil, not an error
            Node::Ref(name) => Ok(env.get(name).cloned().unwrap_or(Value::Nil)),

            // Every nested call counts against the depth limit, whether it
            // ends up in a func, a builtin or a macro expansion
            Node::Call { callee, args } => {
                if !env.enter_call() {
                    return Err(EvalError::StackExhausted {
                        limit: env.max_call_depth(),
                    });
                }
                let result = callee
                    .eval(env)
                    .and_then(|callee| apply(env, &callee, args));
                env.exit_call();
                result
            }

            Node::Assign { key, value } => {
                let value = value.eval(env)?;
                env.set(key.as_str(), value.clone());
                Ok(value)
            }

            Node::Switch(branches) => eval_switch(branches, env),

            Node::Block(nodes) => {
                let mut last = Value::Nil;
                for node in nodes {
                    last = node.eval(env)?;
                }
                Ok(last)
            }
        }
    }
}

fn eval_switch(branches: &[Branch], env: &mut Environment) -> Result<Value, EvalError> {
    for branch in branches {
        if branch.cond.eval(env)?.truthy() {
            return branch.body.eval(env);
        }
    }
    Ok(Value::Nil)
}

// ============================================================================
// Call protocol
// ============================================================================

/// Apply an evaluated callee to the raw argument nodes of a call.
///
/// An expander sees the unevaluated nodes and its replacement node is
/// evaluated in the same environment. Anything else gets its arguments
/// evaluated left to right first, then must be callable.
pub fn apply(env: &mut Environment, callee: &Value, args: &[Node]) -> Result<Value, EvalError> {
    if let Value::Macro(m) = callee {
        trace!(name = m.name(), args = args.len(), "expanding macro");
        let expanded = m.expand(env, args)?;
        return expanded.eval(env);
    }

    let values = args
        .iter()
        .map(|arg| arg.eval(env))
        .collect::<Result<Vec<_>, _>>()?;

    call(env, callee, &values)
}

/// Invoke a callable value with already evaluated arguments.
pub fn call(env: &mut Environment, callee: &Value, args: &[Value]) -> Result<Value, EvalError> {
    match callee {
        Value::Func(func) => func.call(env, args),
        Value::Builtin(builtin) => {
            trace!(name = builtin.name(), args = args.len(), "calling builtin");
            builtin.call(env, args)
        }
        Value::Nil
        | Value::Bool(_)
        | Value::Number(_)
        | Value::String(_)
        | Value::Array(_)
        | Value::Macro(_) => Err(EvalError::NotCallable(callee.to_string())),
    }
}

impl Func {
    /// Run the body in one fresh scope pushed on top of the caller's stack.
    ///
    /// Parameters beyond the argument count stay unbound in that scope;
    /// arguments beyond the parameter count are ignored. The scope is popped
    /// on every exit path.
    pub fn call(&self, env: &mut Environment, args: &[Value]) -> Result<Value, EvalError> {
        trace!(params = ?self.params, args = args.len(), "calling func");

        let scope: Scope = self
            .params
            .iter()
            .zip(args)
            .map(|(param, arg)| (param.clone(), arg.clone()))
            .collect();

        env.push(scope);
        let result = self.body.eval(env);
        env.pop();
        result
    }
}
