//! Environment for variable bindings
//!
//! The Environment is an ordered stack of scopes, innermost last. Lookup walks
//! from the innermost scope outwards; definition and deletion only ever touch
//! the innermost scope.

use rustc_hash::FxHashMap;

use crate::value::Value;

/// One layer of name-to-value bindings.
pub type Scope = FxHashMap<String, Value>;

/// Default limit on nested call evaluations. Each call node being evaluated
/// counts once, so a recursive function uses one level per call in its body
/// that is still waiting on the recursion.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

// ============================================================================
// Environment
// ============================================================================

/// Stack of scopes plus the bookkeeping the evaluator needs for its
/// recursion limit.
///
/// Single-threaded by construction: evaluation takes `&mut Environment`, so
/// there is exactly one writer at any time.
#[derive(Clone, Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
    calls: usize,
    max_call_depth: usize,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Create an environment holding a single empty scope
    pub fn new() -> Self {
        Self::with_scopes(vec![Scope::default()])
    }

    pub(crate) fn with_scopes(scopes: Vec<Scope>) -> Self {
        debug_assert!(!scopes.is_empty());
        Environment {
            scopes,
            calls: 0,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    /// Look up a name, innermost scope first. `None` means no scope binds it.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(key))
    }

    /// Bind a name in the innermost scope
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.innermost_mut().insert(key.into(), value);
    }

    /// Remove a binding from the innermost scope only
    pub fn delete(&mut self, key: &str) -> Option<Value> {
        self.innermost_mut().remove(key)
    }

    pub fn push(&mut self, scope: Scope) {
        self.scopes.push(scope);
    }

    /// Remove the innermost scope.
    ///
    /// # Panics
    ///
    /// Panics when only one scope is left; callers must pop exactly what
    /// they pushed.
    pub fn pop(&mut self) -> Scope {
        assert!(self.scopes.len() > 1, "cannot pop the outermost scope");
        self.scopes.pop().expect("stack holds more than one scope")
    }

    /// Number of scopes on the stack
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn max_call_depth(&self) -> usize {
        self.max_call_depth
    }

    pub fn set_max_call_depth(&mut self, limit: usize) {
        self.max_call_depth = limit;
    }

    /// Record entry into a call evaluation; false when the limit is reached.
    pub(crate) fn enter_call(&mut self) -> bool {
        if self.calls >= self.max_call_depth {
            return false;
        }
        self.calls += 1;
        true
    }

    pub(crate) fn exit_call(&mut self) {
        self.calls = self.calls.saturating_sub(1);
    }

    fn innermost_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }
}
