//! Native stack headroom for the recursive parser and evaluator.
//!
//! Nesting depth is bounded by the parser's nesting limit and the
//! environment's call depth limit; this keeps those limits reachable on
//! threads with small stacks.

/// Run `f`, first moving to a fresh stack segment when less than the red zone
/// remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    const RED_ZONE: usize = 100 * 1024;
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
