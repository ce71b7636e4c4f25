//! Stack safety for evaluating deeply nested trees.
//!
//! Trees are author-supplied and may nest arbitrarily deep. Every recursive
//! `evaluate` call goes through [`ensure_sufficient_stack`], which grows the
//! native stack with `stacker` before it runs out. The interpreter's depth
//! limit bounds the total work; this only keeps the host thread alive while
//! it gets there.

/// Default maximum evaluation depth for an interpreter.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Minimum stack space to keep available (100KB red zone).
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
#[cfg(not(target_arch = "wasm32"))]
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
