//! Stack growth guard for recursive tree walks.
//!
//! Formulas written by hosts (or generated by tools) can nest thousands of
//! levels deep: long `&` chains, nested `If`s, generated lookups. The binder
//! and IR compiler recurse per node, so every recursive step goes through
//! [`ensure_sufficient_stack`].
//!
//! On native targets `stacker` grows the stack on demand. WASM manages its
//! own stack and the guard is a passthrough.

/// Grow when less than this remains (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if the remaining space is below the red zone.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Depth of a right-leaning chain, walked recursively.
    fn chain_depth(n: u64) -> u64 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { chain_depth(n - 1) + 1 })
    }

    #[test]
    fn deep_recursion_does_not_overflow() {
        assert_eq!(chain_depth(200_000), 200_000);
    }

    #[test]
    fn passes_through_results() {
        let result: Result<u8, &str> = ensure_sufficient_stack(|| Err("bad"));
        assert_eq!(result, Err("bad"));
    }
}
