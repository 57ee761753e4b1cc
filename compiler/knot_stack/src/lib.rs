//! Stack growth for deep recursion.
//!
//! Compiled matchers run in continuation-passing style: every element of a
//! list, every step of a tree search and every nested pair adds native stack
//! frames before the final continuation returns. Structural equality and
//! printing of long lists recurse in the same way. Wrapping those recursive
//! entry points in [`ensure_sufficient_stack`] moves the recursion onto
//! freshly allocated stack segments when the current one runs low.
//!
//! On `wasm32` the wrapper is a plain call.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
///
/// ```text
/// fn run<T>(
///     &self,
///     subject: &Subject,
///     env: &mut Env,
///     sk: Cont<'_, T>,
///     fk: Cont<'_, T>,
/// ) -> Result<T, MatchError> {
///     ensure_sufficient_stack(|| self.dispatch(subject, env, sk, fk))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
