//! Knot IR - names and runtime data shared by every knot crate.
//!
//! This crate provides:
//! - `Name`, a 32-bit interned identifier, and the process-wide interner
//! - `Value`, the Scheme-like datum that patterns are matched against
//! - `Procedure`, host-supplied native functions used as predicates,
//!   transforms, record accessors, getters and setters
//! - `ProcError`, the error type every procedure call reports

mod error;
mod interner;
mod name;
mod value;

pub use error::ProcError;
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use value::{Arity, Heap, NativeFn, Pair, Procedure, Record, Value, Vector};
