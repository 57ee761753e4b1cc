//! Knot Reader - turns source text into `Value` data.
//!
//! Patterns, match clauses and `knotc` scripts are all written as
//! S-expressions. The reader produces plain [`Value`]s; interpreting them as
//! patterns is the job of `knot_patterns`.
//!
//! Abbreviations expand to two-element lists:
//!
//! | Text | Datum |
//! |------|-------|
//! | `'x` | `(quote x)` |
//! | `` `x `` | `(quasiquote x)` |
//! | `,x` | `(unquote x)` |
//! | `,@x` | `(unquote-splicing x)` |

mod error;
mod reader;
mod span;
mod token;

pub use error::{ReadError, ReadErrorKind};
pub use span::Span;

use knot_ir::Value;

/// Read every datum in `source`.
pub fn read_all(source: &str) -> Result<Vec<Value>, ReadError> {
    let tokens = token::tokenize(source)?;
    reader::Reader::new(&tokens, source.len()).read_all()
}

/// Read exactly one datum from `source`.
pub fn read_one(source: &str) -> Result<Value, ReadError> {
    let tokens = token::tokenize(source)?;
    reader::Reader::new(&tokens, source.len()).read_single()
}
