//! Compile-time pattern errors.
//!
//! Every variant means the pattern (or the `match` form around it) is
//! malformed. None of them is recovered from: the author has to fix the
//! pattern.

use knot_ir::{Name, Value};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PatternSyntaxError {
    #[error("match form has no subject expression")]
    MissingExpression,

    #[error("match form has no clauses")]
    MissingClauses,

    #[error("malformed match clause `{clause}`")]
    MalformedClause { clause: Value },

    #[error("multiple ellipsis patterns not allowed at the same level")]
    MultipleEllipses,

    #[error("dotted tail not allowed after ellipsis")]
    DottedTailAfterEllipsis,

    #[error("ellipsis `{marker}` must follow a pattern")]
    MisplacedEllipsis { marker: Name },

    #[error("malformed tree search, expected `(path *** target)`: `{form}`")]
    MalformedTreeSearch { form: Value },

    #[error("malformed `{keyword}` pattern `{form}`")]
    MalformedForm { keyword: Name, form: Value },

    #[error("unknown procedure `{name}`")]
    UnknownProcedure { name: Name },

    #[error("unknown record type `{name}`")]
    UnknownRecord { name: Name },

    #[error("record type `{record}` has no field `{field}`")]
    UnknownField { record: Name, field: Name },

    #[error("record type `{record}` has {expected} field(s), pattern gives {got}")]
    TooManyFields {
        record: Name,
        expected: usize,
        got: usize,
    },

    #[error("`or` branch {branch} does not bind `{name}` like the other branches")]
    OrBindingMismatch { branch: usize, name: Name },

    #[error("spliced escape must be followed by a fixed-length list")]
    SpliceTail,

    #[error("spliced escape `,@` must appear inside a list")]
    MisplacedSplice,
}
