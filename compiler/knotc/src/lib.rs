//! Knot CLI library.
//!
//! [`Session`] evaluates match scripts: top-level `define-record` and
//! `match` forms. The `commands` module wraps it for the `knot` binary.

pub mod commands;
mod logging;
mod script;

pub use logging::init_tracing;
pub use script::{CheckSummary, ScriptError, Session};
