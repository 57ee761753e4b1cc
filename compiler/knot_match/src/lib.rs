//! Knot Match - compiles patterns to continuation-passing matchers and
//! runs them.
//!
//! [`CompiledPattern`] is one compiled pattern; [`match_value`] is the
//! Clause Driver over an ordered list of [`Clause`]s.
//!
//! # Example
//!
//! ```
//! use knot_ir::Value;
//! use knot_match::{CompiledPattern, MatchOptions};
//! use knot_patterns::{Pattern, RepeatMin};
//!
//! // (a ... b)
//! let pattern = Pattern::repetition(
//!     Pattern::variable("a"),
//!     RepeatMin::Zero,
//!     Pattern::list(vec![Pattern::variable("b")]),
//! );
//! let compiled = CompiledPattern::compile(&pattern, &MatchOptions::default()).unwrap();
//! let value = Value::list(vec![Value::int(1), Value::int(2), Value::int(3)]);
//! let bindings = compiled.match_value(&value).unwrap().unwrap();
//! assert_eq!(bindings.get_str("a").map(ToString::to_string).as_deref(), Some("(1 2)"));
//! assert_eq!(bindings.get_str("b"), Some(&Value::int(3)));
//! ```

mod compile;
mod driver;
mod env;
mod errors;
mod node;
mod options;
mod quasi;
mod record;
mod search;
mod sequence;
mod slot;
mod vector;

pub use compile::CompiledPattern;
pub use driver::{match_value, Clause, ClauseBody, Failure};
pub use env::Bindings;
pub use errors::{ControlAction, MatchError};
pub use options::{MatchOptions, OrBindings};
