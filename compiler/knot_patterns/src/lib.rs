//! Knot Patterns - everything about a pattern short of matching it.
//!
//! - [`Pattern`] and [`Template`], the pattern AST
//! - [`parse_pattern`] and [`parse_match_form`], from reader data to AST
//! - [`extract_vars`], the Variable Extractor
//! - [`Registry`], the named procedures and [`RecordShape`]s that
//!   predicate, transform and record patterns refer to
//! - [`PatternSyntaxError`], every compile-time failure

mod builtins;
mod errors;
mod extract;
mod form;
mod keywords;
mod parse;
mod pattern;
mod record;
mod registry;

pub use errors::PatternSyntaxError;
pub use extract::{
    bound_names, extract_template_vars, extract_vars, AccumulatorId, ExtractedVar, NameSet,
};
pub use form::{parse_clause, parse_match_form, ClauseForm, MatchForm};
pub use keywords::Keywords;
pub use parse::parse_pattern;
pub use pattern::{Pattern, RepeatMin, Template, VectorRest};
pub use record::{FieldAccessor, RecordShape};
pub use registry::Registry;
