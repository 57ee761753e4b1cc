//! Variable Extractor.
//!
//! Lists, in first-occurrence order, the fresh names a pattern binds given
//! the names already bound around it. A name in `bound` is a reference to
//! an earlier binding (compared for equality at match time), so it is not
//! reported. Predicate and transform procedures are opaque and never
//! inspected; `not` binds nothing. Inside a quasiquote only escapes and
//! splices contain pattern syntax.
//!
//! The sequence and vector compilers call this before emitting a loop, to
//! know which names to accumulate per iteration.

use knot_ir::Name;
use knot_stack::ensure_sufficient_stack;
use rustc_hash::FxHashSet;

use crate::{Pattern, Template};

/// Set of already bound names.
pub type NameSet = FxHashSet<Name>;

/// Accumulator label paired with each extracted name.
///
/// Labels are dense indices into the extraction result, so a repetition
/// can keep one accumulator per name in a plain vector.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AccumulatorId(u32);

impl AccumulatorId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExtractedVar {
    pub name: Name,
    pub accumulator: AccumulatorId,
}

/// Fresh names bound by `pattern`.
pub fn extract_vars(pattern: &Pattern, bound: &NameSet) -> Vec<ExtractedVar> {
    let mut extractor = Extractor::new(bound);
    extractor.pattern(pattern);
    extractor.out
}

/// Fresh names bound by the escapes of a quasiquote template.
pub fn extract_template_vars(template: &Template, bound: &NameSet) -> Vec<ExtractedVar> {
    let mut extractor = Extractor::new(bound);
    extractor.template(template);
    extractor.out
}

/// Just the names of [`extract_vars`].
pub fn bound_names(pattern: &Pattern, bound: &NameSet) -> Vec<Name> {
    extract_vars(pattern, bound)
        .into_iter()
        .map(|var| var.name)
        .collect()
}

struct Extractor<'b> {
    bound: &'b NameSet,
    seen: NameSet,
    out: Vec<ExtractedVar>,
}

impl<'b> Extractor<'b> {
    fn new(bound: &'b NameSet) -> Self {
        Extractor {
            bound,
            seen: NameSet::default(),
            out: Vec::new(),
        }
    }

    /// Record `name` once; `fresh_only` skips names bound outside.
    fn add(&mut self, name: Name, fresh_only: bool) {
        if fresh_only && self.bound.contains(&name) {
            return;
        }
        if self.seen.insert(name) {
            let accumulator = AccumulatorId(u32::try_from(self.out.len()).unwrap_or(u32::MAX));
            self.out.push(ExtractedVar { name, accumulator });
        }
    }

    fn pattern(&mut self, pattern: &Pattern) {
        ensure_sufficient_stack(|| match pattern {
            Pattern::Variable(name) => self.add(*name, true),
            // Slot accessors always introduce a new binding.
            Pattern::Getter(name) | Pattern::Setter(name) => self.add(*name, false),
            Pattern::Literal(_)
            | Pattern::Quoted(_)
            | Pattern::Wildcard
            | Pattern::Null
            | Pattern::Not(_) => {}
            Pattern::Pair(head, tail) => {
                self.pattern(head);
                self.pattern(tail);
            }
            Pattern::Repetition {
                element, trailing, ..
            } => {
                self.pattern(element);
                self.pattern(trailing);
            }
            Pattern::TreeSearch { path, target } => {
                self.pattern(path);
                self.pattern(target);
            }
            Pattern::Vector { elements, rest } => {
                for element in elements {
                    self.pattern(element);
                }
                if let Some(rest) = rest {
                    self.pattern(&rest.element);
                }
            }
            Pattern::And(patterns) | Pattern::Or(patterns) => {
                for pattern in patterns {
                    self.pattern(pattern);
                }
            }
            Pattern::Predicate { pattern, .. } | Pattern::Transform { pattern, .. } => {
                self.pattern(pattern);
            }
            Pattern::Record { fields, .. } => {
                for (_, pattern) in fields {
                    self.pattern(pattern);
                }
            }
            Pattern::Quasiquote(template) => self.template(template),
        });
    }

    fn template(&mut self, template: &Template) {
        ensure_sufficient_stack(|| match template {
            Template::Datum(_) => {}
            Template::Pair(head, tail) => {
                self.template(head);
                self.template(tail);
            }
            Template::Repetition {
                element, trailing, ..
            } => {
                self.template(element);
                self.template(trailing);
            }
            Template::Vector(elements) => self.template(elements),
            Template::Escape(pattern) | Template::Splice(pattern) => self.pattern(pattern),
            Template::Nested { body, .. } => self.template(body),
        });
    }
}
