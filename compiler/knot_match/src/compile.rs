//! Pattern compilation.
//!
//! [`CompiledPattern::compile`] turns a [`Pattern`] into an interpreter
//! tree once. Whether a variable occurrence binds or compares is decided
//! here, from the set of names bound so far, so running the tree involves
//! no name analysis at all.

use knot_ir::{Name, Value};
use knot_patterns::{bound_names, NameSet, Pattern, PatternSyntaxError};
use knot_stack::ensure_sufficient_stack;

use crate::env::{Bindings, Env};
use crate::node::Node;
use crate::slot::Subject;
use crate::{MatchError, MatchOptions, OrBindings};

/// A pattern compiled for repeated matching.
#[derive(Debug)]
pub struct CompiledPattern {
    root: Node,
    names: Vec<Name>,
}

impl CompiledPattern {
    pub fn compile(pattern: &Pattern, options: &MatchOptions) -> Result<Self, PatternSyntaxError> {
        Self::compile_with_bound(pattern, &NameSet::default(), options)
    }

    /// Compile with `bound` already in scope: occurrences of those names
    /// compare against the seed bindings passed to [`run`](Self::run).
    #[tracing::instrument(level = "debug", skip_all, fields(bound = bound.len()))]
    pub fn compile_with_bound(
        pattern: &Pattern,
        bound: &NameSet,
        options: &MatchOptions,
    ) -> Result<Self, PatternSyntaxError> {
        let names = bound_names(pattern, bound);
        let mut scope = bound.clone();
        let root = Compiler { options }.compile(pattern, &mut scope)?;
        tracing::debug!(names = names.len(), "compiled pattern");
        Ok(CompiledPattern { root, names })
    }

    /// Names a successful match can bind, in first-occurrence order.
    pub fn names(&self) -> &[Name] {
        &self.names
    }

    /// Match `value`, then call exactly one of the continuations.
    ///
    /// `on_success` receives the bindings made by this match (not the
    /// seed). Its result, or the result of `on_failure`, is returned.
    pub fn run<T>(
        &self,
        value: &Value,
        seed: &Bindings,
        on_success: impl Fn(Bindings) -> Result<T, MatchError>,
        on_failure: impl Fn() -> Result<T, MatchError>,
    ) -> Result<T, MatchError> {
        let mut env = Env::seeded(seed);
        let mark = env.mark();
        self.root.run(
            &Subject::detached(value.clone()),
            &mut env,
            &|env: &mut Env| on_success(env.bindings_since(mark)),
            &|_: &mut Env| on_failure(),
        )
    }

    pub fn match_value(&self, value: &Value) -> Result<Option<Bindings>, MatchError> {
        self.match_with(value, &Bindings::default())
    }

    pub fn match_with(&self, value: &Value, seed: &Bindings) -> Result<Option<Bindings>, MatchError> {
        self.run(value, seed, |bindings| Ok(Some(bindings)), || Ok(None))
    }
}

pub(crate) struct Compiler<'o> {
    options: &'o MatchOptions,
}

impl Compiler<'_> {
    /// Compile `pattern`, adding the names it binds to `bound`.
    pub(crate) fn compile(
        &self,
        pattern: &Pattern,
        bound: &mut NameSet,
    ) -> Result<Node, PatternSyntaxError> {
        ensure_sufficient_stack(|| self.compile_inner(pattern, bound))
    }

    fn compile_inner(
        &self,
        pattern: &Pattern,
        bound: &mut NameSet,
    ) -> Result<Node, PatternSyntaxError> {
        match pattern {
            Pattern::Null => Ok(Node::Null),
            Pattern::Literal(value) | Pattern::Quoted(value) => Ok(Node::Literal(value.clone())),
            Pattern::Quasiquote(template) => self.compile_template(template, bound),
            Pattern::And(patterns) => {
                let nodes = patterns
                    .iter()
                    .map(|pattern| self.compile(pattern, bound))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(match nodes.len() {
                    0 => Node::Succeed,
                    _ => Node::And(nodes),
                })
            }
            Pattern::Or(branches) => self.compile_or(branches, bound),
            Pattern::Not(inner) => {
                let inner = self.compile(inner, &mut bound.clone())?;
                Ok(Node::Not(Box::new(inner)))
            }
            Pattern::Predicate { test, pattern } => Ok(Node::Predicate {
                test: test.clone(),
                then: Box::new(self.compile(pattern, bound)?),
            }),
            Pattern::Transform { procedure, pattern } => Ok(Node::Transform {
                procedure: procedure.clone(),
                then: Box::new(self.compile(pattern, bound)?),
            }),
            Pattern::Repetition {
                element,
                min,
                trailing,
            } => self.compile_repetition(element, *min, trailing, bound),
            Pattern::TreeSearch { path, target } => self.compile_tree_search(path, target, bound),
            Pattern::Record { shape, fields } => self.compile_record(shape, fields, bound),
            Pattern::Pair(head, tail) if matches!(**tail, Pattern::Null) => {
                Ok(Node::Single(Box::new(self.compile(head, bound)?)))
            }
            Pattern::Pair(head, tail) => {
                let head = self.compile(head, bound)?;
                let tail = self.compile(tail, bound)?;
                Ok(Node::Pair(Box::new(head), Box::new(tail)))
            }
            Pattern::Vector { elements, rest } => self.compile_vector(elements, rest.as_ref(), bound),
            Pattern::Wildcard => Ok(Node::Succeed),
            Pattern::Variable(name) => {
                if bound.insert(*name) {
                    Ok(Node::Bind(*name))
                } else {
                    Ok(Node::Same(*name))
                }
            }
            Pattern::Getter(name) => {
                bound.insert(*name);
                Ok(Node::Getter(*name))
            }
            Pattern::Setter(name) => {
                bound.insert(*name);
                Ok(Node::Setter(*name))
            }
        }
    }

    /// Branches compile independently; afterwards every name any branch
    /// binds counts as bound.
    fn compile_or(
        &self,
        branches: &[Pattern],
        bound: &mut NameSet,
    ) -> Result<Node, PatternSyntaxError> {
        match branches {
            [] => return Ok(Node::Fail),
            [only] => return self.compile(only, bound),
            _ => {}
        }

        let branch_names: Vec<Vec<Name>> = branches
            .iter()
            .map(|branch| bound_names(branch, bound))
            .collect();
        if self.options.or_bindings == OrBindings::Strict {
            check_or_bindings(&branch_names)?;
        }

        let nodes = branches
            .iter()
            .map(|branch| self.compile(branch, &mut bound.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        bound.extend(branch_names.into_iter().flatten());
        Ok(Node::Or(nodes))
    }
}

/// Every branch must bind the names the first one binds, and no others.
fn check_or_bindings(branch_names: &[Vec<Name>]) -> Result<(), PatternSyntaxError> {
    let Some((first, rest)) = branch_names.split_first() else {
        return Ok(());
    };
    let first_set: NameSet = first.iter().copied().collect();
    for (offset, names) in rest.iter().enumerate() {
        let branch = offset + 1;
        let set: NameSet = names.iter().copied().collect();
        let extra = names.iter().find(|name| !first_set.contains(name));
        let missing = first.iter().find(|name| !set.contains(name));
        if let Some(name) = extra.or(missing) {
            return Err(PatternSyntaxError::OrBindingMismatch {
                branch,
                name: *name,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
