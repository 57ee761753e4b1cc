//! Tree search: `(path *** target)`.
//!
//! Depth first. At each node the target is tried first. If it fails and
//! the node is a pair, its car must match `path`, and the search moves on
//! to the elements of its cdr one after another. Path variables are bound
//! to lists of the values met on the way down, outermost first.

use knot_ir::{Heap, Name, Pair, Value};
use knot_patterns::{bound_names, NameSet, Pattern, PatternSyntaxError};
use knot_stack::ensure_sufficient_stack;

use crate::compile::Compiler;
use crate::env::{Collected, Env};
use crate::node::{Cont, Node};
use crate::slot::Subject;
use crate::MatchError;

#[derive(Debug)]
pub(crate) struct Search {
    path: Box<Node>,
    target: Box<Node>,
    path_vars: Vec<Name>,
}

/// Path bindings of every step taken so far, innermost first.
struct Trail<'a> {
    step: Collected,
    parent: Option<&'a Trail<'a>>,
}

impl Search {
    pub(crate) fn run<T>(
        &self,
        subject: &Subject,
        env: &mut Env,
        sk: Cont<'_, T>,
        fk: Cont<'_, T>,
    ) -> Result<T, MatchError> {
        self.try_at(subject, None, env, sk, fk)
    }

    fn try_at<T>(
        &self,
        subject: &Subject,
        trail: Option<&Trail<'_>>,
        env: &mut Env,
        sk: Cont<'_, T>,
        fk: Cont<'_, T>,
    ) -> Result<T, MatchError> {
        ensure_sufficient_stack(|| {
            let mark = env.mark();
            self.target.run(
                subject,
                env,
                &|env: &mut Env| {
                    self.bind_path(trail, env);
                    sk(env)
                },
                &|env: &mut Env| {
                    env.truncate(mark);
                    self.descend(subject, trail, env, sk, fk)
                },
            )
        })
    }

    fn descend<T>(
        &self,
        subject: &Subject,
        trail: Option<&Trail<'_>>,
        env: &mut Env,
        sk: Cont<'_, T>,
        fk: Cont<'_, T>,
    ) -> Result<T, MatchError> {
        let Some(pair) = subject.value.as_pair() else {
            return fk(env);
        };
        let mark = env.mark();
        self.path.run(
            &Subject::car(pair),
            env,
            &|env: &mut Env| {
                let step = env.collect(mark, &self.path_vars);
                env.truncate(mark);
                let trail = Trail {
                    step,
                    parent: trail,
                };
                self.siblings(pair, Some(&trail), env, sk, fk)
            },
            &|env: &mut Env| {
                env.truncate(mark);
                fk(env)
            },
        )
    }

    /// Search each element after `cell`, in order.
    fn siblings<T>(
        &self,
        cell: &Heap<Pair>,
        trail: Option<&Trail<'_>>,
        env: &mut Env,
        sk: Cont<'_, T>,
        fk: Cont<'_, T>,
    ) -> Result<T, MatchError> {
        let Some(next) = cell.cdr().as_pair().cloned() else {
            return fk(env);
        };
        self.try_at(&Subject::car(&next), trail, env, sk, &|env: &mut Env| {
            self.siblings(&next, trail, env, sk, fk)
        })
    }

    fn bind_path(&self, trail: Option<&Trail<'_>>, env: &mut Env) {
        let mut steps = Vec::new();
        let mut current = trail;
        while let Some(step) = current {
            steps.push(&step.step);
            current = step.parent;
        }
        steps.reverse();

        for (index, name) in self.path_vars.iter().enumerate() {
            let values: Option<Vec<_>> = steps
                .iter()
                .map(|step| step.get(index).cloned().flatten())
                .collect();
            if let Some(values) = values {
                env.bind(*name, Value::list(values));
            }
        }
    }
}

impl Compiler<'_> {
    pub(crate) fn compile_tree_search(
        &self,
        path: &Pattern,
        target: &Pattern,
        bound: &mut NameSet,
    ) -> Result<Node, PatternSyntaxError> {
        let path_vars = bound_names(path, bound);
        let path = self.compile(path, &mut bound.clone())?;
        let target = self.compile(target, bound)?;
        bound.extend(path_vars.iter().copied());
        Ok(Node::Search(Search {
            path: Box::new(path),
            target: Box::new(target),
            path_vars,
        }))
    }
}
