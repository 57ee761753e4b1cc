//! Sequence/ellipsis matching.
//!
//! `(p ooo q ...)` needs a proper list with at least `min` elements before
//! the `len(q ...)` trailing ones. The trailing length is known at compile
//! time, so the split point is computed once and never searched for.

use knot_ir::{Heap, Name, Pair, Value};
use knot_patterns::{bound_names, NameSet, Pattern, PatternSyntaxError, RepeatMin};

use crate::compile::Compiler;
use crate::env::Env;
use crate::node::{Cont, Node};
use crate::slot::Subject;
use crate::MatchError;

#[derive(Debug)]
pub(crate) struct Repeat {
    element: Box<Node>,
    min: usize,
    /// Names the element binds; each gets one list.
    vars: Vec<Name>,
    trailing: Box<Node>,
    trailing_len: usize,
    /// Set when the element is a fresh variable and nothing trails.
    whole_list: Option<Name>,
}

impl Repeat {
    pub(crate) fn new(
        element: Node,
        min: RepeatMin,
        vars: Vec<Name>,
        trailing: Node,
        trailing_len: usize,
    ) -> Self {
        Repeat {
            element: Box::new(element),
            min: min.count(),
            vars,
            trailing: Box::new(trailing),
            trailing_len,
            whole_list: None,
        }
    }

    pub(crate) fn run<T>(
        &self,
        subject: &Subject,
        env: &mut Env,
        sk: Cont<'_, T>,
        fk: Cont<'_, T>,
    ) -> Result<T, MatchError> {
        let Some(cells) = subject.value.proper_list_cells() else {
            return fk(env);
        };
        if cells.len() < self.trailing_len + self.min {
            return fk(env);
        }
        let count = cells.len() - self.trailing_len;

        if let Some(name) = self.whole_list {
            env.bind(name, subject.value.clone());
            return sk(env);
        }

        let subjects = cells[..count].iter().map(Subject::car);
        let Some(lists) = accumulate(&self.element, &self.vars, subjects, env)? else {
            return fk(env);
        };
        bind_accumulated(env, &self.vars, lists);
        self.trailing.run(&remainder(subject, &cells, count), env, sk, fk)
    }
}

impl Compiler<'_> {
    pub(crate) fn compile_repetition(
        &self,
        element: &Pattern,
        min: RepeatMin,
        trailing: &Pattern,
        bound: &mut NameSet,
    ) -> Result<Node, PatternSyntaxError> {
        let trailing_len = trailing.trailing_len()?;
        let vars = bound_names(element, bound);
        let whole_list = match element {
            Pattern::Variable(name) if trailing_len == 0 && !bound.contains(name) => Some(*name),
            _ => None,
        };

        let element = self.compile(element, &mut bound.clone())?;
        bound.extend(vars.iter().copied());
        let trailing = self.compile(trailing, bound)?;

        let mut repeat = Repeat::new(element, min, vars, trailing, trailing_len);
        repeat.whole_list = whole_list;
        Ok(Node::Repeat(repeat))
    }
}

/// Per-name lists collected by [`accumulate`]. `None` marks a name some
/// element left unbound (possible under lenient `or`).
pub(crate) type Accumulated = Vec<Option<Vec<Value>>>;

/// Match `element` against every subject in turn, collecting the values of
/// `vars` from each match. Returns `None` as soon as one element fails.
///
/// Each element runs to completion on its own: its bindings are read back
/// and dropped before the next element starts.
pub(crate) fn accumulate<I>(
    element: &Node,
    vars: &[Name],
    subjects: I,
    env: &mut Env,
) -> Result<Option<Accumulated>, MatchError>
where
    I: IntoIterator<Item = Subject>,
{
    let mut lists: Accumulated = vec![Some(Vec::new()); vars.len()];
    for subject in subjects {
        let mark = env.mark();
        let step = element.run(
            &subject,
            env,
            &|env: &mut Env| {
                let values = env.collect(mark, vars);
                env.truncate(mark);
                Ok(Some(values))
            },
            &|env: &mut Env| {
                env.truncate(mark);
                Ok(None)
            },
        )?;
        let Some(values) = step else {
            return Ok(None);
        };
        for (list, value) in lists.iter_mut().zip(values) {
            match (list.as_mut(), value) {
                (Some(items), Some(value)) => items.push(value),
                _ => *list = None,
            }
        }
    }
    Ok(Some(lists))
}

pub(crate) fn bind_accumulated(env: &mut Env, vars: &[Name], lists: Accumulated) {
    for (name, list) in vars.iter().zip(lists) {
        if let Some(items) = list {
            env.bind(*name, Value::list(items));
        }
    }
}

/// The list after its first `count` cells, with the cdr slot it sits in.
pub(crate) fn remainder(subject: &Subject, cells: &[Heap<Pair>], count: usize) -> Subject {
    match count.checked_sub(1).and_then(|last| cells.get(last)) {
        Some(last) => Subject::cdr(last),
        None => subject.clone(),
    }
}
