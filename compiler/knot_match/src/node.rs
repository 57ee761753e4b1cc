//! The interpreter tree a pattern compiles to.
//!
//! A `Node` is run against a [`Subject`] with a success continuation and a
//! failure continuation. Exactly one of them is eventually called for each
//! path through the tree, and whatever it returns is the answer of the
//! whole run. Nodes that try alternatives (`Or`, `Not`, tree search) mark
//! the environment first and truncate back to the mark before moving on.

use knot_ir::{Name, Procedure, Value};
use knot_stack::ensure_sufficient_stack;

use crate::env::Env;
use crate::quasi::Splice;
use crate::record::RecordNode;
use crate::search::Search;
use crate::sequence::Repeat;
use crate::slot::Subject;
use crate::vector::VectorNode;
use crate::MatchError;

/// Continuation handed to a running node.
pub(crate) type Cont<'a, T> = &'a dyn Fn(&mut Env) -> Result<T, MatchError>;

#[derive(Debug)]
pub(crate) enum Node {
    /// `()`
    Null,
    /// Structural equality with a constant.
    Literal(Value),
    Succeed,
    Fail,
    /// First occurrence of a variable.
    Bind(Name),
    /// Later occurrence of a variable: equality with its binding.
    Same(Name),
    /// One-element list whose element matches the node.
    Single(Box<Node>),
    Pair(Box<Node>, Box<Node>),
    And(Vec<Node>),
    Or(Vec<Node>),
    Not(Box<Node>),
    Predicate {
        test: Procedure,
        then: Box<Node>,
    },
    Transform {
        procedure: Procedure,
        then: Box<Node>,
    },
    Repeat(Repeat),
    Search(Search),
    Vector(VectorNode),
    Record(RecordNode),
    Getter(Name),
    Setter(Name),
    Splice(Splice),
    /// Vector converted to a list, then matched.
    VectorList(Box<Node>),
}

impl Node {
    pub(crate) fn run<T>(
        &self,
        subject: &Subject,
        env: &mut Env,
        sk: Cont<'_, T>,
        fk: Cont<'_, T>,
    ) -> Result<T, MatchError> {
        ensure_sufficient_stack(|| self.dispatch(subject, env, sk, fk))
    }

    fn dispatch<T>(
        &self,
        subject: &Subject,
        env: &mut Env,
        sk: Cont<'_, T>,
        fk: Cont<'_, T>,
    ) -> Result<T, MatchError> {
        match self {
            Node::Null => check(subject.value.is_null(), env, sk, fk),
            Node::Literal(expected) => check(subject.value.equals(expected), env, sk, fk),
            Node::Succeed => sk(env),
            Node::Fail => fk(env),
            Node::Bind(name) => {
                env.bind(*name, subject.value.clone());
                sk(env)
            }
            Node::Same(name) => {
                let Some(bound) = env.lookup(*name) else {
                    return Err(MatchError::UnboundReference { name: *name });
                };
                let equal = bound.equals(&subject.value);
                check(equal, env, sk, fk)
            }
            Node::Single(element) => match subject.value.as_pair() {
                Some(pair) if pair.cdr().is_null() => element.run(&Subject::car(pair), env, sk, fk),
                _ => fk(env),
            },
            Node::Pair(head, tail) => {
                let Some(pair) = subject.value.as_pair() else {
                    return fk(env);
                };
                let rest = Subject::cdr(pair);
                head.run(
                    &Subject::car(pair),
                    env,
                    &|env: &mut Env| tail.run(&rest, env, sk, fk),
                    fk,
                )
            }
            Node::And(nodes) => run_and(nodes, subject, env, sk, fk),
            Node::Or(branches) => run_or(branches, subject, env, sk, fk),
            Node::Not(inner) => {
                let mark = env.mark();
                inner.run(
                    subject,
                    env,
                    &|env: &mut Env| {
                        env.truncate(mark);
                        fk(env)
                    },
                    &|env: &mut Env| {
                        env.truncate(mark);
                        sk(env)
                    },
                )
            }
            Node::Predicate { test, then } => {
                if test.call1(&subject.value)?.is_truthy() {
                    then.run(subject, env, sk, fk)
                } else {
                    fk(env)
                }
            }
            Node::Transform { procedure, then } => {
                let transformed = procedure.call1(&subject.value)?;
                then.run(&Subject::detached(transformed), env, sk, fk)
            }
            Node::Repeat(repeat) => repeat.run(subject, env, sk, fk),
            Node::Search(search) => search.run(subject, env, sk, fk),
            Node::Vector(vector) => vector.run(subject, env, sk, fk),
            Node::Record(record) => record.run(subject, env, sk, fk),
            Node::Getter(name) => {
                env.bind(*name, Value::procedure(subject.getter(*name)));
                sk(env)
            }
            Node::Setter(name) => {
                env.bind(*name, Value::procedure(subject.setter(*name)));
                sk(env)
            }
            Node::Splice(splice) => splice.run(subject, env, sk, fk),
            Node::VectorList(inner) => match subject.value.as_vector() {
                Some(vector) => {
                    let list = Value::list(vector.to_vec());
                    inner.run(&Subject::detached(list), env, sk, fk)
                }
                None => fk(env),
            },
        }
    }
}

#[inline]
fn check<T>(ok: bool, env: &mut Env, sk: Cont<'_, T>, fk: Cont<'_, T>) -> Result<T, MatchError> {
    if ok {
        sk(env)
    } else {
        fk(env)
    }
}

fn run_and<T>(
    nodes: &[Node],
    subject: &Subject,
    env: &mut Env,
    sk: Cont<'_, T>,
    fk: Cont<'_, T>,
) -> Result<T, MatchError> {
    match nodes {
        [] => sk(env),
        [last] => last.run(subject, env, sk, fk),
        [first, rest @ ..] => first.run(
            subject,
            env,
            &|env: &mut Env| run_and(rest, subject, env, sk, fk),
            fk,
        ),
    }
}

fn run_or<T>(
    branches: &[Node],
    subject: &Subject,
    env: &mut Env,
    sk: Cont<'_, T>,
    fk: Cont<'_, T>,
) -> Result<T, MatchError> {
    match branches {
        [] => fk(env),
        [last] => last.run(subject, env, sk, fk),
        [first, rest @ ..] => {
            let mark = env.mark();
            first.run(subject, env, sk, &|env: &mut Env| {
                env.truncate(mark);
                run_or(rest, subject, env, sk, fk)
            })
        }
    }
}
