//! Vector patterns: fixed positions, optionally followed by a repetition
//! over the remaining indices.

use knot_ir::{Heap, Name, Vector};
use knot_patterns::{bound_names, NameSet, Pattern, PatternSyntaxError, VectorRest};

use crate::compile::Compiler;
use crate::env::Env;
use crate::node::{Cont, Node};
use crate::sequence::{accumulate, bind_accumulated};
use crate::slot::Subject;
use crate::MatchError;

#[derive(Debug)]
pub(crate) struct VectorNode {
    elements: Vec<Node>,
    rest: Option<RestNode>,
}

#[derive(Debug)]
struct RestNode {
    element: Box<Node>,
    min: usize,
    vars: Vec<Name>,
}

impl VectorNode {
    pub(crate) fn run<T>(
        &self,
        subject: &Subject,
        env: &mut Env,
        sk: Cont<'_, T>,
        fk: Cont<'_, T>,
    ) -> Result<T, MatchError> {
        let Some(vector) = subject.value.as_vector() else {
            return fk(env);
        };
        let fits = match &self.rest {
            None => vector.len() == self.elements.len(),
            Some(rest) => vector.len() >= self.elements.len() + rest.min,
        };
        if !fits {
            return fk(env);
        }
        self.run_from(vector, 0, env, sk, fk)
    }

    fn run_from<T>(
        &self,
        vector: &Heap<Vector>,
        index: usize,
        env: &mut Env,
        sk: Cont<'_, T>,
        fk: Cont<'_, T>,
    ) -> Result<T, MatchError> {
        let Some(node) = self.elements.get(index) else {
            return self.run_rest(vector, env, sk, fk);
        };
        node.run(
            &Subject::element(vector, index),
            env,
            &|env: &mut Env| self.run_from(vector, index + 1, env, sk, fk),
            fk,
        )
    }

    fn run_rest<T>(
        &self,
        vector: &Heap<Vector>,
        env: &mut Env,
        sk: Cont<'_, T>,
        fk: Cont<'_, T>,
    ) -> Result<T, MatchError> {
        let Some(rest) = &self.rest else {
            return sk(env);
        };
        let subjects = (self.elements.len()..vector.len()).map(|i| Subject::element(vector, i));
        match accumulate(&rest.element, &rest.vars, subjects, env)? {
            Some(lists) => {
                bind_accumulated(env, &rest.vars, lists);
                sk(env)
            }
            None => fk(env),
        }
    }
}

impl Compiler<'_> {
    pub(crate) fn compile_vector(
        &self,
        elements: &[Pattern],
        rest: Option<&VectorRest>,
        bound: &mut NameSet,
    ) -> Result<Node, PatternSyntaxError> {
        let elements = elements
            .iter()
            .map(|element| self.compile(element, bound))
            .collect::<Result<Vec<_>, _>>()?;
        let rest = match rest {
            Some(rest) => {
                let vars = bound_names(&rest.element, bound);
                let element = self.compile(&rest.element, &mut bound.clone())?;
                bound.extend(vars.iter().copied());
                Some(RestNode {
                    element: Box::new(element),
                    min: rest.min.count(),
                    vars,
                })
            }
            None => None,
        };
        Ok(Node::Vector(VectorNode { elements, rest }))
    }
}
