//! Quasiquote templates.
//!
//! A template is literal structure with escapes. Literal parts compile to
//! equality checks, escapes re-enter the pattern compiler, and `,@p`
//! matches a prefix of the list whose length leaves exactly enough
//! elements for the fixed template after it.

use knot_ir::Value;
use knot_patterns::{extract_template_vars, NameSet, PatternSyntaxError, Template};
use knot_stack::ensure_sufficient_stack;

use crate::compile::Compiler;
use crate::env::Env;
use crate::node::{Cont, Node};
use crate::sequence::{remainder, Repeat};
use crate::slot::Subject;
use crate::MatchError;

/// `(,@prefix . rest)`
#[derive(Debug)]
pub(crate) struct Splice {
    prefix: Box<Node>,
    rest: Box<Node>,
    rest_len: usize,
}

impl Splice {
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
        let Some(count) = cells.len().checked_sub(self.rest_len) else {
            return fk(env);
        };
        let prefix = Value::list(cells[..count].iter().map(|cell| cell.car()).collect());
        let rest = remainder(subject, &cells, count);
        self.prefix.run(
            &Subject::detached(prefix),
            env,
            &|env: &mut Env| self.rest.run(&rest, env, sk, fk),
            fk,
        )
    }
}

impl Compiler<'_> {
    pub(crate) fn compile_template(
        &self,
        template: &Template,
        bound: &mut NameSet,
    ) -> Result<Node, PatternSyntaxError> {
        ensure_sufficient_stack(|| self.compile_template_inner(template, bound))
    }

    fn compile_template_inner(
        &self,
        template: &Template,
        bound: &mut NameSet,
    ) -> Result<Node, PatternSyntaxError> {
        match template {
            Template::Datum(Value::Null) => Ok(Node::Null),
            Template::Datum(datum) => Ok(Node::Literal(datum.clone())),
            Template::Escape(pattern) => self.compile(pattern, bound),
            Template::Splice(_) => Err(PatternSyntaxError::MisplacedSplice),
            Template::Pair(head, tail) => {
                if let Template::Splice(prefix) = &**head {
                    let rest_len = tail.fixed_len(true)?;
                    let prefix = self.compile(prefix, bound)?;
                    let rest = self.compile_template(tail, bound)?;
                    return Ok(Node::Splice(Splice {
                        prefix: Box::new(prefix),
                        rest: Box::new(rest),
                        rest_len,
                    }));
                }
                let head = self.compile_template(head, bound)?;
                if matches!(**tail, Template::Datum(Value::Null)) {
                    return Ok(Node::Single(Box::new(head)));
                }
                let tail = self.compile_template(tail, bound)?;
                Ok(Node::Pair(Box::new(head), Box::new(tail)))
            }
            Template::Repetition {
                element,
                min,
                trailing,
            } => {
                let trailing_len = trailing.fixed_len(false)?;
                let vars: Vec<_> = extract_template_vars(element, bound)
                    .into_iter()
                    .map(|var| var.name)
                    .collect();
                let element = self.compile_template(element, &mut bound.clone())?;
                bound.extend(vars.iter().copied());
                let trailing = self.compile_template(trailing, bound)?;
                Ok(Node::Repeat(Repeat::new(
                    element,
                    *min,
                    vars,
                    trailing,
                    trailing_len,
                )))
            }
            Template::Vector(elements) => Ok(Node::VectorList(Box::new(
                self.compile_template(elements, bound)?,
            ))),
            Template::Nested { keyword, body } => {
                let body = self.compile_template(body, bound)?;
                Ok(Node::Pair(
                    Box::new(Node::Literal(Value::Symbol(*keyword))),
                    Box::new(Node::Single(Box::new(body))),
                ))
            }
        }
    }
}
