//! Record patterns. The instance test and field readers come from the
//! pattern's [`RecordShape`]; nothing is derived from the tag.

use std::sync::Arc;

use knot_patterns::{NameSet, Pattern, PatternSyntaxError, RecordShape};

use crate::compile::Compiler;
use crate::env::Env;
use crate::node::{Cont, Node};
use crate::slot::Subject;
use crate::MatchError;

#[derive(Debug)]
pub(crate) struct RecordNode {
    shape: Arc<RecordShape>,
    fields: Vec<(usize, Node)>,
}

impl RecordNode {
    pub(crate) fn run<T>(
        &self,
        subject: &Subject,
        env: &mut Env,
        sk: Cont<'_, T>,
        fk: Cont<'_, T>,
    ) -> Result<T, MatchError> {
        if !self.shape.is_instance().call1(&subject.value)?.is_truthy() {
            return fk(env);
        }
        self.run_fields(subject, 0, env, sk, fk)
    }

    /// Fields are read one at a time, only once the previous ones matched.
    fn run_fields<T>(
        &self,
        subject: &Subject,
        position: usize,
        env: &mut Env,
        sk: Cont<'_, T>,
        fk: Cont<'_, T>,
    ) -> Result<T, MatchError> {
        let Some((index, node)) = self.fields.get(position) else {
            return sk(env);
        };
        let Some(accessor) = self.shape.field(*index) else {
            return fk(env);
        };
        let field = Subject::field(&subject.value, accessor)?;
        node.run(
            &field,
            env,
            &|env: &mut Env| self.run_fields(subject, position + 1, env, sk, fk),
            fk,
        )
    }
}

impl Compiler<'_> {
    pub(crate) fn compile_record(
        &self,
        shape: &Arc<RecordShape>,
        fields: &[(usize, Pattern)],
        bound: &mut NameSet,
    ) -> Result<Node, PatternSyntaxError> {
        let expected = shape.fields().len();
        let fields = fields
            .iter()
            .map(|(index, pattern)| {
                if *index >= expected {
                    return Err(PatternSyntaxError::TooManyFields {
                        record: shape.tag(),
                        expected,
                        got: index + 1,
                    });
                }
                Ok((*index, self.compile(pattern, bound)?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Node::Record(RecordNode {
            shape: Arc::clone(shape),
            fields,
        }))
    }
}
