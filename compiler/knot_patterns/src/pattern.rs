//! Pattern AST.
//!
//! A `Pattern` is built once per clause, either by [`parse_pattern`] from
//! surface syntax or directly by a host, and never changes afterwards.
//!
//! List patterns are pair chains terminated by `Null`. A `Repetition` is
//! itself a list pattern: `(a ... b)` is `Repetition { a, Zero, (b) }`,
//! and `(x a ... b)` is `Pair(x, Repetition { a, Zero, (b) })`. A
//! `Repetition` in head position is therefore a nested list.
//!
//! [`parse_pattern`]: crate::parse_pattern

use std::sync::Arc;

use knot_ir::{Name, Procedure, Value};

use crate::{PatternSyntaxError, RecordShape};

/// Minimum element count of a repetition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RepeatMin {
    /// `...` or `___`
    Zero,
    /// `..1`
    One,
}

impl RepeatMin {
    pub fn count(self) -> usize {
        match self {
            RepeatMin::Zero => 0,
            RepeatMin::One => 1,
        }
    }
}

#[derive(Clone, Debug)]
pub enum Pattern {
    /// Matches by structural equality.
    Literal(Value),
    /// `'datum`; matches by structural equality.
    Quoted(Value),
    /// Binds a fresh name, or compares with an earlier binding.
    Variable(Name),
    /// `_`
    Wildcard,
    /// `()`, the empty-sequence terminator.
    Null,
    Pair(Box<Pattern>, Box<Pattern>),
    /// `element` repeated, then whatever `trailing` requires.
    Repetition {
        element: Box<Pattern>,
        min: RepeatMin,
        trailing: Box<Pattern>,
    },
    /// `(path *** target)`
    TreeSearch {
        path: Box<Pattern>,
        target: Box<Pattern>,
    },
    Vector {
        elements: Vec<Pattern>,
        rest: Option<VectorRest>,
    },
    And(Vec<Pattern>),
    Or(Vec<Pattern>),
    Not(Box<Pattern>),
    /// `(? test pattern ...)`
    Predicate {
        test: Procedure,
        pattern: Box<Pattern>,
    },
    /// `(= procedure pattern)`
    Transform {
        procedure: Procedure,
        pattern: Box<Pattern>,
    },
    /// `($ tag pattern ...)` or `(@ tag (field pattern) ...)`; each entry
    /// pairs a field index of `shape` with the pattern for that field.
    Record {
        shape: Arc<RecordShape>,
        fields: Vec<(usize, Pattern)>,
    },
    Quasiquote(Template),
    /// `(get! name)`: binds a reader for the matched slot.
    Getter(Name),
    /// `(set! name)`: binds a writer for the matched slot.
    Setter(Name),
}

/// Trailing `pattern ooo` of a vector pattern.
#[derive(Clone, Debug)]
pub struct VectorRest {
    pub element: Box<Pattern>,
    pub min: RepeatMin,
}

/// Quasiquote template.
#[derive(Clone, Debug)]
pub enum Template {
    /// Literal structure.
    Datum(Value),
    Pair(Box<Template>, Box<Template>),
    /// `(qp ooo qp ...)`
    Repetition {
        element: Box<Template>,
        min: RepeatMin,
        trailing: Box<Template>,
    },
    /// `#(qp ...)`; the payload is the list template of the elements.
    Vector(Box<Template>),
    /// `,pattern` at depth zero.
    Escape(Box<Pattern>),
    /// `,@pattern` at depth zero; only valid as the head of a `Pair`.
    Splice(Box<Pattern>),
    /// A quasiquote-family form one level in or out, matched as the list
    /// `(keyword body)`.
    Nested { keyword: Name, body: Box<Template> },
}

impl Pattern {
    pub fn variable(name: &str) -> Self {
        Pattern::Variable(Name::intern(name))
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Pattern::Literal(value.into())
    }

    pub fn pair(head: Pattern, tail: Pattern) -> Self {
        Pattern::Pair(Box::new(head), Box::new(tail))
    }

    /// Proper list pattern of `items`.
    pub fn list(items: Vec<Pattern>) -> Self {
        items
            .into_iter()
            .rev()
            .fold(Pattern::Null, |tail, head| Pattern::pair(head, tail))
    }

    pub fn repetition(element: Pattern, min: RepeatMin, trailing: Pattern) -> Self {
        Pattern::Repetition {
            element: Box::new(element),
            min,
            trailing: Box::new(trailing),
        }
    }

    pub fn tree_search(path: Pattern, target: Pattern) -> Self {
        Pattern::TreeSearch {
            path: Box::new(path),
            target: Box::new(target),
        }
    }

    pub fn vector(elements: Vec<Pattern>, rest: Option<(Pattern, RepeatMin)>) -> Self {
        Pattern::Vector {
            elements,
            rest: rest.map(|(element, min)| VectorRest {
                element: Box::new(element),
                min,
            }),
        }
    }

    /// Number of elements a list pattern following an ellipsis consumes.
    ///
    /// The pattern must be a pair chain ending in `()`. A repetition in
    /// the chain or any other terminator is an error, since the
    /// element/trailing boundary must be fixed before matching starts.
    pub fn trailing_len(&self) -> Result<usize, PatternSyntaxError> {
        let mut len = 0;
        let mut current = self;
        loop {
            match current {
                Pattern::Null => return Ok(len),
                Pattern::Pair(_, tail) => {
                    len += 1;
                    current = tail;
                }
                Pattern::Repetition { .. } => return Err(PatternSyntaxError::MultipleEllipses),
                _ => return Err(PatternSyntaxError::DottedTailAfterEllipsis),
            }
        }
    }
}

impl Template {
    pub fn pair(head: Template, tail: Template) -> Self {
        Template::Pair(Box::new(head), Box::new(tail))
    }

    /// Number of elements a fixed list template consumes; see
    /// [`Pattern::trailing_len`]. `after_splice` selects the error reported
    /// for a variable-length element.
    pub fn fixed_len(&self, after_splice: bool) -> Result<usize, PatternSyntaxError> {
        let mut len = 0;
        let mut current = self;
        loop {
            match current {
                Template::Datum(Value::Null) => return Ok(len),
                Template::Pair(head, tail) => {
                    if matches!(**head, Template::Splice(_)) {
                        return Err(variable_length_error(after_splice));
                    }
                    len += 1;
                    current = tail;
                }
                Template::Repetition { .. } => return Err(variable_length_error(after_splice)),
                _ if after_splice => return Err(PatternSyntaxError::SpliceTail),
                _ => return Err(PatternSyntaxError::DottedTailAfterEllipsis),
            }
        }
    }
}

fn variable_length_error(after_splice: bool) -> PatternSyntaxError {
    if after_splice {
        PatternSyntaxError::SpliceTail
    } else {
        PatternSyntaxError::MultipleEllipses
    }
}
