//! Surface syntax to `Pattern`.
//!
//! The input is a datum produced by the reader. Symbols naming predicates,
//! transforms and record types are resolved in the [`Registry`] here, so a
//! pattern refers to its procedures directly.
//!
//! Repetition markers are recognized by looking one element ahead: in
//! `(p ... rest)` the marker is the second element of the chain starting
//! at `p`. Everything after the marker is checked for a second marker
//! before any of it is parsed.

use knot_ir::{Heap, Name, Pair, Value};
use knot_stack::ensure_sufficient_stack;

use crate::{Keywords, Pattern, PatternSyntaxError, Registry, Template};

/// Parse one pattern.
pub fn parse_pattern(datum: &Value, registry: &Registry) -> Result<Pattern, PatternSyntaxError> {
    Parser::new(registry).parse(datum)
}

struct Parser<'r> {
    registry: &'r Registry,
    kw: &'static Keywords,
}

impl<'r> Parser<'r> {
    fn new(registry: &'r Registry) -> Self {
        Parser {
            registry,
            kw: Keywords::get(),
        }
    }

    fn parse(&self, datum: &Value) -> Result<Pattern, PatternSyntaxError> {
        ensure_sufficient_stack(|| match datum {
            Value::Symbol(name) => self.parse_symbol(*name),
            Value::Null => Ok(Pattern::Null),
            Value::Pair(pair) => self.parse_pair(datum, pair),
            Value::Vector(vector) => self.parse_vector(&vector.to_vec()),
            _ => Ok(Pattern::Literal(datum.clone())),
        })
    }

    fn parse_symbol(&self, name: Name) -> Result<Pattern, PatternSyntaxError> {
        if name == self.kw.wildcard {
            Ok(Pattern::Wildcard)
        } else if self.kw.repeat_marker(name).is_some() {
            Err(PatternSyntaxError::MisplacedEllipsis { marker: name })
        } else if name == self.kw.tree_search {
            Err(PatternSyntaxError::MalformedTreeSearch {
                form: Value::Symbol(name),
            })
        } else {
            Ok(Pattern::Variable(name))
        }
    }

    fn parse_pair(&self, datum: &Value, pair: &Heap<Pair>) -> Result<Pattern, PatternSyntaxError> {
        if let Some(keyword) = pair.car().as_symbol() {
            if let Some(pattern) = self.parse_keyword_form(keyword, datum)? {
                return Ok(pattern);
            }
        }
        self.parse_list(datum, pair)
    }

    /// `Some` if `keyword` introduces a special form.
    fn parse_keyword_form(
        &self,
        keyword: Name,
        datum: &Value,
    ) -> Result<Option<Pattern>, PatternSyntaxError> {
        let kw = self.kw;
        let is_form = [
            kw.quote,
            kw.quasiquote,
            kw.unquote,
            kw.unquote_splicing,
            kw.and,
            kw.or,
            kw.not,
            kw.predicate,
            kw.transform,
            kw.record,
            kw.record_named,
            kw.getter,
            kw.setter,
        ]
        .contains(&keyword);
        if !is_form {
            return Ok(None);
        }

        let malformed = || PatternSyntaxError::MalformedForm {
            keyword,
            form: datum.clone(),
        };
        let items = datum.to_vec().ok_or_else(malformed)?;
        let args = &items[1..];

        let pattern = if keyword == kw.quote {
            match args {
                [quoted] => Pattern::Quoted(quoted.clone()),
                _ => return Err(malformed()),
            }
        } else if keyword == kw.quasiquote {
            match args {
                [template] => Pattern::Quasiquote(self.parse_template(template, 0)?),
                _ => return Err(malformed()),
            }
        } else if keyword == kw.unquote || keyword == kw.unquote_splicing {
            return Err(malformed());
        } else if keyword == kw.and {
            Pattern::And(self.parse_all(args)?)
        } else if keyword == kw.or {
            Pattern::Or(self.parse_all(args)?)
        } else if keyword == kw.not {
            match args {
                [negated] => Pattern::Not(Box::new(self.parse(negated)?)),
                _ => return Err(malformed()),
            }
        } else if keyword == kw.predicate {
            let [test, patterns @ ..] = args else {
                return Err(malformed());
            };
            let test = self.lookup_procedure(test).ok_or_else(malformed)??;
            let pattern = match patterns {
                [] => Pattern::Wildcard,
                [single] => self.parse(single)?,
                _ => Pattern::And(self.parse_all(patterns)?),
            };
            Pattern::Predicate {
                test,
                pattern: Box::new(pattern),
            }
        } else if keyword == kw.transform {
            let [procedure, pattern] = args else {
                return Err(malformed());
            };
            Pattern::Transform {
                procedure: self.lookup_procedure(procedure).ok_or_else(malformed)??,
                pattern: Box::new(self.parse(pattern)?),
            }
        } else if keyword == kw.record {
            self.parse_positional_record(args)?.ok_or_else(malformed)?
        } else if keyword == kw.record_named {
            self.parse_named_record(args)?.ok_or_else(malformed)?
        } else {
            // get! / set!
            let [Value::Symbol(name)] = args else {
                return Err(malformed());
            };
            if keyword == kw.getter {
                Pattern::Getter(*name)
            } else {
                Pattern::Setter(*name)
            }
        };
        Ok(Some(pattern))
    }

    fn parse_all(&self, data: &[Value]) -> Result<Vec<Pattern>, PatternSyntaxError> {
        data.iter().map(|datum| self.parse(datum)).collect()
    }

    /// `None` if `datum` is not a symbol.
    fn lookup_procedure(
        &self,
        datum: &Value,
    ) -> Option<Result<knot_ir::Procedure, PatternSyntaxError>> {
        let name = datum.as_symbol()?;
        Some(
            self.registry
                .procedure(name)
                .cloned()
                .ok_or(PatternSyntaxError::UnknownProcedure { name }),
        )
    }

    /// `Ok(None)` if the form's shape is wrong.
    fn parse_positional_record(
        &self,
        args: &[Value],
    ) -> Result<Option<Pattern>, PatternSyntaxError> {
        let Some((Value::Symbol(tag), patterns)) = args.split_first() else {
            return Ok(None);
        };
        let shape = self
            .registry
            .record(*tag)
            .ok_or(PatternSyntaxError::UnknownRecord { name: *tag })?;
        if patterns.len() > shape.fields().len() {
            return Err(PatternSyntaxError::TooManyFields {
                record: *tag,
                expected: shape.fields().len(),
                got: patterns.len(),
            });
        }
        let mut fields = Vec::with_capacity(patterns.len());
        for (index, datum) in patterns.iter().enumerate() {
            fields.push((index, self.parse(datum)?));
        }
        Ok(Some(Pattern::Record {
            shape: shape.clone(),
            fields,
        }))
    }

    /// `Ok(None)` if the form's shape is wrong.
    fn parse_named_record(&self, args: &[Value]) -> Result<Option<Pattern>, PatternSyntaxError> {
        let Some((Value::Symbol(tag), entries)) = args.split_first() else {
            return Ok(None);
        };
        let shape = self
            .registry
            .record(*tag)
            .ok_or(PatternSyntaxError::UnknownRecord { name: *tag })?;
        let mut fields = Vec::with_capacity(entries.len());
        for entry in entries {
            let entry = entry.to_vec();
            let Some([Value::Symbol(field), datum]) = entry.as_deref() else {
                return Ok(None);
            };
            let index = shape
                .field_index(*field)
                .ok_or(PatternSyntaxError::UnknownField {
                    record: *tag,
                    field: *field,
                })?;
            fields.push((index, self.parse(datum)?));
        }
        Ok(Some(Pattern::Record {
            shape: shape.clone(),
            fields,
        }))
    }

    fn parse_list(&self, datum: &Value, pair: &Heap<Pair>) -> Result<Pattern, PatternSyntaxError> {
        let head = pair.car();
        let rest = pair.cdr();
        if let Some(second) = rest.as_pair() {
            if let Some(marker) = second.car().as_symbol() {
                if marker == self.kw.tree_search {
                    return match second.cdr().to_vec().as_deref() {
                        Some([target]) => Ok(Pattern::tree_search(
                            self.parse(&head)?,
                            self.parse(target)?,
                        )),
                        _ => Err(PatternSyntaxError::MalformedTreeSearch {
                            form: datum.clone(),
                        }),
                    };
                }
                if let Some(min) = self.kw.repeat_marker(marker) {
                    let trailing = second.cdr();
                    self.verify_no_ellipsis(&trailing)?;
                    let element = self.parse(&head)?;
                    let trailing = self.parse_fixed_list(&trailing)?;
                    return Ok(Pattern::repetition(element, min, trailing));
                }
            }
        }
        Ok(Pattern::pair(self.parse(&head)?, self.parse(&rest)?))
    }

    /// The part of a list after a repetition marker: a proper list with no
    /// further marker.
    fn verify_no_ellipsis(&self, trailing: &Value) -> Result<(), PatternSyntaxError> {
        let mut current = trailing.clone();
        loop {
            match current {
                Value::Null => return Ok(()),
                Value::Pair(pair) => {
                    let is_marker = pair
                        .car()
                        .as_symbol()
                        .is_some_and(|name| self.kw.repeat_marker(name).is_some());
                    if is_marker {
                        return Err(PatternSyntaxError::MultipleEllipses);
                    }
                    current = pair.cdr();
                }
                _ => return Err(PatternSyntaxError::DottedTailAfterEllipsis),
            }
        }
    }

    /// Element-wise list pattern for an already verified proper list.
    fn parse_fixed_list(&self, list: &Value) -> Result<Pattern, PatternSyntaxError> {
        let items = list
            .to_vec()
            .ok_or(PatternSyntaxError::DottedTailAfterEllipsis)?;
        Ok(Pattern::list(self.parse_all(&items)?))
    }

    fn parse_vector(&self, items: &[Value]) -> Result<Pattern, PatternSyntaxError> {
        let markers: Vec<(usize, Name)> = items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| {
                let name = item.as_symbol()?;
                self.kw.repeat_marker(name).map(|_| (i, name))
            })
            .collect();
        match markers.as_slice() {
            [] => Ok(Pattern::vector(self.parse_all(items)?, None)),
            [(index, marker)] if *index + 1 == items.len() && *index > 0 => {
                let min = self.kw.repeat_marker(*marker);
                let elements = self.parse_all(&items[..index - 1])?;
                let element = self.parse(&items[index - 1])?;
                Ok(Pattern::vector(
                    elements,
                    min.map(|min| (element, min)),
                ))
            }
            [(_, marker)] => Err(PatternSyntaxError::MisplacedEllipsis { marker: *marker }),
            _ => Err(PatternSyntaxError::MultipleEllipses),
        }
    }

    fn parse_template(&self, datum: &Value, depth: usize) -> Result<Template, PatternSyntaxError> {
        ensure_sufficient_stack(|| match datum {
            Value::Pair(pair) => self.parse_template_pair(pair, datum, depth),
            Value::Vector(vector) => {
                let elements = Value::list(vector.to_vec());
                Ok(Template::Vector(Box::new(
                    self.parse_template(&elements, depth)?,
                )))
            }
            _ => Ok(Template::Datum(datum.clone())),
        })
    }

    /// `(keyword arg)` for a quasiquote-family keyword.
    fn quasi_form(&self, datum: &Value) -> Option<(Name, Value)> {
        let items = datum.to_vec()?;
        let [Value::Symbol(keyword), arg] = items.as_slice() else {
            return None;
        };
        let kw = self.kw;
        [kw.quasiquote, kw.unquote, kw.unquote_splicing]
            .contains(keyword)
            .then(|| (*keyword, arg.clone()))
    }

    fn parse_template_pair(
        &self,
        pair: &Heap<Pair>,
        datum: &Value,
        depth: usize,
    ) -> Result<Template, PatternSyntaxError> {
        let kw = self.kw;
        if let Some((keyword, arg)) = self.quasi_form(datum) {
            return if keyword == kw.quasiquote {
                Ok(Template::Nested {
                    keyword,
                    body: Box::new(self.parse_template(&arg, depth + 1)?),
                })
            } else if depth > 0 {
                Ok(Template::Nested {
                    keyword,
                    body: Box::new(self.parse_template(&arg, depth - 1)?),
                })
            } else if keyword == kw.unquote {
                Ok(Template::Escape(Box::new(self.parse(&arg)?)))
            } else {
                Err(PatternSyntaxError::MisplacedSplice)
            };
        }

        let head = pair.car();
        let rest = pair.cdr();

        if depth == 0 {
            if let Some((keyword, arg)) = self.quasi_form(&head) {
                if keyword == kw.unquote_splicing {
                    let rest = self.parse_template(&rest, depth)?;
                    rest.fixed_len(true)?;
                    return Ok(Template::pair(
                        Template::Splice(Box::new(self.parse(&arg)?)),
                        rest,
                    ));
                }
            }
            if let Some(second) = rest.as_pair() {
                let marker = second
                    .car()
                    .as_symbol()
                    .and_then(|name| kw.repeat_marker(name));
                if let Some(min) = marker {
                    let trailing = second.cdr();
                    self.verify_no_ellipsis(&trailing)?;
                    let element = self.parse_template(&head, depth)?;
                    let items = trailing
                        .to_vec()
                        .ok_or(PatternSyntaxError::DottedTailAfterEllipsis)?;
                    let trailing = items.iter().rev().try_fold(
                        Template::Datum(Value::Null),
                        |tail, item| {
                            Ok::<_, PatternSyntaxError>(Template::pair(
                                self.parse_template(item, depth)?,
                                tail,
                            ))
                        },
                    )?;
                    return Ok(Template::Repetition {
                        element: Box::new(element),
                        min,
                        trailing: Box::new(trailing),
                    });
                }
            }
        }

        Ok(Template::pair(
            self.parse_template(&head, depth)?,
            self.parse_template(&rest, depth)?,
        ))
    }
}

#[cfg(test)]
mod tests;
