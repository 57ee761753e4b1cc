//! `(match subject clause ...)` forms.

use knot_ir::{Name, Value};

use crate::{parse_pattern, Keywords, Pattern, PatternSyntaxError, Registry};

/// A parsed `match` form. The subject and bodies stay as data; evaluating
/// them is up to the host.
#[derive(Clone, Debug)]
pub struct MatchForm {
    pub subject: Value,
    pub clauses: Vec<ClauseForm>,
}

/// `(pattern body ...)` or `(pattern (=> failure) body ...)`.
#[derive(Clone, Debug)]
pub struct ClauseForm {
    pub pattern: Pattern,
    /// Name the body uses to give up and fall through to the next clause.
    pub failure: Option<Name>,
    pub body: Vec<Value>,
}

/// Parse a whole `match` form.
#[tracing::instrument(level = "debug", skip_all)]
pub fn parse_match_form(datum: &Value, registry: &Registry) -> Result<MatchForm, PatternSyntaxError> {
    let kw = Keywords::get();
    let malformed = || PatternSyntaxError::MalformedForm {
        keyword: kw.match_,
        form: datum.clone(),
    };
    let items = datum.to_vec().ok_or_else(malformed)?;
    let (subject, clauses) = match items.as_slice() {
        [head, ..] if head.as_symbol() != Some(kw.match_) => return Err(malformed()),
        [] => return Err(malformed()),
        [_] => return Err(PatternSyntaxError::MissingExpression),
        [_, _] => return Err(PatternSyntaxError::MissingClauses),
        [_, subject, clauses @ ..] => (subject, clauses),
    };
    let clauses = clauses
        .iter()
        .map(|clause| parse_clause(clause, registry))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(clauses = clauses.len(), "parsed match form");
    Ok(MatchForm {
        subject: subject.clone(),
        clauses,
    })
}

/// Parse one clause.
pub fn parse_clause(datum: &Value, registry: &Registry) -> Result<ClauseForm, PatternSyntaxError> {
    let malformed = || PatternSyntaxError::MalformedClause {
        clause: datum.clone(),
    };
    let items = datum.to_vec().ok_or_else(malformed)?;
    let [pattern, rest @ ..] = items.as_slice() else {
        return Err(malformed());
    };
    let (failure, body) = match rest {
        [first, body @ ..] => match failure_binding(first) {
            Some(name) => (Some(name), body),
            None => (None, rest),
        },
        [] => (None, rest),
    };
    if body.is_empty() {
        return Err(malformed());
    }
    Ok(ClauseForm {
        pattern: parse_pattern(pattern, registry)?,
        failure,
        body: body.to_vec(),
    })
}

/// `(=> name)`
fn failure_binding(datum: &Value) -> Option<Name> {
    let items = datum.to_vec()?;
    match items.as_slice() {
        [Value::Symbol(arrow), Value::Symbol(name)] if *arrow == Keywords::get().failure_arrow => {
            Some(*name)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests;
