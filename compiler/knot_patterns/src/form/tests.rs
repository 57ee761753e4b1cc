use knot_ir::{Name, Value};
use knot_reader::read_one;
use pretty_assertions::assert_eq;

use crate::{parse_match_form, MatchForm, PatternSyntaxError, Registry};

fn parse(text: &str) -> Result<MatchForm, PatternSyntaxError> {
    let datum = read_one(text).unwrap_or_else(|err| panic!("bad test input {text:?}: {err}"));
    parse_match_form(&datum, &Registry::with_builtins())
}

#[test]
fn clauses_in_order() {
    let form = parse("(match '(1 2) ((a b) (list a b)) (_ 'other))")
        .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(form.clauses.len(), 2);
    assert_eq!(form.clauses[0].failure, None);
    assert_eq!(form.clauses[1].body, vec![read_one("'other").unwrap_or(Value::Null)]);
}

#[test]
fn failure_binding() {
    let form = parse("(match 1 (x (=> skip) skip) (_ 0))").unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(form.clauses[0].failure, Some(Name::intern("skip")));
    assert_eq!(form.clauses[0].body, vec![Value::symbol("skip")]);
}

#[test]
fn missing_parts() {
    assert_eq!(parse("(match)").err(), Some(PatternSyntaxError::MissingExpression));
    assert_eq!(parse("(match 1)").err(), Some(PatternSyntaxError::MissingClauses));
}

#[test]
fn malformed_clauses() {
    for text in ["(match 1 x)", "(match 1 (x))", "(match 1 (x (=> f)))", "(match 1 (x . 2))"] {
        assert!(
            matches!(parse(text), Err(PatternSyntaxError::MalformedClause { .. })),
            "{text}"
        );
    }
}

#[test]
fn not_a_match_form() {
    assert!(matches!(
        parse("(case 1 (x x))"),
        Err(PatternSyntaxError::MalformedForm { .. })
    ));
}

#[test]
fn clause_pattern_errors_surface() {
    assert_eq!(
        parse("(match 1 ((a ... b ...) 0))").err(),
        Some(PatternSyntaxError::MultipleEllipses)
    );
}
