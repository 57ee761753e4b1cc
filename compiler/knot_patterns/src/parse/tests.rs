use knot_ir::{Name, Value};
use knot_reader::read_one;
use pretty_assertions::assert_eq;

use crate::{parse_pattern, Pattern, PatternSyntaxError, Registry, RepeatMin, Template};

fn registry() -> Registry {
    let mut registry = Registry::with_builtins();
    registry.define_native_record(
        Name::intern("point"),
        &[Name::intern("x"), Name::intern("y")],
    );
    registry
}

fn parse(text: &str) -> Result<Pattern, PatternSyntaxError> {
    let datum = read_one(text).unwrap_or_else(|err| panic!("bad test input {text:?}: {err}"));
    parse_pattern(&datum, &registry())
}

fn ok(text: &str) -> Pattern {
    parse(text).unwrap_or_else(|err| panic!("failed to parse {text:?}: {err}"))
}

fn is_var(pattern: &Pattern, name: &str) -> bool {
    matches!(pattern, Pattern::Variable(n) if n.as_str() == name)
}

#[test]
fn atoms() {
    assert!(matches!(ok("_"), Pattern::Wildcard));
    assert!(is_var(&ok("x"), "x"));
    assert!(matches!(ok("()"), Pattern::Null));
    assert!(matches!(ok("42"), Pattern::Literal(Value::Int(42))));
    assert!(matches!(ok("\"s\""), Pattern::Literal(Value::Str(_))));
    assert!(matches!(ok("#t"), Pattern::Literal(Value::Bool(true))));
    assert!(matches!(ok("'sym"), Pattern::Quoted(Value::Symbol(_))));
}

#[test]
fn fixed_list_is_pair_chain() {
    let Pattern::Pair(a, rest) = ok("(a b)") else {
        panic!("expected a pair");
    };
    assert!(is_var(&a, "a"));
    let Pattern::Pair(b, end) = *rest else {
        panic!("expected a pair");
    };
    assert!(is_var(&b, "b"));
    assert!(matches!(*end, Pattern::Null));
}

#[test]
fn dotted_tail() {
    let Pattern::Pair(a, rest) = ok("(a . rest)") else {
        panic!("expected a pair");
    };
    assert!(is_var(&a, "a"));
    assert!(is_var(&rest, "rest"));
}

#[test]
fn ellipsis_with_trailing() {
    let Pattern::Repetition {
        element,
        min,
        trailing,
    } = ok("(a ... b c)")
    else {
        panic!("expected a repetition");
    };
    assert!(is_var(&element, "a"));
    assert_eq!(min, RepeatMin::Zero);
    assert_eq!(trailing.trailing_len(), Ok(2));
}

#[test]
fn ellipsis_after_prefix() {
    let Pattern::Pair(head, rest) = ok("(x a ___)") else {
        panic!("expected a pair");
    };
    assert!(is_var(&head, "x"));
    assert!(matches!(*rest, Pattern::Repetition { min: RepeatMin::Zero, .. }));
}

#[test]
fn one_or_more() {
    assert!(matches!(ok("(a ..1)"), Pattern::Repetition { min: RepeatMin::One, .. }));
}

#[test]
fn multiple_ellipses_rejected() {
    assert_eq!(parse("(a ... b ...)").err(), Some(PatternSyntaxError::MultipleEllipses));
    assert_eq!(parse("(a ... ...)").err(), Some(PatternSyntaxError::MultipleEllipses));
}

#[test]
fn dotted_tail_after_ellipsis_rejected() {
    assert_eq!(
        parse("(a ... . b)").err(),
        Some(PatternSyntaxError::DottedTailAfterEllipsis)
    );
    assert_eq!(
        parse("(a ... b . c)").err(),
        Some(PatternSyntaxError::DottedTailAfterEllipsis)
    );
}

#[test]
fn leading_ellipsis_rejected() {
    assert_eq!(
        parse("(... a)").err(),
        Some(PatternSyntaxError::MisplacedEllipsis {
            marker: Name::intern("...")
        })
    );
}

#[test]
fn tree_search() {
    let Pattern::TreeSearch { path, target } = ok("(_ *** 5)") else {
        panic!("expected a tree search");
    };
    assert!(matches!(*path, Pattern::Wildcard));
    assert!(matches!(*target, Pattern::Literal(Value::Int(5))));
}

#[test]
fn malformed_tree_search_rejected() {
    for text in ["(a *** b c)", "(a ***)", "(a *** . b)", "***"] {
        assert!(
            matches!(parse(text), Err(PatternSyntaxError::MalformedTreeSearch { .. })),
            "{text}"
        );
    }
}

#[test]
fn boolean_combinators() {
    assert!(matches!(ok("(and a b)"), Pattern::And(ps) if ps.len() == 2));
    assert!(matches!(ok("(or)"), Pattern::Or(ps) if ps.is_empty()));
    assert!(matches!(ok("(not 1)"), Pattern::Not(_)));
    assert!(matches!(
        parse("(not 1 2)"),
        Err(PatternSyntaxError::MalformedForm { .. })
    ));
}

#[test]
fn predicate_and_transform_resolve_procedures() {
    let Pattern::Predicate { test, pattern } = ok("(? number? n)") else {
        panic!("expected a predicate");
    };
    assert_eq!(test.name(), Name::intern("number?"));
    assert!(is_var(&pattern, "n"));

    assert!(matches!(
        ok("(? pair? a b)"),
        Pattern::Predicate { pattern, .. } if matches!(*pattern, Pattern::And(_))
    ));
    assert!(matches!(ok("(= car head)"), Pattern::Transform { .. }));
    assert_eq!(
        parse("(? nope x)").err(),
        Some(PatternSyntaxError::UnknownProcedure {
            name: Name::intern("nope")
        })
    );
    assert!(matches!(
        parse("(= car)"),
        Err(PatternSyntaxError::MalformedForm { .. })
    ));
}

#[test]
fn records_positional_and_named() {
    let Pattern::Record { shape, fields } = ok("($ point a b)") else {
        panic!("expected a record");
    };
    assert_eq!(shape.tag(), Name::intern("point"));
    assert_eq!(fields.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![0, 1]);

    let Pattern::Record { fields, .. } = ok("(@ point (y b))") else {
        panic!("expected a record");
    };
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].0, 1);

    assert_eq!(
        parse("($ point a b c)").err(),
        Some(PatternSyntaxError::TooManyFields {
            record: Name::intern("point"),
            expected: 2,
            got: 3
        })
    );
    assert_eq!(
        parse("(@ point (z b))").err(),
        Some(PatternSyntaxError::UnknownField {
            record: Name::intern("point"),
            field: Name::intern("z")
        })
    );
    assert_eq!(
        parse("($ nothing)").err(),
        Some(PatternSyntaxError::UnknownRecord {
            name: Name::intern("nothing")
        })
    );
}

#[test]
fn getters_and_setters() {
    assert!(matches!(ok("(get! g)"), Pattern::Getter(n) if n.as_str() == "g"));
    assert!(matches!(ok("(set! s)"), Pattern::Setter(n) if n.as_str() == "s"));
    assert!(matches!(
        parse("(set! 1)"),
        Err(PatternSyntaxError::MalformedForm { .. })
    ));
}

#[test]
fn vectors() {
    assert!(matches!(ok("#(a b)"), Pattern::Vector { elements, rest: None } if elements.len() == 2));
    assert!(matches!(
        ok("#(a b ...)"),
        Pattern::Vector { elements, rest: Some(_) } if elements.len() == 1
    ));
    assert!(matches!(
        parse("#(a ... b)"),
        Err(PatternSyntaxError::MisplacedEllipsis { .. })
    ));
    assert_eq!(
        parse("#(a ... b ...)").err(),
        Some(PatternSyntaxError::MultipleEllipses)
    );
}

#[test]
fn quasiquote_templates() {
    let Pattern::Quasiquote(Template::Pair(head, tail)) = ok("`(a ,b)") else {
        panic!("expected a quasiquote pair");
    };
    assert!(matches!(*head, Template::Datum(Value::Symbol(_))));
    let Template::Pair(escape, end) = *tail else {
        panic!("expected a pair");
    };
    assert!(matches!(*escape, Template::Escape(p) if is_var(&p, "b")));
    assert!(matches!(*end, Template::Datum(Value::Null)));
}

#[test]
fn quasiquote_splice_and_repetition() {
    assert!(matches!(
        ok("`(,@xs end)"),
        Pattern::Quasiquote(Template::Pair(head, _)) if matches!(*head, Template::Splice(_))
    ));
    assert!(matches!(
        ok("`(,x ... last)"),
        Pattern::Quasiquote(Template::Repetition { .. })
    ));
    assert_eq!(
        parse("`(,@xs ,@ys)").err(),
        Some(PatternSyntaxError::SpliceTail)
    );
    assert_eq!(parse("`,@xs").err(), Some(PatternSyntaxError::MisplacedSplice));
}

#[test]
fn nested_quasiquote_keeps_inner_escapes_literal() {
    let Pattern::Quasiquote(Template::Nested { keyword, body }) = ok("``,x") else {
        panic!("expected a nested quasiquote");
    };
    assert_eq!(keyword, Name::intern("quasiquote"));
    assert!(matches!(
        *body,
        Template::Nested { keyword, ref body } if keyword == Name::intern("unquote")
            && matches!(**body, Template::Datum(Value::Symbol(_)))
    ));
}

#[test]
fn unquote_outside_quasiquote_rejected() {
    assert!(matches!(
        parse(",x"),
        Err(PatternSyntaxError::MalformedForm { .. })
    ));
}
