use std::cell::Cell;

use knot_ir::{Name, ProcError, Value};
use knot_patterns::{parse_pattern, NameSet, Pattern, PatternSyntaxError, Registry, RepeatMin};
use knot_reader::read_one;
use pretty_assertions::assert_eq;

use crate::{Bindings, CompiledPattern, MatchError, MatchOptions};

fn registry() -> Registry {
    let mut registry = Registry::with_builtins();
    registry.define_native_record(
        Name::intern("point"),
        &[Name::intern("x"), Name::intern("y")],
    );
    registry
}

fn read(text: &str) -> Value {
    read_one(text).unwrap_or_else(|err| panic!("bad test input {text:?}: {err}"))
}

fn pattern(text: &str) -> Pattern {
    parse_pattern(&read(text), &registry())
        .unwrap_or_else(|err| panic!("failed to parse {text:?}: {err}"))
}

fn compile_with(text: &str, options: &MatchOptions) -> Result<CompiledPattern, PatternSyntaxError> {
    CompiledPattern::compile(&pattern(text), options)
}

fn compile(text: &str) -> CompiledPattern {
    compile_with(text, &MatchOptions::default())
        .unwrap_or_else(|err| panic!("failed to compile {text:?}: {err}"))
}

fn render(bindings: &Bindings) -> String {
    bindings
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Bindings of a match as `name=value ...`, or `None` when it fails.
fn show(pattern: &str, value: &str) -> Option<String> {
    compile(pattern)
        .match_value(&read(value))
        .unwrap_or_else(|err| panic!("{pattern} against {value}: {err}"))
        .map(|bindings| render(&bindings))
}

fn procedure(bindings: &Bindings, name: &str) -> knot_ir::Procedure {
    bindings
        .get_str(name)
        .and_then(Value::as_procedure)
        .cloned()
        .unwrap_or_else(|| panic!("{name} is not bound to a procedure"))
}

#[test]
fn empty_list_and_literals() {
    assert_eq!(show("()", "()"), Some(String::new()));
    assert_eq!(show("()", "(1)"), None);
    assert_eq!(show("42", "42"), Some(String::new()));
    assert_eq!(show("42", "42.0"), None);
    assert_eq!(show("\"abc\"", "\"abc\""), Some(String::new()));
    assert_eq!(show("'(1 (2))", "(1 (2))"), Some(String::new()));
    assert_eq!(show("'sym", "sym"), Some(String::new()));
    assert_eq!(show("'sym", "other"), None);
}

#[test]
fn variables_and_wildcards() {
    assert_eq!(show("x", "(1 2)"), Some("x=(1 2)".to_string()));
    assert_eq!(show("(a _ c)", "(1 2 3)"), Some("a=1 c=3".to_string()));
    assert_eq!(show("(a _ c)", "(1 2)"), None);
    assert_eq!(show("(a . b)", "(1 2 3)"), Some("a=1 b=(2 3)".to_string()));
    assert_eq!(show("(a . b)", "5"), None);
}

#[test]
fn single_element_list() {
    assert_eq!(show("(a)", "(1)"), Some("a=1".to_string()));
    assert_eq!(show("(a)", "(1 2)"), None);
    assert_eq!(show("(a)", "()"), None);
    assert_eq!(show("(a)", "(1 . 2)"), None);
}

#[test]
fn non_linear_equality() {
    let compiled = CompiledPattern::compile(
        &Pattern::list(vec![Pattern::variable("x"), Pattern::variable("x")]),
        &MatchOptions::default(),
    )
    .unwrap();
    let bindings = compiled.match_value(&read("(5 5)")).unwrap().unwrap();
    assert_eq!(render(&bindings), "x=5");
    assert_eq!(compiled.match_value(&read("(5 6)")).unwrap(), None);

    assert_eq!(show("(x (y x))", "(1 (2 1))"), Some("x=1 y=2".to_string()));
    assert_eq!(show("(x (y x))", "(1 (2 3))"), None);
    assert_eq!(show("(x x)", "((1 2) (1 2))"), Some("x=(1 2)".to_string()));
}

#[test]
fn and_not() {
    assert_eq!(
        show("(and x (a b))", "(1 2)"),
        Some("x=(1 2) a=1 b=2".to_string())
    );
    assert_eq!(show("(and)", "anything"), Some(String::new()));
    assert_eq!(show("(and 1 2)", "1"), None);
    assert_eq!(show("(not 1)", "2"), Some(String::new()));
    assert_eq!(show("(not 1)", "1"), None);
    // Names inside `not` never escape.
    assert_eq!(show("(and (not (1 x)) y)", "(2 3)"), Some("y=(2 3)".to_string()));
}

#[test]
fn or_unification() {
    assert_eq!(show("(or (0 x) (x))", "(0 9)"), Some("x=9".to_string()));
    assert_eq!(show("(or (0 x) (x))", "(7)"), Some("x=7".to_string()));
    assert_eq!(show("(or (0 x) (x))", "(1 2)"), None);
    assert_eq!(show("(or)", "1"), None);
    assert_eq!(show("(or x)", "1"), Some("x=1".to_string()));
}

#[test]
fn failed_or_branch_leaves_no_bindings() {
    let options = MatchOptions::new().lenient_or();
    let compiled = compile_with("(or (x 1) (y 2))", &options).unwrap();
    let bindings = compiled.match_value(&read("(5 2)")).unwrap().unwrap();
    assert_eq!(render(&bindings), "y=5");
}

#[test]
fn or_commits_to_first_matching_branch() {
    // Branch one binds x = 1; the later `x` then fails and the second
    // branch is not retried.
    assert_eq!(show("((or (x _) (_ x)) x)", "((1 2) 2)"), None);
    assert_eq!(show("((or (x _) (_ x)) x)", "((1 2) 1)"), Some("x=1".to_string()));
}

#[test]
fn strict_or_rejects_different_names() {
    let err = compile_with("(or (a) (b))", &MatchOptions::default()).unwrap_err();
    assert_eq!(
        err,
        PatternSyntaxError::OrBindingMismatch {
            branch: 1,
            name: Name::intern("b")
        }
    );
    let err = compile_with("(or (a b) (a))", &MatchOptions::default()).unwrap_err();
    assert_eq!(
        err,
        PatternSyntaxError::OrBindingMismatch {
            branch: 1,
            name: Name::intern("b")
        }
    );
}

#[test]
fn lenient_or_binds_taken_branch_only() {
    let options = MatchOptions::new().lenient_or();
    let compiled = compile_with("((or (1 a) (2 b)) b)", &options).unwrap();

    let bindings = compiled.match_value(&read("((2 5) 5)")).unwrap().unwrap();
    assert_eq!(render(&bindings), "b=5");

    let err = compiled.match_value(&read("((1 5) 3)")).unwrap_err();
    assert_eq!(
        err,
        MatchError::UnboundReference {
            name: Name::intern("b")
        }
    );

    let compiled = compile_with("(or (1 a) (2 b))", &options).unwrap();
    let bindings = compiled.match_value(&read("(1 9)")).unwrap().unwrap();
    assert_eq!(render(&bindings), "a=9");
    assert_eq!(bindings.get_str("b"), None);
}

#[test]
fn predicates() {
    assert_eq!(show("(? integer?)", "1"), Some(String::new()));
    assert_eq!(show("(? integer?)", "a"), None);
    assert_eq!(show("(? integer? x)", "3"), Some("x=3".to_string()));
    assert_eq!(
        show("(? pair? (a . b))", "(1 . 2)"),
        Some("a=1 b=2".to_string())
    );
    assert_eq!(show("(? integer? (? positive? x))", "-3"), None);
}

#[test]
fn transforms() {
    assert_eq!(show("(= car x)", "(1 2)"), Some("x=1".to_string()));
    assert_eq!(show("(= length 3)", "(a b c)"), Some(String::new()));
    assert_eq!(show("(= length 3)", "(a b)"), None);
}

#[test]
fn procedure_errors_propagate() {
    let err = compile("(= car x)").match_value(&read("5")).unwrap_err();
    assert!(
        matches!(err, MatchError::External(ProcError::WrongType { .. })),
        "unexpected error: {err:?}"
    );
}

#[test]
fn repetition_boundary() {
    let pattern = Pattern::repetition(
        Pattern::variable("a"),
        RepeatMin::Zero,
        Pattern::list(vec![Pattern::variable("b")]),
    );
    let compiled = CompiledPattern::compile(&pattern, &MatchOptions::default()).unwrap();
    let bindings = compiled.match_value(&read("(1 2 3)")).unwrap().unwrap();
    assert_eq!(render(&bindings), "a=(1 2) b=3");
    assert_eq!(compiled.match_value(&read("()")).unwrap(), None);

    assert_eq!(show("(a ... b c)", "(1 2)"), Some("a=() b=1 c=2".to_string()));
    assert_eq!(show("(x a ... b)", "(0 1 2 3)"), Some("x=0 a=(1 2) b=3".to_string()));
}

#[test]
fn one_or_more() {
    let pattern = Pattern::repetition(Pattern::variable("a"), RepeatMin::One, Pattern::Null);
    let compiled = CompiledPattern::compile(&pattern, &MatchOptions::default()).unwrap();
    assert_eq!(compiled.match_value(&read("()")).unwrap(), None);
    let bindings = compiled.match_value(&read("(1)")).unwrap().unwrap();
    assert_eq!(render(&bindings), "a=(1)");

    assert_eq!(show("(a ..1 b)", "(1)"), None);
    assert_eq!(show("(a ..1 b)", "(1 2)"), Some("a=(1) b=2".to_string()));
}

#[test]
fn repetition_needs_a_proper_list() {
    assert_eq!(show("(a ...)", "(1 2 . 3)"), None);
    assert_eq!(show("(a ...)", "5"), None);
    assert_eq!(show("((a b) ...)", "((1 2) 3)"), None);
}

#[test]
fn repetition_with_structured_elements() {
    assert_eq!(
        show("((k v) ...)", "((a 1) (b 2))"),
        Some("k=(a b) v=(1 2)".to_string())
    );
    assert_eq!(
        show("((k v ...) ...)", "((a 1 2) (b) (c 3))"),
        Some("k=(a b c) v=((1 2) () (3))".to_string())
    );
    assert_eq!(show("((k v) ...)", "()"), Some("k=() v=()".to_string()));
}

#[test]
fn repetition_element_refers_to_earlier_binding() {
    assert_eq!(
        show("(x (y x) ...)", "(1 (a 1) (b 1))"),
        Some("x=1 y=(a b)".to_string())
    );
    assert_eq!(show("(x (y x) ...)", "(1 (a 1) (b 2))"), None);
}

#[test]
fn multiple_repetition_rejection() {
    let pattern = Pattern::repetition(
        Pattern::variable("a"),
        RepeatMin::Zero,
        Pattern::repetition(Pattern::variable("b"), RepeatMin::Zero, Pattern::Null),
    );
    let err = CompiledPattern::compile(&pattern, &MatchOptions::default()).unwrap_err();
    assert_eq!(err, PatternSyntaxError::MultipleEllipses);

    let dotted = Pattern::repetition(Pattern::variable("a"), RepeatMin::Zero, Pattern::variable("b"));
    let err = CompiledPattern::compile(&dotted, &MatchOptions::default()).unwrap_err();
    assert_eq!(err, PatternSyntaxError::DottedTailAfterEllipsis);
}

#[test]
fn repetition_in_head_position_is_a_nested_list() {
    // ((a ...) b ...): two repetitions, each at its own list level.
    let pattern = Pattern::pair(
        Pattern::repetition(Pattern::variable("a"), RepeatMin::Zero, Pattern::Null),
        Pattern::repetition(Pattern::variable("b"), RepeatMin::Zero, Pattern::Null),
    );
    let compiled = CompiledPattern::compile(&pattern, &MatchOptions::default()).unwrap();

    let bindings = compiled.match_value(&read("((1 2) 3 4)")).unwrap().unwrap();
    assert_eq!(render(&bindings), "a=(1 2) b=(3 4)");
    let bindings = compiled.match_value(&read("(())")).unwrap().unwrap();
    assert_eq!(render(&bindings), "a=() b=()");
    assert!(compiled.match_value(&read("(1 2 3)")).unwrap().is_none());
    assert_eq!(
        show("((a ...) b ...)", "((x) y z)"),
        Some("a=(x) b=(y z)".to_string())
    );
}

#[test]
fn vector_exact_length() {
    assert_eq!(show("#(a b)", "#(1 2)"), Some("a=1 b=2".to_string()));
    assert_eq!(show("#(a b)", "#(1)"), None);
    assert_eq!(show("#(a b)", "#(1 2 3)"), None);
    assert_eq!(show("#(a b)", "(1 2)"), None);
    assert_eq!(show("#()", "#()"), Some(String::new()));
}

#[test]
fn vector_with_repetition() {
    assert_eq!(show("#(a b ...)", "#(1)"), Some("a=1 b=()".to_string()));
    assert_eq!(show("#(a b ...)", "#(1 2 3)"), Some("a=1 b=(2 3)".to_string()));
    assert_eq!(show("#(a b ..1)", "#(1)"), None);
    assert_eq!(
        show("#(a (k v) ...)", "#(0 (x 1) (y 2))"),
        Some("a=0 k=(x y) v=(1 2)".to_string())
    );
    assert_eq!(show("#(a (k v) ...)", "#(0 (x 1) y)"), None);
}

#[test]
fn records() {
    assert_eq!(show("($ point x y)", "#s(point 1 2)"), Some("x=1 y=2".to_string()));
    assert_eq!(show("($ point x y)", "#s(other 1 2)"), None);
    assert_eq!(show("($ point x y)", "(point 1 2)"), None);
    assert_eq!(show("($ point 1)", "#s(point 1 2)"), Some(String::new()));
    assert_eq!(show("($ point 1)", "#s(point 2 2)"), None);
    assert_eq!(show("(@ point (y v))", "#s(point 1 2)"), Some("v=2".to_string()));
}

#[test]
fn quasiquote_templates() {
    assert_eq!(show("`(1 ,x)", "(1 2)"), Some("x=2".to_string()));
    assert_eq!(show("`(1 ,x)", "(2 2)"), None);
    assert_eq!(show("`(a ,@rest)", "(a b c)"), Some("rest=(b c)".to_string()));
    assert_eq!(show("`(,@xs ,y)", "(1 2 3)"), Some("xs=(1 2) y=3".to_string()));
    assert_eq!(show("`(,@xs ,y)", "()"), None);
    assert_eq!(show("`(,x ...)", "(1 2)"), Some("x=(1 2)".to_string()));
    assert_eq!(show("`#(1 ,y)", "#(1 2)"), Some("y=2".to_string()));
    assert_eq!(show("`(a . ,b)", "(a 1 2)"), Some("b=(1 2)".to_string()));
}

#[test]
fn nested_quasiquote_matches_inner_form_literally() {
    assert_eq!(show("`(a `(b ,,c))", "(a `(b ,5))"), Some("c=5".to_string()));
    assert_eq!(show("`(a `(b ,c))", "(a `(b ,c))"), Some(String::new()));
    assert_eq!(show("`(a `(b ,c))", "(a `(b ,d))"), None);
}

#[test]
fn getter_reads_slot() {
    let value = read("(1 2 3)");
    let bindings = compile("(_ _ (get! g))").match_value(&value).unwrap().unwrap();
    let getter = procedure(&bindings, "g");
    assert_eq!(getter.call(&[]).unwrap(), Value::int(3));
}

#[test]
fn setter_writes_pair_slot() {
    let value = read("(1 2 3)");
    let bindings = compile("(_ (set! s) _)").match_value(&value).unwrap().unwrap();
    procedure(&bindings, "s").call(&[Value::int(20)]).unwrap();
    assert_eq!(value.to_string(), "(1 20 3)");
}

#[test]
fn setter_writes_vector_and_record_slots() {
    let vector = read("#(1 2)");
    let bindings = compile("#(_ (set! s))").match_value(&vector).unwrap().unwrap();
    procedure(&bindings, "s").call(&[Value::symbol("b")]).unwrap();
    assert_eq!(vector.to_string(), "#(1 b)");

    let point = read("#s(point 1 2)");
    let bindings = compile("($ point (set! sx) (get! gy))")
        .match_value(&point)
        .unwrap()
        .unwrap();
    procedure(&bindings, "sx").call(&[Value::int(9)]).unwrap();
    assert_eq!(point.to_string(), "#s(point 9 2)");
    assert_eq!(procedure(&bindings, "gy").call(&[]).unwrap(), Value::int(2));
}

#[test]
fn computed_values_are_read_only() {
    let bindings = compile("(set! s)").match_value(&read("5")).unwrap().unwrap();
    let err = procedure(&bindings, "s").call(&[Value::int(1)]).unwrap_err();
    assert!(matches!(err, ProcError::ReadOnlySlot { .. }));

    let bindings = compile("(= car (set! s))")
        .match_value(&read("(1)"))
        .unwrap()
        .unwrap();
    let err = procedure(&bindings, "s").call(&[Value::int(1)]).unwrap_err();
    assert!(matches!(err, ProcError::ReadOnlySlot { .. }));
}

#[test]
fn seeded_names_compare_against_seed() {
    let bound: NameSet = [Name::intern("x")].into_iter().collect();
    let compiled =
        CompiledPattern::compile_with_bound(&pattern("(x y)"), &bound, &MatchOptions::default())
            .unwrap();
    assert_eq!(compiled.names(), &[Name::intern("y")]);

    let mut seed = Bindings::new();
    seed.insert(Name::intern("x"), Value::int(1));
    let bindings = compiled.match_with(&read("(1 2)"), &seed).unwrap().unwrap();
    assert_eq!(render(&bindings), "y=2");
    assert_eq!(compiled.match_with(&read("(3 2)"), &seed).unwrap(), None);

    let err = compiled.match_value(&read("(1 2)")).unwrap_err();
    assert_eq!(
        err,
        MatchError::UnboundReference {
            name: Name::intern("x")
        }
    );
}

#[test]
fn names_in_first_occurrence_order() {
    let compiled = compile("(a (b a) . c)");
    let names: Vec<_> = compiled.names().iter().map(|name| name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn run_calls_exactly_one_continuation() {
    let compiled = compile("(a (b c) ...)");
    for (text, matched) in [("(1 (2 3) (4 5))", true), ("(1 (2 3) 4)", false)] {
        let successes = Cell::new(0);
        let failures = Cell::new(0);
        let outcome = compiled
            .run(
                &read(text),
                &Bindings::default(),
                |_| {
                    successes.set(successes.get() + 1);
                    Ok(true)
                },
                || {
                    failures.set(failures.get() + 1);
                    Ok(false)
                },
            )
            .unwrap();
        assert_eq!(outcome, matched);
        assert_eq!(successes.get() + failures.get(), 1);
    }
}

#[test]
fn long_lists_do_not_overflow() {
    let items: Vec<Value> = (0..100_000).map(Value::int).collect();
    let value = Value::list(items);
    let bindings = compile("((? integer? x) ... last)")
        .match_value(&value)
        .unwrap()
        .unwrap();
    assert_eq!(bindings.get_str("last"), Some(&Value::int(99_999)));

    let deep = (0..5_000).fold(Value::int(0), |inner, _| {
        Value::list(vec![Value::int(1), inner])
    });
    assert!(compile("(_ *** 0)").match_value(&deep).unwrap().is_some());
}
