use pretty_assertions::assert_eq;

use super::*;
use crate::ProcError;

fn ints(ns: &[i64]) -> Value {
    Value::list(ns.iter().copied().map(Value::int).collect())
}

#[test]
fn truthiness_only_false_is_false() {
    assert!(!Value::Bool(false).is_truthy());
    assert!(Value::Bool(true).is_truthy());
    assert!(Value::int(0).is_truthy());
    assert!(Value::Null.is_truthy());
    assert!(Value::string("").is_truthy());
}

#[test]
fn list_factories() {
    let xs = ints(&[1, 2, 3]);
    assert_eq!(xs.to_vec(), Some(vec![Value::int(1), Value::int(2), Value::int(3)]));
    assert!(xs.is_list());

    let dotted = Value::list_with_tail(vec![Value::int(1)], Value::int(2));
    assert_eq!(dotted.to_vec(), None);
    assert!(!dotted.is_list());

    assert_eq!(Value::list(vec![]), Value::Null);
    assert_eq!(Value::Null.to_vec(), Some(vec![]));
}

#[test]
fn cyclic_list_is_not_proper() {
    let tail = Value::cons(Value::int(2), Value::Null);
    let head = Value::cons(Value::int(1), tail.clone());
    if let Some(pair) = tail.as_pair() {
        pair.set_cdr(head.clone());
    }
    assert!(head.proper_list_cells().is_none());
}

#[test]
fn structural_equality() {
    assert_eq!(ints(&[1, 2]), ints(&[1, 2]));
    assert_ne!(ints(&[1, 2]), ints(&[1, 2, 3]));
    assert_ne!(Value::int(1), Value::float(1.0));
    assert_eq!(Value::symbol("a"), Value::symbol("a"));
    assert_ne!(Value::symbol("a"), Value::string("a"));
    assert_eq!(
        Value::vector(vec![Value::int(1), ints(&[2])]),
        Value::vector(vec![Value::int(1), ints(&[2])])
    );
    let tag = Name::intern("point");
    assert_eq!(
        Value::record(tag, vec![Value::int(1), Value::int(2)]),
        Value::record(tag, vec![Value::int(1), Value::int(2)])
    );
    assert_ne!(
        Value::record(tag, vec![Value::int(1)]),
        Value::record(Name::intern("other"), vec![Value::int(1)])
    );
}

#[test]
fn procedures_compare_by_identity() {
    let p = Procedure::new("id", Arity::Exactly(1), |args| Ok(args[0].clone()));
    let q = Procedure::new("id", Arity::Exactly(1), |args| Ok(args[0].clone()));
    assert_eq!(Value::procedure(p.clone()), Value::procedure(p.clone()));
    assert_ne!(Value::procedure(p), Value::procedure(q));
}

#[test]
fn long_list_equality_does_not_overflow() {
    let a = Value::list((0..200_000).map(Value::int).collect());
    let b = Value::list((0..200_000).map(Value::int).collect());
    assert!(a.equals(&b));
}

#[test]
fn deeply_nested_equality_does_not_overflow() {
    let nest = || (0..50_000).fold(Value::Null, |inner, _| Value::list(vec![inner]));
    assert!(nest().equals(&nest()));
}

#[test]
fn long_lists_drop_without_overflow() {
    let xs = Value::list((0..500_000).map(Value::int).collect());
    drop(xs);
}

#[test]
fn slots_are_mutable() {
    let pair = Value::cons(Value::int(1), Value::Null);
    if let Some(cell) = pair.as_pair() {
        cell.set_car(Value::int(9));
    }
    assert_eq!(pair, ints(&[9]));

    let v = Value::vector(vec![Value::int(1), Value::int(2)]);
    let vector = v.as_vector().cloned();
    assert!(vector.as_ref().is_some_and(|vec| vec.set(1, Value::int(5))));
    assert!(vector.as_ref().is_some_and(|vec| !vec.set(2, Value::int(5))));
    assert_eq!(v.to_string(), "#(1 5)");
}

#[test]
fn written_syntax() {
    assert_eq!(ints(&[1, 2, 3]).to_string(), "(1 2 3)");
    assert_eq!(
        Value::list_with_tail(vec![Value::int(1), Value::int(2)], Value::int(3)).to_string(),
        "(1 2 . 3)"
    );
    assert_eq!(Value::Null.to_string(), "()");
    assert_eq!(Value::Bool(true).to_string(), "#t");
    assert_eq!(Value::Bool(false).to_string(), "#f");
    assert_eq!(Value::float(2.0).to_string(), "2.0");
    assert_eq!(Value::float(0.5).to_string(), "0.5");
    assert_eq!(Value::float(f64::NEG_INFINITY).to_string(), "-inf.0");
    assert_eq!(Value::Char('a').to_string(), "#\\a");
    assert_eq!(Value::Char(' ').to_string(), "#\\space");
    assert_eq!(Value::string("a\"b\n").to_string(), "\"a\\\"b\\n\"");
    assert_eq!(
        Value::list(vec![Value::symbol("quote"), Value::symbol("x")]).to_string(),
        "(quote x)"
    );
    assert_eq!(
        Value::record(Name::intern("point"), vec![Value::int(1), Value::int(2)]).to_string(),
        "#s(point 1 2)"
    );
    assert_eq!(Value::Unspecified.to_string(), "#<unspecified>");
}

#[test]
fn procedure_arity_is_checked() {
    let p = Procedure::new("car", Arity::Exactly(1), |args| Ok(args[0].clone()));
    assert_eq!(
        p.call(&[]),
        Err(ProcError::Arity {
            procedure: Name::intern("car"),
            expected: Arity::Exactly(1),
            got: 0,
        })
    );
    assert_eq!(p.call1(&Value::int(3)), Ok(Value::int(3)));
}
