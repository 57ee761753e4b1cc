use pretty_assertions::assert_eq;

use super::*;

#[test]
fn fresh_interner_holds_empty_string() {
    let interner = StringInterner::new();
    assert_eq!(interner.len(), 1);
    assert_eq!(interner.lookup(Name::EMPTY), "");
}

#[test]
fn round_trips_text() {
    let interner = StringInterner::new();
    let name = interner.intern("vector->list");
    assert_eq!(interner.lookup(name), "vector->list");
    assert_eq!(interner.len(), 2);
}

#[test]
fn repeated_interning_does_not_grow() {
    let interner = StringInterner::new();
    let first = interner.intern("x");
    let second = interner.intern("x");
    assert_eq!(first, second);
    assert_eq!(interner.len(), 2);
}

#[test]
fn unknown_name_looks_up_empty() {
    let interner = StringInterner::new();
    assert_eq!(interner.lookup(Name::from_index(999)), "");
}
