//! Runtime data matched by compiled patterns.
//!
//! # Shape
//!
//! `Value` mirrors Scheme data: the empty list, booleans, numbers,
//! characters, strings, symbols, pairs, vectors, tagged records and
//! procedures. Atoms are stored inline; compound data lives behind
//! [`Heap`] so cloning a `Value` never copies structure.
//!
//! ## Construction
//!
//! ```text
//! let xs = Value::list(vec![Value::int(1), Value::int(2)]);   // (1 2)
//! let dotted = Value::cons(Value::int(1), Value::int(2));     // (1 . 2)
//! let v = Value::vector(vec![Value::symbol("a")]);            // #(a)
//! ```
//!
//! # Mutation
//!
//! Pairs, vectors and records expose settable slots. The matcher never
//! writes to them itself; it hands `(set! s)` patterns a setter procedure
//! that does.

mod compound;
mod heap;
mod print;
mod procedure;

use knot_stack::ensure_sufficient_stack;

use crate::Name;

pub use compound::{Pair, Record, Vector};
pub use heap::Heap;
pub use procedure::{Arity, NativeFn, Procedure};

/// Runtime datum.
#[derive(Clone)]
pub enum Value {
    /// The empty list, terminator of every proper list.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    Str(Heap<String>),
    Symbol(Name),
    Pair(Heap<Pair>),
    Vector(Heap<Vector>),
    Record(Heap<Record>),
    Procedure(Procedure),
    /// Result of operations with no useful value, such as setters.
    Unspecified,
}

// Factory methods (the only way to build heap values)

impl Value {
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn float(f: f64) -> Self {
        Value::Float(f)
    }

    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    /// Interned symbol.
    #[inline]
    pub fn symbol(text: &str) -> Self {
        Value::Symbol(Name::intern(text))
    }

    #[inline]
    pub fn cons(car: Value, cdr: Value) -> Self {
        Value::Pair(Heap::new(Pair::new(car, cdr)))
    }

    /// Proper list of `items`.
    pub fn list(items: Vec<Value>) -> Self {
        Self::list_with_tail(items, Value::Null)
    }

    /// List of `items` ending in `tail` instead of `()`.
    pub fn list_with_tail(items: Vec<Value>, tail: Value) -> Self {
        items
            .into_iter()
            .rev()
            .fold(tail, |rest, item| Value::cons(item, rest))
    }

    pub fn vector(items: Vec<Value>) -> Self {
        Value::Vector(Heap::new(Vector::new(items)))
    }

    pub fn record(tag: Name, fields: Vec<Value>) -> Self {
        Value::Record(Heap::new(Record::new(tag, fields)))
    }

    #[inline]
    pub fn procedure(procedure: Procedure) -> Self {
        Value::Procedure(procedure)
    }
}

// Inspection

impl Value {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Everything except `#f` is true.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<Name> {
        match self {
            Value::Symbol(name) => Some(*name),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<&Heap<Pair>> {
        match self {
            Value::Pair(pair) => Some(pair),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&Heap<Vector>> {
        match self {
            Value::Vector(vector) => Some(vector),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Heap<Record>> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_procedure(&self) -> Option<&Procedure> {
        match self {
            Value::Procedure(procedure) => Some(procedure),
            _ => None,
        }
    }

    /// Type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Char(_) => "char",
            Value::Str(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Pair(_) => "pair",
            Value::Vector(_) => "vector",
            Value::Record(_) => "record",
            Value::Procedure(_) => "procedure",
            Value::Unspecified => "unspecified",
        }
    }

    /// Spine cells of a proper list, or `None` for dotted or cyclic lists.
    ///
    /// `()` yields an empty spine. Cycles are detected by comparing each new
    /// cell with the one halfway back along the spine.
    pub fn proper_list_cells(&self) -> Option<Vec<Heap<Pair>>> {
        let mut cells: Vec<Heap<Pair>> = Vec::new();
        let mut current = self.clone();
        loop {
            match current {
                Value::Null => return Some(cells),
                Value::Pair(pair) => {
                    if let Some(slow) = cells.get(cells.len() / 2) {
                        if Heap::ptr_eq(slow, &pair) {
                            return None;
                        }
                    }
                    current = pair.cdr();
                    cells.push(pair);
                }
                _ => return None,
            }
        }
    }

    /// Elements of a proper list.
    pub fn to_vec(&self) -> Option<Vec<Value>> {
        self.proper_list_cells()
            .map(|cells| cells.iter().map(|cell| cell.car()).collect())
    }

    /// Whether this is a proper (finite, `()`-terminated) list.
    pub fn is_list(&self) -> bool {
        self.proper_list_cells().is_some()
    }

    /// Structural equality (Scheme `equal?`).
    ///
    /// Numbers compare by type and value, so `1` and `1.0` differ.
    /// Procedures compare by identity.
    pub fn equals(&self, other: &Value) -> bool {
        ensure_sufficient_stack(|| match (self, other) {
            (Value::Null, Value::Null) | (Value::Unspecified, Value::Unspecified) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a.as_str() == b.as_str(),
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Pair(_), Value::Pair(_)) => lists_equal(self, other),
            (Value::Vector(a), Value::Vector(b)) => {
                Heap::ptr_eq(a, b)
                    || (a.len() == b.len()
                        && a.to_vec()
                            .iter()
                            .zip(b.to_vec().iter())
                            .all(|(x, y)| x.equals(y)))
            }
            (Value::Record(a), Value::Record(b)) => {
                Heap::ptr_eq(a, b)
                    || (a.tag() == b.tag()
                        && a.len() == b.len()
                        && a.fields()
                            .iter()
                            .zip(b.fields().iter())
                            .all(|(x, y)| x.equals(y)))
            }
            (Value::Procedure(a), Value::Procedure(b)) => a.ptr_eq(b),
            _ => false,
        })
    }
}

/// Walk two lists along their cdrs iteratively; only cars recurse.
fn lists_equal(a: &Value, b: &Value) -> bool {
    let mut left = a.clone();
    let mut right = b.clone();
    loop {
        match (&left, &right) {
            (Value::Pair(x), Value::Pair(y)) => {
                if Heap::ptr_eq(x, y) {
                    return true;
                }
                if !x.car().equals(&y.car()) {
                    return false;
                }
                let (next_left, next_right) = (x.cdr(), y.cdr());
                left = next_left;
                right = next_right;
            }
            _ => return left.equals(&right),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

#[cfg(test)]
mod tests;
