//! Mutable compound data: pairs, vectors and records.
//!
//! Each slot sits behind its own lock so a `(set! s)` setter handed out by
//! the matcher can write one car, one vector element or one record field
//! without touching anything else. Reads clone the slot's `Value` out,
//! which is a reference-count bump for heap values.

use parking_lot::RwLock;

use super::Value;
use crate::Name;

/// A cons cell.
#[derive(Debug)]
pub struct Pair {
    car: RwLock<Value>,
    cdr: RwLock<Value>,
}

impl Pair {
    pub(crate) fn new(car: Value, cdr: Value) -> Self {
        Pair {
            car: RwLock::new(car),
            cdr: RwLock::new(cdr),
        }
    }

    pub fn car(&self) -> Value {
        self.car.read().clone()
    }

    pub fn cdr(&self) -> Value {
        self.cdr.read().clone()
    }

    pub fn set_car(&self, value: Value) {
        *self.car.write() = value;
    }

    pub fn set_cdr(&self, value: Value) {
        *self.cdr.write() = value;
    }
}

/// Long and deeply nested lists are released with an explicit worklist
/// instead of recursive drops.
impl Drop for Pair {
    fn drop(&mut self) {
        let car = std::mem::replace(self.car.get_mut(), Value::Null);
        let cdr = std::mem::replace(self.cdr.get_mut(), Value::Null);
        if !matches!(car, Value::Pair(_)) && !matches!(cdr, Value::Pair(_)) {
            return;
        }
        let mut pending = vec![car, cdr];
        while let Some(value) = pending.pop() {
            if let Value::Pair(heap) = value {
                if let Some(mut pair) = heap.try_unwrap() {
                    pending.push(std::mem::replace(pair.car.get_mut(), Value::Null));
                    pending.push(std::mem::replace(pair.cdr.get_mut(), Value::Null));
                }
            }
        }
    }
}

/// Fixed-length vector with settable elements.
#[derive(Debug)]
pub struct Vector {
    items: Box<[RwLock<Value>]>,
}

impl Vector {
    pub(crate) fn new(items: Vec<Value>) -> Self {
        Vector {
            items: items.into_iter().map(RwLock::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Element at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.get(index).map(|slot| slot.read().clone())
    }

    /// Overwrite the element at `index`. Returns `false` if out of range.
    pub fn set(&self, index: usize, value: Value) -> bool {
        match self.items.get(index) {
            Some(slot) => {
                *slot.write() = value;
                true
            }
            None => false,
        }
    }

    /// Snapshot of all elements.
    pub fn to_vec(&self) -> Vec<Value> {
        self.items.iter().map(|slot| slot.read().clone()).collect()
    }
}

/// Instance of a record type: a type tag plus positional fields.
#[derive(Debug)]
pub struct Record {
    tag: Name,
    fields: Box<[RwLock<Value>]>,
}

impl Record {
    pub(crate) fn new(tag: Name, fields: Vec<Value>) -> Self {
        Record {
            tag,
            fields: fields.into_iter().map(RwLock::new).collect(),
        }
    }

    pub fn tag(&self) -> Name {
        self.tag
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, index: usize) -> Option<Value> {
        self.fields.get(index).map(|slot| slot.read().clone())
    }

    /// Overwrite field `index`. Returns `false` if out of range.
    pub fn set_field(&self, index: usize, value: Value) -> bool {
        match self.fields.get(index) {
            Some(slot) => {
                *slot.write() = value;
                true
            }
            None => false,
        }
    }

    pub fn fields(&self) -> Vec<Value> {
        self.fields.iter().map(|slot| slot.read().clone()).collect()
    }
}
