//! Locations of matched values, for `get!` and `set!`.
//!
//! Every node matches a [`Subject`]: the value plus the place it was read
//! from. Only `get!`/`set!` look at the place. They turn it into a
//! zero-argument reader or a one-argument writer procedure; the matcher
//! itself never writes.

use knot_ir::{Arity, Heap, Name, Pair, ProcError, Procedure, Value, Vector};
use knot_patterns::FieldAccessor;

#[derive(Clone, Debug)]
pub(crate) enum Slot {
    /// Computed or root value with no place to write back to.
    Detached,
    Car(Heap<Pair>),
    Cdr(Heap<Pair>),
    Element(Heap<Vector>, usize),
    Field {
        record: Value,
        accessor: FieldAccessor,
    },
}

#[derive(Clone, Debug)]
pub(crate) struct Subject {
    pub(crate) value: Value,
    pub(crate) slot: Slot,
}

impl Subject {
    pub(crate) fn detached(value: Value) -> Self {
        Subject {
            value,
            slot: Slot::Detached,
        }
    }

    pub(crate) fn car(pair: &Heap<Pair>) -> Self {
        Subject {
            value: pair.car(),
            slot: Slot::Car(pair.clone()),
        }
    }

    pub(crate) fn cdr(pair: &Heap<Pair>) -> Self {
        Subject {
            value: pair.cdr(),
            slot: Slot::Cdr(pair.clone()),
        }
    }

    pub(crate) fn element(vector: &Heap<Vector>, index: usize) -> Self {
        Subject {
            value: vector.get(index).unwrap_or(Value::Unspecified),
            slot: Slot::Element(vector.clone(), index),
        }
    }

    pub(crate) fn field(record: &Value, accessor: &FieldAccessor) -> Result<Self, ProcError> {
        Ok(Subject {
            value: accessor.get.call1(record)?,
            slot: Slot::Field {
                record: record.clone(),
                accessor: accessor.clone(),
            },
        })
    }

    /// Reader for the current contents of the slot.
    pub(crate) fn getter(&self, name: Name) -> Procedure {
        let slot = self.slot.clone();
        let value = self.value.clone();
        Procedure::new(name, Arity::Exactly(0), move |_| match &slot {
            Slot::Detached => Ok(value.clone()),
            Slot::Car(pair) => Ok(pair.car()),
            Slot::Cdr(pair) => Ok(pair.cdr()),
            Slot::Element(vector, index) => vector
                .get(*index)
                .ok_or_else(|| ProcError::custom(format!("vector index {index} out of range"))),
            Slot::Field { record, accessor } => accessor.get.call1(record),
        })
    }

    /// Writer that replaces the slot contents with its one argument.
    pub(crate) fn setter(&self, name: Name) -> Procedure {
        let slot = self.slot.clone();
        Procedure::new(name, Arity::Exactly(1), move |args| {
            let new = args.first().cloned().unwrap_or(Value::Unspecified);
            match &slot {
                Slot::Detached => return Err(ProcError::ReadOnlySlot { procedure: name }),
                Slot::Car(pair) => pair.set_car(new),
                Slot::Cdr(pair) => pair.set_cdr(new),
                Slot::Element(vector, index) => {
                    if !vector.set(*index, new) {
                        return Err(ProcError::custom(format!(
                            "vector index {index} out of range"
                        )));
                    }
                }
                Slot::Field { record, accessor } => {
                    let Some(set) = &accessor.set else {
                        return Err(ProcError::ReadOnlySlot { procedure: name });
                    };
                    set.call(&[record.clone(), new])?;
                }
            }
            Ok(Value::Unspecified)
        })
    }
}
