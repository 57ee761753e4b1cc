//! Host-supplied native procedures.

use std::fmt;
use std::sync::Arc;

use super::Value;
use crate::{Name, ProcError};

/// Signature of a native procedure body.
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, ProcError> + Send + Sync;

/// Number of arguments a procedure accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// A named native function.
///
/// Procedures are opaque to the pattern compiler: it only calls them.
/// Equality is identity, as for Scheme procedures.
#[derive(Clone)]
pub struct Procedure {
    name: Name,
    arity: Arity,
    func: Arc<NativeFn>,
}

impl Procedure {
    pub fn new<F>(name: impl Into<Name>, arity: Arity, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, ProcError> + Send + Sync + 'static,
    {
        Procedure {
            name: name.into(),
            arity,
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> Name {
        self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Call with an argument list, checking the arity first.
    pub fn call(&self, args: &[Value]) -> Result<Value, ProcError> {
        if !self.arity.accepts(args.len()) {
            return Err(ProcError::Arity {
                procedure: self.name,
                expected: self.arity,
                got: args.len(),
            });
        }
        (self.func)(args)
    }

    /// Call with a single argument.
    pub fn call1(&self, arg: &Value) -> Result<Value, ProcError> {
        self.call(std::slice::from_ref(arg))
    }

    pub fn ptr_eq(&self, other: &Procedure) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<procedure {}>", self.name)
    }
}
