//! Named procedures and record shapes that pattern syntax can refer to.
//!
//! `(? pred ...)`, `(= proc ...)`, `($ tag ...)` and `(@ tag ...)` name
//! host capabilities by symbol. The parser resolves those symbols here, so
//! a compiled pattern holds the procedures themselves and never looks a
//! name up at match time.

use std::sync::Arc;

use knot_ir::{Name, Procedure};
use rustc_hash::FxHashMap;

use crate::builtins;
use crate::RecordShape;

/// Procedures and record shapes by name.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    procedures: FxHashMap<Name, Procedure>,
    records: FxHashMap<Name, Arc<RecordShape>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in predicates and list/vector helpers.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for procedure in builtins::procedures() {
            registry.define(procedure);
        }
        registry
    }

    /// Register `procedure` under its own name, replacing any earlier one.
    pub fn define(&mut self, procedure: Procedure) {
        self.procedures.insert(procedure.name(), procedure);
    }

    pub fn procedure(&self, name: Name) -> Option<&Procedure> {
        self.procedures.get(&name)
    }

    /// Register a record shape under its tag.
    pub fn define_record(&mut self, shape: RecordShape) -> Arc<RecordShape> {
        let shape = Arc::new(shape);
        self.records.insert(shape.tag(), Arc::clone(&shape));
        shape
    }

    /// Register a `Value::Record` type along with its companion procedures
    /// `<tag>?`, `<tag>-<field>` and `set-<tag>-<field>!`.
    pub fn define_native_record(&mut self, tag: Name, field_names: &[Name]) -> Arc<RecordShape> {
        let shape = RecordShape::native(tag, field_names);
        self.define(shape.is_instance().clone());
        for field in shape.fields() {
            self.define(field.get.clone());
            if let Some(set) = &field.set {
                self.define(set.clone());
            }
        }
        tracing::debug!(%tag, fields = field_names.len(), "defined record type");
        self.define_record(shape)
    }

    pub fn record(&self, tag: Name) -> Option<&Arc<RecordShape>> {
        self.records.get(&tag)
    }

    /// Number of registered procedures.
    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }
}
