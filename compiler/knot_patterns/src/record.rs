//! Record shapes: the capability a host supplies for `$`/`@` patterns.
//!
//! The compiler never derives a predicate from a type name. Whoever builds
//! a `Record` pattern hands over the instance test and one accessor per
//! field. [`RecordShape::native`] builds that capability for the
//! `Value::Record` representation.

use std::fmt;

use knot_ir::{Arity, Name, ProcError, Procedure, Value};

/// Type tag plus the procedures that recognize and take apart instances.
#[derive(Clone)]
pub struct RecordShape {
    tag: Name,
    is_instance: Procedure,
    fields: Vec<FieldAccessor>,
}

/// Reader and optional writer for one record field.
#[derive(Clone, Debug)]
pub struct FieldAccessor {
    pub name: Name,
    pub get: Procedure,
    pub set: Option<Procedure>,
}

impl RecordShape {
    pub fn new(tag: Name, is_instance: Procedure, fields: Vec<FieldAccessor>) -> Self {
        RecordShape {
            tag,
            is_instance,
            fields,
        }
    }

    /// Shape over `Value::Record` instances tagged `tag` with exactly
    /// `field_names.len()` fields.
    ///
    /// The procedures are named `<tag>?`, `<tag>-<field>` and
    /// `set-<tag>-<field>!`.
    pub fn native(tag: Name, field_names: &[Name]) -> Self {
        let arity = field_names.len();
        let is_instance = Procedure::new(
            Name::intern(&format!("{tag}?")),
            Arity::Exactly(1),
            move |args| Ok(Value::Bool(is_native_instance(&args[0], tag, arity))),
        );
        let fields = field_names
            .iter()
            .enumerate()
            .map(|(index, &field)| native_accessor(tag, arity, field, index))
            .collect();
        RecordShape::new(tag, is_instance, fields)
    }

    pub fn tag(&self) -> Name {
        self.tag
    }

    pub fn is_instance(&self) -> &Procedure {
        &self.is_instance
    }

    pub fn fields(&self) -> &[FieldAccessor] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&FieldAccessor> {
        self.fields.get(index)
    }

    /// Index of the field called `name`.
    pub fn field_index(&self, name: Name) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }
}

impl fmt::Debug for RecordShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordShape")
            .field("tag", &self.tag)
            .field(
                "fields",
                &self.fields.iter().map(|field| field.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn is_native_instance(value: &Value, tag: Name, arity: usize) -> bool {
    value
        .as_record()
        .is_some_and(|record| record.tag() == tag && record.len() == arity)
}

fn native_accessor(tag: Name, arity: usize, field: Name, index: usize) -> FieldAccessor {
    let getter_name = Name::intern(&format!("{tag}-{field}"));
    let setter_name = Name::intern(&format!("set-{tag}-{field}!"));
    let get = Procedure::new(getter_name, Arity::Exactly(1), move |args| {
        match args[0].as_record() {
            Some(record) if is_native_instance(&args[0], tag, arity) => record
                .field(index)
                .ok_or_else(|| ProcError::custom(format!("{getter_name}: missing field {index}"))),
            _ => Err(ProcError::WrongType {
                procedure: getter_name,
                expected: "record",
                got: args[0].type_name(),
            }),
        }
    });
    let set = Procedure::new(setter_name, Arity::Exactly(2), move |args| {
        match args[0].as_record() {
            Some(record) if is_native_instance(&args[0], tag, arity) => {
                record.set_field(index, args[1].clone());
                Ok(Value::Unspecified)
            }
            _ => Err(ProcError::WrongType {
                procedure: setter_name,
                expected: "record",
                got: args[0].type_name(),
            }),
        }
    });
    FieldAccessor {
        name: field,
        get,
        set: Some(set),
    }
}
