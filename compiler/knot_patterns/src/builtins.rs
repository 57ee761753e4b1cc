//! Built-in procedures available to `?` and `=` patterns.

use knot_ir::{Arity, Name, ProcError, Procedure, Value};

/// Every built-in, in no particular order.
pub(crate) fn procedures() -> Vec<Procedure> {
    vec![
        predicate("null?", Value::is_null),
        predicate("pair?", |v| v.as_pair().is_some()),
        predicate("list?", Value::is_list),
        predicate("symbol?", |v| v.as_symbol().is_some()),
        predicate("string?", |v| v.as_str().is_some()),
        predicate("number?", |v| matches!(v, Value::Int(_) | Value::Float(_))),
        predicate("integer?", is_integer),
        predicate("boolean?", |v| matches!(v, Value::Bool(_))),
        predicate("char?", |v| matches!(v, Value::Char(_))),
        predicate("vector?", |v| v.as_vector().is_some()),
        predicate("procedure?", |v| v.as_procedure().is_some()),
        numeric("zero?", |n| n == 0, |x| x == 0.0),
        numeric("positive?", |n| n > 0, |x| x > 0.0),
        numeric("negative?", |n| n < 0, |x| x < 0.0),
        integral("even?", |n| n % 2 == 0),
        integral("odd?", |n| n % 2 != 0),
        unary("car", |name, v| match v.as_pair() {
            Some(pair) => Ok(pair.car()),
            None => Err(wrong_type(name, "pair", v)),
        }),
        unary("cdr", |name, v| match v.as_pair() {
            Some(pair) => Ok(pair.cdr()),
            None => Err(wrong_type(name, "pair", v)),
        }),
        unary("length", |name, v| {
            let items = list_items(name, v)?;
            i64::try_from(items.len())
                .map(Value::int)
                .map_err(|_| ProcError::custom(format!("{name}: list too long")))
        }),
        unary("reverse", |name, v| {
            let mut items = list_items(name, v)?;
            items.reverse();
            Ok(Value::list(items))
        }),
        unary("vector->list", |name, v| match v.as_vector() {
            Some(vector) => Ok(Value::list(vector.to_vec())),
            None => Err(wrong_type(name, "vector", v)),
        }),
        unary("list->vector", |name, v| Ok(Value::vector(list_items(name, v)?))),
        unary("symbol->string", |name, v| match v.as_symbol() {
            Some(symbol) => Ok(Value::string(symbol.as_str())),
            None => Err(wrong_type(name, "symbol", v)),
        }),
        unary("string->symbol", |name, v| match v.as_str() {
            Some(text) => Ok(Value::symbol(text)),
            None => Err(wrong_type(name, "string", v)),
        }),
        unary("string-length", |name, v| match v.as_str() {
            Some(text) => i64::try_from(text.chars().count())
                .map(Value::int)
                .map_err(|_| ProcError::custom(format!("{name}: string too long"))),
            None => Err(wrong_type(name, "string", v)),
        }),
        unary("abs", |name, v| match v {
            Value::Int(n) => n
                .checked_abs()
                .map(Value::int)
                .ok_or_else(|| ProcError::custom(format!("{name}: integer overflow"))),
            Value::Float(x) => Ok(Value::float(x.abs())),
            _ => Err(wrong_type(name, "number", v)),
        }),
    ]
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Int(_) => true,
        Value::Float(x) => x.is_finite() && x.fract() == 0.0,
        _ => false,
    }
}

fn wrong_type(procedure: Name, expected: &'static str, got: &Value) -> ProcError {
    ProcError::WrongType {
        procedure,
        expected,
        got: got.type_name(),
    }
}

fn list_items(procedure: Name, value: &Value) -> Result<Vec<Value>, ProcError> {
    value
        .to_vec()
        .ok_or_else(|| wrong_type(procedure, "list", value))
}

fn unary<F>(name: &str, body: F) -> Procedure
where
    F: Fn(Name, &Value) -> Result<Value, ProcError> + Send + Sync + 'static,
{
    let name = Name::intern(name);
    Procedure::new(name, Arity::Exactly(1), move |args| body(name, &args[0]))
}

fn predicate(name: &str, test: fn(&Value) -> bool) -> Procedure {
    unary(name, move |_, v| Ok(Value::Bool(test(v))))
}

fn numeric(name: &str, int_test: fn(i64) -> bool, float_test: fn(f64) -> bool) -> Procedure {
    unary(name, move |name, v| match v {
        Value::Int(n) => Ok(Value::Bool(int_test(*n))),
        Value::Float(x) => Ok(Value::Bool(float_test(*x))),
        _ => Err(wrong_type(name, "number", v)),
    })
}

fn integral(name: &str, test: fn(i64) -> bool) -> Procedure {
    unary(name, move |name, v| match v {
        Value::Int(n) => Ok(Value::Bool(test(*n))),
        _ => Err(wrong_type(name, "integer", v)),
    })
}
