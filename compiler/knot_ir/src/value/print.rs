//! Written (`write`-style) rendering of values.

use std::fmt::{self, Write as _};

use super::Value;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        knot_stack::ensure_sufficient_stack(|| match self {
            Value::Null => f.write_str("()"),
            Value::Bool(true) => f.write_str("#t"),
            Value::Bool(false) => f.write_str("#f"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write_float(f, *x),
            Value::Char(c) => write_char(f, *c),
            Value::Str(s) => write_string(f, s),
            Value::Symbol(name) => f.write_str(name.as_str()),
            Value::Pair(_) => write_list(f, self),
            Value::Vector(vector) => {
                f.write_str("#(")?;
                write_spaced(f, &vector.to_vec())?;
                f.write_char(')')
            }
            Value::Record(record) => {
                write!(f, "#s({}", record.tag())?;
                for field in record.fields() {
                    write!(f, " {field}")?;
                }
                f.write_char(')')
            }
            Value::Procedure(procedure) => write!(f, "#<procedure {}>", procedure.name()),
            Value::Unspecified => f.write_str("#<unspecified>"),
        })
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

fn write_spaced(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_char(' ')?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Lists print iteratively along the spine; a cyclic spine prints forever,
/// as in Scheme `write` without datum labels, so callers avoid printing them.
fn write_list(f: &mut fmt::Formatter<'_>, list: &Value) -> fmt::Result {
    f.write_char('(')?;
    let mut current = list.clone();
    let mut first = true;
    loop {
        match current {
            Value::Pair(pair) => {
                if !first {
                    f.write_char(' ')?;
                }
                first = false;
                write!(f, "{}", pair.car())?;
                current = pair.cdr();
            }
            Value::Null => break,
            tail => {
                write!(f, " . {tail}")?;
                break;
            }
        }
    }
    f.write_char(')')
}

fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        f.write_str("+nan.0")
    } else if x.is_infinite() {
        f.write_str(if x > 0.0 { "+inf.0" } else { "-inf.0" })
    } else if x.fract() == 0.0 && x.abs() < 1e16 {
        write!(f, "{x:.1}")
    } else {
        write!(f, "{x}")
    }
}

fn write_char(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    match c {
        ' ' => f.write_str("#\\space"),
        '\n' => f.write_str("#\\newline"),
        '\t' => f.write_str("#\\tab"),
        c => write!(f, "#\\{c}"),
    }
}

fn write_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}
