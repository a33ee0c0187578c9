//! Primitive equality rules.
//!
//! Two families of rules live here:
//!
//! - **Leaf rules** used inside the structural walk: [`strict_equals`]
//!   (same kind and value, `NaN` equal to `NaN`, `0` equal to `-0`) and
//!   [`loose_equals`] (coercing across kinds, `NaN` equal to `NaN`).
//! - **Operator rules** used by the shallow `compare` tokens:
//!   [`strict_operator`] and [`loose_operator`]. These are the raw operators,
//!   so `NaN` is unequal to everything including itself, and composites are
//!   compared by identity.

use std::collections::HashSet;

use crate::value::{format_number, NodeId, Value};

/// Strict leaf equality for two primitives.
///
/// Composites are never equal here; the structural walk handles them.
#[must_use]
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
        _ => same_primitive(a, b),
    }
}

/// Loose (coercing) leaf equality for two primitives.
///
/// `NaN` equals `NaN`; otherwise this is the loose operator restricted to
/// primitives.
#[must_use]
pub fn loose_equals(a: &Value, b: &Value) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_composite() || b.is_composite() {
        return false;
    }
    abstract_equals(a, b)
}

/// The raw strict operator: no coercion, `NaN` never equal, composites by identity.
#[must_use]
pub fn strict_operator(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y,
        _ if a.is_composite() || b.is_composite() => a.same_node(b),
        _ => same_primitive(a, b),
    }
}

/// The raw loose operator: coercing, `NaN` never equal, composites by identity.
///
/// A composite compared against a primitive is first reduced to its
/// primitive string form (see [`to_primitive_string`]).
#[must_use]
pub fn loose_operator(a: &Value, b: &Value) -> bool {
    abstract_equals(a, b)
}

/// Coercing equality between any two values.
fn abstract_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
        (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::String(s)) | (Value::String(s), Value::Number(x)) => {
            *x == string_to_number(s)
        }
        (Value::Bool(x), other) | (other, Value::Bool(x)) => {
            abstract_equals(&Value::Number(bool_to_number(*x)), other)
        }
        _ if a.is_composite() && b.is_composite() => a.same_node(b),
        _ if a.is_composite() => abstract_equals(&Value::from(to_primitive_string(a)), b),
        _ => abstract_equals(a, &Value::from(to_primitive_string(b))),
    }
}

fn same_primitive(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        _ => false,
    }
}

fn bool_to_number(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Coerce a string to a number.
///
/// Surrounding whitespace is ignored and the empty string is `0`. Decimal
/// literals (with optional sign, fraction and exponent), `0x`/`0o`/`0b`
/// prefixed integers and `Infinity` are understood; anything else is `NaN`.
#[must_use]
pub fn string_to_number(s: &str) -> f64 {
    let s = s.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}');
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return f64::NAN;
        }
        return digits
            .chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d));
    }

    // f64::from_str also accepts "inf" and "nan", which are not numbers here
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return f64::NAN;
    }
    s.parse().unwrap_or(f64::NAN)
}

/// Primitive string form of a composite.
///
/// Lists join their elements' string forms with `,` (`undefined` and `null`
/// contribute empty strings, a list nested inside itself contributes an
/// empty string). Records are `"[object Object]"`.
#[must_use]
pub fn to_primitive_string(value: &Value) -> String {
    join_list(value, &mut HashSet::new())
}

fn join_list(value: &Value, in_progress: &mut HashSet<NodeId>) -> String {
    match value {
        Value::Undefined | Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::String(s) => s.to_string(),
        Value::Record(_) => "[object Object]".to_string(),
        Value::List(list) => {
            let Some(id) = value.node_id() else {
                return String::new();
            };
            if !in_progress.insert(id) {
                return String::new();
            }
            let joined = list
                .borrow()
                .iter()
                .map(|item| join_list(item, in_progress))
                .collect::<Vec<_>>()
                .join(",");
            in_progress.remove(&id);
            joined
        }
    }
}
