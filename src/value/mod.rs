//! Dynamic values that flow through comparison and deduplication.
//!
//! # Overview
//!
//! A [`Value`] is either a primitive (`undefined`, `null`, boolean, number,
//! string) or a composite (a list or a record). Composites are shared,
//! interior-mutable handles: cloning a composite `Value` clones the handle,
//! not the contents, so two clones are the *same node*. That identity is what
//! lets the comparator detect and match reference cycles.
//!
//! Records only carry their declared own fields. There is no notion of
//! inherited or hidden fields; a field either exists on the record or it
//! does not.
//!
//! Lists expose their elements as fields keyed by canonical decimal index
//! (`"0"`, `"1"`, ...), which is how path specs address list elements.
//!
//! # Cycles
//!
//! Cycles are built by storing a handle inside itself:
//!
//! ```
//! use nodups::value::Value;
//!
//! let a = Value::record([("v", Value::from(5))]);
//! a.set("ref", a.clone());
//!
//! assert!(a.get("ref").is_some_and(|r| r.same_node(&a)));
//! ```
//!
//! Reference-counted cycles are never freed on their own. Break them with
//! [`Value::remove`] when a long-lived process builds many of them.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::compare::StructuralComparator;

pub mod json;

/// Shared handle to list contents.
pub type ListRef = Rc<RefCell<Vec<Value>>>;

/// Shared handle to record contents.
pub type RecordRef = Rc<RefCell<Record>>;

/// A dynamically typed value.
#[derive(Clone)]
pub enum Value {
    /// Absence of a value (a missing field reads as this).
    Undefined,
    /// Explicit null.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Numeric scalar. `NaN` is the not-a-number sentinel.
    Number(f64),
    /// String scalar.
    String(Rc<str>),
    /// Ordered sequence of values.
    List(ListRef),
    /// Keyed mapping of declared own fields.
    Record(RecordRef),
}

/// Identity of a composite node, stable for as long as the node is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Insertion-ordered field storage for a record.
///
/// Fields are kept in a vector for ordering, with a name index for lookup.
#[derive(Default, Clone)]
pub struct Record {
    fields: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.index.get(key).map(|&idx| &self.fields[idx].1)
    }

    /// Check if a field is declared.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Insert or replace a field, returning the previous value.
    ///
    /// Replacing keeps the field's original position.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        if let Some(&idx) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.fields[idx].1, value));
        }
        self.index.insert(key.clone(), self.fields.len());
        self.fields.push((key, value));
        None
    }

    /// Remove a field, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let idx = self.index.remove(key)?;
        let (_, value) = self.fields.remove(idx);
        // later fields shift down by one
        for (name, _) in &self.fields[idx..] {
            if let Some(slot) = self.index.get_mut(name) {
                *slot -= 1;
            }
        }
        Some(value)
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Value {
    /// Create a new list from values.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    /// Create a new record from `(name, value)` pairs.
    ///
    /// A repeated name replaces the earlier value.
    pub fn record<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        let mut record = Record::new();
        for (key, value) in fields {
            record.insert(key, value);
        }
        Value::Record(Rc::new(RefCell::new(record)))
    }

    /// Create a new, empty list.
    #[must_use]
    pub fn empty_list() -> Self {
        Self::list(Vec::new())
    }

    /// Create a new, empty record.
    #[must_use]
    pub fn empty_record() -> Self {
        Value::Record(Rc::new(RefCell::new(Record::new())))
    }

    /// The not-a-number sentinel.
    #[must_use]
    pub fn nan() -> Self {
        Value::Number(f64::NAN)
    }

    /// Check if this is a list or a record.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(self, Value::List(_) | Value::Record(_))
    }

    /// Check if this is the not-a-number sentinel.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        matches!(self, Value::Number(n) if n.is_nan())
    }

    /// Short name of the value's kind, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Record(_) => "record",
        }
    }

    /// Numeric payload, if this is a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Boolean payload, if this is a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Identity of this node, if it is a composite.
    #[must_use]
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Value::List(list) => Some(NodeId(Rc::as_ptr(list).cast::<()>() as usize)),
            Value::Record(record) => Some(NodeId(Rc::as_ptr(record).cast::<()>() as usize)),
            _ => None,
        }
    }

    /// Check if both values are the same composite node.
    ///
    /// Primitives are never the same node, even when equal.
    #[must_use]
    pub fn same_node(&self, other: &Value) -> bool {
        match (self.node_id(), other.node_id()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Read a field of a composite.
    ///
    /// Returns `None` for primitives and for fields that are not declared.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Value::List(list) => {
                let idx = parse_index(key)?;
                list.borrow().get(idx).cloned()
            }
            Value::Record(record) => record.borrow().get(key).cloned(),
            _ => None,
        }
    }

    /// Check if a composite declares the given field.
    #[must_use]
    pub fn has_field(&self, key: &str) -> bool {
        match self {
            Value::List(list) => parse_index(key).is_some_and(|idx| idx < list.borrow().len()),
            Value::Record(record) => record.borrow().contains_key(key),
            _ => false,
        }
    }

    /// Field names of a composite, in order. Empty for primitives.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        match self {
            Value::List(list) => (0..list.borrow().len()).map(|i| i.to_string()).collect(),
            Value::Record(record) => record.borrow().keys().map(str::to_string).collect(),
            _ => Vec::new(),
        }
    }

    /// Number of fields of a composite. Zero for primitives.
    #[must_use]
    pub fn field_count(&self) -> usize {
        match self {
            Value::List(list) => list.borrow().len(),
            Value::Record(record) => record.borrow().len(),
            _ => 0,
        }
    }

    /// Write a field of a composite.
    ///
    /// On a record the field is inserted or replaced. On a list the key must
    /// be a canonical index; writing past the end pads with `undefined`.
    /// Writes to primitives and non-index list keys are ignored.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        match self {
            Value::Record(record) => {
                record.borrow_mut().insert(key, value.into());
            }
            Value::List(list) => {
                if let Some(idx) = parse_index(&key) {
                    let mut items = list.borrow_mut();
                    if idx >= items.len() {
                        items.resize(idx + 1, Value::Undefined);
                    }
                    items[idx] = value.into();
                }
            }
            _ => {}
        }
    }

    /// Remove a record field, returning its value.
    pub fn remove(&self, key: &str) -> Option<Value> {
        match self {
            Value::Record(record) => record.borrow_mut().remove(key),
            _ => None,
        }
    }

    /// Append to a list. Ignored for anything else.
    pub fn push(&self, value: impl Into<Value>) {
        if let Value::List(list) = self {
            list.borrow_mut().push(value.into());
        }
    }

    /// Snapshot of a list's elements. `None` for anything else.
    #[must_use]
    pub fn to_vec(&self) -> Option<Vec<Value>> {
        match self {
            Value::List(list) => Some(list.borrow().clone()),
            _ => None,
        }
    }
}

/// Parse a canonical list index (`"0"`, `"17"`; not `"01"` or `"+1"`).
pub(crate) fn parse_index(key: &str) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse().ok()
}

/// Format a number the way it reads as a field name or string.
///
/// Integral values print without a fractional part, so `0.0` is `"0"`.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

impl PartialEq for Value {
    /// Default structural equality (strict leaves, cycle-aware).
    fn eq(&self, other: &Self) -> bool {
        StructuralComparator::strict().equal(self, other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_debug(self, f, &mut Vec::new())
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

fn write_debug(
    value: &Value,
    f: &mut fmt::Formatter<'_>,
    ancestors: &mut Vec<NodeId>,
) -> fmt::Result {
    if let Some(id) = value.node_id() {
        if ancestors.contains(&id) {
            return f.write_str("[Circular]");
        }
        ancestors.push(id);
    }

    match value {
        Value::Undefined => f.write_str("undefined")?,
        Value::Null => f.write_str("null")?,
        Value::Bool(b) => write!(f, "{b}")?,
        Value::Number(n) => f.write_str(&format_number(*n))?,
        Value::String(s) => write!(f, "{:?}", &**s)?,
        Value::List(list) => {
            f.write_str("[")?;
            for (i, item) in list.borrow().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_debug(item, f, ancestors)?;
            }
            f.write_str("]")?;
        }
        Value::Record(record) => {
            let record = record.borrow();
            if record.is_empty() {
                f.write_str("{}")?;
            } else {
                f.write_str("{ ")?;
                for (i, (key, item)) in record.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: ")?;
                    write_debug(item, f, ancestors)?;
                }
                f.write_str(" }")?;
            }
        }
    }

    if value.is_composite() {
        ancestors.pop();
    }
    Ok(())
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    /// `None` becomes `null`.
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}
