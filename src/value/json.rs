//! Conversion between [`Value`] and `serde_json::Value`.
//!
//! JSON is tree-shaped, so converting *into* a [`Value`] always succeeds and
//! produces fresh, unshared composites. Converting *out* fails on reference
//! cycles; shared but acyclic nodes are simply written out once per
//! occurrence.

use serde_json::{Map, Number};

use super::{NodeId, Value};
use crate::error::DedupError;

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from(&json)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::from(s.as_str()),
            serde_json::Value::Array(items) => Value::list(items.iter().map(Value::from)),
            serde_json::Value::Object(map) => {
                Value::record(map.iter().map(|(k, v)| (k.clone(), Value::from(v))))
            }
        }
    }
}

impl Value {
    /// Convert to JSON.
    ///
    /// `undefined` record fields are omitted; `undefined` list elements,
    /// `NaN` and infinities become `null`. Integral numbers are written
    /// without a fractional part.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::CyclicValue`] if the value contains a cycle.
    pub fn to_json(&self) -> Result<serde_json::Value, DedupError> {
        to_json_inner(self, &mut Vec::new())
    }
}

fn to_json_inner(value: &Value, ancestors: &mut Vec<NodeId>) -> Result<serde_json::Value, DedupError> {
    if let Some(id) = value.node_id() {
        if ancestors.contains(&id) {
            return Err(DedupError::CyclicValue);
        }
        ancestors.push(id);
    }

    let json = match value {
        Value::Undefined | Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => number_to_json(*n),
        Value::String(s) => serde_json::Value::String(s.to_string()),
        Value::List(list) => {
            let items = list
                .borrow()
                .iter()
                .map(|item| to_json_inner(item, ancestors))
                .collect::<Result<Vec<_>, _>>()?;
            serde_json::Value::Array(items)
        }
        Value::Record(record) => {
            let mut map = Map::new();
            for (key, item) in record.borrow().iter() {
                if matches!(item, Value::Undefined) {
                    continue;
                }
                map.insert(key.to_string(), to_json_inner(item, ancestors)?);
            }
            serde_json::Value::Object(map)
        }
    };

    if value.is_composite() {
        ancestors.pop();
    }
    Ok(json)
}

fn number_to_json(n: f64) -> serde_json::Value {
    // below 2^53 every integral f64 is exact
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return serde_json::Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
}
