//! nodups - Order-preserving duplicate removal
//!
//! Removes duplicates from a sequence of dynamic values while keeping first
//! occurrences in order. Equality is deep and cycle-aware by default, and can
//! be switched to loose (coercing) leaves, shallow operators, a caller-supplied
//! predicate, or a comparison restricted to (`by`) or excluding (`skip`)
//! selected fields.
//!
//! # Example
//!
//! ```
//! use nodups::{nodups, DedupOptions, Value};
//!
//! let people = vec![
//!     Value::record([("name", Value::from("ada")), ("seen", Value::from(1))]),
//!     Value::record([("name", Value::from("ada")), ("seen", Value::from(2))]),
//!     Value::record([("name", Value::from("bob")), ("seen", Value::from(1))]),
//! ];
//!
//! let by_name = nodups(&people, &DedupOptions::new().with_by("name")).unwrap();
//! assert_eq!(by_name.len(), 2);
//!
//! let all_fields = nodups(&people, &DedupOptions::default()).unwrap();
//! assert_eq!(all_fields.len(), 3);
//! ```

pub mod compare;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod value;

pub use compare::{equal, Compare, ComparisonMode, EqualOptions, PathSpecInput};
pub use config::Config;
pub use duplicates::{DedupOptions, DedupSummary, Deduplicator, DuplicateGroup, NoDups};
pub use error::DedupError;
pub use value::Value;

/// Unique values of `values` in first-occurrence order.
///
/// # Errors
///
/// Returns an error if `options` do not resolve to a comparison mode (see
/// [`EqualOptions::resolve`]).
pub fn nodups(values: &[Value], options: &DedupOptions) -> Result<Vec<Value>, DedupError> {
    Ok(Deduplicator::new(options)?.dedup(values))
}

/// Decide whether two values are equal under `options`.
///
/// Resolves `options` on every call; resolve once with
/// [`EqualOptions::resolve`] and use [`compare::equal`] when comparing many
/// pairs.
///
/// # Errors
///
/// Returns an error if `options` do not resolve to a comparison mode.
pub fn equal_with(a: &Value, b: &Value, options: &EqualOptions) -> Result<bool, DedupError> {
    Ok(equal(a, b, &options.resolve()?))
}
