//! Method-call syntax for deduplicating slices of values.

use crate::error::DedupError;
use crate::value::Value;

use super::finder::{DedupOptions, Deduplicator};

/// Deduplicate a sequence of values in place of a free-function call.
///
/// # Example
///
/// ```
/// use nodups::duplicates::{DedupOptions, NoDups};
/// use nodups::value::Value;
///
/// let values: Vec<Value> = [1, 1, 2].into_iter().map(Value::from).collect();
/// assert_eq!(values.nodups().len(), 2);
///
/// let sorted = values.nodups_with(&DedupOptions::new().with_sorted(true)).unwrap();
/// assert_eq!(sorted.len(), 2);
/// ```
pub trait NoDups {
    /// Unique values under strict structural comparison.
    fn nodups(&self) -> Vec<Value>;

    /// Unique values under the given options.
    ///
    /// # Errors
    ///
    /// Returns an error if the options do not resolve to a comparison mode.
    fn nodups_with(&self, options: &DedupOptions) -> Result<Vec<Value>, DedupError>;
}

impl NoDups for [Value] {
    fn nodups(&self) -> Vec<Value> {
        Deduplicator::with_defaults().dedup(self)
    }

    fn nodups_with(&self, options: &DedupOptions) -> Result<Vec<Value>, DedupError> {
        Ok(Deduplicator::new(options)?.dedup(self))
    }
}
