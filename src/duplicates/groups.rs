//! Deduplication results.
//!
//! # Overview
//!
//! A scan partitions its input into groups. Each [`DuplicateGroup`] holds the
//! first occurrence (the *unique* that makes it into the output) and every
//! later value that compared equal to it. A [`DedupSummary`] reports how
//! effective the scan was.
//!
//! # Example
//!
//! ```
//! use nodups::duplicates::Deduplicator;
//! use nodups::value::Value;
//!
//! let values: Vec<Value> = [1, 2, 1, 1].into_iter().map(Value::from).collect();
//! let (groups, summary) = Deduplicator::with_defaults().group(&values);
//!
//! assert_eq!(groups.len(), 2);
//! assert_eq!(groups[0].duplicate_count(), 2);
//! assert_eq!(summary.duplicate_values, 2);
//! ```

use crate::value::Value;

/// A unique value and the duplicates it absorbed.
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    /// Position of the unique in the output
    pub index: usize,
    /// First occurrence
    pub unique: Value,
    /// Later values equal to `unique`, in input order
    pub duplicates: Vec<Value>,
}

impl DuplicateGroup {
    /// Create a group with no duplicates yet.
    #[must_use]
    pub fn new(index: usize, unique: Value) -> Self {
        Self {
            index,
            unique,
            duplicates: Vec::new(),
        }
    }

    /// Record a duplicate.
    pub fn add(&mut self, duplicate: Value) {
        self.duplicates.push(duplicate);
    }

    /// Number of values in the group, the unique included.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.duplicates.len() + 1
    }

    /// Number of duplicates absorbed.
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.duplicates.len()
    }

    /// Check if the unique absorbed anything.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }

    /// The unique followed by its duplicates.
    pub fn members(&self) -> impl Iterator<Item = &Value> {
        std::iter::once(&self.unique).chain(&self.duplicates)
    }
}

/// Statistics from one deduplication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupSummary {
    /// Values scanned
    pub total_values: usize,
    /// Values kept
    pub unique_values: usize,
    /// Values dropped as duplicates
    pub duplicate_values: usize,
    /// Uniques that absorbed at least one duplicate
    pub duplicate_groups: usize,
    /// Pairwise equality checks performed
    pub comparisons: usize,
}

impl DedupSummary {
    /// Percentage of values eliminated as duplicates.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_values == 0 {
            0.0
        } else {
            (self.duplicate_values as f64 / self.total_values as f64) * 100.0
        }
    }

    /// Check if anything was eliminated.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.duplicate_values > 0
    }
}
