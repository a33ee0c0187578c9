//! Deduplication driver.
//!
//! # Overview
//!
//! The [`Deduplicator`] resolves its [`DedupOptions`] into a single
//! [`ComparisonMode`] once, then scans the input in order. Each candidate is
//! checked against the uniques accepted so far with
//! `equal(existing_unique, candidate)`:
//!
//! - **Linear scan** (default): against every unique, first match wins.
//! - **Adjacent scan** (`sorted`): against the last accepted unique only.
//!   On unsorted input this keeps repeats that are not adjacent.
//!
//! Uniques keep their first-occurrence order.
//!
//! # Example
//!
//! ```
//! use nodups::duplicates::{DedupOptions, Deduplicator};
//! use nodups::value::Value;
//!
//! let values: Vec<Value> = [5, 1, 1, 2, 3, 4, 2, 3, 5, 1].into_iter().map(Value::from).collect();
//! let dedup = Deduplicator::new(&DedupOptions::default()).unwrap();
//!
//! let uniques = dedup.dedup(&values);
//! let expected: Vec<Value> = [5, 1, 2, 3, 4].into_iter().map(Value::from).collect();
//! assert_eq!(uniques, expected);
//! ```

use crate::compare::{equal, Compare, ComparisonMode, EqualOptions, PathSpecInput};
use crate::error::DedupError;
use crate::value::Value;

use super::groups::{DedupSummary, DuplicateGroup};

/// Configuration for a deduplication.
#[derive(Debug, Clone, Default)]
pub struct DedupOptions {
    /// When two values count as equal
    pub equality: EqualOptions,
    /// Compare only against the last accepted unique
    pub sorted: bool,
}

impl DedupOptions {
    /// Create default options: strict structural comparison, linear scan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the equality options.
    #[must_use]
    pub fn with_equality(mut self, equality: EqualOptions) -> Self {
        self.equality = equality;
        self
    }

    /// Enable or disable the adjacent scan.
    #[must_use]
    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Set strict or loose primitive leaves.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.equality = self.equality.with_strict(strict);
        self
    }

    /// Set the comparison override.
    #[must_use]
    pub fn with_compare(mut self, compare: Compare) -> Self {
        self.equality = self.equality.with_compare(compare);
        self
    }

    /// Use a caller-supplied predicate.
    #[must_use]
    pub fn with_comparator(mut self, f: impl Fn(&Value, &Value) -> bool + 'static) -> Self {
        self.equality = self.equality.with_comparator(f);
        self
    }

    /// Restrict comparison to the given fields.
    #[must_use]
    pub fn with_by(mut self, by: impl Into<PathSpecInput>) -> Self {
        self.equality = self.equality.with_by(by);
        self
    }

    /// Exclude the given fields from comparison.
    #[must_use]
    pub fn with_skip(mut self, skip: impl Into<PathSpecInput>) -> Self {
        self.equality = self.equality.with_skip(skip);
        self
    }
}

/// Removes duplicates from sequences of values.
#[derive(Debug, Clone)]
pub struct Deduplicator {
    mode: ComparisonMode,
    sorted: bool,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Deduplicator {
    /// Create a deduplicator, resolving the comparison mode once.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::ConflictingRestrictions`] if both `by` and
    /// `skip` are set, or [`DedupError::InvalidPathSpec`] if the active path
    /// spec is malformed.
    pub fn new(options: &DedupOptions) -> Result<Self, DedupError> {
        let mode = options.equality.resolve()?;
        log::debug!(
            "Resolved comparison: {}{}",
            mode.describe(),
            if options.sorted { ", adjacent scan" } else { "" }
        );
        Ok(Self::from_mode(mode, options.sorted))
    }

    /// Create a deduplicator with strict structural comparison and a linear scan.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::from_mode(ComparisonMode::StrictValue, false)
    }

    /// Create a deduplicator from an already resolved mode.
    #[must_use]
    pub fn from_mode(mode: ComparisonMode, sorted: bool) -> Self {
        Self { mode, sorted }
    }

    /// The resolved comparison mode.
    #[must_use]
    pub fn mode(&self) -> &ComparisonMode {
        &self.mode
    }

    /// Check if the adjacent scan is used.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Decide whether two values are equal under this deduplicator's mode.
    #[must_use]
    pub fn equal(&self, a: &Value, b: &Value) -> bool {
        equal(a, b, &self.mode)
    }

    /// Unique values in first-occurrence order, as a new vector.
    #[must_use]
    pub fn dedup(&self, values: &[Value]) -> Vec<Value> {
        self.scan(values, |_, _| {}).0
    }

    /// Remove duplicates from `values`, keeping first occurrences in order.
    pub fn dedup_in_place(&self, values: &mut Vec<Value>) {
        let uniques = self.dedup(values);
        *values = uniques;
    }

    /// Deduplicate a list value into a new list.
    ///
    /// Anything that is not a list yields a new, empty list.
    #[must_use]
    pub fn dedup_value(&self, value: &Value) -> Value {
        match value.to_vec() {
            Some(items) => Value::list(self.dedup(&items)),
            None => {
                log::debug!("Not a list ({}), returning an empty list", value.type_name());
                Value::empty_list()
            }
        }
    }

    /// Deduplicate a list value in place, keeping its identity.
    ///
    /// Anything that is not a list is left untouched.
    pub fn dedup_value_in_place(&self, value: &Value) {
        let Some(items) = value.to_vec() else {
            log::debug!("Not a list ({}), nothing to deduplicate", value.type_name());
            return;
        };
        let uniques = self.dedup(&items);
        if let Value::List(list) = value {
            *list.borrow_mut() = uniques;
        }
    }

    /// Partition `values` into groups of equal values.
    ///
    /// Groups are ordered by their unique's first occurrence; each group
    /// lists its duplicates in input order.
    #[must_use]
    pub fn group(&self, values: &[Value]) -> (Vec<DuplicateGroup>, DedupSummary) {
        let mut duplicates: Vec<Vec<Value>> = Vec::new();
        let (uniques, summary) = self.scan(values, |index, value| {
            if duplicates.len() <= index {
                duplicates.resize_with(index + 1, Vec::new);
            }
            duplicates[index].push(value.clone());
        });

        duplicates.resize_with(uniques.len(), Vec::new);
        let groups = uniques
            .into_iter()
            .zip(duplicates)
            .enumerate()
            .map(|(index, (unique, duplicates))| DuplicateGroup {
                index,
                unique,
                duplicates,
            })
            .collect();
        (groups, summary)
    }

    /// Deduplicate, calling `on_unique` once per unique in output order.
    ///
    /// The callback receives the unique (and may replace it), the duplicates
    /// it absorbed and its index. The output list under construction is not
    /// passed; replacing the unique through the `&mut Value` is how a
    /// callback rewrites its slot. The returned vector holds the uniques as
    /// left by the callback.
    pub fn dedup_with<F>(&self, values: &[Value], mut on_unique: F) -> Vec<Value>
    where
        F: FnMut(&mut Value, &[Value], usize),
    {
        let (groups, _) = self.group(values);
        groups
            .into_iter()
            .map(|mut group| {
                on_unique(&mut group.unique, &group.duplicates, group.index);
                group.unique
            })
            .collect()
    }

    /// Core scan. Calls `on_duplicate(unique_index, value)` for every
    /// rejected value.
    fn scan<F>(&self, values: &[Value], mut on_duplicate: F) -> (Vec<Value>, DedupSummary)
    where
        F: FnMut(usize, &Value),
    {
        let mut uniques: Vec<Value> = Vec::new();
        let mut summary = DedupSummary {
            total_values: values.len(),
            ..DedupSummary::default()
        };
        let mut absorbed: Vec<bool> = Vec::new();

        for (position, candidate) in values.iter().enumerate() {
            let found = if self.sorted {
                self.find_adjacent(&uniques, candidate, &mut summary.comparisons)
            } else {
                self.find_linear(&uniques, candidate, &mut summary.comparisons)
            };

            match found {
                Some(index) => {
                    log::trace!("Value at {position} duplicates unique #{index}");
                    summary.duplicate_values += 1;
                    if !absorbed[index] {
                        absorbed[index] = true;
                        summary.duplicate_groups += 1;
                    }
                    on_duplicate(index, candidate);
                }
                None => {
                    uniques.push(candidate.clone());
                    absorbed.push(false);
                }
            }
        }

        summary.unique_values = uniques.len();
        log::debug!(
            "Dedup complete: {} values → {} unique ({:.1}% eliminated, {} comparisons)",
            summary.total_values,
            summary.unique_values,
            summary.elimination_rate(),
            summary.comparisons
        );
        (uniques, summary)
    }

    fn find_linear(&self, uniques: &[Value], candidate: &Value, comparisons: &mut usize) -> Option<usize> {
        uniques.iter().position(|unique| {
            *comparisons += 1;
            self.equal(unique, candidate)
        })
    }

    fn find_adjacent(&self, uniques: &[Value], candidate: &Value, comparisons: &mut usize) -> Option<usize> {
        let last = uniques.len().checked_sub(1)?;
        *comparisons += 1;
        self.equal(&uniques[last], candidate).then_some(last)
    }
}
