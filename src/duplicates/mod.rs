//! Duplicate removal.
//!
//! This module provides functionality for:
//! - Order-preserving deduplication with a linear or adjacent scan
//! - Grouping values with the duplicates they absorbed
//! - Per-unique callbacks and in-place variants
//! - Method-call syntax on slices ([`NoDups`])

pub mod ext;
pub mod finder;
pub mod groups;

pub use ext::NoDups;
pub use finder::{DedupOptions, Deduplicator};
pub use groups::{DedupSummary, DuplicateGroup};
