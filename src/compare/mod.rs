//! Equality engine.
//!
//! This module provides:
//! - Primitive equality rules, strict and loose ([`primitive`])
//! - Cycle-aware deep comparison ([`StructuralComparator`])
//! - Field-restricted comparison through path tries ([`path`], [`projector`])
//! - Option resolution into a single [`ComparisonMode`] ([`options`])
//!
//! # Example
//!
//! ```
//! use nodups::compare::{equal, ComparisonMode};
//! use nodups::value::Value;
//!
//! let a = Value::record([("a", Value::from(1))]);
//! let b = Value::record([("a", Value::from("1"))]);
//!
//! assert!(!equal(&a, &b, &ComparisonMode::StrictValue));
//! assert!(equal(&a, &b, &ComparisonMode::LooseValue));
//! ```

use std::fmt;
use std::rc::Rc;

use crate::value::Value;

pub mod options;
pub mod path;
pub mod primitive;
pub mod projector;
pub mod structural;
pub mod visited;

pub use options::{Compare, EqualOptions};
pub use path::{PathElement, PathNode, PathSpecInput, PathTree};
pub use projector::{equal_restricted, Projection, Restriction};
pub use structural::StructuralComparator;
pub use visited::{VisitPath, VisitedSet};

/// Rule for comparing two primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeafEquality {
    /// Same kind and value; `NaN` equals `NaN`.
    #[default]
    Strict,
    /// Coercing across kinds; `NaN` equals `NaN`.
    Loose,
}

impl LeafEquality {
    /// Pick the rule from a `strict` flag.
    #[must_use]
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Loose
        }
    }

    /// Compare two primitives under this rule.
    #[must_use]
    pub fn primitives_equal(self, a: &Value, b: &Value) -> bool {
        match self {
            Self::Strict => primitive::strict_equals(a, b),
            Self::Loose => primitive::loose_equals(a, b),
        }
    }
}

/// Caller-supplied equality predicate.
///
/// The comparator is opaque: it is called as-is and a panic inside it
/// propagates to the caller. It need not be transitive.
#[derive(Clone)]
pub struct Comparator(Rc<dyn Fn(&Value, &Value) -> bool>);

impl Comparator {
    /// Wrap a predicate.
    pub fn new(f: impl Fn(&Value, &Value) -> bool + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the predicate.
    #[must_use]
    pub fn call(&self, a: &Value, b: &Value) -> bool {
        (self.0)(a, b)
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<comparator>")
    }
}

/// How two values are decided equal.
///
/// Resolved once per deduplication (see [`EqualOptions::resolve`]) and then
/// dispatched on every pairwise check.
#[derive(Debug, Clone, Default)]
pub enum ComparisonMode {
    /// Deep structural comparison with strict primitive leaves.
    #[default]
    StrictValue,
    /// Deep structural comparison with loose primitive leaves.
    LooseValue,
    /// Shallow operator: composites by identity, primitives by the raw
    /// strict or loose operator (`NaN` never equal).
    Operator(LeafEquality),
    /// Caller-supplied predicate.
    CustomFn(Comparator),
    /// Field-restricted comparison through a prebuilt path trie.
    PathRestricted {
        /// Trie and restriction kind
        projection: Projection,
        /// Rule for fields compared in full
        leaf: LeafEquality,
    },
}

impl ComparisonMode {
    /// Short human-readable name, for logging.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            Self::StrictValue => "strict structural",
            Self::LooseValue => "loose structural",
            Self::Operator(LeafEquality::Strict) => "strict operator",
            Self::Operator(LeafEquality::Loose) => "loose operator",
            Self::CustomFn(_) => "custom comparator",
            Self::PathRestricted {
                projection:
                    Projection {
                        restriction: Restriction::Include,
                        ..
                    },
                ..
            } => "restricted by included paths",
            Self::PathRestricted { .. } => "restricted by excluded paths",
        }
    }
}

/// Decide whether `a` and `b` are equal under `mode`.
#[must_use]
pub fn equal(a: &Value, b: &Value, mode: &ComparisonMode) -> bool {
    match mode {
        ComparisonMode::StrictValue => StructuralComparator::strict().equal(a, b),
        ComparisonMode::LooseValue => StructuralComparator::loose().equal(a, b),
        ComparisonMode::Operator(LeafEquality::Strict) => primitive::strict_operator(a, b),
        ComparisonMode::Operator(LeafEquality::Loose) => primitive::loose_operator(a, b),
        ComparisonMode::CustomFn(comparator) => comparator.call(a, b),
        ComparisonMode::PathRestricted { projection, leaf } => projection.equal(
            a,
            b,
            &StructuralComparator::new(*leaf),
        ),
    }
}
