//! Field-restricted comparison.
//!
//! A [`Projection`] pairs a [`PathTree`] with a [`Restriction`]:
//!
//! - **Include** (`by`): only the fields named by the tree take part. A leaf
//!   field is compared in full; a branch field recurses with its subtree. A
//!   selected field must be declared on both sides or on neither.
//! - **Exclude** (`skip`): every field of `a` takes part except the leaves of
//!   the tree. Branch fields recurse, stripping deeper leaves. Remaining field
//!   counts must match so that fields only `b` declares are caught.
//!
//! Wherever either side is a primitive the comparison falls back to the full
//! structural comparator.

use super::path::{PathNode, PathSpecInput, PathTree};
use super::structural::StructuralComparator;
use crate::error::DedupError;
use crate::value::Value;

/// Whether a tree names the fields to keep or the fields to drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restriction {
    /// Compare only the named fields.
    Include,
    /// Compare everything but the named fields.
    Exclude,
}

/// A compiled field restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    /// Selected fields
    pub tree: PathTree,
    /// How the selection applies
    pub restriction: Restriction,
}

impl Projection {
    /// Create a projection from a compiled tree.
    #[must_use]
    pub fn new(tree: PathTree, restriction: Restriction) -> Self {
        Self { tree, restriction }
    }

    /// Compile an inclusion (`by`) restriction.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::InvalidPathSpec`] if the spec is malformed.
    pub fn include(spec: &PathSpecInput) -> Result<Self, DedupError> {
        Ok(Self::new(PathTree::build(spec)?, Restriction::Include))
    }

    /// Compile an exclusion (`skip`) restriction.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::InvalidPathSpec`] if the spec is malformed.
    pub fn exclude(spec: &PathSpecInput) -> Result<Self, DedupError> {
        Ok(Self::new(PathTree::build(spec)?, Restriction::Exclude))
    }

    /// Compare `a` and `b` through this projection.
    #[must_use]
    pub fn equal(&self, a: &Value, b: &Value, leaf_eq: &StructuralComparator) -> bool {
        equal_restricted(a, b, &self.tree, leaf_eq, self.restriction)
    }
}

/// Compare `a` and `b` on the fields `tree` selects.
#[must_use]
pub fn equal_restricted(
    a: &Value,
    b: &Value,
    tree: &PathTree,
    leaf_eq: &StructuralComparator,
    restriction: Restriction,
) -> bool {
    match restriction {
        Restriction::Include => equal_including(a, b, tree, leaf_eq),
        Restriction::Exclude => equal_excluding(a, b, tree, leaf_eq),
    }
}

fn equal_including(a: &Value, b: &Value, tree: &PathTree, leaf_eq: &StructuralComparator) -> bool {
    if !a.is_composite() || !b.is_composite() {
        return leaf_eq.equal(a, b);
    }

    for (key, node) in tree.iter() {
        let equal = match (a.get(key), b.get(key)) {
            (None, None) => continue,
            (Some(x), Some(y)) => match node {
                PathNode::Leaf => leaf_eq.equal(&x, &y),
                PathNode::Branch(subtree) => equal_including(&x, &y, subtree, leaf_eq),
            },
            _ => false,
        };
        if !equal {
            log::trace!("Included field '{key}' differs");
            return false;
        }
    }
    true
}

fn equal_excluding(a: &Value, b: &Value, tree: &PathTree, leaf_eq: &StructuralComparator) -> bool {
    if !a.is_composite() || !b.is_composite() {
        return leaf_eq.equal(a, b);
    }

    for key in a.keys() {
        let node = tree.get(&key);
        if node.is_some_and(PathNode::is_leaf) {
            continue;
        }

        let (Some(x), Some(y)) = (a.get(&key), b.get(&key)) else {
            return false;
        };
        let equal = match node {
            Some(PathNode::Branch(subtree)) => equal_excluding(&x, &y, subtree, leaf_eq),
            _ => leaf_eq.equal(&x, &y),
        };
        if !equal {
            log::trace!("Field '{key}' differs");
            return false;
        }
    }

    remaining_fields(a, tree) == remaining_fields(b, tree)
}

/// Declared fields of `value` minus the ones excluded as a whole.
fn remaining_fields(value: &Value, tree: &PathTree) -> usize {
    let excluded = tree
        .iter()
        .filter(|(key, node)| node.is_leaf() && value.has_field(key))
        .count();
    value.field_count() - excluded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(fields: &[(&str, Value)]) -> Value {
        Value::record(fields.iter().cloned())
    }

    fn include(paths: &[&str]) -> Projection {
        Projection::include(&PathSpecInput::new(paths.iter().copied())).unwrap()
    }

    fn exclude(paths: &[&str]) -> Projection {
        Projection::exclude(&PathSpecInput::new(paths.iter().copied())).unwrap()
    }

    #[test]
    fn test_include_top_level() {
        let cmp = StructuralComparator::strict();
        let x = rec(&[("a", Value::from(5)), ("b", Value::from(10))]);
        let y = rec(&[("a", Value::from(5)), ("b", Value::from(11))]);

        assert!(include(&["a"]).equal(&x, &y, &cmp));
        assert!(!include(&["b"]).equal(&x, &y, &cmp));
    }

    #[test]
    fn test_include_presence_must_match() {
        let cmp = StructuralComparator::strict();
        let x = rec(&[("a", Value::Undefined)]);
        let y = Value::empty_record();
        let z = rec(&[("b", Value::from(1))]);

        assert!(!include(&["a"]).equal(&x, &y, &cmp));
        assert!(include(&["a"]).equal(&y, &z, &cmp), "absent on both sides");
    }

    #[test]
    fn test_include_nested_path_ignores_siblings() {
        let cmp = StructuralComparator::strict();
        let x = rec(&[("a", rec(&[("b", Value::from(1)), ("c", Value::from(2))]))]);
        let y = rec(&[("a", rec(&[("b", Value::from(1)), ("c", Value::from(3))]))]);

        assert!(include(&["a.b"]).equal(&x, &y, &cmp));
        assert!(!include(&["a"]).equal(&x, &y, &cmp));
        assert!(!include(&["a.b", "a"]).equal(&x, &y, &cmp));
    }

    #[test]
    fn test_include_falls_back_on_primitives() {
        let cmp = StructuralComparator::strict();
        let tree = include(&["a"]);

        assert!(tree.equal(&Value::from(1), &Value::from(1), &cmp));
        assert!(!tree.equal(&Value::from(1), &rec(&[("a", Value::from(1))]), &cmp));

        let x = rec(&[("a", Value::from(1))]);
        let y = rec(&[("a", Value::from(1))]);
        assert!(include(&["a.b"]).equal(&x, &y, &cmp));
    }

    #[test]
    fn test_include_uses_loose_leaves() {
        let x = rec(&[("a", Value::from(1)), ("b", Value::from(1))]);
        let y = rec(&[("a", Value::from("1")), ("b", Value::from(2))]);

        assert!(include(&["a"]).equal(&x, &y, &StructuralComparator::loose()));
        assert!(!include(&["a"]).equal(&x, &y, &StructuralComparator::strict()));
    }

    #[test]
    fn test_include_list_indices() {
        let cmp = StructuralComparator::strict();
        let x = Value::list([Value::from(1), Value::from(2)]);
        let y = Value::list([Value::from(1), Value::from(3)]);

        assert!(include(&["0"]).equal(&x, &y, &cmp));
        assert!(!include(&["1"]).equal(&x, &y, &cmp));
    }

    #[test]
    fn test_exclude_top_level() {
        let cmp = StructuralComparator::strict();
        let x = rec(&[("a", Value::from(5)), ("b", Value::from(10))]);
        let y = rec(&[("a", Value::from(5)), ("b", Value::from(11))]);

        assert!(exclude(&["b"]).equal(&x, &y, &cmp));
        assert!(!exclude(&["a"]).equal(&x, &y, &cmp));
    }

    #[test]
    fn test_exclude_catches_extra_fields_on_either_side() {
        let cmp = StructuralComparator::strict();
        let x = rec(&[("a", Value::from(1))]);
        let y = rec(&[("a", Value::from(1)), ("c", Value::from(2))]);

        assert!(!exclude(&["b"]).equal(&x, &y, &cmp));
        assert!(!exclude(&["b"]).equal(&y, &x, &cmp));
    }

    #[test]
    fn test_exclude_skipped_field_may_be_one_sided() {
        let cmp = StructuralComparator::strict();
        let x = rec(&[("a", Value::from(1)), ("b", Value::from(2))]);
        let y = rec(&[("a", Value::from(1))]);

        assert!(exclude(&["b"]).equal(&x, &y, &cmp));
        assert!(exclude(&["b"]).equal(&y, &x, &cmp));
    }

    #[test]
    fn test_exclude_nested() {
        let cmp = StructuralComparator::strict();
        let x = rec(&[
            ("a", rec(&[("b", Value::from(1)), ("c", Value::from(2))])),
            ("d", Value::from(4)),
        ]);
        let y = rec(&[
            ("a", rec(&[("b", Value::from(9)), ("c", Value::from(2))])),
            ("d", Value::from(4)),
        ]);
        let z = rec(&[
            ("a", rec(&[("b", Value::from(1)), ("c", Value::from(3))])),
            ("d", Value::from(4)),
        ]);

        assert!(exclude(&["a.b"]).equal(&x, &y, &cmp));
        assert!(!exclude(&["a.b"]).equal(&x, &z, &cmp));
    }

    #[test]
    fn test_exclude_with_cycle_outside_tree() {
        let cmp = StructuralComparator::strict();
        let x = rec(&[("v", Value::from(1))]);
        x.set("ref", x.clone());
        let y = rec(&[("v", Value::from(2))]);
        y.set("ref", y.clone());

        // `ref` is compared in full, which reaches the differing `v`
        assert!(!exclude(&["v"]).equal(&x, &y, &cmp));
        assert!(exclude(&["v", "ref"]).equal(&x, &y, &cmp));
    }
}
