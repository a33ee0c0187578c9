//! Deep structural comparison.
//!
//! # Algorithm
//!
//! Both values are walked in lockstep:
//!
//! 1. Two primitives compare with the configured [`LeafEquality`].
//! 2. A primitive never equals a composite; a list never equals a record.
//! 3. Two composites are checked for revisits first. Each side keeps its own
//!    [`VisitedSet`]. If either node has been reached before, the pair is
//!    equal only when *both* were reached before along exactly the same
//!    root-relative paths; the walk does not descend again. Otherwise the
//!    current path is recorded for both nodes and their fields are compared:
//!    same field count, every field of `a` declared on `b`, and each pair of
//!    field values equal (short-circuiting on the first mismatch).
//!
//! Matching revisit paths rather than raw identities makes cycle handling
//! symmetric and structural: `a.ref = a` matches `b.ref = b`, but not a
//! value whose nested node loops back at a different depth.

use std::rc::Rc;

use super::visited::{same_shape, VisitedSet};
use super::LeafEquality;
use crate::value::{NodeId, Value};

/// Cycle-aware deep comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuralComparator {
    leaf: LeafEquality,
}

impl StructuralComparator {
    /// Create a comparator with the given primitive rule.
    #[must_use]
    pub fn new(leaf: LeafEquality) -> Self {
        Self { leaf }
    }

    /// Comparator with strict primitive leaves.
    #[must_use]
    pub fn strict() -> Self {
        Self::new(LeafEquality::Strict)
    }

    /// Comparator with loose (coercing) primitive leaves.
    #[must_use]
    pub fn loose() -> Self {
        Self::new(LeafEquality::Loose)
    }

    /// The primitive rule in use.
    #[must_use]
    pub fn leaf(&self) -> LeafEquality {
        self.leaf
    }

    /// Decide whether `a` and `b` are structurally equal.
    #[must_use]
    pub fn equal(&self, a: &Value, b: &Value) -> bool {
        Walk::new(self.leaf).values(a, b)
    }
}

impl Default for StructuralComparator {
    fn default() -> Self {
        Self::strict()
    }
}

/// State of one top-level comparison.
struct Walk {
    leaf: LeafEquality,
    visited_a: VisitedSet,
    visited_b: VisitedSet,
    path: Vec<Rc<str>>,
}

impl Walk {
    fn new(leaf: LeafEquality) -> Self {
        Self {
            leaf,
            visited_a: VisitedSet::new(),
            visited_b: VisitedSet::new(),
            path: Vec::new(),
        }
    }

    fn values(&mut self, a: &Value, b: &Value) -> bool {
        match (a.node_id(), b.node_id()) {
            (None, None) => self.leaf.primitives_equal(a, b),
            (Some(id_a), Some(id_b)) => self.composites(a, id_a, b, id_b),
            _ => false,
        }
    }

    fn composites(&mut self, a: &Value, id_a: NodeId, b: &Value, id_b: NodeId) -> bool {
        if self.visited_a.contains(id_a) || self.visited_b.contains(id_b) {
            let same = match (self.visited_a.visits(id_a), self.visited_b.visits(id_b)) {
                (Some(va), Some(vb)) => same_shape(va, vb),
                _ => false,
            };
            if same {
                self.visited_a.record(id_a, &self.path);
                self.visited_b.record(id_b, &self.path);
            } else {
                log::trace!("Revisit shape mismatch at /{}", self.path.join("/"));
            }
            return same;
        }

        self.visited_a.record(id_a, &self.path);
        self.visited_b.record(id_b, &self.path);

        match (a, b) {
            (Value::List(la), Value::List(lb)) => {
                let (la, lb) = (la.borrow(), lb.borrow());
                if la.len() != lb.len() {
                    return false;
                }
                la.iter()
                    .zip(lb.iter())
                    .enumerate()
                    .all(|(idx, (x, y))| self.field(Rc::from(idx.to_string()), x, y))
            }
            (Value::Record(ra), Value::Record(rb)) => {
                let (ra, rb) = (ra.borrow(), rb.borrow());
                if ra.len() != rb.len() {
                    return false;
                }
                let equal = ra.iter().all(|(key, x)| match rb.get(key) {
                    Some(y) => self.field(Rc::from(key), x, y),
                    None => false,
                });
                equal
            }
            _ => false,
        }
    }

    fn field(&mut self, key: Rc<str>, a: &Value, b: &Value) -> bool {
        self.path.push(key);
        let equal = self.values(a, b);
        self.path.pop();
        equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(fields: &[(&str, Value)]) -> Value {
        Value::record(fields.iter().cloned())
    }

    #[test]
    fn test_primitives() {
        let cmp = StructuralComparator::strict();
        assert!(cmp.equal(&Value::from(1), &Value::from(1)));
        assert!(!cmp.equal(&Value::from(1), &Value::from("1")));
        assert!(cmp.equal(&Value::nan(), &Value::nan()));
    }

    #[test]
    fn test_primitive_vs_composite() {
        let cmp = StructuralComparator::loose();
        assert!(!cmp.equal(&Value::from(""), &Value::empty_list()));
        assert!(!cmp.equal(&Value::Null, &Value::empty_record()));
    }

    #[test]
    fn test_list_vs_record_with_same_fields() {
        let list = Value::list([Value::from(1)]);
        let record = rec(&[("0", Value::from(1))]);
        assert!(!StructuralComparator::strict().equal(&list, &record));
    }

    #[test]
    fn test_records_field_sets() {
        let cmp = StructuralComparator::strict();
        let a = rec(&[("a", Value::from(1)), ("b", Value::from(2))]);
        let b = rec(&[("b", Value::from(2)), ("a", Value::from(1))]);
        let c = rec(&[("a", Value::from(1))]);
        let d = rec(&[("a", Value::from(1)), ("c", Value::from(2))]);

        assert!(cmp.equal(&a, &b), "field order is irrelevant");
        assert!(!cmp.equal(&a, &c));
        assert!(!cmp.equal(&c, &a));
        assert!(!cmp.equal(&a, &d));
    }

    #[test]
    fn test_nested_records_compare_field_by_field() {
        let cmp = StructuralComparator::strict();
        let inner = |v: i32| rec(&[("x", Value::from(v)), ("y", Value::list([Value::from(v)]))]);
        let a = rec(&[("p", inner(1)), ("q", inner(2))]);
        let b = rec(&[("q", inner(2)), ("p", inner(1))]);
        let c = rec(&[("p", inner(1)), ("q", inner(3))]);
        let d = rec(&[("p", inner(1)), ("r", inner(2))]);

        assert!(cmp.equal(&a, &b));
        assert!(!cmp.equal(&a, &c));
        assert!(!cmp.equal(&a, &d), "same field count, different names");
    }

    #[test]
    fn test_loose_leaves_inside_records() {
        let a = rec(&[("a", Value::from(1))]);
        let b = rec(&[("a", Value::from("1"))]);

        assert!(!StructuralComparator::strict().equal(&a, &b));
        assert!(StructuralComparator::loose().equal(&a, &b));
    }

    #[test]
    fn test_self_cycles_match() {
        let a = rec(&[("v", Value::from(5))]);
        a.set("ref", a.clone());
        let b = rec(&[("v", Value::from(5))]);
        b.set("ref", b.clone());

        assert!(StructuralComparator::strict().equal(&a, &b));
        assert!(StructuralComparator::strict().equal(&a, &a));
    }

    #[test]
    fn test_cycle_vs_fresh_node() {
        let a = rec(&[("v", Value::from(5))]);
        a.set("ref", a.clone());
        let c = rec(&[("v", Value::from(5)), ("ref", Value::empty_record())]);

        assert!(!StructuralComparator::strict().equal(&a, &c));
        assert!(!StructuralComparator::strict().equal(&c, &a));
    }

    #[test]
    fn test_cycle_entered_at_different_depth() {
        let a1 = Value::empty_record();
        a1.set("ref", a1.clone());
        let a = rec(&[("ref", a1)]);

        let b1 = Value::empty_record();
        b1.set("ref", b1.clone());
        let b = rec(&[("ref", rec(&[("ref", b1)]))]);

        assert!(!StructuralComparator::strict().equal(&a, &b));
    }

    #[test]
    fn test_shared_reference_shape() {
        let a1 = rec(&[("v", Value::from(5))]);
        let a2 = rec(&[("v", Value::from(10))]);
        let a = rec(&[("ref1", a1.clone()), ("ref2", a2), ("ref3", a1)]);

        let b1 = rec(&[("v", Value::from(5))]);
        let b2 = rec(&[("v", Value::from(10))]);
        let b = rec(&[("ref1", b1.clone()), ("ref2", b2.clone()), ("ref3", b2)]);

        let c1 = rec(&[("v", Value::from(5))]);
        let c2 = rec(&[("v", Value::from(10))]);
        let c = rec(&[("ref1", c1.clone()), ("ref2", c2), ("ref3", c1)]);

        let cmp = StructuralComparator::strict();
        assert!(!cmp.equal(&a, &b));
        assert!(cmp.equal(&a, &c));
    }

    #[test]
    fn test_list_cycles() {
        let a = Value::list([Value::from(1)]);
        a.push(a.clone());
        let b = Value::list([Value::from(1)]);
        b.push(b.clone());
        let c = Value::list([Value::from(2)]);
        c.push(c.clone());

        let cmp = StructuralComparator::strict();
        assert!(cmp.equal(&a, &b));
        assert!(!cmp.equal(&a, &c));
    }

    #[test]
    fn test_mutual_cycles() {
        let x = Value::empty_record();
        let y = Value::empty_record();
        x.set("next", y.clone());
        y.set("next", x.clone());

        let p = Value::empty_record();
        let q = Value::empty_record();
        p.set("next", q.clone());
        q.set("next", p.clone());

        let solo = Value::empty_record();
        let solo_inner = Value::empty_record();
        solo.set("next", solo_inner.clone());
        solo_inner.set("next", solo_inner.clone());

        let cmp = StructuralComparator::strict();
        assert!(cmp.equal(&x, &p));
        assert!(!cmp.equal(&x, &solo));
    }
}
