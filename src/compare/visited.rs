//! Per-comparison visit bookkeeping for cycle-aware traversal.

use std::collections::HashMap;
use std::rc::Rc;

use crate::value::NodeId;

/// Field names from the comparison root to a node.
pub type VisitPath = Vec<Rc<str>>;

/// Records, for one side of a comparison, every path at which each
/// composite node was reached.
///
/// A fresh set is created for every top-level comparison and dropped when
/// it returns.
#[derive(Debug, Default)]
pub struct VisitedSet {
    visits: HashMap<NodeId, Vec<VisitPath>>,
}

impl VisitedSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths at which `id` has been reached so far, oldest first.
    #[must_use]
    pub fn visits(&self, id: NodeId) -> Option<&[VisitPath]> {
        self.visits.get(&id).map(Vec::as_slice)
    }

    /// Check if `id` has been reached before.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.visits.contains_key(&id)
    }

    /// Record that `id` was reached at `path`.
    pub fn record(&mut self, id: NodeId, path: &[Rc<str>]) {
        self.visits.entry(id).or_default().push(path.to_vec());
    }

    /// Number of distinct nodes reached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    /// Check if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }
}

/// Check that two visit histories have the same shape: equal count and,
/// pairwise, equal field-name sequences.
#[must_use]
pub fn same_shape(a: &[VisitPath], b: &[VisitPath]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(pa, pb)| pa.len() == pb.len() && pa.iter().zip(pb).all(|(x, y)| x == y))
}
