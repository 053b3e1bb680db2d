//! Dependency analysis over a finished store
//!
//! A read-only pass: the analysis mirrors the store's nodes and edges
//! into adjacency lists once, then answers ordering and cycle queries
//! without touching the store again. Callers are expected to run it only
//! after building has ceased.

mod cycles;
mod order;

pub use order::OrderOutcome;

use crate::graph::{ModelStore, NodeRef};
use tracing::warn;

/// Read-only dependency queries over a store snapshot.
pub struct DependencyAnalysis<'a> {
    store: &'a ModelStore,
    /// Per node, the nodes it depends on (edge targets)
    dependencies: Vec<Vec<NodeRef>>,
    /// Per node, the nodes depending on it (edge sources)
    dependents: Vec<Vec<NodeRef>>,
}

impl<'a> DependencyAnalysis<'a> {
    /// Mirror the store's nodes and edges into adjacency form.
    pub fn new(store: &'a ModelStore) -> Self {
        let count = store.node_count();
        let mut dependencies: Vec<Vec<NodeRef>> = vec![Vec::new(); count];
        let mut dependents: Vec<Vec<NodeRef>> = vec![Vec::new(); count];

        for edge in store.edges() {
            dependencies[edge.source.index()].push(edge.target);
            dependents[edge.target.index()].push(edge.source);
        }

        Self {
            store,
            dependencies,
            dependents,
        }
    }

    /// Compute a dependency-first ordering.
    ///
    /// For an acyclic graph, returns [`OrderOutcome::Ordered`]: every
    /// node's dependencies appear before the node itself, with ties
    /// broken by insertion order. For a cyclic graph, returns
    /// [`OrderOutcome::Cyclic`] carrying the insertion order and the
    /// detected cycles, letting the caller decide whether a cycle is
    /// fatal.
    pub fn ordering(&self) -> OrderOutcome {
        order::sort(self)
    }

    /// Dependency-first ordering, degrading to insertion order when the
    /// graph is cyclic.
    ///
    /// The degraded case is only observable through
    /// [`detect_cycles`](Self::detect_cycles) (or by calling
    /// [`ordering`](Self::ordering) instead); callers that must
    /// distinguish "sorted" from "degraded" should check for cycles
    /// first.
    pub fn compute_order(&self) -> Vec<NodeRef> {
        match self.ordering() {
            OrderOutcome::Ordered(order) => order,
            OrderOutcome::Cyclic { order, cycles } => {
                warn!(
                    cycles = cycles.len(),
                    "dependency graph is cyclic; falling back to insertion order"
                );
                order
            }
        }
    }

    /// Find cyclic dependency chains.
    ///
    /// Returns one node sequence per back-edge found during a
    /// depth-first traversal; an acyclic graph yields an empty list.
    /// Never fails. Runs in O(V+E).
    pub fn detect_cycles(&self) -> Vec<Vec<NodeRef>> {
        cycles::detect(&self.dependencies)
    }

    /// All node handles in insertion order.
    pub(crate) fn insertion_order(&self) -> Vec<NodeRef> {
        self.store.nodes().map(|(reference, _)| reference).collect()
    }

    pub(crate) fn dependencies(&self) -> &[Vec<NodeRef>] {
        &self.dependencies
    }

    pub(crate) fn dependents(&self) -> &[Vec<NodeRef>] {
        &self.dependents
    }
}
