//! Dependency-first ordering
//!
//! Edges are stored dependent → dependency, so a dependency-first result
//! is a topological sort over the reversed edge set: a node becomes
//! ready once every node it points at has been emitted. Ready nodes are
//! emitted smallest handle first, which makes the ordering deterministic
//! and keeps independent nodes in insertion order.

use super::DependencyAnalysis;
use crate::graph::NodeRef;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Outcome of a dependency-first sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderOutcome {
    /// Every node's dependencies appear before the node itself.
    Ordered(Vec<NodeRef>),
    /// The graph is cyclic; `order` is the insertion order.
    Cyclic {
        order: Vec<NodeRef>,
        cycles: Vec<Vec<NodeRef>>,
    },
}

impl OrderOutcome {
    /// Returns `true` for the cyclic (degraded) outcome.
    pub fn is_cyclic(&self) -> bool {
        matches!(self, OrderOutcome::Cyclic { .. })
    }

    /// The node sequence, regardless of outcome.
    pub fn into_order(self) -> Vec<NodeRef> {
        match self {
            OrderOutcome::Ordered(order) => order,
            OrderOutcome::Cyclic { order, .. } => order,
        }
    }
}

pub(super) fn sort(analysis: &DependencyAnalysis<'_>) -> OrderOutcome {
    let dependencies = analysis.dependencies();
    let dependents = analysis.dependents();
    let count = dependencies.len();

    // Kahn over the reversed edges: unmet-dependency counts seed the
    // ready set with nodes that depend on nothing.
    let mut unmet: Vec<usize> = dependencies.iter().map(Vec::len).collect();
    let mut ready: BinaryHeap<Reverse<NodeRef>> = unmet
        .iter()
        .enumerate()
        .filter(|(_, &pending)| pending == 0)
        .map(|(index, _)| Reverse(NodeRef(index)))
        .collect();

    let mut order = Vec::with_capacity(count);
    while let Some(Reverse(reference)) = ready.pop() {
        order.push(reference);
        for &dependent in &dependents[reference.index()] {
            let pending = &mut unmet[dependent.index()];
            *pending -= 1;
            if *pending == 0 {
                ready.push(Reverse(dependent));
            }
        }
    }

    if order.len() == count {
        OrderOutcome::Ordered(order)
    } else {
        OrderOutcome::Cyclic {
            order: analysis.insertion_order(),
            cycles: analysis.detect_cycles(),
        }
    }
}
