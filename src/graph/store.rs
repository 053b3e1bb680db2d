//! ModelStore: append-only arena of nodes and edges
//!
//! The store only grows while a model is being built; once handed to
//! analysis or export it is treated as frozen. That transition is a
//! caller convention, not an enforced state.

use super::edge::{Edge, EdgeKind, EdgeRef};
use super::node::{Node, NodeKind, NodeRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur in store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate node id: {0}")]
    DuplicateNodeId(String),

    #[error("unknown node reference {0}")]
    UnknownNode(NodeRef),

    #[error("node {reference} is a {actual}, expected a {expected}")]
    KindMismatch {
        reference: NodeRef,
        expected: NodeKind,
        actual: NodeKind,
    },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Metadata about a model store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// When the store was created
    pub created_at: Option<DateTime<Utc>>,
    /// When the store last grew
    pub updated_at: Option<DateTime<Utc>>,
}

/// Append-only arena of typed nodes and typed directed edges.
///
/// Nodes and edges are addressed by [`NodeRef`]/[`EdgeRef`] handles issued
/// in insertion order. There is no removal API; cyclic references between
/// nodes are plain data, not object-graph aliasing.
#[derive(Debug, Clone)]
pub struct ModelStore {
    /// Human-readable name of the model
    name: String,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    /// Insertion-order handle lists per kind
    by_kind: HashMap<NodeKind, Vec<NodeRef>>,
    /// Explicit-id uniqueness index
    by_id: HashMap<String, NodeRef>,
    metadata: ModelMetadata,
}

impl ModelStore {
    /// Create an empty store with the given model name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            by_kind: HashMap::new(),
            by_id: HashMap::new(),
            metadata: ModelMetadata {
                created_at: Some(Utc::now()),
                ..Default::default()
            },
        }
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store metadata.
    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Append a node, returning its handle.
    ///
    /// Explicit ids are unique within a store; inserting a node whose id
    /// is already taken is an error.
    pub fn insert_node(&mut self, node: Node) -> StoreResult<NodeRef> {
        if self.by_id.contains_key(&node.id) {
            return Err(StoreError::DuplicateNodeId(node.id));
        }

        let reference = NodeRef(self.nodes.len());
        self.by_id.insert(node.id.clone(), reference);
        self.by_kind.entry(node.kind()).or_default().push(reference);
        self.nodes.push(node);
        self.touch();
        Ok(reference)
    }

    /// Append an edge, returning its handle.
    ///
    /// Both endpoints must already be in the store (referential
    /// integrity). Inserting an edge whose source, target, kind and
    /// properties all match an existing edge returns the existing handle
    /// instead of appending a second copy.
    pub fn insert_edge(&mut self, edge: Edge) -> StoreResult<EdgeRef> {
        self.check_node(edge.source)?;
        self.check_node(edge.target)?;

        let duplicate = self.edges.iter().position(|e| {
            e.source == edge.source
                && e.target == edge.target
                && e.kind == edge.kind
                && e.properties == edge.properties
        });
        if let Some(index) = duplicate {
            return Ok(EdgeRef(index));
        }

        let reference = EdgeRef(self.edges.len());
        self.edges.push(edge);
        self.touch();
        Ok(reference)
    }

    /// Get a node by handle.
    pub fn node(&self, reference: NodeRef) -> Option<&Node> {
        self.nodes.get(reference.0)
    }

    /// Get an edge by handle.
    pub fn edge(&self, reference: EdgeRef) -> Option<&Edge> {
        self.edges.get(reference.0)
    }

    /// Look up a node handle by explicit id.
    pub fn node_by_id(&self, id: &str) -> Option<NodeRef> {
        self.by_id.get(id).copied()
    }

    /// Handles of all nodes of one kind, in insertion order.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> &[NodeRef] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All nodes with their handles, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeRef, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeRef(index), node))
    }

    /// All edges, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Outgoing edges of a node (its dependencies).
    pub fn edges_from(&self, reference: NodeRef) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.source == reference)
    }

    /// Incoming edges of a node (its dependents).
    pub fn edges_to(&self, reference: NodeRef) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.target == reference)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the store holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Re-point a segment's cached endpoint handles at canonical points.
    ///
    /// This and [`repoint_connection`](Self::repoint_connection) are the
    /// only mutations allowed after insertion: correcting a just-inserted
    /// aggregate's cached sub-references once its sub-objects have been
    /// deduplicated.
    pub fn repoint_segment(
        &mut self,
        segment: NodeRef,
        begin: NodeRef,
        end: NodeRef,
    ) -> StoreResult<()> {
        self.check_node(begin)?;
        self.check_node(end)?;
        let node = self
            .nodes
            .get_mut(segment.0)
            .ok_or(StoreError::UnknownNode(segment))?;
        match &mut node.body {
            super::NodeBody::Segment {
                begin: cached_begin,
                end: cached_end,
            } => {
                *cached_begin = begin;
                *cached_end = end;
                Ok(())
            }
            other => Err(StoreError::KindMismatch {
                reference: segment,
                expected: NodeKind::Segment,
                actual: other.kind(),
            }),
        }
    }

    /// Re-point a connection point's cached geometry handle.
    pub fn repoint_connection(
        &mut self,
        connection: NodeRef,
        geometry: NodeRef,
    ) -> StoreResult<()> {
        self.check_node(geometry)?;
        let node = self
            .nodes
            .get_mut(connection.0)
            .ok_or(StoreError::UnknownNode(connection))?;
        match &mut node.body {
            super::NodeBody::ConnectionPoint { geometry: cached } => {
                *cached = Some(geometry);
                Ok(())
            }
            other => Err(StoreError::KindMismatch {
                reference: connection,
                expected: NodeKind::ConnectionPoint,
                actual: other.kind(),
            }),
        }
    }

    /// Outgoing edges of one kind, first match.
    pub fn dependency(&self, reference: NodeRef, kind: EdgeKind) -> Option<NodeRef> {
        self.edges_from(reference)
            .find(|e| e.kind == kind)
            .map(|e| e.target)
    }

    fn check_node(&self, reference: NodeRef) -> StoreResult<()> {
        if reference.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(StoreError::UnknownNode(reference))
        }
    }

    fn touch(&mut self) {
        self.metadata.updated_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeBody, Point3};

    fn point(id: &str, x: f64) -> Node {
        Node::new(id, id.to_uppercase(), NodeBody::Point(Point3::new(x, 0.0, 0.0)))
    }

    #[test]
    fn metadata_tracks_store_growth() {
        let mut store = ModelStore::new("frame");
        assert_eq!(store.name(), "frame");
        assert!(store.is_empty());

        let created_at = store.metadata().created_at;
        assert!(created_at.is_some());
        assert!(store.metadata().updated_at.is_none());

        let a = store.insert_node(point("a", 0.0)).unwrap();
        assert!(!store.is_empty());
        let after_node = store.metadata().updated_at;
        assert!(after_node.is_some());
        assert!(after_node >= created_at);

        let b = store.insert_node(point("b", 1.0)).unwrap();
        store
            .insert_edge(Edge::new(a, b, EdgeKind::BeginsAt))
            .unwrap();
        assert!(store.metadata().updated_at >= after_node);
    }

    #[test]
    fn insert_node_issues_handles_in_insertion_order() {
        let mut store = ModelStore::new("test");
        let a = store.insert_node(point("a", 0.0)).unwrap();
        let b = store.insert_node(point("b", 1.0)).unwrap();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(store.node_count(), 2);
    }

    #[test]
    fn insert_node_rejects_duplicate_id() {
        let mut store = ModelStore::new("test");
        store.insert_node(point("a", 0.0)).unwrap();
        let err = store.insert_node(point("a", 1.0)).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateNodeId(id) if id == "a"));
    }

    #[test]
    fn nodes_of_kind_preserves_insertion_order() {
        let mut store = ModelStore::new("test");
        let a = store.insert_node(point("a", 0.0)).unwrap();
        store
            .insert_node(Node::new("m", "M", NodeBody::Material { grade: None }))
            .unwrap();
        let b = store.insert_node(point("b", 1.0)).unwrap();

        assert_eq!(store.nodes_of_kind(NodeKind::Point), &[a, b]);
        assert_eq!(store.nodes_of_kind(NodeKind::Storey), &[]);
    }

    #[test]
    fn insert_edge_rejects_dangling_reference() {
        let mut store = ModelStore::new("test");
        let a = store.insert_node(point("a", 0.0)).unwrap();
        let err = store
            .insert_edge(Edge::new(a, NodeRef(7), EdgeKind::HasGeometry))
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownNode(NodeRef(7))));
    }

    #[test]
    fn insert_edge_returns_existing_handle_for_exact_duplicate() {
        let mut store = ModelStore::new("test");
        let a = store.insert_node(point("a", 0.0)).unwrap();
        let b = store.insert_node(point("b", 1.0)).unwrap();

        let first = store
            .insert_edge(Edge::new(a, b, EdgeKind::BeginsAt))
            .unwrap();
        let second = store
            .insert_edge(Edge::new(a, b, EdgeKind::BeginsAt))
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(store.edge_count(), 1);
    }

    #[test]
    fn insert_edge_keeps_edges_with_distinct_properties() {
        let mut store = ModelStore::new("test");
        let m = store
            .insert_node(Node::new("m", "M", NodeBody::Member { role: None }))
            .unwrap();
        let a = store.insert_node(point("a", 0.0)).unwrap();

        store
            .insert_edge(Edge::new(m, a, EdgeKind::HasSegment).with_property("index", "0"))
            .unwrap();
        store
            .insert_edge(Edge::new(m, a, EdgeKind::HasSegment).with_property("index", "1"))
            .unwrap();

        assert_eq!(store.edge_count(), 2);
    }

    #[test]
    fn repoint_segment_updates_cached_endpoints() {
        let mut store = ModelStore::new("test");
        let a = store.insert_node(point("a", 0.0)).unwrap();
        let b = store.insert_node(point("b", 1.0)).unwrap();
        let c = store.insert_node(point("c", 2.0)).unwrap();
        let segment = store
            .insert_node(Node::new(
                "s",
                "S",
                NodeBody::Segment { begin: a, end: b },
            ))
            .unwrap();

        store.repoint_segment(segment, a, c).unwrap();

        match store.node(segment).map(|n| &n.body) {
            Some(NodeBody::Segment { begin, end }) => {
                assert_eq!(*begin, a);
                assert_eq!(*end, c);
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn repoint_segment_rejects_non_segment() {
        let mut store = ModelStore::new("test");
        let a = store.insert_node(point("a", 0.0)).unwrap();
        let b = store.insert_node(point("b", 1.0)).unwrap();
        let err = store.repoint_segment(a, b, b).unwrap_err();
        assert!(matches!(
            err,
            StoreError::KindMismatch {
                expected: NodeKind::Segment,
                actual: NodeKind::Point,
                ..
            }
        ));
    }

    #[test]
    fn repoint_connection_sets_geometry() {
        let mut store = ModelStore::new("test");
        let p = store.insert_node(point("p", 0.0)).unwrap();
        let n = store
            .insert_node(Node::new(
                "n",
                "N",
                NodeBody::ConnectionPoint { geometry: None },
            ))
            .unwrap();

        store.repoint_connection(n, p).unwrap();

        match store.node(n).map(|n| &n.body) {
            Some(NodeBody::ConnectionPoint { geometry }) => assert_eq!(*geometry, Some(p)),
            other => panic!("unexpected body: {other:?}"),
        }
    }
}
