//! Identity resolution: per-kind equality policies
//!
//! Decides whether a freshly constructed candidate duplicates a node
//! already in the store. Resolution is total and side-effect free: it
//! returns the handle of an equivalent stored node, or `None`, and never
//! fails. Exactly one policy applies per node kind (see
//! [`NodeKind::equality_policy`]).

use crate::graph::{EdgeKind, ModelStore, Node, NodeBody, NodeKind, NodeRef, Point3};
use tracing::debug;

/// How candidates of a kind are compared against stored nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualityPolicy {
    /// Case-insensitive comparison of non-empty native keys. A candidate
    /// without a native key is never deduplicated.
    NativeKey,
    /// Componentwise coordinate comparison within
    /// [`COORD_TOLERANCE`](crate::graph::COORD_TOLERANCE), scanning every
    /// stored point.
    Spatial,
    /// Spatial comparison of the points the nodes resolve to through
    /// their has-geometry association.
    DerivedSpatial,
}

/// Find a stored node equivalent to `candidate`.
///
/// The scan is restricted to nodes of the candidate's kind and applies
/// that kind's policy.
pub fn resolve(candidate: &Node, store: &ModelStore) -> Option<NodeRef> {
    let kind = candidate.kind();
    let found = match kind.equality_policy() {
        EqualityPolicy::NativeKey => resolve_by_native_key(candidate, store, kind),
        EqualityPolicy::Spatial => match &candidate.body {
            NodeBody::Point(at) => resolve_point(store, *at),
            _ => None,
        },
        EqualityPolicy::DerivedSpatial => resolve_connection(candidate, store),
    };

    if let Some(existing) = found {
        debug!(kind = %kind, id = %candidate.id, existing = %existing, "reusing equivalent stored node");
    }
    found
}

/// Spatial-tolerance lookup over stored points.
pub fn resolve_point(store: &ModelStore, at: Point3) -> Option<NodeRef> {
    store
        .nodes_of_kind(NodeKind::Point)
        .iter()
        .copied()
        .find(|&reference| {
            matches!(
                store.node(reference).map(|n| &n.body),
                Some(NodeBody::Point(stored)) if stored.almost_eq(&at)
            )
        })
}

fn resolve_by_native_key(candidate: &Node, store: &ModelStore, kind: NodeKind) -> Option<NodeRef> {
    let key = non_empty(candidate.native_key.as_deref())?.to_lowercase();
    store
        .nodes_of_kind(kind)
        .iter()
        .copied()
        .find(|&reference| {
            store
                .node(reference)
                .and_then(|n| non_empty(n.native_key.as_deref()))
                .is_some_and(|stored| stored.to_lowercase() == key)
        })
}

/// Derived lookup: a connection point is equivalent to a stored one iff
/// the geometry points they resolve to are spatially equivalent.
fn resolve_connection(candidate: &Node, store: &ModelStore) -> Option<NodeRef> {
    let NodeBody::ConnectionPoint {
        geometry: Some(geometry),
    } = &candidate.body
    else {
        return None;
    };
    let at = point_coords(store, *geometry)?;

    store
        .nodes_of_kind(NodeKind::ConnectionPoint)
        .iter()
        .copied()
        .find(|&reference| {
            store
                .dependency(reference, EdgeKind::HasGeometry)
                .and_then(|point| point_coords(store, point))
                .is_some_and(|stored| stored.almost_eq(&at))
        })
}

fn point_coords(store: &ModelStore, reference: NodeRef) -> Option<Point3> {
    match &store.node(reference)?.body {
        NodeBody::Point(at) => Some(*at),
        _ => None,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;

    fn store_with_point(at: Point3) -> (ModelStore, NodeRef) {
        let mut store = ModelStore::new("test");
        let p = store
            .insert_node(Node::new("p1", "P1", NodeBody::Point(at)))
            .unwrap();
        (store, p)
    }

    #[test]
    fn spatial_match_within_tolerance() {
        let (store, p) = store_with_point(Point3::new(0.0, 0.0, 0.0));
        let candidate = Node::new("p2", "P2", NodeBody::Point(Point3::new(1e-12, 0.0, 0.0)));
        assert_eq!(resolve(&candidate, &store), Some(p));
    }

    #[test]
    fn spatial_distinct_beyond_tolerance() {
        let (store, _) = store_with_point(Point3::new(0.0, 0.0, 0.0));
        let candidate = Node::new("p2", "P2", NodeBody::Point(Point3::new(0.001, 0.0, 0.0)));
        assert_eq!(resolve(&candidate, &store), None);
    }

    #[test]
    fn spatial_comparison_is_strict_at_tolerance() {
        let (store, _) = store_with_point(Point3::new(0.0, 0.0, 0.0));
        let candidate = Node::new(
            "p2",
            "P2",
            NodeBody::Point(Point3::new(crate::graph::COORD_TOLERANCE, 0.0, 0.0)),
        );
        assert_eq!(resolve(&candidate, &store), None);
    }

    #[test]
    fn native_key_match_is_case_insensitive() {
        let mut store = ModelStore::new("test");
        let m = store
            .insert_node(
                Node::new("m1", "S235", NodeBody::Material { grade: None })
                    .with_native_key("MAT-S235"),
            )
            .unwrap();

        let candidate = Node::new("m2", "S235", NodeBody::Material { grade: None })
            .with_native_key("mat-s235");
        assert_eq!(resolve(&candidate, &store), Some(m));
    }

    #[test]
    fn missing_native_key_never_deduplicates() {
        let mut store = ModelStore::new("test");
        store
            .insert_node(Node::new("m1", "S235", NodeBody::Material { grade: None }))
            .unwrap();

        let candidate = Node::new("m2", "S235", NodeBody::Material { grade: None });
        assert_eq!(resolve(&candidate, &store), None);
    }

    #[test]
    fn blank_native_key_never_deduplicates() {
        let mut store = ModelStore::new("test");
        store
            .insert_node(
                Node::new("m1", "S235", NodeBody::Material { grade: None }).with_native_key("  "),
            )
            .unwrap();

        let candidate =
            Node::new("m2", "S235", NodeBody::Material { grade: None }).with_native_key("  ");
        assert_eq!(resolve(&candidate, &store), None);
    }

    #[test]
    fn native_key_scan_is_restricted_to_candidate_kind() {
        let mut store = ModelStore::new("test");
        store
            .insert_node(
                Node::new("m1", "IPE200", NodeBody::Material { grade: None })
                    .with_native_key("shared-key"),
            )
            .unwrap();

        let candidate = Node::new("cs1", "IPE200", NodeBody::CrossSection { profile: None })
            .with_native_key("shared-key");
        assert_eq!(resolve(&candidate, &store), None);
    }

    #[test]
    fn connection_points_match_through_their_geometry() {
        let mut store = ModelStore::new("test");
        let p = store
            .insert_node(Node::new(
                "p1",
                "P1",
                NodeBody::Point(Point3::new(1.0, 2.0, 3.0)),
            ))
            .unwrap();
        let n = store
            .insert_node(Node::new(
                "n1",
                "N1",
                NodeBody::ConnectionPoint { geometry: Some(p) },
            ))
            .unwrap();
        store
            .insert_edge(Edge::new(n, p, EdgeKind::HasGeometry))
            .unwrap();

        let near = store
            .insert_node(Node::new(
                "p2",
                "P2",
                NodeBody::Point(Point3::new(1.0 + 1e-12, 2.0, 3.0)),
            ))
            .unwrap();
        let candidate = Node::new(
            "n2",
            "N2",
            NodeBody::ConnectionPoint {
                geometry: Some(near),
            },
        );
        assert_eq!(resolve(&candidate, &store), Some(n));
    }

    #[test]
    fn connection_point_without_geometry_never_matches() {
        let mut store = ModelStore::new("test");
        store
            .insert_node(Node::new(
                "n1",
                "N1",
                NodeBody::ConnectionPoint { geometry: None },
            ))
            .unwrap();

        let candidate = Node::new("n2", "N2", NodeBody::ConnectionPoint { geometry: None });
        assert_eq!(resolve(&candidate, &store), None);
    }
}
