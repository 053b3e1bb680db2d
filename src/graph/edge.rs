//! Typed directed associations between stored nodes

use super::node::NodeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(Uuid);

impl EdgeId {
    /// Create a new random EdgeId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EdgeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to an edge stored in a [`ModelStore`](super::ModelStore).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EdgeRef(pub(crate) usize);

impl EdgeRef {
    /// Position of the edge in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for EdgeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Semantic association carried by an edge.
///
/// Direction is always dependent → dependency: the source is the entity
/// that requires something, the target is the thing required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Member or cross-section → material
    HasMaterial,
    /// Member → cross-section
    HasCrossSection,
    /// Member → storey
    OnStorey,
    /// Connection point → geometry point
    HasGeometry,
    /// Member → ordered curve segment
    HasSegment,
    /// Member → begin connection point, or segment → begin point
    BeginsAt,
    /// Member → end connection point, or segment → end point
    EndsAt,
}

impl EdgeKind {
    /// Stable snake_case label, identical to the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            EdgeKind::HasMaterial => "has_material",
            EdgeKind::HasCrossSection => "has_cross_section",
            EdgeKind::OnStorey => "on_storey",
            EdgeKind::HasGeometry => "has_geometry",
            EdgeKind::HasSegment => "has_segment",
            EdgeKind::BeginsAt => "begins_at",
            EdgeKind::EndsAt => "ends_at",
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// String-keyed property bag attached to an edge
pub type Properties = HashMap<String, String>;

/// A directed, typed association between two stored nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier
    pub id: EdgeId,
    /// The dependent node
    pub source: NodeRef,
    /// The dependency node
    pub target: NodeRef,
    /// Semantic association
    pub kind: EdgeKind,
    /// Additional properties (e.g. the segment index on has-segment edges)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: Properties,
}

impl Edge {
    /// Create a new edge from a dependent to its dependency.
    pub fn new(source: NodeRef, target: NodeRef, kind: EdgeKind) -> Self {
        Self {
            id: EdgeId::new(),
            source,
            target,
            kind,
            properties: HashMap::new(),
        }
    }

    /// Attach a property to the edge.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}
