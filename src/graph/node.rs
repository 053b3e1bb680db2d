//! Node representation in the exchange model graph

use serde::{Deserialize, Serialize};

use crate::identity::EqualityPolicy;

/// Handle to a node stored in a [`ModelStore`](super::ModelStore).
///
/// Serializes as a plain index. Handles are issued in insertion order and
/// are only meaningful for the store that created them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeRef(pub(crate) usize);

impl NodeRef {
    /// Position of the node in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Componentwise tolerance for spatial point deduplication.
pub const COORD_TOLERANCE: f64 = 1e-10;

/// A point in model space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Componentwise comparison within [`COORD_TOLERANCE`].
    pub fn almost_eq(&self, other: &Point3) -> bool {
        (self.x - other.x).abs() < COORD_TOLERANCE
            && (self.y - other.y).abs() < COORD_TOLERANCE
            && (self.z - other.z).abs() < COORD_TOLERANCE
    }
}

/// Kind discriminator for nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Geometric point in model space
    Point,
    /// Structural connection point, located by its geometry point
    ConnectionPoint,
    /// Curve segment between two points
    Segment,
    /// Physical member (beam, column, ...)
    Member,
    /// Material definition
    Material,
    /// Cross-section definition
    CrossSection,
    /// Organizational storey/level
    Storey,
}

impl NodeKind {
    /// Equality policy deciding whether a candidate duplicates a stored node.
    pub fn equality_policy(self) -> EqualityPolicy {
        match self {
            NodeKind::Point => EqualityPolicy::Spatial,
            NodeKind::ConnectionPoint => EqualityPolicy::DerivedSpatial,
            NodeKind::Segment
            | NodeKind::Member
            | NodeKind::Material
            | NodeKind::CrossSection
            | NodeKind::Storey => EqualityPolicy::NativeKey,
        }
    }

    /// Stable lowercase label, identical to the serialized discriminator.
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Point => "point",
            NodeKind::ConnectionPoint => "connection_point",
            NodeKind::Segment => "segment",
            NodeKind::Member => "member",
            NodeKind::Material => "material",
            NodeKind::CrossSection => "cross_section",
            NodeKind::Storey => "storey",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind-specific payload of a node.
///
/// A closed union: downstream consumers (serializers, validators) can match
/// exhaustively instead of dispatching through a type hierarchy. The serde
/// tag doubles as the kind discriminator in the exported shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeBody {
    Point(Point3),
    ConnectionPoint {
        /// Cached handle of the geometry point, kept in sync with the
        /// node's has-geometry edge
        #[serde(default, skip_serializing_if = "Option::is_none")]
        geometry: Option<NodeRef>,
    },
    Segment {
        /// Cached begin point handle
        begin: NodeRef,
        /// Cached end point handle
        end: NodeRef,
    },
    Member {
        /// Member subtype (e.g. "beam", "column")
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<String>,
    },
    Material {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        grade: Option<String>,
    },
    CrossSection {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        profile: Option<String>,
    },
    Storey {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        elevation: Option<f64>,
    },
}

impl NodeBody {
    /// Kind discriminator for this payload.
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeBody::Point(_) => NodeKind::Point,
            NodeBody::ConnectionPoint { .. } => NodeKind::ConnectionPoint,
            NodeBody::Segment { .. } => NodeKind::Segment,
            NodeBody::Member { .. } => NodeKind::Member,
            NodeBody::Material { .. } => NodeKind::Material,
            NodeBody::CrossSection { .. } => NodeKind::CrossSection,
            NodeBody::Storey { .. } => NodeKind::Storey,
        }
    }
}

/// A stored domain object in the exchange graph.
///
/// Immutable after insertion, apart from the narrow cached-reference
/// corrections the store allows (see
/// [`ModelStore::repoint_segment`](super::ModelStore::repoint_segment)).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier within the store
    pub id: String,
    /// Human-readable display name
    pub name: String,
    /// Externally-sourced identifier used for cross-system deduplication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_key: Option<String>,
    /// Kind-specific fields, carrying the serialized kind discriminator
    #[serde(flatten)]
    pub body: NodeBody,
}

impl Node {
    /// Create a node with the given identity and payload.
    pub fn new(id: impl Into<String>, name: impl Into<String>, body: NodeBody) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            native_key: None,
            body,
        }
    }

    /// Attach a native key for cross-system deduplication.
    pub fn with_native_key(mut self, key: impl Into<String>) -> Self {
        self.native_key = Some(key.into());
        self
    }

    /// Kind discriminator, derived from the payload.
    pub fn kind(&self) -> NodeKind {
        self.body.kind()
    }
}
