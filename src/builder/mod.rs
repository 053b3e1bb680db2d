//! Create-or-reuse factory operations over a [`ModelStore`]
//!
//! Every entry point follows the same sequence: validate the scalar
//! fields, construct a transient candidate, ask the identity resolver for
//! an equivalent stored node, insert the candidate only if nothing
//! matched, then resolve each supplied dependency the same way and wire
//! one dependency edge per dependency. Absent dependencies produce no
//! edge.

mod spec;

pub use spec::{
    ConnectionPointSpec, CrossSectionSpec, MaterialSpec, MemberSpec, PointSpec, SegmentSpec,
    StoreySpec,
};

use crate::graph::{
    Edge, EdgeKind, EdgeRef, ModelStore, Node, NodeBody, NodeRef, StoreError,
};
use crate::identity;
use thiserror::Error;
use tracing::debug;

/// Errors raised by builder operations
#[derive(Debug, Error)]
pub enum BuildError {
    /// A required scalar field was missing or blank. Caller error; the
    /// same input will fail the same way on retry.
    #[error("{operation}: required field `{field}` must not be empty")]
    Validation {
        operation: &'static str,
        field: &'static str,
    },

    /// A deeper layer rejected the operation (duplicate id, dangling
    /// reference). Wraps the original cause and names the operation.
    #[error("{operation} failed")]
    Construction {
        operation: &'static str,
        #[source]
        source: StoreError,
    },
}

/// Result type for builder operations
pub type BuildResult<T> = Result<T, BuildError>;

/// Orchestrates create-or-reuse construction of an exchange model.
///
/// The builder owns the store while the model is being built; call
/// [`into_store`](Self::into_store) once building is finished to hand the
/// frozen store to analysis or export.
#[derive(Debug)]
pub struct ModelBuilder {
    store: ModelStore,
}

impl ModelBuilder {
    /// Create a builder with an empty store.
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            store: ModelStore::new(model_name),
        }
    }

    /// Read access to the store being built.
    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// Finish building and hand over the store.
    pub fn into_store(self) -> ModelStore {
        self.store
    }

    /// Create or reuse a geometric point, deduplicated by spatial
    /// tolerance.
    pub fn add_point(&mut self, point: PointSpec) -> BuildResult<NodeRef> {
        const OP: &str = "add_point";
        require(OP, "id", &point.id)?;
        require(OP, "name", &point.name)?;

        let candidate = Node::new(point.id, point.name, NodeBody::Point(point.at));
        self.create_or_reuse(OP, candidate)
    }

    /// Create or reuse a material, deduplicated by native key.
    pub fn add_material(&mut self, material: MaterialSpec) -> BuildResult<NodeRef> {
        const OP: &str = "add_material";
        require(OP, "id", &material.id)?;
        require(OP, "name", &material.name)?;

        let mut candidate = Node::new(
            material.id,
            material.name,
            NodeBody::Material {
                grade: material.grade,
            },
        );
        candidate.native_key = material.native_key;
        self.create_or_reuse(OP, candidate)
    }

    /// Create or reuse a cross-section, deduplicated by native key.
    ///
    /// A supplied material is resolved against the store (or inserted)
    /// and linked with a has-material edge.
    pub fn add_cross_section(&mut self, section: CrossSectionSpec) -> BuildResult<NodeRef> {
        const OP: &str = "add_cross_section";
        require(OP, "id", &section.id)?;
        require(OP, "name", &section.name)?;

        let mut candidate = Node::new(
            section.id,
            section.name,
            NodeBody::CrossSection {
                profile: section.profile,
            },
        );
        candidate.native_key = section.native_key;
        let canonical = self.create_or_reuse(OP, candidate)?;

        if let Some(material) = section.material {
            let target = self.add_material(material)?;
            self.link(OP, canonical, target, EdgeKind::HasMaterial)?;
        }
        Ok(canonical)
    }

    /// Create or reuse a storey, deduplicated by native key.
    pub fn add_storey(&mut self, storey: StoreySpec) -> BuildResult<NodeRef> {
        const OP: &str = "add_storey";
        require(OP, "id", &storey.id)?;
        require(OP, "name", &storey.name)?;

        let mut candidate = Node::new(
            storey.id,
            storey.name,
            NodeBody::Storey {
                elevation: storey.elevation,
            },
        );
        candidate.native_key = storey.native_key;
        self.create_or_reuse(OP, candidate)
    }

    /// Create or reuse a connection point.
    ///
    /// The supplied geometry point is resolved first; the connection is
    /// then deduplicated against stored connections through their
    /// geometry (derived spatial policy) and linked with a has-geometry
    /// edge.
    pub fn add_connection_point(
        &mut self,
        connection: ConnectionPointSpec,
    ) -> BuildResult<NodeRef> {
        const OP: &str = "add_connection_point";
        require(OP, "id", &connection.id)?;
        require(OP, "name", &connection.name)?;

        let geometry = connection
            .geometry
            .map(|point| self.add_point(point))
            .transpose()?;

        let candidate = Node::new(
            connection.id,
            connection.name,
            NodeBody::ConnectionPoint { geometry },
        );
        let canonical = self.create_or_reuse(OP, candidate)?;

        if let Some(point) = geometry {
            self.link(OP, canonical, point, EdgeKind::HasGeometry)?;
        }
        Ok(canonical)
    }

    /// Create or reuse a curve segment, deduplicated by native key.
    ///
    /// Both endpoints are resolved through the spatial point lookup
    /// (inserting whichever is missing) before the segment is
    /// constructed, so its cached endpoint handles always point at
    /// canonical stored points. Begin and end edges are wired to the
    /// points.
    pub fn add_segment(&mut self, segment: SegmentSpec) -> BuildResult<NodeRef> {
        const OP: &str = "add_segment";
        require(OP, "id", &segment.id)?;
        require(OP, "name", &segment.name)?;

        let begin = self.add_point(segment.begin)?;
        let end = self.add_point(segment.end)?;

        let mut candidate = Node::new(
            segment.id,
            segment.name,
            NodeBody::Segment { begin, end },
        );
        candidate.native_key = segment.native_key;
        let canonical = self.create_or_reuse(OP, candidate)?;

        self.link(OP, canonical, begin, EdgeKind::BeginsAt)?;
        self.link(OP, canonical, end, EdgeKind::EndsAt)?;
        Ok(canonical)
    }

    /// Create or reuse a physical member, deduplicated by native key.
    ///
    /// Every supplied dependency is resolved through its own
    /// kind-appropriate lookup and linked from the canonical member:
    /// material, cross-section, storey, begin/end connection points and
    /// the ordered segments (whose has-segment edges carry an `index`
    /// property in caller order).
    pub fn add_member(&mut self, member: MemberSpec) -> BuildResult<NodeRef> {
        const OP: &str = "add_member";
        require(OP, "id", &member.id)?;
        require(OP, "name", &member.name)?;

        let mut candidate = Node::new(
            member.id,
            member.name,
            NodeBody::Member { role: member.role },
        );
        candidate.native_key = member.native_key;
        let canonical = self.create_or_reuse(OP, candidate)?;

        if let Some(material) = member.material {
            let target = self.add_material(material)?;
            self.link(OP, canonical, target, EdgeKind::HasMaterial)?;
        }
        if let Some(section) = member.cross_section {
            let target = self.add_cross_section(section)?;
            self.link(OP, canonical, target, EdgeKind::HasCrossSection)?;
        }
        if let Some(storey) = member.storey {
            let target = self.add_storey(storey)?;
            self.link(OP, canonical, target, EdgeKind::OnStorey)?;
        }
        if let Some(begin) = member.begin {
            let target = self.add_connection_point(begin)?;
            self.link(OP, canonical, target, EdgeKind::BeginsAt)?;
        }
        if let Some(end) = member.end {
            let target = self.add_connection_point(end)?;
            self.link(OP, canonical, target, EdgeKind::EndsAt)?;
        }
        for (index, segment) in member.segments.into_iter().enumerate() {
            let target = self.add_segment(segment)?;
            let edge = Edge::new(canonical, target, EdgeKind::HasSegment)
                .with_property("index", index.to_string());
            self.insert_edge(OP, edge)?;
        }
        Ok(canonical)
    }

    fn create_or_reuse(&mut self, operation: &'static str, candidate: Node) -> BuildResult<NodeRef> {
        if let Some(existing) = identity::resolve(&candidate, &self.store) {
            return Ok(existing);
        }
        debug!(operation, id = %candidate.id, kind = %candidate.kind(), "inserting new node");
        self.store
            .insert_node(candidate)
            .map_err(|source| BuildError::Construction { operation, source })
    }

    fn link(
        &mut self,
        operation: &'static str,
        source: NodeRef,
        target: NodeRef,
        kind: EdgeKind,
    ) -> BuildResult<EdgeRef> {
        self.insert_edge(operation, Edge::new(source, target, kind))
    }

    fn insert_edge(&mut self, operation: &'static str, edge: Edge) -> BuildResult<EdgeRef> {
        self.store
            .insert_edge(edge)
            .map_err(|source| BuildError::Construction { operation, source })
    }
}

fn require(operation: &'static str, field: &'static str, value: &str) -> BuildResult<()> {
    if value.trim().is_empty() {
        Err(BuildError::Validation { operation, field })
    } else {
        Ok(())
    }
}
