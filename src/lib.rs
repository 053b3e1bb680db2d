//! Armature: typed exchange graph for structural engineering models
//!
//! An in-memory, strongly-typed directed graph describing an
//! interoperable structural-engineering data exchange model. Typed nodes
//! represent domain objects (points, members, materials, cross-sections,
//! storeys); typed directed edges represent named associations between
//! them, always oriented dependent → dependency.
//!
//! # Core Concepts
//!
//! - **Store**: an append-only, insertion-order-preserving arena of
//!   nodes and edges, addressed by handles
//! - **Identity resolution**: per-kind equality policies (native key,
//!   spatial tolerance, derived) deduplicate nodes at construction time
//! - **Builder**: create-or-reuse operations that validate inputs,
//!   resolve identity and wire dependency edges
//! - **Analysis**: deterministic dependency-first ordering and cycle
//!   detection over the finished store
//!
//! # Example
//!
//! ```
//! use armature::{DependencyAnalysis, MaterialSpec, MemberSpec, ModelBuilder};
//!
//! let mut builder = ModelBuilder::new("hall-a");
//! builder
//!     .add_member(
//!         MemberSpec::new("b1", "Beam 1")
//!             .with_material(MaterialSpec::new("m1", "S235").with_native_key("MAT-1")),
//!     )
//!     .unwrap();
//!
//! let store = builder.into_store();
//! let order = DependencyAnalysis::new(&store).compute_order();
//! assert_eq!(order.len(), 2);
//! ```

pub mod analysis;
pub mod builder;
mod graph;
pub mod identity;

pub use analysis::{DependencyAnalysis, OrderOutcome};
pub use builder::{
    BuildError, BuildResult, ConnectionPointSpec, CrossSectionSpec, MaterialSpec, MemberSpec,
    ModelBuilder, PointSpec, SegmentSpec, StoreySpec,
};
pub use graph::{
    Edge, EdgeId, EdgeKind, EdgeRef, ModelMetadata, ModelStore, Node, NodeBody, NodeKind, NodeRef,
    Point3, Properties, StoreError, StoreResult, COORD_TOLERANCE,
};
pub use identity::EqualityPolicy;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
