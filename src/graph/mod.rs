//! Core graph data structures

mod edge;
mod node;
mod store;


pub use edge::{Edge, EdgeId, EdgeKind, EdgeRef, Properties};
pub use node::{Node, NodeBody, NodeKind, NodeRef, Point3, COORD_TOLERANCE};
pub use store::{ModelMetadata, ModelStore, StoreError, StoreResult};
