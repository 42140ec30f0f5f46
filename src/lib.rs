//! Progressive triangle-mesh decimation over a directed-edge (half-edge)
//! connectivity structure.
//!
//! Build a [`HalfEdgeMesh`] once from a vertex/index buffer, then either
//! drive it directly with [`HalfEdgeMesh::collapse`] or wrap it in a
//! [`Decimator`] to let [`Decimator::reduce`] pick collapses greedily by
//! cost. Neither type touches a file, socket, or environment variable;
//! loading meshes and rendering reduced ones are the embedding
//! application's job.

pub mod constants;
pub mod cost;
pub mod error;
pub mod half_edge;
pub mod reduce;

pub use cost::collapse_cost;
pub use error::MeshError;
pub use half_edge::{CollapseOutcome, FaceId, HalfEdge, HalfEdgeId, HalfEdgeMesh, VertexId, VertexRecord, VertexStatus};
pub use reduce::{Decimator, ReducedMesh};
