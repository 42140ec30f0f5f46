//! Directed-edge (half-edge) connectivity over a fixed position buffer.
//!
//! Layout follows spec.md §3: triangle `f` occupies half-edge slots
//! `3f, 3f+1, 3f+2`, so `next`/`prev` are pure arithmetic
//! ([`HalfEdgeId::next`]/[`HalfEdgeId::prev`]) and a collapsed face is
//! tombstoned in `removed_faces` rather than removed from the array, which
//! is what keeps half-edge indices stable across collapses.

mod collapse;
mod construction;
mod topology;
mod validation;
pub mod types;

pub use collapse::CollapseOutcome;
pub use types::{FaceId, HalfEdge, HalfEdgeId, VertexId, VertexRecord, VertexStatus};

use types::Position;

/// A triangle mesh's directed-edge connectivity, with edge-collapse mutation.
///
/// Construction builds the structure once from a vertex/index buffer;
/// afterwards the only mutation is [`HalfEdgeMesh::collapse`]. Every public
/// query and mutator restores invariants (1)-(6) of spec.md §3 before
/// returning; see [`HalfEdgeMesh::debug_validate`] for a checked assertion
/// of all six, used by this crate's own tests.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh {
    positions: Vec<Position>,
    edges: Vec<HalfEdge>,
    vertices: Vec<VertexRecord>,
    boundary_emanating: Vec<Vec<HalfEdgeId>>,
    removed_faces: Vec<bool>,
}
