//! Core entity types for the directed-edge connectivity structure.

use glam::Vec3;

/// Index of a vertex in the mesh's position buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub u32);

/// Index into the flat half-edge array. `e`'s triangle is `e.0 / 3`; the two
/// other half-edges of that triangle sit at `next(e)` and `prev(e)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HalfEdgeId(pub u32);

/// Index of a triangle. `FaceId(f)` occupies half-edge slots `3f, 3f+1, 3f+2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FaceId(pub u32);

impl VertexId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl FaceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl HalfEdgeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The triangle this half-edge belongs to.
    pub fn face(self) -> FaceId {
        FaceId(self.0 / 3)
    }

    /// The next half-edge around the same triangle, in winding order.
    pub fn next(self) -> HalfEdgeId {
        let face_start = (self.0 / 3) * 3;
        HalfEdgeId(face_start + (self.0 + 1) % 3)
    }

    /// The previous half-edge around the same triangle, in winding order.
    pub fn prev(self) -> HalfEdgeId {
        let face_start = (self.0 / 3) * 3;
        HalfEdgeId(face_start + (self.0 + 2) % 3)
    }
}

/// A vertex's position in the connectivity graph.
///
/// Replaces the original C++ negative-id encoding (non-negative = interior
/// ordinal, negative = `-(boundary table index) - 1`, a sentinel = deleted)
/// with an explicit tagged union, per spec.md's own design notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexStatus {
    /// Fully surrounded by triangles; its one-ring closes via `next(opposite(·))`.
    Interior,
    /// On a mesh boundary. The payload indexes the boundary-emanating table,
    /// since a boundary vertex's emanating half-edges can't be recovered by
    /// walking twins alone.
    Boundary(usize),
    /// Removed by a collapse. Never a valid source/target of a live half-edge.
    Deleted,
}

/// One directed edge. `target` is the vertex this half-edge points at;
/// `opposite` is its twin on the adjacent triangle, or `None` on a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfEdge {
    pub target: VertexId,
    pub opposite: Option<HalfEdgeId>,
}

/// Per-vertex bookkeeping: classification plus one live emanating half-edge
/// to seed one-ring walks from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexRecord {
    pub status: VertexStatus,
    pub edge: HalfEdgeId,
}

/// Positions are immutable for the lifetime of a `HalfEdgeMesh` (spec.md §5):
/// collapses only retarget connectivity, never move a surviving vertex.
pub(crate) type Position = Vec3;
