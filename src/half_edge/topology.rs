//! Read-only neighbourhood queries (spec.md §4.2).
//!
//! Every query here returns an owned `Vec`, a read-only snapshot invalidated
//! by the next `collapse` call. There is no iterator borrowing `&self`
//! across a mutation, matching spec.md §5's ownership model.

use glam::Vec3;

use super::types::{FaceId, VertexId, VertexStatus};
use super::{HalfEdgeId, HalfEdgeMesh};

impl HalfEdgeMesh {
    /// Number of half-edge slots, live or tombstoned (always `3 * face_count_total`).
    pub fn half_edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of vertices ever allocated, including those a collapse later
    /// marked `Deleted`. Used internally to size remap tables; live vertex
    /// count is [`HalfEdgeMesh::vertex_count`].
    pub(crate) fn vertex_buffer_len(&self) -> usize {
        self.positions.len()
    }

    pub fn position(&self, v: VertexId) -> Vec3 {
        self.positions[v.index()]
    }

    pub fn target(&self, e: HalfEdgeId) -> VertexId {
        self.edges[e.index()].target
    }

    /// The vertex this half-edge emanates from: `target(prev(e))` under this
    /// crate's "store target" convention (see `construction.rs`).
    pub fn source(&self, e: HalfEdgeId) -> VertexId {
        self.target(e.prev())
    }

    pub fn opposite(&self, e: HalfEdgeId) -> Option<HalfEdgeId> {
        self.edges[e.index()].opposite
    }

    pub fn is_face_removed(&self, f: FaceId) -> bool {
        self.removed_faces[f.index()]
    }

    pub fn is_boundary_vertex(&self, v: VertexId) -> bool {
        matches!(self.vertices[v.index()].status, VertexStatus::Boundary(_))
    }

    /// Number of vertices not yet removed by a collapse.
    pub fn vertex_count(&self) -> usize {
        self.vertices
            .iter()
            .filter(|v| !matches!(v.status, VertexStatus::Deleted))
            .count()
    }

    /// Number of triangles not yet removed by a collapse.
    pub fn face_count(&self) -> usize {
        self.removed_faces.iter().filter(|removed| !**removed).count()
    }

    /// All half-edges emanating from `v` (i.e. with `source(e) == v`).
    ///
    /// Interior vertices are walked via `next(opposite(·))` until the walk
    /// returns to its start; boundary vertices are answered directly from the
    /// boundary-emanating table, since their one-ring doesn't close.
    pub fn emanating(&self, v: VertexId) -> Vec<HalfEdgeId> {
        match self.vertices[v.index()].status {
            VertexStatus::Boundary(idx) => self.boundary_emanating[idx].clone(),
            VertexStatus::Interior => {
                let start = self.vertices[v.index()].edge;
                let mut result = vec![start];
                let mut cur = start;
                loop {
                    let opp = match self.opposite(cur) {
                        Some(o) => o,
                        None => {
                            tracing::warn!(vertex = v.0, "interior vertex hit a boundary half-edge during one-ring walk");
                            break;
                        }
                    };
                    cur = opp.next();
                    if cur == start {
                        break;
                    }
                    result.push(cur);
                }
                result
            }
            VertexStatus::Deleted => Vec::new(),
        }
    }

    /// The set of vertices adjacent to `v` (spec.md §4.2).
    pub fn neighbours(&self, v: VertexId) -> Vec<VertexId> {
        match self.vertices[v.index()].status {
            VertexStatus::Interior => self.emanating(v).iter().map(|&e| self.target(e)).collect(),
            VertexStatus::Boundary(_) => {
                let mut result = Vec::new();
                for e in self.emanating(v) {
                    let a = self.target(e);
                    let b = self.target(e.next());
                    if !result.contains(&a) {
                        result.push(a);
                    }
                    if !result.contains(&b) {
                        result.push(b);
                    }
                }
                result
            }
            VertexStatus::Deleted => Vec::new(),
        }
    }

    /// Faces touching `v`.
    pub fn adjacent_faces(&self, v: VertexId) -> Vec<FaceId> {
        self.emanating(v).iter().map(|e| e.face()).collect()
    }

    pub fn valence(&self, v: VertexId) -> u32 {
        self.neighbours(v).len() as u32
    }

    /// Whether `face` has `vertex` as one of its three corners. Ambient
    /// supplement grounded on `DirectedEdgeMesh::doesVertexBelongToFace`.
    pub fn face_contains_vertex(&self, face: FaceId, vertex: VertexId) -> bool {
        (0..3).any(|k| self.target(HalfEdgeId(face.0 * 3 + k)) == vertex)
    }

    pub fn face_normal(&self, f: FaceId) -> Vec3 {
        let e0 = HalfEdgeId(f.0 * 3);
        let p0 = self.position(self.source(e0));
        let p1 = self.position(self.target(e0));
        let p2 = self.position(self.target(e0.next()));
        (p1 - p0).cross(p2 - p0).normalize_or_zero()
    }

    /// Average of the (live) adjacent face normals.
    pub fn vertex_normal(&self, v: VertexId) -> Vec3 {
        let mut sum = Vec3::ZERO;
        let mut count = 0u32;
        for f in self.adjacent_faces(v) {
            if self.is_face_removed(f) {
                continue;
            }
            sum += self.face_normal(f);
            count += 1;
        }
        if count == 0 {
            Vec3::ZERO
        } else {
            (sum / count as f32).normalize_or_zero()
        }
    }

    /// Number of undirected edges currently live: paired half-edges counted
    /// once, boundary half-edges counted once. Ambient supplement grounded
    /// on `painting::half_edge::topology::edge_count`.
    pub fn edge_count(&self) -> usize {
        let mut paired = 0usize;
        let mut boundary = 0usize;
        for face in 0..self.removed_faces.len() {
            if self.removed_faces[face] {
                continue;
            }
            for k in 0..3u32 {
                let e = HalfEdgeId(face as u32 * 3 + k);
                match self.opposite(e) {
                    Some(_) => paired += 1,
                    None => boundary += 1,
                }
            }
        }
        paired / 2 + boundary
    }

    /// Currently live boundary half-edges. Ambient supplement used to test
    /// the "boundary preservation" property of spec.md §8.
    pub fn boundary_edge_ids(&self) -> Vec<HalfEdgeId> {
        (0..self.edges.len())
            .filter(|&i| !self.removed_faces[i / 3] && self.edges[i].opposite.is_none())
            .map(|i| HalfEdgeId(i as u32))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_patch() -> HalfEdgeMesh {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];
        HalfEdgeMesh::new(&positions, &indices).unwrap()
    }

    #[test]
    fn square_patch_boundary_vertex_has_two_neighbours() {
        let mesh = square_patch();
        // Vertex 1 only touches the (0,1,2) triangle, so its one-ring is {0, 2}.
        let neighbours = mesh.neighbours(VertexId(1));
        assert_eq!(neighbours.len(), 2);
        assert!(neighbours.contains(&VertexId(0)));
        assert!(neighbours.contains(&VertexId(2)));
    }

    #[test]
    fn square_patch_diagonal_vertices_see_three_neighbours() {
        let mesh = square_patch();
        // Vertex 0 and vertex 2 sit on the shared diagonal and touch both triangles.
        assert_eq!(mesh.valence(VertexId(0)), 3);
        assert_eq!(mesh.valence(VertexId(2)), 3);
    }

    #[test]
    fn face_contains_vertex_matches_the_triangle() {
        let mesh = square_patch();
        assert!(mesh.face_contains_vertex(FaceId(0), VertexId(0)));
        assert!(mesh.face_contains_vertex(FaceId(0), VertexId(1)));
        assert!(mesh.face_contains_vertex(FaceId(0), VertexId(2)));
        assert!(!mesh.face_contains_vertex(FaceId(0), VertexId(3)));
    }

    #[test]
    fn edge_count_matches_hand_count() {
        let mesh = square_patch();
        // 4 boundary edges + 1 shared diagonal = 5 undirected edges.
        assert_eq!(mesh.edge_count(), 5);
        assert_eq!(mesh.boundary_edge_ids().len(), 4);
    }

    #[test]
    fn face_normal_points_along_positive_z() {
        let mesh = square_patch();
        let normal = mesh.face_normal(FaceId(0));
        assert!(normal.z > 0.9);
    }
}
