//! One-shot construction from a vertex/index buffer (spec.md §4.1).

use std::collections::HashMap;

use glam::Vec3;

use crate::error::MeshError;

use super::types::{HalfEdge, VertexId, VertexRecord, VertexStatus};
use super::HalfEdgeMesh;
use super::HalfEdgeId;

impl HalfEdgeMesh {
    /// Builds the connectivity structure from a triangle soup.
    ///
    /// `indices` is read in slot order: slot `s` holds `target = indices[next(s)]`
    /// (the "store target" convention spec.md §4.1 allows as an alternative to
    /// the original's "store source" field; this crate uses `target`
    /// throughout, translating every original `vertexIdx` reference as
    /// `target(prev(e))`).
    ///
    /// Twin linking runs through a temporary `(source, target) -> half-edge`
    /// map; a duplicate key means two triangles share the same directed edge,
    /// which is non-manifold input and a hard construction error. Boundary
    /// vertices (those touching at least one half-edge with no twin) are then
    /// found by a dedicated O(E) sweep per boundary vertex, matching
    /// `DirectedEdgeMesh::findEmanatingEdges` in the original source.
    pub fn new(positions: &[Vec3], indices: &[u32]) -> Result<Self, MeshError> {
        if positions.is_empty() || indices.is_empty() {
            return Err(MeshError::MalformedInput(
                "positions and indices must be non-empty".to_string(),
            ));
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::MalformedInput(
                "index count must be a multiple of 3".to_string(),
            ));
        }
        for &i in indices {
            if i as usize >= positions.len() {
                return Err(MeshError::MalformedInput(format!(
                    "index {i} out of range for {} positions",
                    positions.len()
                )));
            }
        }

        let mut edges = Vec::with_capacity(indices.len());
        for triangle in indices.chunks_exact(3) {
            edges.push(HalfEdge {
                target: VertexId(triangle[1]),
                opposite: None,
            });
            edges.push(HalfEdge {
                target: VertexId(triangle[2]),
                opposite: None,
            });
            edges.push(HalfEdge {
                target: VertexId(triangle[0]),
                opposite: None,
            });
        }

        let mut directed: HashMap<(u32, u32), u32> = HashMap::with_capacity(indices.len());
        for slot in 0..indices.len() {
            let source = indices[slot];
            let target = indices[next_slot(slot)];
            if directed.insert((source, target), slot as u32).is_some() {
                return Err(MeshError::NonManifoldInput {
                    from: source,
                    to: target,
                });
            }
        }
        for slot in 0..indices.len() {
            let source = indices[slot];
            let target = indices[next_slot(slot)];
            if let Some(&twin) = directed.get(&(target, source)) {
                edges[slot].opposite = Some(HalfEdgeId(twin));
            }
        }

        let mut vertices = vec![
            VertexRecord {
                status: VertexStatus::Interior,
                edge: HalfEdgeId(0),
            };
            positions.len()
        ];
        // Last slot with a given source wins, matching the original's
        // unconditional per-iteration overwrite.
        for slot in 0..indices.len() {
            vertices[indices[slot] as usize].edge = HalfEdgeId(slot as u32);
        }

        let mut mesh = HalfEdgeMesh {
            positions: positions.to_vec(),
            edges,
            vertices,
            boundary_emanating: Vec::new(),
            removed_faces: vec![false; indices.len() / 3],
        };

        let mut boundary_vertex_count = 0;
        for slot in 0..mesh.edges.len() {
            if mesh.edges[slot].opposite.is_some() {
                continue;
            }
            let v = VertexId(indices[slot]);
            if matches!(mesh.vertices[v.index()].status, VertexStatus::Boundary(_)) {
                continue;
            }
            let emanating = mesh.find_emanating_brute_force(v, indices);
            let table_idx = mesh.boundary_emanating.len();
            let head = emanating[0];
            mesh.boundary_emanating.push(emanating);
            mesh.vertices[v.index()].status = VertexStatus::Boundary(table_idx);
            mesh.vertices[v.index()].edge = head;
            boundary_vertex_count += 1;
        }

        tracing::debug!(
            vertices = mesh.positions.len(),
            faces = mesh.removed_faces.len(),
            boundary_vertices = boundary_vertex_count,
            "half-edge mesh constructed"
        );

        Ok(mesh)
    }

    /// O(E) sweep for every half-edge whose source is `v`, skipping ahead to
    /// the next triangle as soon as one is found (a triangle can only
    /// contribute one half-edge emanating from a given vertex). Used only at
    /// construction time, before the boundary table exists to answer this
    /// question any other way.
    fn find_emanating_brute_force(&self, v: VertexId, indices: &[u32]) -> Vec<HalfEdgeId> {
        let mut result = Vec::new();
        let mut slot = 0usize;
        while slot < indices.len() {
            if indices[slot] == v.0 {
                result.push(HalfEdgeId(slot as u32));
                slot = ((slot + 3) / 3) * 3;
            } else {
                slot += 1;
            }
        }
        result
    }
}

fn next_slot(slot: usize) -> usize {
    let face_start = (slot / 3) * 3;
    face_start + (slot + 1) % 3
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::half_edge::VertexStatus;

    fn square_positions() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn square_patch_has_four_boundary_vertices() {
        let positions = square_positions();
        let indices = vec![0, 1, 2, 0, 2, 3];
        let mesh = HalfEdgeMesh::new(&positions, &indices).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
        for v in 0..4 {
            assert!(
                matches!(mesh.vertices[v].status, VertexStatus::Boundary(_)),
                "vertex {v} should be a boundary vertex"
            );
        }
    }

    #[test]
    fn duplicate_directed_edge_is_non_manifold() {
        let positions = square_positions();
        // Two triangles both winding 0,1,2: the directed edge (0,1) appears twice.
        let indices = vec![0, 1, 2, 0, 1, 3];
        let err = HalfEdgeMesh::new(&positions, &indices).unwrap_err();
        assert!(matches!(err, MeshError::NonManifoldInput { .. }));
    }

    #[test]
    fn tetrahedron_has_no_boundary() {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let indices = vec![0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3];
        let mesh = HalfEdgeMesh::new(&positions, &indices).unwrap();

        for v in 0..4 {
            assert_eq!(mesh.vertices[v].status, VertexStatus::Interior);
            assert_eq!(mesh.valence(VertexId(v as u32)), 3);
        }
        assert!(mesh.debug_validate().is_ok());
    }

    #[test]
    fn rejects_index_count_not_divisible_by_three() {
        let positions = square_positions();
        let err = HalfEdgeMesh::new(&positions, &[0, 1, 2, 3]).unwrap_err();
        assert!(matches!(err, MeshError::MalformedInput(_)));
    }
}
