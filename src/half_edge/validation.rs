//! Ambient invariant checker (spec.md §3's six invariants).
//!
//! Not called from any mutator, since that would defeat the point of O(1)
//! tombstone removal, but available to tests and to callers that want an
//! assert-style sanity check, the same way `painting`'s own
//! `half_edge::validation::validate` is an opt-in call rather than something
//! wired into every mutation.

use crate::error::MeshError;

use super::types::VertexStatus;
use super::{HalfEdgeId, HalfEdgeMesh};

impl HalfEdgeMesh {
    pub fn debug_validate(&self) -> Result<(), MeshError> {
        if self.edges.len() % 3 != 0 {
            return Err(MeshError::InvariantViolation(
                "half-edge count is not a multiple of 3".to_string(),
            ));
        }

        for face in 0..self.removed_faces.len() {
            if self.removed_faces[face] {
                continue;
            }
            for k in 0..3u32 {
                let e = HalfEdgeId(face as u32 * 3 + k);
                if let Some(o) = self.opposite(e) {
                    if self.opposite(o) != Some(e) {
                        return Err(MeshError::InvariantViolation(format!(
                            "half-edge {e:?} and its opposite {o:?} are not mutual twins"
                        )));
                    }
                    if self.target(e) != self.source(o) || self.target(o) != self.source(e) {
                        return Err(MeshError::InvariantViolation(format!(
                            "half-edge {e:?}/{o:?} twin endpoints disagree"
                        )));
                    }
                    if self.is_face_removed(o.face()) {
                        return Err(MeshError::InvariantViolation(format!(
                            "live half-edge {e:?} points at a removed face via opposite {o:?}"
                        )));
                    }
                }
            }
        }

        let mut seen = std::collections::HashSet::new();
        for face in 0..self.removed_faces.len() {
            if self.removed_faces[face] {
                continue;
            }
            for k in 0..3u32 {
                let e = HalfEdgeId(face as u32 * 3 + k);
                let key = (self.source(e), self.target(e));
                if !seen.insert(key) {
                    return Err(MeshError::InvariantViolation(format!(
                        "directed edge ({:?}, {:?}) is not unique among live half-edges",
                        key.0, key.1
                    )));
                }
            }
        }

        for v in 0..self.vertices.len() {
            let status = self.vertices[v].status;
            match status {
                VertexStatus::Interior => {
                    let emanating = self.emanating(super::VertexId(v as u32));
                    for &e in &emanating {
                        if self.opposite(e).is_none() {
                            return Err(MeshError::InvariantViolation(format!(
                                "interior vertex {v} has a boundary half-edge {e:?} in its one-ring"
                            )));
                        }
                    }
                }
                VertexStatus::Boundary(idx) => {
                    for &e in &self.boundary_emanating[idx] {
                        if self.is_face_removed(e.face()) {
                            return Err(MeshError::InvariantViolation(format!(
                                "boundary table entry {e:?} for vertex {v} points at a removed face"
                            )));
                        }
                        if self.source(e).index() != v {
                            return Err(MeshError::InvariantViolation(format!(
                                "boundary table entry {e:?} does not emanate from vertex {v}"
                            )));
                        }
                    }
                }
                VertexStatus::Deleted => {}
            }
        }

        Ok(())
    }
}
