//! Cost-ordered greedy reduction driver (spec.md §4.6, §4.7).

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::cost::collapse_cost;
use crate::half_edge::{HalfEdgeId, HalfEdgeMesh, VertexId};

/// A pending collapse candidate, ordered by `(cost, half_edge_index)`.
///
/// The half-edge-index tiebreak is load-bearing, not cosmetic (spec.md §4.6,
/// §9): without it, two candidates of equal cost would compare equal and a
/// `BTreeSet` would silently drop one, corrupting "remove this exact
/// candidate" lookups in [`Decimator::reevaluate`]. It also makes `reduce()`
/// deterministic across runs on identical input, mirroring
/// `EdgeCollapseCandidate::Compare` in
/// `original_source/source/app/ReducibleDirectedEdgeMesh.h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CollapseCandidate {
    cost: u32,
    edge: HalfEdgeId,
}

impl Ord for CollapseCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost.cmp(&other.cost).then_with(|| self.edge.0.cmp(&other.edge.0))
    }
}

impl PartialOrd for CollapseCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Drives greedy, cost-ordered collapses over a [`HalfEdgeMesh`] until no
/// legal collapse remains.
#[derive(Debug)]
pub struct Decimator {
    mesh: HalfEdgeMesh,
    costs: Vec<u32>,
    candidates: BTreeSet<CollapseCandidate>,
}

impl Decimator {
    /// Builds a fresh candidate queue by scoring every half-edge that is
    /// currently a valid collapse candidate.
    pub fn new(mesh: HalfEdgeMesh) -> Self {
        let half_edge_count = mesh.half_edge_count();
        let mut costs = vec![0u32; half_edge_count];
        let mut candidates = BTreeSet::new();

        for slot in 0..half_edge_count {
            let e = HalfEdgeId(slot as u32);
            if mesh.is_valid_collapse_candidate(e) {
                let cost = collapse_cost(&mesh, e);
                costs[slot] = cost;
                candidates.insert(CollapseCandidate { cost, edge: e });
            }
        }

        tracing::debug!(candidates = candidates.len(), "decimator initialised");

        Self {
            mesh,
            costs,
            candidates,
        }
    }

    pub fn mesh(&self) -> &HalfEdgeMesh {
        &self.mesh
    }

    /// Whether no legal collapse remains. Once true, it stays true: nothing
    /// grows the candidate set back.
    pub fn reached_max_reduction(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Pops and applies the cheapest legal collapse, returning the collapsed
    /// half-edge, or `None` once the mesh is maximally reduced.
    ///
    /// A popped candidate may be stale (its neighbourhood changed since it
    /// was queued without a requeue, e.g. a vertex that dropped below the
    /// valence floor); those are discarded and the next-cheapest is tried.
    /// Whether the inner loop ever found a *valid* candidate is tracked
    /// explicitly rather than inferred from the set being empty afterwards,
    /// since the original's `reduce()` checks `m_sortedEdgeCollapseCandidates.size()
    /// == 0` after the loop to decide whether to return `-1`, which runs
    /// into trouble if the very last candidate popped both validates *and*
    /// empties the set on the same iteration (spec.md §9's flagged bug).
    pub fn reduce(&mut self) -> Option<HalfEdgeId> {
        if self.reached_max_reduction() {
            tracing::warn!("reduce() called after the mesh was already maximally reduced");
            return None;
        }

        let mut found = None;
        while let Some(candidate) = self.candidates.pop_first() {
            if self.mesh.is_valid_collapse_candidate(candidate.edge) {
                found = Some(candidate);
                break;
            }
        }

        let candidate = found?;

        let vi = self.mesh.source(candidate.edge);
        let mut affected_sources: Vec<VertexId> = self.mesh.neighbours(vi);
        affected_sources.push(vi);

        let mut affected = Vec::new();
        for v in affected_sources {
            affected.extend(self.mesh.emanating(v));
        }

        let outcome = self
            .mesh
            .collapse(candidate.edge)
            .expect("candidate was validated immediately before this call");

        for h in affected {
            self.reevaluate(h);
            if let Some(o) = self.mesh.opposite(h) {
                self.reevaluate(o);
            }
        }

        if self.reached_max_reduction() {
            tracing::debug!("reduce: no collapse candidates remain");
        }

        Some(outcome.half_edge)
    }

    /// Removes `e`'s stale candidate entry (if any) and, unless it now sits
    /// in a removed face or is no longer a valid collapse, recomputes its
    /// cost and reinserts it.
    fn reevaluate(&mut self, e: HalfEdgeId) {
        let idx = e.index();
        let old_cost = self.costs[idx];
        self.candidates.remove(&CollapseCandidate { cost: old_cost, edge: e });

        if self.mesh.is_face_removed(e.face()) || !self.mesh.is_valid_collapse_candidate(e) {
            return;
        }

        let cost = collapse_cost(&self.mesh, e);
        self.costs[idx] = cost;
        self.candidates.insert(CollapseCandidate { cost, edge: e });
    }

    /// Extracts the currently-reduced mesh (spec.md §4.7): sweeps half-edges
    /// in index order, skipping removed faces, remapping each original
    /// vertex to a dense index on first sight and recomputing its normal
    /// then.
    pub fn reduced_submesh(&self) -> ReducedMesh {
        let mesh = &self.mesh;
        let mut remap: Vec<Option<u32>> = vec![None; mesh.vertex_buffer_len()];
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut indices = Vec::new();

        for slot in 0..mesh.half_edge_count() {
            let e = HalfEdgeId(slot as u32);
            if mesh.is_face_removed(e.face()) {
                continue;
            }
            let v = mesh.source(e);
            let dense = match remap[v.index()] {
                Some(dense) => dense,
                None => {
                    let dense = positions.len() as u32;
                    positions.push(mesh.position(v));
                    normals.push(mesh.vertex_normal(v));
                    remap[v.index()] = Some(dense);
                    dense
                }
            };
            indices.push(dense);
        }

        ReducedMesh {
            positions,
            normals,
            indices,
        }
    }
}

/// The triangle mesh produced by [`Decimator::reduced_submesh`]: dense
/// position/normal buffers plus a remapped index buffer, ready to hand to a
/// renderer or to serialize for later replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReducedMesh {
    pub positions: Vec<glam::Vec3>,
    pub normals: Vec<glam::Vec3>,
    pub indices: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn tetrahedron() -> HalfEdgeMesh {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let indices = vec![0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3];
        HalfEdgeMesh::new(&positions, &indices).unwrap()
    }

    #[test]
    fn tetrahedron_is_immediately_exhausted() {
        let mesh = tetrahedron();
        let mut decimator = Decimator::new(mesh);
        assert!(decimator.reached_max_reduction());
        assert_eq!(decimator.reduce(), None);
    }

    fn octahedron_at(center: Vec3) -> (Vec<Vec3>, Vec<u32>) {
        let positions = vec![
            center + Vec3::new(1.0, 0.0, 0.0),
            center + Vec3::new(0.0, 1.0, 0.0),
            center + Vec3::new(-1.0, 0.0, 0.0),
            center + Vec3::new(0.0, -1.0, 0.0),
            center + Vec3::new(0.0, 0.0, 1.0),
            center + Vec3::new(0.0, 0.0, -1.0),
        ];
        let indices = vec![
            0, 1, 4, 1, 2, 4, 2, 3, 4, 3, 0, 4, // top cap
            1, 0, 5, 2, 1, 5, 3, 2, 5, 0, 3, 5, // bottom cap
        ];
        (positions, indices)
    }

    #[test]
    fn octahedron_reduces_exactly_once() {
        let (positions, indices) = octahedron_at(Vec3::ZERO);
        let mesh = HalfEdgeMesh::new(&positions, &indices).unwrap();
        let mut decimator = Decimator::new(mesh);

        assert!(decimator.reduce().is_some());
        assert!(decimator.reached_max_reduction());
        assert_eq!(decimator.reduce(), None);
    }

    #[test]
    fn tie_breaks_prefer_smaller_half_edge_index() {
        // Two congruent octahedra, far enough apart to share no geometry.
        // Every pair of corresponding edges has identical cost, so the first
        // collapse must come from whichever copy has the lower half-edge
        // indices, the first one appended.
        let (mut positions, mut indices) = octahedron_at(Vec3::ZERO);
        let (positions_b, indices_b) = octahedron_at(Vec3::new(100.0, 0.0, 0.0));
        let offset = positions.len() as u32;
        positions.extend(positions_b);
        indices.extend(indices_b.into_iter().map(|i| i + offset));

        let mesh = HalfEdgeMesh::new(&positions, &indices).unwrap();
        let mut decimator = Decimator::new(mesh);
        let collapsed = decimator.reduce().expect("at least one valid collapse");
        assert!(collapsed.index() < 24, "expected the first octahedron's half-edge to win the tie, got {collapsed:?}");
    }
}
