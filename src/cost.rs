//! Edge-collapse cost metric (spec.md §4.3).
//!
//! Follows the Melax polygon-reduction formulation used by
//! `ReducibleDirectedEdgeMesh::computeCost` in the original source:
//! `cost = edge_length * curvature`, where curvature measures how much the
//! faces around the collapsing edge would bend. The result is floored and
//! cast to `u32` rather than kept as a float, so that the collapse candidate
//! queue orders deterministically across architectures (spec.md §4.3).

use crate::constants::COST_SCALE;
use crate::half_edge::{HalfEdgeId, HalfEdgeMesh};

/// Computes the collapse cost of half-edge `e`, from its source vertex's
/// incident faces and the faces shared with its target.
pub fn collapse_cost(mesh: &HalfEdgeMesh, e: HalfEdgeId) -> u32 {
    let vi = mesh.source(e);
    let vj = mesh.target(e);

    let p0 = mesh.position(vi);
    let p1 = mesh.position(vj);
    let length = (p1 - p0).length() as f64;

    let faces_vi = mesh.adjacent_faces(vi);
    let faces_vj = mesh.adjacent_faces(vj);
    let shared_faces: Vec<_> = faces_vi
        .iter()
        .filter(|f| faces_vj.contains(f))
        .copied()
        .collect();

    let mut curvature = 0.0f64;
    for &f in &faces_vi {
        let normal_f = mesh.face_normal(f);
        let mut min_curvature_here = 1.0f64;
        for &g in &shared_faces {
            let normal_g = mesh.face_normal(g);
            let facing = normal_f.dot(normal_g) as f64;
            min_curvature_here = min_curvature_here.min((1.0 - facing) / 2.0);
        }
        curvature = curvature.max(min_curvature_here);
    }

    let scaled = length * curvature * COST_SCALE;
    if scaled <= 0.0 {
        0
    } else {
        scaled.floor() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn coplanar_collapse_has_zero_curvature_cost() {
        // A flat quad made of two coplanar triangles: collapsing the shared
        // diagonal should cost zero, since curvature is zero everywhere.
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];
        let mesh = HalfEdgeMesh::new(&positions, &indices).unwrap();

        for slot in 0..mesh.half_edge_count() {
            let e = HalfEdgeId(slot as u32);
            assert_eq!(collapse_cost(&mesh, e), 0);
        }
    }
}
