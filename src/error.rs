//! Crate-wide error type.

use crate::half_edge::HalfEdgeId;

/// Everything that can go wrong building or mutating a [`crate::HalfEdgeMesh`].
///
/// `NonManifoldInput` is fatal to construction. `InvalidCollapse` is a
/// programmer-error class: callers are expected to consult
/// [`crate::HalfEdgeMesh::is_valid_collapse_candidate`] (or go through
/// [`crate::Decimator::reduce`], which never hands out an invalid candidate)
/// before calling `collapse` directly. `Exhausted` is not represented here:
/// normal termination of the reduction driver is a plain `None`, not an error.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("malformed mesh input: {0}")]
    MalformedInput(String),

    #[error("non-manifold input: directed edge ({from}, {to}) appears twice")]
    NonManifoldInput { from: u32, to: u32 },

    #[error("half-edge {0:?} is not a valid collapse candidate")]
    InvalidCollapse(HalfEdgeId),

    #[error("half-edge index {0} out of range")]
    IndexOutOfRange(u32),

    #[error("connectivity invariant violated: {0}")]
    InvariantViolation(String),
}
