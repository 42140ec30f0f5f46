//! Tunable constants for the decimation engine.
//!
//! No config file or environment variable reads anything here back. The
//! core has no I/O contract (see spec §6), so tuning happens at compile
//! time, the same way `painting::constants` exposes brush/canvas tunables.

/// Scale applied to `length * curvature` before flooring to an integer
/// edge-collapse cost (§4.3). Large enough that two collapses which differ
/// by a sub-millimeter length at typical mesh scale still land in distinct
/// cost buckets.
pub const COST_SCALE: f64 = 1e8;

/// A vertex opposite a collapsed edge must retain at least this many
/// neighbours after the collapse (§4.4, rule 3: valence strictly greater
/// than 3).
pub const MIN_VALENCE_AFTER_COLLAPSE: u32 = 3;
