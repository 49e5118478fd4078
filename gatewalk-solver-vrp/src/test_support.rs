//! Test-only utilities for `gatewalk-solver-vrp`.
//!
//! Gated behind the `test-support` feature (and `cfg(test)`).

use std::time::Duration;

use crate::{VrpBackend, VrpBackendConfig};

/// A backend tuned for tests: one-second budget and few generations.
///
/// # Examples
/// ```rust
/// use gatewalk_solver_vrp::test_support::quick_backend;
///
/// assert_eq!(quick_backend().config().max_generations, Some(40));
/// ```
#[must_use]
pub const fn quick_backend() -> VrpBackend {
    VrpBackend::with_config(VrpBackendConfig {
        time_limit: Duration::from_secs(1),
        max_generations: Some(40),
    })
}

/// Four stops that form a convex pentagon with an origin start.
///
/// The shortest closed tour follows the hull, so the only optimal orders are
/// `[0, 1, 2, 3]` and its reverse.
#[must_use]
pub fn ring_points() -> Vec<(f64, f64)> {
    vec![(2.0, 0.0), (3.0, 2.0), (1.0, 3.0), (-1.0, 1.0)]
}

/// Whether `order` walks [`ring_points`] around the hull in either direction.
#[must_use]
pub fn is_ring_order(order: &[usize]) -> bool {
    order == [0, 1, 2, 3] || order == [3, 2, 1, 0]
}

/// Two stops flanking the start and one far stop straight ahead.
///
/// A closed tour pays the return leg, so it visits the far stop between the
/// flanking pair: `[0, 2, 1]` or `[1, 2, 0]`. An open path would instead
/// finish at the far stop with `[0, 1, 2]` or `[1, 0, 2]`.
#[must_use]
pub fn detour_points() -> Vec<(f64, f64)> {
    vec![(1.0, 0.0), (-1.0, 0.0), (0.0, 10.0)]
}

/// Whether `order` is a shortest closed tour over [`detour_points`].
#[must_use]
pub fn is_closed_detour_order(order: &[usize]) -> bool {
    order == [0, 2, 1] || order == [1, 2, 0]
}
