//! Unit tests for `VrpBackend`.

use std::time::Duration;

use gatewalk_core::test_support::planar_matrix;
use gatewalk_core::{DistanceMatrix, SequenceSolver, SequenceSolverBackend};
use rstest::{fixture, rstest};

use super::*;
use crate::test_support::{
    detour_points, is_closed_detour_order, is_ring_order, quick_backend, ring_points,
};

#[fixture]
fn backend() -> VrpBackend {
    quick_backend()
}

#[rstest]
fn default_config_uses_five_second_budget() {
    let config = VrpBackend::new().config().clone();
    assert_eq!(config.time_limit, Duration::from_secs(5));
    assert_eq!(config.max_generations, None);
}

#[rstest]
fn reports_vrp_name(backend: VrpBackend) {
    assert_eq!(backend.name(), "vrp");
}

#[rstest]
fn empty_matrix_returns_empty_order(backend: VrpBackend) {
    let costs = DistanceMatrix::from_rows(vec![vec![0.0]]).expect("start-only matrix is valid");
    let order = backend.solve(&costs).expect("empty problem solves");
    assert!(order.is_empty());
}

#[rstest]
fn visits_every_stop_exactly_once(backend: VrpBackend) {
    let costs = planar_matrix((0.0, 0.0), &[(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0)]);
    let order = backend.solve(&costs).expect("square tour solves");
    let mut seen = order.as_slice().to_vec();
    seen.sort_unstable();
    assert_eq!(seen, vec![0, 1, 2, 3]);
}

#[rstest]
fn ring_is_walked_around_the_hull(backend: VrpBackend) {
    let costs = planar_matrix((0.0, 0.0), &ring_points());
    let order = backend.solve(&costs).expect("ring tour solves");
    // The return leg counts, so both directions around the hull tie.
    assert!(
        is_ring_order(order.as_slice()),
        "unexpected order {:?}",
        order.as_slice()
    );
}

#[rstest]
fn far_stop_is_visited_between_the_flanking_stops(backend: VrpBackend) {
    let costs = planar_matrix((0.0, 0.0), &detour_points());
    let order = backend.solve(&costs).expect("detour tour solves");
    // Ending at the far stop would be shorter without the return leg.
    assert!(
        is_closed_detour_order(order.as_slice()),
        "unexpected order {:?}",
        order.as_slice()
    );
}

#[rstest]
fn sequence_solver_uses_vrp_backend_above_threshold(backend: VrpBackend) {
    let solver = SequenceSolver::with_heuristic(backend);
    let costs = planar_matrix((0.0, 0.0), &ring_points());
    let outcome = solver.solve_with_diagnostics(&costs);
    assert_eq!(outcome.diagnostics.backend, "vrp");
    assert!(!outcome.diagnostics.fell_back);
    assert_eq!(outcome.order.len(), 4);
}
