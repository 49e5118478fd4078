//! Tests for `SequenceSolver` and the greedy backend.

use super::*;
use rstest::rstest;

use crate::test_support::{FailingBackend, FixedOrderBackend, planar_matrix};

/// A(0,0), B(0,1), C(1,0) visited from S(-1,-1).
fn abc_matrix() -> DistanceMatrix {
    planar_matrix((-1.0, -1.0), &[(0.0, 0.0), (0.0, 1.0), (1.0, 0.0)])
}

#[rstest]
fn greedy_picks_nearest_unvisited_node() {
    let order = SequenceSolver::greedy_only().solve(&abc_matrix());
    assert_eq!(order.as_slice(), &[0, 1, 2]);
}

#[rstest]
fn greedy_breaks_ties_towards_lower_index() {
    let costs = planar_matrix((0.0, 0.0), &[(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0)]);
    let order = GreedySolver.order(&costs);
    assert_eq!(order.as_slice().first(), Some(&0));
}

#[rstest]
fn empty_matrix_yields_empty_order() {
    let costs = planar_matrix((0.0, 0.0), &[]);
    let outcome = SequenceSolver::with_heuristic(FailingBackend::default())
        .solve_with_diagnostics(&costs);
    assert!(outcome.order.is_empty());
    assert_eq!(outcome.diagnostics.backend, "greedy");
    assert!(!outcome.diagnostics.fell_back);
}

#[rstest]
fn failing_heuristic_falls_back_to_greedy() {
    let backend = FailingBackend::default();
    let solver = SequenceSolver::with_heuristic(backend.clone());
    let outcome = solver.solve_with_diagnostics(&abc_matrix());
    assert_eq!(backend.calls(), 1);
    assert_eq!(outcome.order.as_slice(), &[0, 1, 2]);
    assert_eq!(outcome.diagnostics.backend, "greedy");
    assert!(outcome.diagnostics.fell_back);
}

#[rstest]
#[case(vec![0, 0, 1])]
#[case(vec![0, 1])]
#[case(vec![0, 1, 5])]
fn invalid_heuristic_order_falls_back(#[case] indices: Vec<usize>) {
    let solver = SequenceSolver::with_heuristic(FixedOrderBackend::new(indices));
    let outcome = solver.solve_with_diagnostics(&abc_matrix());
    assert_eq!(outcome.order.as_slice(), &[0, 1, 2]);
    assert!(outcome.diagnostics.fell_back);
}

#[rstest]
fn valid_heuristic_order_is_used() {
    let solver = SequenceSolver::with_heuristic(FixedOrderBackend::new(vec![2, 0, 1]));
    let outcome = solver.solve_with_diagnostics(&abc_matrix());
    assert_eq!(outcome.order.as_slice(), &[2, 0, 1]);
    assert_eq!(outcome.diagnostics.backend, "fixed");
    assert!(!outcome.diagnostics.fell_back);
}

#[rstest]
#[case(1)]
#[case(2)]
fn heuristic_is_skipped_for_small_inputs(#[case] poi_count: usize) {
    let points: Vec<(f64, f64)> = [(1.0, 0.0), (2.0, 0.0)]
        .into_iter()
        .take(poi_count)
        .collect();
    let backend = FailingBackend::default();
    let solver = SequenceSolver::with_heuristic(backend.clone());
    let outcome = solver.solve_with_diagnostics(&planar_matrix((0.0, 0.0), &points));
    assert_eq!(backend.calls(), 0);
    assert_eq!(outcome.order.len(), poi_count);
    assert!(!outcome.diagnostics.fell_back);
}

#[rstest]
fn five_pois_without_heuristic_form_a_permutation() {
    let points = [(3.0, 1.0), (0.5, 0.5), (2.0, 2.0), (1.0, 3.0), (4.0, 0.0)];
    let costs = planar_matrix((0.0, 0.0), &points);
    let order = solve_sequence(&costs);
    let mut sorted = order.into_inner();
    sorted.sort_unstable();
    assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
}

#[rstest]
fn debug_names_the_heuristic() {
    let solver = SequenceSolver::with_heuristic(FailingBackend::default());
    assert!(format!("{solver:?}").contains("failing"));
    assert!(!SequenceSolver::default().has_heuristic());
}
