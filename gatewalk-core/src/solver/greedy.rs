//! Deterministic nearest-neighbour sequencing.

use crate::DistanceMatrix;

use super::{BackendError, RouteOrder, SequenceSolverBackend};

/// Greedy nearest-neighbour backend.
///
/// Starting from node `0`, repeatedly moves to the cheapest unvisited node.
/// Ties go to the lower input index. Runs in `O(N^2)` and never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedySolver;

impl GreedySolver {
    /// Order every POI node of `costs`.
    #[must_use]
    pub fn order(&self, costs: &DistanceMatrix) -> RouteOrder {
        let poi_count = costs.poi_count();
        let mut visited = vec![false; poi_count];
        let mut indices = Vec::with_capacity(poi_count);
        let mut current = 0_usize;

        while indices.len() < poi_count {
            let mut best: Option<(usize, f64)> = None;
            for (idx, done) in visited.iter().enumerate() {
                if *done {
                    continue;
                }
                let cost = costs.get(current, idx + 1).unwrap_or(f64::INFINITY);
                if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                    best = Some((idx, cost));
                }
            }
            let Some((next, _)) = best else { break };
            if let Some(flag) = visited.get_mut(next) {
                *flag = true;
            }
            indices.push(next);
            current = next + 1;
        }

        // Every unvisited index is pushed exactly once above.
        RouteOrder::from_unchecked(indices)
    }
}

impl SequenceSolverBackend for GreedySolver {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn solve(&self, costs: &DistanceMatrix) -> Result<RouteOrder, BackendError> {
        Ok(self.order(costs))
    }
}
