//! `VrpBackend` implementation backed by `vrp-core`.

use std::time::{Duration, Instant};

use gatewalk_core::{BackendError, DistanceMatrix, RouteOrder, SequenceSolverBackend};

use crate::vrp::solve_closed_tour;

/// Configuration for [`VrpBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VrpBackendConfig {
    /// Wall-clock budget for one search, in whole seconds (at least one).
    pub time_limit: Duration,
    /// Optional cap on `vrp-core` generations; small problems converge long
    /// before the time limit.
    pub max_generations: Option<usize>,
}

impl Default for VrpBackendConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(5),
            max_generations: None,
        }
    }
}

/// Time-bounded local-search backend using `vrp-core`.
///
/// # Examples
/// ```no_run
/// use gatewalk_core::SequenceSolver;
/// use gatewalk_solver_vrp::VrpBackend;
///
/// let solver = SequenceSolver::with_heuristic(VrpBackend::new());
/// assert!(solver.has_heuristic());
/// ```
#[derive(Debug, Clone, Default)]
pub struct VrpBackend {
    config: VrpBackendConfig,
}

impl VrpBackend {
    /// Construct a backend using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(VrpBackendConfig::default())
    }

    /// Construct a backend with explicit configuration.
    #[must_use]
    pub const fn with_config(config: VrpBackendConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &VrpBackendConfig {
        &self.config
    }
}

impl SequenceSolverBackend for VrpBackend {
    fn name(&self) -> &'static str {
        "vrp"
    }

    fn solve(&self, costs: &DistanceMatrix) -> Result<RouteOrder, BackendError> {
        let poi_count = costs.poi_count();
        if poi_count == 0 {
            return Ok(RouteOrder::empty());
        }
        let started_at = Instant::now();
        let indices = solve_closed_tour(&costs.to_integer_costs(), &self.config)?;
        let order = RouteOrder::new(indices, poi_count)?;
        log::debug!(
            "vrp-core ordered {poi_count} stops in {:?}",
            started_at.elapsed()
        );
        Ok(order)
    }
}

#[cfg(test)]
mod tests;
