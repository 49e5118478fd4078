//! Visit sequencing over a cost matrix.
//!
//! Node `0` of the cost matrix is the fixed start: it is visited first and
//! never appears in the returned [`RouteOrder`]. [`SequenceSolver`] prefers
//! an optional heuristic backend and absorbs every backend failure by
//! falling back to [`GreedySolver`], so callers always receive a complete
//! permutation.

mod greedy;
mod order;

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::DistanceMatrix;

pub use greedy::GreedySolver;
pub use order::{RouteOrder, RouteOrderError};

/// The heuristic backend is only consulted above this many POIs.
pub const HEURISTIC_MIN_POIS: usize = 3;

/// Failures a backend may report. [`SequenceSolver`] never surfaces them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend could not express the problem.
    #[error("failed to build routing model: {0}")]
    Model(String),
    /// No feasible tour was found within the time budget.
    #[error("no solution found within the time budget")]
    NoSolution,
    /// The backend produced something that is not a permutation.
    #[error("backend returned an invalid order: {0}")]
    InvalidOrder(#[from] RouteOrderError),
}

/// A strategy for ordering the POI nodes of a cost matrix.
///
/// Implementations must be `Send + Sync` so one solver can serve concurrent
/// callers.
pub trait SequenceSolverBackend: Send + Sync {
    /// Short identifier used in diagnostics and logs.
    fn name(&self) -> &'static str;

    /// Order every POI node of `costs` (nodes `1..size`).
    ///
    /// # Errors
    /// Returns a [`BackendError`] when no usable order was produced.
    fn solve(&self, costs: &DistanceMatrix) -> Result<RouteOrder, BackendError>;
}

/// Which backend produced an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveDiagnostics {
    /// Name of the backend whose order was returned.
    pub backend: &'static str,
    /// Whether the heuristic backend was tried and failed.
    pub fell_back: bool,
    /// Wall-clock time spent solving.
    pub solve_time: Duration,
}

/// An order plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutcome {
    /// The visiting order.
    pub order: RouteOrder,
    /// Backend bookkeeping.
    pub diagnostics: SolveDiagnostics,
}

/// Sequencing front door: heuristic when available, greedy otherwise.
///
/// The backend is chosen at construction time.
///
/// # Examples
/// ```
/// use gatewalk_core::{DistanceMatrix, SequenceSolver};
///
/// let costs = DistanceMatrix::from_rows(vec![
///     vec![0.0, 5.0, 1.0],
///     vec![5.0, 0.0, 2.0],
///     vec![1.0, 2.0, 0.0],
/// ])?;
/// let order = SequenceSolver::greedy_only().solve(&costs);
/// assert_eq!(order.as_slice(), &[1, 0]);
/// # Ok::<(), gatewalk_core::MatrixError>(())
/// ```
pub struct SequenceSolver {
    heuristic: Option<Box<dyn SequenceSolverBackend>>,
    greedy: GreedySolver,
}

impl SequenceSolver {
    /// A solver without a heuristic backend.
    #[must_use]
    pub fn greedy_only() -> Self {
        Self {
            heuristic: None,
            greedy: GreedySolver,
        }
    }

    /// A solver that tries `backend` first.
    #[must_use]
    pub fn with_heuristic(backend: impl SequenceSolverBackend + 'static) -> Self {
        Self::from_backend(Some(Box::new(backend)))
    }

    /// A solver with an optional heuristic backend.
    #[must_use]
    pub fn from_backend(heuristic: Option<Box<dyn SequenceSolverBackend>>) -> Self {
        if heuristic.is_none() {
            log::debug!("no heuristic backend configured; sequencing uses greedy only");
        }
        Self {
            heuristic,
            greedy: GreedySolver,
        }
    }

    /// Whether a heuristic backend is configured.
    #[must_use]
    pub fn has_heuristic(&self) -> bool {
        self.heuristic.is_some()
    }

    /// Order every POI node of `costs`. Never fails.
    #[must_use]
    pub fn solve(&self, costs: &DistanceMatrix) -> RouteOrder {
        self.solve_with_diagnostics(costs).order
    }

    /// Order every POI node of `costs`, reporting which backend was used.
    #[must_use]
    pub fn solve_with_diagnostics(&self, costs: &DistanceMatrix) -> SolveOutcome {
        let started_at = Instant::now();
        let poi_count = costs.poi_count();

        let heuristic = self
            .heuristic
            .as_deref()
            .filter(|_| poi_count >= HEURISTIC_MIN_POIS);
        let mut fell_back = false;
        if let Some(backend) = heuristic {
            match run_backend(backend, costs) {
                Ok(order) => {
                    log::info!("{} order: {:?}", backend.name(), order.as_slice());
                    return outcome(order, backend.name(), false, started_at);
                }
                Err(err) => {
                    log::warn!(
                        "{} backend failed ({err}); falling back to greedy",
                        backend.name()
                    );
                    fell_back = true;
                }
            }
        }

        let order = self.greedy.order(costs);
        log::info!("greedy order: {:?}", order.as_slice());
        outcome(order, self.greedy.name(), fell_back, started_at)
    }
}

impl Default for SequenceSolver {
    fn default() -> Self {
        Self::greedy_only()
    }
}

impl std::fmt::Debug for SequenceSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceSolver")
            .field(
                "heuristic",
                &self.heuristic.as_ref().map(|backend| backend.name()),
            )
            .finish()
    }
}

/// Run a backend and re-check its output, whatever it claims.
fn run_backend(
    backend: &dyn SequenceSolverBackend,
    costs: &DistanceMatrix,
) -> Result<RouteOrder, BackendError> {
    let order = backend.solve(costs)?;
    Ok(RouteOrder::new(order.into_inner(), costs.poi_count())?)
}

fn outcome(
    order: RouteOrder,
    backend: &'static str,
    fell_back: bool,
    started_at: Instant,
) -> SolveOutcome {
    SolveOutcome {
        order,
        diagnostics: SolveDiagnostics {
            backend,
            fell_back,
            solve_time: started_at.elapsed(),
        },
    }
}

/// Solve with a greedy-only [`SequenceSolver`].
#[must_use]
pub fn solve_sequence(costs: &DistanceMatrix) -> RouteOrder {
    SequenceSolver::greedy_only().solve(costs)
}

#[cfg(test)]
mod tests;
