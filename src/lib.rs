//! Facade crate for the Gatewalk route and gate optimisation engine.
//!
//! This crate re-exports the core planning API and, behind the `solver-vrp`
//! feature, the `vrp-core` heuristic backend.

#![forbid(unsafe_code)]

pub use gatewalk_core::{
    AdviceConfig, BackendError, Coordinate, CostModel, CostModelConfig, DayPlan, DistanceMatrix,
    Gate, GateAssignment, GateLookup, GateSelector, GateSelectorConfig, ItineraryPlan,
    ItineraryPlanner, Leg, LegAdvice, MAX_DAYS, MatrixError, MultiStrategyPlanner, PlanError,
    PlanRequest, PlannedStop, PlannerConfig, Poi, PoiError, PoiGates, RouteOrder, RouteStats,
    SequenceSolver, SequenceSolverBackend, SpeedModel, Strategy, StrategyChoice, StrategyPlans,
    StrategyRoute, TrafficContext, TransportMode, TransportOption, TravelAdvisor, TravelMode,
    TravelTip, VenueClass, WeatherContext, apply_weights, build_matrix, haversine_distance,
    plan_strategies, select_gates, solve_sequence,
};

#[cfg(feature = "solver-vrp")]
pub use gatewalk_solver_vrp::{VrpBackend, VrpBackendConfig};

/// The sequence solver this build recommends.
///
/// Uses the `vrp-core` heuristic with its default five-second budget when
/// the `solver-vrp` feature is enabled, and greedy ordering otherwise.
///
/// # Examples
/// ```
/// use gatewalk::{MultiStrategyPlanner, default_sequence_solver};
///
/// let planner = MultiStrategyPlanner::new(default_sequence_solver());
/// assert_eq!(planner.solver().has_heuristic(), cfg!(feature = "solver-vrp"));
/// ```
#[must_use]
pub fn default_sequence_solver() -> SequenceSolver {
    #[cfg(feature = "solver-vrp")]
    {
        SequenceSolver::with_heuristic(VrpBackend::new())
    }
    #[cfg(not(feature = "solver-vrp"))]
    {
        SequenceSolver::greedy_only()
    }
}
