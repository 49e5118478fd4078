//! Route and gate optimisation for multi-stop sightseeing itineraries.
//!
//! The engine is a set of pure functions over already-resolved inputs:
//!
//! 1. [`build_matrix`] turns a start coordinate and POIs into a haversine
//!    [`DistanceMatrix`] with the start as node `0`.
//! 2. [`CostModel`] reshapes that matrix for weather and traffic.
//! 3. [`SequenceSolver`] orders the POIs, trying an optional heuristic
//!    [`SequenceSolverBackend`] first and falling back to [`GreedySolver`].
//! 4. [`GateSelector`] picks entry and exit gates along the fixed order.
//! 5. [`MultiStrategyPlanner`] and [`ItineraryPlanner`] package the results
//!    with [`RouteStats`] and per-leg [`LegAdvice`].
//!
//! Nothing is persisted between calls and the crate performs no network or
//! file IO.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod advice;
pub mod context;
pub mod cost;
pub mod distance;
pub mod gates;
pub mod itinerary;
pub mod matrix;
pub mod planner;
pub mod poi;
pub mod solver;
pub mod stats;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use advice::{
    AdviceConfig, LegAdvice, TransportMode, TransportOption, TravelAdvisor, TravelTip,
};
pub use context::{TrafficContext, WeatherContext};
pub use cost::{CostModel, CostModelConfig, apply_weights};
pub use distance::{Coordinate, EARTH_RADIUS_METRES, haversine_distance};
pub use gates::{
    GateAssignment, GateLookup, GateSelector, GateSelectorConfig, PoiGates, max_gate_separation,
    select_gates,
};
pub use itinerary::{
    DEFAULT_DEPARTURE_HOUR, DayPlan, ItineraryPlan, ItineraryPlanner, MAX_DAYS, PlanRequest,
    PlannedStop, StrategyChoice, distribute_across_days,
};
pub use matrix::{DistanceMatrix, INTEGER_COST_SCALE, MatrixError, build_matrix};
pub use planner::{
    MultiStrategyPlanner, ParseStrategyError, PlanError, PlannerConfig, Strategy, StrategyPlans,
    StrategyRoute, discount_fast_legs, plan_strategies,
};
pub use poi::{Gate, Poi, PoiError, VenueClass, validate_coordinate};
pub use solver::{
    BackendError, GreedySolver, HEURISTIC_MIN_POIS, RouteOrder, RouteOrderError,
    SequenceSolver, SequenceSolverBackend, SolveDiagnostics, SolveOutcome, solve_sequence,
};
pub use stats::{Leg, RouteStats, SpeedModel, TravelMode};
