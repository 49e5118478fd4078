//! `vrp-core` modelling helpers for `VrpBackend`.
//!
//! Converts an integer cost matrix into a closed-tour `vrp-core` problem,
//! runs the solver, and reads the tour back as POI indices.

use std::sync::Arc;

use gatewalk_core::BackendError;
use vrp_core::models::common::{Location, Profile};
use vrp_core::models::problem::TravelTime;
use vrp_core::models::solution::Route as VrpRoute;
use vrp_core::prelude::*;

use crate::backend::VrpBackendConfig;

/// Location of the start node in the routing matrix.
const DEPOT: Location = 0;

fn model_error(err: impl std::fmt::Display) -> BackendError {
    BackendError::Model(err.to_string())
}

fn define_goal(transport: Arc<dyn TransportCost>) -> GenericResult<GoalContext> {
    let minimize_unassigned = MinimizeUnassignedBuilder::new("min-unassigned").build()?;
    let transport_feature = TransportFeatureBuilder::new("min-cost")
        .set_transport_cost(transport)
        .set_time_constrained(false)
        .build_minimize_distance()?;

    GoalContextBuilder::with_features(&[minimize_unassigned, transport_feature])?.build()
}

fn define_problem(
    poi_count: usize,
    transport: Arc<dyn TransportCost>,
    goal: GoalContext,
) -> GenericResult<Problem> {
    let jobs = (1..=poi_count)
        .map(|location| {
            SingleBuilder::default()
                .id(format!("poi{location}").as_str())
                .location(location)?
                .build_as_job()
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Returning to the depot keeps the closed-tour objective: the return
    // leg steers the search even though it is never reported.
    let vehicle = VehicleBuilder::default()
        .id("walker")
        .add_detail(
            VehicleDetailBuilder::default()
                .set_start_location(DEPOT)
                .set_end_location(DEPOT)
                .build()?,
        )
        .build()?;

    ProblemBuilder::default()
        .add_jobs(jobs.into_iter())
        .add_vehicles(std::iter::once(vehicle))
        .with_goal(goal)
        .with_transport_cost(transport)
        .build()
}

/// Integer costs served to `vrp-core` as both distance and duration.
struct ScaledCostTransport {
    costs: Vec<Vec<f64>>,
}

impl ScaledCostTransport {
    #[expect(
        clippy::cast_precision_loss,
        reason = "scaled costs stay far below 2^53"
    )]
    fn new(costs: &[Vec<i64>]) -> Self {
        let costs = costs
            .iter()
            .map(|row| row.iter().map(|cost| *cost as f64).collect())
            .collect();
        Self { costs }
    }

    fn cost(&self, from: Location, to: Location) -> f64 {
        let result = self.costs.get(from).and_then(|row| row.get(to)).copied();
        debug_assert!(result.is_some(), "cost lookup failed: from={from}, to={to}");
        result.unwrap_or(f64::MAX)
    }
}

impl TransportCost for ScaledCostTransport {
    fn distance(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> Cost {
        self.cost(from, to)
    }

    fn duration(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> f64 {
        self.cost(from, to)
    }

    fn distance_approx(&self, profile: &Profile, from: usize, to: usize) -> f64 {
        self.duration_approx(profile, from, to)
    }

    fn duration_approx(&self, _profile: &Profile, from: usize, to: usize) -> f64 {
        self.cost(from, to)
    }
}

/// Solve the closed tour over `costs`, returning POI indices (`0..N`).
pub(crate) fn solve_closed_tour(
    costs: &[Vec<i64>],
    config: &VrpBackendConfig,
) -> Result<Vec<usize>, BackendError> {
    let poi_count = costs.len().saturating_sub(1);
    let transport: Arc<dyn TransportCost> = Arc::new(ScaledCostTransport::new(costs));
    let goal = define_goal(transport.clone()).map_err(model_error)?;
    let problem = Arc::new(define_problem(poi_count, transport, goal).map_err(model_error)?);

    let max_seconds = usize::try_from(config.time_limit.as_secs().max(1)).unwrap_or(usize::MAX);
    let vrp_config = VrpConfigBuilder::new(problem.clone())
        .prebuild()
        .map_err(model_error)?
        .with_max_time(Some(max_seconds))
        .with_max_generations(config.max_generations)
        .build()
        .map_err(model_error)?;

    let solution = vrp_core::solver::Solver::new(problem, vrp_config)
        .solve()
        .map_err(|err| {
            log::debug!("vrp-core search failed: {err}");
            BackendError::NoSolution
        })?;

    if !solution.unassigned.is_empty() {
        log::debug!(
            "vrp-core left {} of {poi_count} stops unassigned",
            solution.unassigned.len()
        );
        return Err(BackendError::NoSolution);
    }

    Ok(solution
        .get_locations()
        .flatten()
        .filter(|location| *location != DEPOT)
        .map(|location| location - 1)
        .collect())
}
