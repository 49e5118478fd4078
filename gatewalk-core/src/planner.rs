//! Shortest, fastest and balanced route alternatives.
//!
//! Each strategy shapes the same raw distance matrix differently and hands
//! it to the shared [`SequenceSolver`]. Stats are always measured on real
//! distances, whatever the shaping.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::{
    CostModel, CostModelConfig, Coordinate, DistanceMatrix, MatrixError, Poi, RouteOrder,
    RouteStats, SequenceSolver, SpeedModel, TrafficContext, WeatherContext, build_matrix,
};

/// A cost-shaping strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Strategy {
    /// Raw great-circle distance.
    Shortest,
    /// Long legs discounted to favour faster transport.
    Fastest,
    /// Weather-aware weighted cost.
    Balanced,
}

impl Strategy {
    /// Every strategy, in reporting order.
    pub const ALL: [Self; 3] = [Self::Shortest, Self::Fastest, Self::Balanced];

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shortest => "shortest",
            Self::Fastest => "fastest",
            Self::Balanced => "balanced",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown strategy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy `{0}`; expected shortest, fastest or balanced")]
pub struct ParseStrategyError(pub String);

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStrategyError(s.to_owned()))
    }
}

/// Errors from [`MultiStrategyPlanner`] and the itinerary planner.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// The start or a POI had an unusable coordinate.
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    /// An itinerary was requested over zero days.
    #[error("an itinerary needs at least one day")]
    ZeroDays,
    /// An itinerary was requested over more days than the planner accepts.
    #[error("{requested} days requested; at most {limit} are supported")]
    TooManyDays {
        /// Days in the request.
        requested: usize,
        /// The accepted maximum.
        limit: usize,
    },
}

/// Tuning for [`MultiStrategyPlanner`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerConfig {
    /// Legs strictly longer than this are discounted by `fastest`.
    pub fast_leg_threshold_m: f64,
    /// Multiplier applied to those legs.
    pub fast_leg_discount: f64,
    /// Penalties used by `balanced`.
    pub cost_model: CostModelConfig,
    /// Speeds used for stats.
    pub speed_model: SpeedModel,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            fast_leg_threshold_m: 5000.0,
            fast_leg_discount: 0.7,
            cost_model: CostModelConfig::default(),
            speed_model: SpeedModel::default(),
        }
    }
}

/// One strategy's order and stats.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrategyRoute {
    /// Strategy that produced the order.
    pub strategy: Strategy,
    /// Visiting order over the input POIs.
    pub order: RouteOrder,
    /// Real-distance stats for the order.
    pub stats: RouteStats,
}

/// All three alternatives.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrategyPlans {
    /// Shortest by raw distance.
    pub shortest: StrategyRoute,
    /// Biased towards long, fast legs.
    pub fastest: StrategyRoute,
    /// Weather-aware.
    pub balanced: StrategyRoute,
}

impl StrategyPlans {
    /// The route for `strategy`.
    #[must_use]
    pub const fn get(&self, strategy: Strategy) -> &StrategyRoute {
        match strategy {
            Strategy::Shortest => &self.shortest,
            Strategy::Fastest => &self.fastest,
            Strategy::Balanced => &self.balanced,
        }
    }

    /// Routes in [`Strategy::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &StrategyRoute> {
        [&self.shortest, &self.fastest, &self.balanced].into_iter()
    }
}

/// Multiply every cell longer than `threshold_m` by `factor`.
///
/// # Examples
/// ```
/// use gatewalk_core::{DistanceMatrix, discount_fast_legs};
///
/// let raw = DistanceMatrix::from_rows(vec![vec![0.0, 8000.0], vec![800.0, 0.0]])?;
/// let fast = discount_fast_legs(&raw, 5000.0, 0.7);
/// assert_eq!(fast.get(0, 1), Some(8000.0 * 0.7));
/// assert_eq!(fast.get(1, 0), Some(800.0));
/// # Ok::<(), gatewalk_core::MatrixError>(())
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "discounting is a multiplication")]
pub fn discount_fast_legs(
    matrix: &DistanceMatrix,
    threshold_m: f64,
    factor: f64,
) -> DistanceMatrix {
    matrix.map_cells(|_, _, distance| {
        if distance > threshold_m {
            distance * factor
        } else {
            distance
        }
    })
}

/// Runs the sequence solver once per strategy.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use gatewalk_core::{MultiStrategyPlanner, Poi, Strategy};
///
/// let pois = vec![
///     Poi::new(1, "Bell Tower", Coord { x: 116.3958, y: 39.9418 }, "monument"),
///     Poi::new(2, "Drum Tower", Coord { x: 116.3948, y: 39.9403 }, "monument"),
/// ];
/// let start = Coord { x: 116.3975, y: 39.9087 };
///
/// let plans = MultiStrategyPlanner::default().plan(&pois, start, None)?;
/// for route in plans.iter() {
///     assert_eq!(route.order.len(), 2);
/// }
/// assert_eq!(plans.get(Strategy::Fastest).strategy, Strategy::Fastest);
/// # Ok::<(), gatewalk_core::PlanError>(())
/// ```
#[derive(Debug, Default)]
pub struct MultiStrategyPlanner {
    solver: SequenceSolver,
    config: PlannerConfig,
}

impl MultiStrategyPlanner {
    /// A planner over `solver` with default configuration.
    #[must_use]
    pub fn new(solver: SequenceSolver) -> Self {
        Self::with_config(solver, PlannerConfig::default())
    }

    /// A planner with explicit configuration.
    #[must_use]
    pub const fn with_config(solver: SequenceSolver, config: PlannerConfig) -> Self {
        Self { solver, config }
    }

    /// The underlying solver.
    #[must_use]
    pub const fn solver(&self) -> &SequenceSolver {
        &self.solver
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan all three strategies; `balanced` ignores traffic.
    ///
    /// # Errors
    /// Returns [`PlanError::Matrix`] when a coordinate is invalid. Solver
    /// trouble never surfaces; the greedy order is used instead.
    pub fn plan(
        &self,
        pois: &[Poi],
        start: Coordinate,
        weather: Option<&WeatherContext>,
    ) -> Result<StrategyPlans, PlanError> {
        self.plan_with_traffic(pois, start, weather, None)
    }

    /// Plan all three strategies, letting `balanced` see `traffic`.
    ///
    /// # Errors
    /// Returns [`PlanError::Matrix`] when a coordinate is invalid.
    pub fn plan_with_traffic(
        &self,
        pois: &[Poi],
        start: Coordinate,
        weather: Option<&WeatherContext>,
        traffic: Option<&TrafficContext>,
    ) -> Result<StrategyPlans, PlanError> {
        let raw = build_matrix(start, pois)?;
        let context = Context {
            raw: &raw,
            pois,
            start,
            weather,
            traffic,
        };
        Ok(StrategyPlans {
            shortest: self.route(Strategy::Shortest, &context),
            fastest: self.route(Strategy::Fastest, &context),
            balanced: self.route(Strategy::Balanced, &context),
        })
    }

    /// Plan a single strategy.
    ///
    /// # Errors
    /// Returns [`PlanError::Matrix`] when a coordinate is invalid.
    pub fn plan_strategy(
        &self,
        strategy: Strategy,
        pois: &[Poi],
        start: Coordinate,
        weather: Option<&WeatherContext>,
    ) -> Result<StrategyRoute, PlanError> {
        let raw = build_matrix(start, pois)?;
        let context = Context {
            raw: &raw,
            pois,
            start,
            weather,
            traffic: None,
        };
        Ok(self.route(strategy, &context))
    }

    /// The matrix `strategy` hands to the solver.
    #[must_use]
    pub fn shape<'a>(
        &self,
        strategy: Strategy,
        raw: &'a DistanceMatrix,
        pois: &[Poi],
        weather: Option<&WeatherContext>,
        traffic: Option<&TrafficContext>,
    ) -> Cow<'a, DistanceMatrix> {
        match strategy {
            Strategy::Shortest => Cow::Borrowed(raw),
            Strategy::Fastest => Cow::Owned(discount_fast_legs(
                raw,
                self.config.fast_leg_threshold_m,
                self.config.fast_leg_discount,
            )),
            Strategy::Balanced => Cow::Owned(
                CostModel::new(self.config.cost_model).apply(raw, pois, weather, traffic),
            ),
        }
    }

    fn route(&self, strategy: Strategy, context: &Context<'_>) -> StrategyRoute {
        let costs = self.shape(
            strategy,
            context.raw,
            context.pois,
            context.weather,
            context.traffic,
        );
        let outcome = self.solver.solve_with_diagnostics(&costs);
        log::debug!(
            "{strategy} route solved by {} in {:?}",
            outcome.diagnostics.backend,
            outcome.diagnostics.solve_time
        );
        let stats = RouteStats::for_order_with(
            context.start,
            context.pois,
            &outcome.order,
            &self.config.speed_model,
        );
        StrategyRoute {
            strategy,
            order: outcome.order,
            stats,
        }
    }
}

struct Context<'a> {
    raw: &'a DistanceMatrix,
    pois: &'a [Poi],
    start: Coordinate,
    weather: Option<&'a WeatherContext>,
    traffic: Option<&'a TrafficContext>,
}

/// Plan all strategies with a greedy-only solver.
///
/// # Errors
/// Returns [`PlanError::Matrix`] when a coordinate is invalid.
pub fn plan_strategies(
    pois: &[Poi],
    start: Coordinate,
    weather: Option<&WeatherContext>,
) -> Result<StrategyPlans, PlanError> {
    MultiStrategyPlanner::default().plan(pois, start, weather)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::{fixture, rstest};

    use crate::test_support::{FailingBackend, east_of, north_of, poi};

    const ORIGIN: Coordinate = Coord { x: 0.0, y: 0.0 };

    #[expect(clippy::float_arithmetic, reason = "summing leg costs")]
    fn order_cost(costs: &DistanceMatrix, order: &RouteOrder) -> f64 {
        let mut previous = 0;
        let mut total = 0.0;
        for idx in order.iter() {
            total += costs.get(previous, idx + 1).unwrap_or(f64::INFINITY);
            previous = idx + 1;
        }
        total
    }

    /// A walkable park cluster plus one museum 8 km away.
    #[fixture]
    fn pois() -> Vec<Poi> {
        let near = east_of(ORIGIN, 400.0);
        let park = north_of(ORIGIN, 700.0);
        let far = east_of(ORIGIN, 8000.0);
        vec![
            poi(1, near.x, near.y, "museum"),
            poi(2, far.x, far.y, "history museum"),
            poi(3, park.x, park.y, "city park"),
        ]
    }

    #[rstest]
    #[case("shortest", Strategy::Shortest)]
    #[case(" Fastest ", Strategy::Fastest)]
    #[case("BALANCED", Strategy::Balanced)]
    fn parses_strategy_names(#[case] raw: &str, #[case] expected: Strategy) {
        assert_eq!(raw.parse::<Strategy>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_strategy() {
        let err = "scenic".parse::<Strategy>().expect_err("unknown name");
        assert_eq!(err, ParseStrategyError("scenic".to_owned()));
    }

    #[rstest]
    fn every_strategy_covers_every_poi(pois: Vec<Poi>) {
        let plans = MultiStrategyPlanner::default()
            .plan(&pois, ORIGIN, None)
            .expect("valid input");
        for route in plans.iter() {
            let mut sorted = route.order.as_slice().to_vec();
            sorted.sort_unstable();
            assert_eq!(sorted, vec![0, 1, 2], "{}", route.strategy);
            assert_eq!(route.stats.leg_count(), 3);
        }
    }

    #[rstest]
    fn fastest_cost_never_exceeds_shortest_cost(pois: Vec<Poi>) {
        let planner = MultiStrategyPlanner::default();
        let plans = planner.plan(&pois, ORIGIN, None).expect("valid input");
        let raw = build_matrix(ORIGIN, &pois).expect("valid input");
        let fast = planner.shape(Strategy::Fastest, &raw, &pois, None, None);
        let order = &plans.fastest.order;
        assert!(order_cost(&fast, order) <= order_cost(&raw, order));
    }

    #[rstest]
    fn rain_shapes_only_the_balanced_matrix(pois: Vec<Poi>) {
        let planner = MultiStrategyPlanner::default();
        let raw = build_matrix(ORIGIN, &pois).expect("valid input");
        let rain = WeatherContext::from_label("heavy rain");
        let shortest = planner.shape(Strategy::Shortest, &raw, &pois, Some(&rain), None);
        let balanced = planner.shape(Strategy::Balanced, &raw, &pois, Some(&rain), None);
        assert!(matches!(shortest, Cow::Borrowed(_)));
        assert_ne!(*balanced, raw);
    }

    #[rstest]
    fn failing_backend_still_yields_three_routes(pois: Vec<Poi>) {
        let planner = MultiStrategyPlanner::new(SequenceSolver::with_heuristic(
            FailingBackend::default(),
        ));
        let plans = planner.plan(&pois, ORIGIN, None).expect("valid input");
        assert_eq!(plans.iter().count(), 3);
        assert!(plans.iter().all(|route| route.order.len() == 3));
    }

    #[rstest]
    fn invalid_poi_coordinate_is_reported() {
        let pois = vec![poi(1, 0.0, 0.0, "park"), poi(2, 200.0, 0.0, "park")];
        let err = plan_strategies(&pois, ORIGIN, None).expect_err("invalid longitude");
        assert!(matches!(
            err,
            PlanError::Matrix(MatrixError::InvalidPoi {
                index: 1,
                poi_id: 2,
                ..
            })
        ));
    }

    #[rstest]
    fn empty_input_plans_empty_routes() {
        let plans = plan_strategies(&[], ORIGIN, None).expect("empty input");
        assert!(plans.iter().all(|route| route.order.is_empty()));
    }
}
