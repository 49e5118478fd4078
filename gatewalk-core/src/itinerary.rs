//! Multi-day itinerary assembly.
//!
//! A request is solved once over all POIs, the resulting order is split
//! into consecutive per-day chunks, and each day gets its own gate
//! assignments and gate-aware stats. Every day departs from the request's
//! start location. Days are independent, so they are processed in parallel.

use rayon::prelude::*;

use crate::{
    Coordinate, GateAssignment, GateLookup, GateSelector, LegAdvice, MultiStrategyPlanner,
    PlanError, Poi, RouteOrder, RouteStats, SpeedModel, Strategy, StrategyPlans, StrategyRoute,
    TravelAdvisor, WeatherContext,
};

/// Hour of day the first leg of each day starts at when none is given.
pub const DEFAULT_DEPARTURE_HOUR: u8 = 9;

/// Which strategy an itinerary request wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum StrategyChoice {
    /// Only the shortest route.
    Shortest,
    /// Only the fastest route.
    Fastest,
    /// Only the balanced route.
    #[default]
    Balanced,
    /// All three; `balanced` is selected and the rest kept as alternatives.
    All,
}

impl StrategyChoice {
    /// The strategy whose order drives the itinerary.
    #[must_use]
    pub const fn selected(self) -> Strategy {
        match self {
            Self::Shortest => Strategy::Shortest,
            Self::Fastest => Strategy::Fastest,
            Self::Balanced | Self::All => Strategy::Balanced,
        }
    }
}

impl From<Strategy> for StrategyChoice {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Shortest => Self::Shortest,
            Strategy::Fastest => Self::Fastest,
            Strategy::Balanced => Self::Balanced,
        }
    }
}

/// An itinerary request as supplied by the surrounding application.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanRequest {
    /// Where every day starts.
    pub start: Coordinate,
    /// Places to visit.
    pub pois: Vec<Poi>,
    /// Free-text weather label, e.g. "小雨" or "light rain".
    #[cfg_attr(feature = "serde", serde(default))]
    pub weather: Option<String>,
    /// Number of days to spread the visits over.
    #[cfg_attr(feature = "serde", serde(default = "default_days"))]
    pub days: usize,
    /// Requested strategy.
    #[cfg_attr(feature = "serde", serde(default))]
    pub strategy: StrategyChoice,
    /// Hour of day (0-23) each day sets off; drives rush-hour advice.
    #[cfg_attr(feature = "serde", serde(default = "default_departure_hour"))]
    pub departure_hour: u8,
}

#[cfg(feature = "serde")]
const fn default_days() -> usize {
    1
}

#[cfg(feature = "serde")]
const fn default_departure_hour() -> u8 {
    DEFAULT_DEPARTURE_HOUR
}

impl PlanRequest {
    /// A one-day balanced request without weather.
    #[must_use]
    pub const fn new(start: Coordinate, pois: Vec<Poi>) -> Self {
        Self {
            start,
            pois,
            weather: None,
            days: 1,
            strategy: StrategyChoice::Balanced,
            departure_hour: DEFAULT_DEPARTURE_HOUR,
        }
    }

    /// Spread the visits over `days`.
    #[must_use]
    pub const fn with_days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }

    /// Request a strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: StrategyChoice) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set off each day at `hour`.
    #[must_use]
    pub const fn with_departure_hour(mut self, hour: u8) -> Self {
        self.departure_hour = hour;
        self
    }

    /// Attach a weather label.
    #[must_use]
    pub fn with_weather(mut self, label: impl Into<String>) -> Self {
        self.weather = Some(label.into());
        self
    }
}

/// A stop with its chosen gates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedStop {
    /// The visited POI.
    pub poi: Poi,
    /// Entry and exit gates.
    pub assignment: GateAssignment,
}

/// One day of an itinerary.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DayPlan {
    /// Day number, starting at 1.
    pub day: usize,
    /// Stops in visiting order.
    pub stops: Vec<PlannedStop>,
    /// Gate-aware stats from the start through every stop.
    pub stats: RouteStats,
    /// Travel options and tips, one entry per leg in `stats`.
    pub advice: Vec<LegAdvice>,
}

/// A complete multi-day plan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItineraryPlan {
    /// Strategy whose order was split into days.
    pub selected_strategy: Strategy,
    /// That order over the request's POIs.
    pub order: RouteOrder,
    /// Per-day plans.
    pub days: Vec<DayPlan>,
    /// All three strategies when the request asked for them.
    pub alternatives: Option<StrategyPlans>,
}

/// Longest itinerary [`ItineraryPlanner::plan`] accepts, in days.
pub const MAX_DAYS: usize = 366;

/// Split `items` into `days` consecutive chunks.
///
/// Each chunk gets `len / days` items and the first `len % days` chunks get
/// one more. Zero days yields no chunks and `days` is capped at
/// [`MAX_DAYS`].
///
/// # Examples
/// ```
/// use gatewalk_core::distribute_across_days;
///
/// let days = distribute_across_days(&[1, 2, 3, 4, 5, 6, 7], 3);
/// assert_eq!(days, vec![vec![1, 2, 3], vec![4, 5], vec![6, 7]]);
/// ```
#[must_use]
pub fn distribute_across_days<T: Clone>(items: &[T], days: usize) -> Vec<Vec<T>> {
    let days = days.min(MAX_DAYS);
    let (Some(base), Some(extra)) = (items.len().checked_div(days), items.len().checked_rem(days))
    else {
        return Vec::new();
    };
    let mut rest = items;
    (0..days)
        .map(|day| {
            let take = base + usize::from(day < extra);
            let (chunk, tail) = rest.split_at(take.min(rest.len()));
            rest = tail;
            chunk.to_vec()
        })
        .collect()
}

/// Turns a [`PlanRequest`] into an [`ItineraryPlan`].
///
/// # Examples
/// ```
/// use geo::Coord;
/// use gatewalk_core::{ItineraryPlanner, PlanRequest, Poi, PoiGates};
///
/// let pois = vec![
///     Poi::new(1, "Bell Tower", Coord { x: 116.3958, y: 39.9418 }, "monument"),
///     Poi::new(2, "Lama Temple", Coord { x: 116.4170, y: 39.9470 }, "temple"),
///     Poi::new(3, "Beihai Park", Coord { x: 116.3830, y: 39.9250 }, "park"),
/// ];
/// let request = PlanRequest::new(Coord { x: 116.3975, y: 39.9087 }, pois).with_days(2);
///
/// let plan = ItineraryPlanner::default().plan(&request, &PoiGates)?;
/// assert_eq!(plan.days.len(), 2);
/// assert_eq!(plan.days[0].stops.len(), 2);
/// assert_eq!(plan.days[1].stops.len(), 1);
/// # Ok::<(), gatewalk_core::PlanError>(())
/// ```
#[derive(Debug, Default)]
pub struct ItineraryPlanner {
    planner: MultiStrategyPlanner,
    gates: GateSelector,
    advisor: TravelAdvisor,
}

impl ItineraryPlanner {
    /// An itinerary planner over `planner` with the default gate selector.
    #[must_use]
    pub fn new(planner: MultiStrategyPlanner) -> Self {
        Self::with_gate_selector(planner, GateSelector::default())
    }

    /// An itinerary planner with an explicit gate selector.
    #[must_use]
    pub fn with_gate_selector(planner: MultiStrategyPlanner, gates: GateSelector) -> Self {
        Self {
            planner,
            gates,
            advisor: TravelAdvisor::default(),
        }
    }

    /// Replace the travel advisor.
    #[must_use]
    pub const fn with_advisor(mut self, advisor: TravelAdvisor) -> Self {
        self.advisor = advisor;
        self
    }

    /// The strategy planner.
    #[must_use]
    pub const fn planner(&self) -> &MultiStrategyPlanner {
        &self.planner
    }

    /// Plan `request`, resolving gates through `lookup`.
    ///
    /// # Errors
    /// Returns [`PlanError::ZeroDays`] for `days == 0`,
    /// [`PlanError::TooManyDays`] above [`MAX_DAYS`] and
    /// [`PlanError::Matrix`] for invalid coordinates.
    pub fn plan<L>(&self, request: &PlanRequest, lookup: &L) -> Result<ItineraryPlan, PlanError>
    where
        L: GateLookup + Sync + ?Sized,
    {
        if request.days == 0 {
            return Err(PlanError::ZeroDays);
        }
        if request.days > MAX_DAYS {
            return Err(PlanError::TooManyDays {
                requested: request.days,
                limit: MAX_DAYS,
            });
        }
        let weather = request.weather.as_deref().map(WeatherContext::from_label);
        let (selected, alternatives) = self.solve(request, weather.as_ref())?;

        let ordered: Vec<Poi> = selected
            .order
            .apply(&request.pois)
            .into_iter()
            .cloned()
            .collect();
        let context = DayContext {
            start: request.start,
            departure_hour: request.departure_hour,
            weather: weather.as_ref(),
            gates: &self.gates,
            advisor: &self.advisor,
            speed_model: &self.planner.config().speed_model,
        };
        let days = distribute_across_days(&ordered, request.days)
            .into_par_iter()
            .enumerate()
            .map(|(idx, stops)| context.plan_day(idx + 1, stops, lookup))
            .collect();

        log::info!(
            "planned {} stops over {} days using the {} strategy",
            ordered.len(),
            request.days,
            selected.strategy
        );
        Ok(ItineraryPlan {
            selected_strategy: selected.strategy,
            order: selected.order,
            days,
            alternatives,
        })
    }

    fn solve(
        &self,
        request: &PlanRequest,
        weather: Option<&WeatherContext>,
    ) -> Result<(StrategyRoute, Option<StrategyPlans>), PlanError> {
        if request.strategy == StrategyChoice::All {
            let plans = self.planner.plan(&request.pois, request.start, weather)?;
            return Ok((plans.get(StrategyChoice::All.selected()).clone(), Some(plans)));
        }
        let route = self.planner.plan_strategy(
            request.strategy.selected(),
            &request.pois,
            request.start,
            weather,
        )?;
        Ok((route, None))
    }
}

/// What every day of one request shares.
struct DayContext<'a> {
    start: Coordinate,
    departure_hour: u8,
    weather: Option<&'a WeatherContext>,
    gates: &'a GateSelector,
    advisor: &'a TravelAdvisor,
    speed_model: &'a SpeedModel,
}

impl DayContext<'_> {
    fn plan_day<L>(&self, day: usize, pois: Vec<Poi>, lookup: &L) -> DayPlan
    where
        L: GateLookup + ?Sized,
    {
        let assignments = self.gates.select(self.start, &pois, lookup);
        let stats = RouteStats::for_gates(self.start, &assignments, self.speed_model);
        let advice = self.advisor.advise_day(
            &stats.legs,
            self.departure_hour,
            self.weather,
            self.speed_model,
        );
        let stops = pois
            .into_iter()
            .zip(assignments)
            .map(|(poi, assignment)| PlannedStop { poi, assignment })
            .collect();
        DayPlan {
            day,
            stops,
            stats,
            advice,
        }
    }
}
