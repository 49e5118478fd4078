//! Aggregate distance and duration estimates for an ordered route.

use std::time::Duration;

use crate::{Coordinate, GateAssignment, Poi, RouteOrder, haversine_distance};

/// How a leg is presumed to be travelled, decided by its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TravelMode {
    /// Short legs.
    Walking,
    /// Medium legs.
    Transit,
    /// Long legs.
    Driving,
}

/// Fixed speeds per [`TravelMode`] and the distance bands selecting them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeedModel {
    /// Walking speed in km/h.
    pub walking_kmh: f64,
    /// Transit speed in km/h.
    pub transit_kmh: f64,
    /// Driving speed in km/h.
    pub driving_kmh: f64,
    /// Legs strictly shorter than this are walked.
    pub walking_limit_m: f64,
    /// Legs strictly longer than this are driven.
    pub transit_limit_m: f64,
}

impl Default for SpeedModel {
    fn default() -> Self {
        Self {
            walking_kmh: 5.0,
            transit_kmh: 20.0,
            driving_kmh: 40.0,
            walking_limit_m: 1000.0,
            transit_limit_m: 5000.0,
        }
    }
}

impl SpeedModel {
    /// Mode for a leg of `distance_m` metres.
    ///
    /// # Examples
    /// ```
    /// use gatewalk_core::{SpeedModel, TravelMode};
    ///
    /// let model = SpeedModel::default();
    /// assert_eq!(model.mode_for(999.0), TravelMode::Walking);
    /// assert_eq!(model.mode_for(1000.0), TravelMode::Transit);
    /// assert_eq!(model.mode_for(5000.0), TravelMode::Transit);
    /// assert_eq!(model.mode_for(5000.1), TravelMode::Driving);
    /// ```
    #[must_use]
    pub fn mode_for(&self, distance_m: f64) -> TravelMode {
        if distance_m < self.walking_limit_m {
            TravelMode::Walking
        } else if distance_m <= self.transit_limit_m {
            TravelMode::Transit
        } else {
            TravelMode::Driving
        }
    }

    /// Speed of `mode` in km/h.
    #[must_use]
    pub const fn speed_kmh(&self, mode: TravelMode) -> f64 {
        match mode {
            TravelMode::Walking => self.walking_kmh,
            TravelMode::Transit => self.transit_kmh,
            TravelMode::Driving => self.driving_kmh,
        }
    }

    /// Estimated time to cover `distance_m` metres in `mode`.
    ///
    /// Non-positive speeds saturate to [`Duration::MAX`].
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "distance over speed")]
    pub fn duration_for(&self, distance_m: f64, mode: TravelMode) -> Duration {
        let metres_per_second = self.speed_kmh(mode) * 1000.0 / 3600.0;
        Duration::try_from_secs_f64(distance_m / metres_per_second).unwrap_or(Duration::MAX)
    }
}

impl TravelMode {
    /// Mode under the default [`SpeedModel`].
    #[must_use]
    pub fn for_distance(distance_m: f64) -> Self {
        SpeedModel::default().mode_for(distance_m)
    }
}

/// One hop of a route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leg {
    /// Where the leg begins.
    pub from: Coordinate,
    /// Where the leg ends.
    pub to: Coordinate,
    /// Great-circle length in metres.
    pub distance_m: f64,
    /// Presumed mode of travel.
    pub mode: TravelMode,
    /// Estimated travel time.
    pub duration: Duration,
}

/// Totals for a route, with the legs they were summed from.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use gatewalk_core::{Poi, RouteOrder, RouteStats, TravelMode};
///
/// let start = Coord { x: 0.0, y: 0.0 };
/// let pois = vec![Poi::new(1, "Fountain", Coord { x: 0.0, y: 0.005 }, "square")];
/// let order = RouteOrder::new(vec![0], 1)?;
///
/// let stats = RouteStats::for_order(start, &pois, &order);
/// assert_eq!(stats.legs.len(), 1);
/// assert_eq!(stats.legs[0].mode, TravelMode::Walking);
/// assert!(stats.total_distance_m > 550.0 && stats.total_distance_m < 560.0);
/// # Ok::<(), gatewalk_core::RouteOrderError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteStats {
    /// Sum of leg distances in metres.
    pub total_distance_m: f64,
    /// Sum of leg durations.
    pub total_duration: Duration,
    /// Legs in travel order.
    pub legs: Vec<Leg>,
}

impl RouteStats {
    /// Stats for walking `start` then `pois` in `order`, default speeds.
    #[must_use]
    pub fn for_order(start: Coordinate, pois: &[Poi], order: &RouteOrder) -> Self {
        Self::for_order_with(start, pois, order, &SpeedModel::default())
    }

    /// Stats for walking `start` then `pois` in `order`.
    #[must_use]
    pub fn for_order_with(
        start: Coordinate,
        pois: &[Poi],
        order: &RouteOrder,
        model: &SpeedModel,
    ) -> Self {
        let stops = order.apply(pois).into_iter().map(|poi| poi.location);
        Self::from_positions(std::iter::once(start).chain(stops), model)
    }

    /// Gate-aware stats: each leg runs from the previous exit (or `start`)
    /// to the next entry.
    #[must_use]
    pub fn for_gates(
        start: Coordinate,
        assignments: &[GateAssignment],
        model: &SpeedModel,
    ) -> Self {
        let mut legs = Vec::with_capacity(assignments.len());
        let mut position = start;
        for assignment in assignments {
            legs.push(leg(position, assignment.entry.location, model));
            position = assignment.exit.location;
        }
        Self::from_legs(legs)
    }

    /// Stats for visiting `positions` in sequence.
    #[must_use]
    pub fn from_positions(
        positions: impl IntoIterator<Item = Coordinate>,
        model: &SpeedModel,
    ) -> Self {
        let mut positions = positions.into_iter();
        let Some(mut previous) = positions.next() else {
            return Self::default();
        };
        let legs = positions
            .map(|next| {
                let hop = leg(previous, next, model);
                previous = next;
                hop
            })
            .collect();
        Self::from_legs(legs)
    }

    fn from_legs(legs: Vec<Leg>) -> Self {
        let total_distance_m = legs.iter().map(|hop| hop.distance_m).sum();
        let total_duration = legs
            .iter()
            .fold(Duration::ZERO, |acc, hop| acc.saturating_add(hop.duration));
        Self {
            total_distance_m,
            total_duration,
            legs,
        }
    }

    /// Number of legs.
    #[must_use]
    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }
}

fn leg(from: Coordinate, to: Coordinate, model: &SpeedModel) -> Leg {
    let distance_m = haversine_distance(from, to);
    let mode = model.mode_for(distance_m);
    Leg {
        from,
        to,
        distance_m,
        mode,
        duration: model.duration_for(distance_m, mode),
    }
}
