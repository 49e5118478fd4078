//! Weather and traffic cost shaping over a [`DistanceMatrix`].
//!
//! Penalties compose multiplicatively and are decided from the raw distance
//! of each cell, never from an already-penalised value:
//!
//! - rain and an outdoor destination: `x outdoor_multiplier`
//! - rain and a short (walking) leg: `x short_leg_multiplier`
//! - congestion and a long (driving) leg: `x delay_factor`

use crate::{DistanceMatrix, Poi, TrafficContext, VenueClass, WeatherContext};

/// Multipliers and thresholds used by [`CostModel`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostModelConfig {
    /// Penalty for rainy legs ending at an outdoor venue.
    pub outdoor_multiplier: f64,
    /// Penalty for rainy legs short enough to be walked.
    pub short_leg_multiplier: f64,
    /// Legs strictly below this many metres count as walked.
    pub short_leg_threshold_m: f64,
    /// Legs strictly above this many metres count as driven.
    pub long_leg_threshold_m: f64,
}

impl Default for CostModelConfig {
    fn default() -> Self {
        Self {
            outdoor_multiplier: 1.5,
            short_leg_multiplier: 1.3,
            short_leg_threshold_m: 1000.0,
            long_leg_threshold_m: 5000.0,
        }
    }
}

/// Applies weather and traffic penalties to distances.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use gatewalk_core::{CostModel, DistanceMatrix, Poi, WeatherContext};
///
/// let matrix = DistanceMatrix::from_rows(vec![vec![0.0, 2000.0], vec![2000.0, 0.0]])?;
/// let pois = vec![Poi::new(1, "Park", Coord { x: 0.0, y: 0.0 }, "city park")];
/// let rain = WeatherContext::from_label("rain");
///
/// let weighted = CostModel::default().apply(&matrix, &pois, Some(&rain), None);
/// assert_eq!(weighted.get(0, 1), Some(3000.0));
/// assert_eq!(matrix.get(0, 1), Some(2000.0));
/// # Ok::<(), gatewalk_core::MatrixError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostModel {
    config: CostModelConfig,
}

impl CostModel {
    /// Construct a model with explicit configuration.
    #[must_use]
    pub const fn new(config: CostModelConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &CostModelConfig {
        &self.config
    }

    /// Return a weighted copy of `matrix`.
    ///
    /// `pois[j - 1]` describes node `j`. Absent contexts leave cells
    /// unchanged; the input matrix is never mutated.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "penalties are floating-point multipliers"
    )]
    pub fn apply(
        &self,
        matrix: &DistanceMatrix,
        pois: &[Poi],
        weather: Option<&WeatherContext>,
        traffic: Option<&TrafficContext>,
    ) -> DistanceMatrix {
        if matrix.poi_count() != pois.len() {
            log::warn!(
                "cost model received {} POIs for a matrix with {} POI nodes; unmatched nodes are treated as unclassified",
                pois.len(),
                matrix.poi_count()
            );
        }
        let raining = weather.is_some_and(WeatherContext::has_precipitation);
        let delay = traffic
            .filter(|ctx| ctx.congested)
            .map(|ctx| ctx.delay_factor);
        let config = self.config;

        matrix.map_cells(|_, to, distance| {
            let mut multiplier = 1.0;
            if raining {
                if is_outdoor_destination(pois, to) {
                    multiplier *= config.outdoor_multiplier;
                }
                if distance < config.short_leg_threshold_m {
                    multiplier *= config.short_leg_multiplier;
                }
            }
            if let Some(factor) = delay
                && distance > config.long_leg_threshold_m
            {
                multiplier *= factor;
            }
            distance * multiplier
        })
    }
}

fn is_outdoor_destination(pois: &[Poi], node: usize) -> bool {
    node.checked_sub(1)
        .and_then(|idx| pois.get(idx))
        .is_some_and(|poi| poi.venue_class() == VenueClass::Outdoor)
}

/// Apply the default [`CostModel`].
#[must_use]
pub fn apply_weights(
    matrix: &DistanceMatrix,
    pois: &[Poi],
    weather: Option<&WeatherContext>,
    traffic: Option<&TrafficContext>,
) -> DistanceMatrix {
    CostModel::default().apply(matrix, pois, weather, traffic)
}
