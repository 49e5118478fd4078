//! Test-only fixtures and backends used by unit, behaviour and property tests.
//!
//! Gated behind the `test-support` feature (and `cfg(test)`).

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use geo::Coord;

use crate::{
    BackendError, Coordinate, DistanceMatrix, EARTH_RADIUS_METRES, Gate, Poi, RouteOrder,
    SequenceSolverBackend,
};

/// Construct a gateless POI at `(lng, lat)`.
///
/// # Examples
/// ```rust
/// use gatewalk_core::test_support::poi;
///
/// let poi = poi(1, 0.0, 0.0, "park");
/// assert_eq!(poi.id, 1);
/// assert_eq!(poi.name, "poi-1");
/// ```
#[must_use]
pub fn poi(id: u64, lng: f64, lat: f64, category: &str) -> Poi {
    Poi::new(id, format!("poi-{id}"), Coord { x: lng, y: lat }, category)
}

/// A coordinate `metres` east of `origin`, measured along the parallel.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "converting metres to degrees of longitude"
)]
pub fn east_of(origin: Coordinate, metres: f64) -> Coordinate {
    let metres_per_degree =
        EARTH_RADIUS_METRES * std::f64::consts::PI / 180.0 * origin.y.to_radians().cos();
    Coord {
        x: origin.x + metres / metres_per_degree,
        y: origin.y,
    }
}

/// A coordinate `metres` north of `origin`.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "converting metres to degrees of latitude"
)]
pub fn north_of(origin: Coordinate, metres: f64) -> Coordinate {
    let metres_per_degree = EARTH_RADIUS_METRES * std::f64::consts::PI / 180.0;
    Coord {
        x: origin.x,
        y: origin.y + metres / metres_per_degree,
    }
}

/// A POI with two gates, `separation` metres apart along the east-west axis,
/// centred on `(lng, lat)`.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "halving the gate separation")]
pub fn two_gate_poi(id: u64, lng: f64, lat: f64, separation: f64) -> Poi {
    let centre = Coord { x: lng, y: lat };
    let west = east_of(centre, -separation / 2.0);
    let east = east_of(centre, separation / 2.0);
    Poi::new(id, format!("venue-{id}"), centre, "scenic park").with_gates(vec![
        Gate::new("West Gate", west),
        Gate::new("East Gate", east),
    ])
}

/// Euclidean matrix over planar points: `start` is node 0.
///
/// Handy for scenarios phrased in abstract units.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "planar Euclidean distance")]
pub fn planar_matrix(start: (f64, f64), points: &[(f64, f64)]) -> DistanceMatrix {
    let nodes: Vec<(f64, f64)> = std::iter::once(start)
        .chain(points.iter().copied())
        .collect();
    DistanceMatrix::from_fn(nodes.len(), |from, to| {
        match (nodes.get(from), nodes.get(to)) {
            (Some(a), Some(b)) => (a.0 - b.0).hypot(a.1 - b.1),
            _ => 0.0,
        }
    })
}

/// Backend that always fails, counting how often it was asked.
///
/// Clones share the counter, so a test can keep one handle and box another.
#[derive(Debug, Clone, Default)]
pub struct FailingBackend {
    calls: Arc<AtomicUsize>,
}

impl FailingBackend {
    /// Number of `solve` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SequenceSolverBackend for FailingBackend {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn solve(&self, _costs: &DistanceMatrix) -> Result<RouteOrder, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(BackendError::NoSolution)
    }
}

/// Backend that returns a canned index list, valid or not.
#[derive(Debug, Clone)]
pub struct FixedOrderBackend {
    indices: Vec<usize>,
}

impl FixedOrderBackend {
    /// Return `indices` from every solve.
    #[must_use]
    pub const fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }
}

impl SequenceSolverBackend for FixedOrderBackend {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn solve(&self, _costs: &DistanceMatrix) -> Result<RouteOrder, BackendError> {
        // Deliberately unchecked: `SequenceSolver` must re-validate.
        Ok(RouteOrder::from_unchecked(self.indices.clone()))
    }
}
