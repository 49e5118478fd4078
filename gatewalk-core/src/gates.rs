//! Entry and exit gate selection for a fixed visiting sequence.
//!
//! Stops are processed left to right. Each entry is the gate nearest to
//! where the walker actually is (the previous exit, or the start), and each
//! exit is the gate nearest to the next stop. Large venues whose nearest
//! entry and exit coincide are forced to exit elsewhere so the route crosses
//! the venue instead of doubling back.

use crate::{Coordinate, Gate, Poi, haversine_distance, validate_coordinate};

/// Supplies the gates of a POI.
///
/// Closures `Fn(&Poi) -> Vec<Gate>` implement this directly, so callers can
/// plug in a cached lookup without a wrapper type.
pub trait GateLookup {
    /// Gates known for `poi`. An empty list means "use the POI itself".
    fn gates_for(&self, poi: &Poi) -> Vec<Gate>;
}

impl<F> GateLookup for F
where
    F: Fn(&Poi) -> Vec<Gate>,
{
    fn gates_for(&self, poi: &Poi) -> Vec<Gate> {
        self(poi)
    }
}

/// Lookup that reads [`Poi::gates`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PoiGates;

impl GateLookup for PoiGates {
    fn gates_for(&self, poi: &Poi) -> Vec<Gate> {
        poi.gates.clone()
    }
}

/// Entry and exit chosen for one stop.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GateAssignment {
    /// Identifier of the visited POI.
    pub poi_id: u64,
    /// Gate used to enter.
    pub entry: Gate,
    /// Gate used to leave.
    pub exit: Gate,
    /// Whether the exit was overridden to cross a large venue.
    pub forced_traversal: bool,
}

impl GateAssignment {
    fn single(poi_id: u64, gate: Gate) -> Self {
        Self {
            poi_id,
            exit: gate.clone(),
            entry: gate,
            forced_traversal: false,
        }
    }
}

/// Tuning for [`GateSelector`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GateSelectorConfig {
    /// Venues whose widest gate pair exceeds this many metres are "large".
    pub large_venue_threshold_m: f64,
}

impl Default for GateSelectorConfig {
    fn default() -> Self {
        Self {
            large_venue_threshold_m: 500.0,
        }
    }
}

/// Chooses entry and exit gates per stop without reordering stops.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use gatewalk_core::{Gate, GateSelector, Poi, PoiGates};
///
/// let start = Coord { x: 0.0, y: 0.0 };
/// let museum = Poi::new(1, "Museum", Coord { x: 0.001, y: 0.0 }, "museum")
///     .with_gates(vec![Gate::new("Main", Coord { x: 0.001, y: 0.0 })]);
/// let cafe = Poi::new(2, "Cafe", Coord { x: 0.002, y: 0.0 }, "restaurant");
///
/// let assignments = GateSelector::default().select(start, &[museum, cafe], &PoiGates);
/// assert_eq!(assignments.len(), 2);
/// assert_eq!(assignments[0].entry, assignments[0].exit);
/// assert_eq!(assignments[1].entry.name, "Cafe");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GateSelector {
    config: GateSelectorConfig,
}

impl GateSelector {
    /// Construct a selector with explicit configuration.
    #[must_use]
    pub const fn new(config: GateSelectorConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &GateSelectorConfig {
        &self.config
    }

    /// Assign gates to every stop of `sequence`, walking from `start`.
    ///
    /// The output has one assignment per stop, in input order. Gates with
    /// unresolved coordinates are skipped with a warning; a stop left with no
    /// usable gate falls back to its own location.
    pub fn select<L>(&self, start: Coordinate, sequence: &[Poi], lookup: &L) -> Vec<GateAssignment>
    where
        L: GateLookup + ?Sized,
    {
        let mut position = start;
        let mut assignments = Vec::with_capacity(sequence.len());
        for (idx, poi) in sequence.iter().enumerate() {
            let next = sequence.get(idx + 1).map(|stop| stop.location);
            let gates = usable_gates(poi, lookup.gates_for(poi));
            let assignment = self.assign(poi, &gates, position, next);
            position = assignment.exit.location;
            assignments.push(assignment);
        }
        assignments
    }

    fn assign(
        &self,
        poi: &Poi,
        gates: &[Gate],
        arrive_from: Coordinate,
        next: Option<Coordinate>,
    ) -> GateAssignment {
        let Some(entry_idx) = rank_by_distance(gates, arrive_from).first().copied() else {
            log::warn!(
                "POI {} has no gates; using its own coordinate as the gate",
                poi.id
            );
            return GateAssignment::single(poi.id, poi.implicit_gate());
        };

        let exit_ranking = next.map(|target| rank_by_distance(gates, target));
        let mut exit_idx = exit_ranking
            .as_ref()
            .and_then(|ranked| ranked.first().copied())
            .unwrap_or(entry_idx);

        let mut forced_traversal = false;
        if exit_idx == entry_idx
            && let Some(second) = exit_ranking.as_ref().and_then(|ranked| ranked.get(1))
            && self.is_large_venue(gates)
        {
            log::debug!(
                "POI {} spans more than {} m; forcing exit through another gate",
                poi.id,
                self.config.large_venue_threshold_m
            );
            exit_idx = *second;
            forced_traversal = true;
        }

        let gate_at = |idx: usize| gates.get(idx).cloned().unwrap_or_else(|| poi.implicit_gate());
        GateAssignment {
            poi_id: poi.id,
            entry: gate_at(entry_idx),
            exit: gate_at(exit_idx),
            forced_traversal,
        }
    }

    fn is_large_venue(&self, gates: &[Gate]) -> bool {
        max_gate_separation(gates) > self.config.large_venue_threshold_m
    }
}

/// Drop gates whose coordinates are non-finite or outside WGS84 bounds.
fn usable_gates(poi: &Poi, gates: Vec<Gate>) -> Vec<Gate> {
    gates
        .into_iter()
        .filter(|gate| match validate_coordinate(gate.location) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("POI {} gate {:?} ignored: {err}", poi.id, gate.name);
                false
            }
        })
        .collect()
}

/// Gate indices ordered by distance to `target`; ties keep input order.
fn rank_by_distance(gates: &[Gate], target: Coordinate) -> Vec<usize> {
    let mut ranked: Vec<(usize, f64)> = gates
        .iter()
        .enumerate()
        .map(|(idx, gate)| (idx, haversine_distance(gate.location, target)))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked.into_iter().map(|(idx, _)| idx).collect()
}

/// Widest distance between any two gates, in metres.
#[must_use]
pub fn max_gate_separation(gates: &[Gate]) -> f64 {
    gates
        .iter()
        .enumerate()
        .flat_map(|(idx, a)| {
            gates
                .iter()
                .skip(idx + 1)
                .map(move |b| haversine_distance(a.location, b.location))
        })
        .fold(0.0, f64::max)
}

/// Select gates with the default [`GateSelector`].
pub fn select_gates<L>(start: Coordinate, sequence: &[Poi], lookup: &L) -> Vec<GateAssignment>
where
    L: GateLookup + ?Sized,
{
    GateSelector::default().select(start, sequence, lookup)
}
