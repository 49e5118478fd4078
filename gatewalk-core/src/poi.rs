//! Points of interest, their gates, and weather-sensitivity classification.

use thiserror::Error;

use crate::Coordinate;

/// How exposed a venue is to the weather.
///
/// Resolved once from the free-form category label when a [`Poi`] is built,
/// so cost shaping never re-matches strings per matrix cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum VenueClass {
    /// Scenic spots, parks, monuments and other open-air venues.
    Outdoor,
    /// Museums, galleries, malls and other covered venues.
    Indoor,
    /// No keyword matched.
    #[default]
    Unknown,
}

const OUTDOOR_KEYWORDS: &[&str] = &[
    "scenic", "park", "garden", "monument", "square", "mountain", "lake", "beach", "zoo", "风景",
    "公园", "景区", "广场", "山", "湖",
];

const INDOOR_KEYWORDS: &[&str] = &[
    "museum", "gallery", "mall", "theatre", "theater", "restaurant", "hotel", "博物馆", "美术馆",
    "商场", "餐厅", "酒店",
];

impl VenueClass {
    /// Classify a category label.
    ///
    /// Outdoor keywords take precedence, so "park museum" is outdoor.
    ///
    /// # Examples
    /// ```
    /// use gatewalk_core::VenueClass;
    ///
    /// assert_eq!(VenueClass::classify("Scenic Park"), VenueClass::Outdoor);
    /// assert_eq!(VenueClass::classify("history museum"), VenueClass::Indoor);
    /// assert_eq!(VenueClass::classify("bakery"), VenueClass::Unknown);
    /// ```
    #[must_use]
    pub fn classify(category: &str) -> Self {
        let lowered = category.to_lowercase();
        if OUTDOOR_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
            Self::Outdoor
        } else if INDOOR_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
            Self::Indoor
        } else {
            Self::Unknown
        }
    }
}

/// A named physical entrance or exit of a [`Poi`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gate {
    /// Display name, e.g. "North Gate".
    pub name: String,
    /// Where the gate is.
    pub location: Coordinate,
}

impl Gate {
    /// Construct a gate.
    pub fn new(name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

/// Errors returned by [`Poi::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PoiError {
    /// The coordinate is non-finite or outside WGS84 bounds.
    #[error("coordinate ({lng}, {lat}) is not a valid WGS84 position")]
    InvalidCoordinate {
        /// Longitude as supplied.
        lng: f64,
        /// Latitude as supplied.
        lat: f64,
    },
}

/// Check that a coordinate is finite and within WGS84 bounds.
///
/// # Errors
/// Returns [`PoiError::InvalidCoordinate`] when it is not.
pub fn validate_coordinate(location: Coordinate) -> Result<(), PoiError> {
    let lng_ok = location.x.is_finite() && (-180.0..=180.0).contains(&location.x);
    let lat_ok = location.y.is_finite() && (-90.0..=90.0).contains(&location.y);
    if lng_ok && lat_ok {
        Ok(())
    } else {
        Err(PoiError::InvalidCoordinate {
            lng: location.x,
            lat: location.y,
        })
    }
}

/// A place to visit.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. The
/// category is kept verbatim and classified once into a [`VenueClass`].
///
/// # Examples
/// ```
/// use geo::Coord;
/// use gatewalk_core::{Gate, Poi, VenueClass};
///
/// let poi = Poi::new(7, "Summer Palace", Coord { x: 116.27, y: 39.99 }, "scenic park")
///     .with_gates(vec![
///         Gate::new("East Palace Gate", Coord { x: 116.275, y: 39.998 }),
///         Gate::new("North Palace Gate", Coord { x: 116.268, y: 40.004 }),
///     ]);
///
/// assert_eq!(poi.venue_class(), VenueClass::Outdoor);
/// assert_eq!(poi.gates.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "PoiRecord", into = "PoiRecord")
)]
pub struct Poi {
    /// Caller-assigned identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Resolved position.
    pub location: Coordinate,
    /// Known entrances; empty or single-entry lists mean single access.
    pub gates: Vec<Gate>,
    category: String,
    venue_class: VenueClass,
}

impl Poi {
    /// Construct a POI without gates.
    pub fn new(
        id: u64,
        name: impl Into<String>,
        location: Coordinate,
        category: impl Into<String>,
    ) -> Self {
        let category = category.into();
        let venue_class = VenueClass::classify(&category);
        Self {
            id,
            name: name.into(),
            location,
            gates: Vec::new(),
            category,
            venue_class,
        }
    }

    /// Replace the gate list.
    #[must_use]
    pub fn with_gates(mut self, gates: Vec<Gate>) -> Self {
        self.gates = gates;
        self
    }

    /// The category label as supplied.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Weather-sensitivity class derived from the category.
    #[must_use]
    pub const fn venue_class(&self) -> VenueClass {
        self.venue_class
    }

    /// The POI's own position as a gate, used when no gates are known.
    #[must_use]
    pub fn implicit_gate(&self) -> Gate {
        Gate::new(self.name.clone(), self.location)
    }

    /// Validate the POI's coordinate and those of its gates.
    ///
    /// # Errors
    /// Returns [`PoiError::InvalidCoordinate`] for the first bad position.
    pub fn validate(&self) -> Result<(), PoiError> {
        validate_coordinate(self.location)?;
        self.gates
            .iter()
            .try_for_each(|gate| validate_coordinate(gate.location))
    }
}

/// Wire shape of a [`Poi`]; the venue class is always re-derived.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct PoiRecord {
    id: u64,
    name: String,
    location: Coordinate,
    #[serde(default)]
    category: String,
    #[serde(default)]
    gates: Vec<Gate>,
}

#[cfg(feature = "serde")]
impl From<PoiRecord> for Poi {
    fn from(record: PoiRecord) -> Self {
        Self::new(record.id, record.name, record.location, record.category)
            .with_gates(record.gates)
    }
}

#[cfg(feature = "serde")]
impl From<Poi> for PoiRecord {
    fn from(poi: Poi) -> Self {
        Self {
            id: poi.id,
            name: poi.name,
            location: poi.location,
            category: poi.category,
            gates: poi.gates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::rstest;

    #[rstest]
    #[case("Scenic Area", VenueClass::Outdoor)]
    #[case("city park", VenueClass::Outdoor)]
    #[case("风景名胜", VenueClass::Outdoor)]
    #[case("war monument", VenueClass::Outdoor)]
    #[case("Art Gallery", VenueClass::Indoor)]
    #[case("博物馆", VenueClass::Indoor)]
    #[case("park-side museum", VenueClass::Outdoor)]
    #[case("", VenueClass::Unknown)]
    #[case("noodle shop", VenueClass::Unknown)]
    fn classifies_categories(#[case] category: &str, #[case] expected: VenueClass) {
        assert_eq!(VenueClass::classify(category), expected);
    }

    #[rstest]
    fn venue_class_is_resolved_on_construction() {
        let poi = Poi::new(1, "Lake", Coord { x: 0.0, y: 0.0 }, "lake shore");
        assert_eq!(poi.venue_class(), VenueClass::Outdoor);
        assert_eq!(poi.category(), "lake shore");
    }

    #[rstest]
    #[case(Coord { x: f64::NAN, y: 0.0 })]
    #[case(Coord { x: 0.0, y: f64::INFINITY })]
    #[case(Coord { x: 181.0, y: 0.0 })]
    #[case(Coord { x: 0.0, y: -90.5 })]
    fn rejects_invalid_coordinates(#[case] location: Coordinate) {
        let poi = Poi::new(1, "Nowhere", location, "park");
        assert!(matches!(
            poi.validate(),
            Err(PoiError::InvalidCoordinate { .. })
        ));
    }

    #[rstest]
    fn rejects_invalid_gate_coordinates() {
        let poi = Poi::new(1, "Fort", Coord { x: 1.0, y: 1.0 }, "monument")
            .with_gates(vec![Gate::new("Broken", Coord { x: 1.0, y: 95.0 })]);
        assert!(poi.validate().is_err());
    }

    #[rstest]
    fn implicit_gate_uses_own_location() {
        let poi = Poi::new(3, "Tower", Coord { x: 2.0, y: 3.0 }, "monument");
        let gate = poi.implicit_gate();
        assert_eq!(gate.location, poi.location);
        assert_eq!(gate.name, "Tower");
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn deserialising_reclassifies_category() {
        let json = r#"{"id":4,"name":"Gardens","location":{"x":0.5,"y":0.5},"category":"botanic garden"}"#;
        let poi: Poi = serde_json::from_str(json).expect("valid poi json");
        assert_eq!(poi.venue_class(), VenueClass::Outdoor);
        assert!(poi.gates.is_empty());
    }
}
