//! Weather and traffic conditions supplied by collaborators.

/// Markers that indicate precipitation (or poor visibility) in a weather label.
const PRECIPITATION_MARKERS: &[&str] = &[
    "雨", "雪", "雾", "rain", "drizzle", "shower", "snow", "sleet", "fog", "storm",
];

/// Day-level weather classification.
///
/// # Examples
/// ```
/// use gatewalk_core::WeatherContext;
///
/// assert!(WeatherContext::from_label("小雨").has_precipitation());
/// assert!(WeatherContext::from_label("Light Rain").has_precipitation());
/// assert!(!WeatherContext::from_label("晴").has_precipitation());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeatherContext {
    /// Text label as reported by the weather service.
    pub label: String,
    /// Whether the day has precipitation.
    pub precipitation: bool,
}

impl WeatherContext {
    /// Build a context with an explicit precipitation flag.
    pub fn new(label: impl Into<String>, precipitation: bool) -> Self {
        Self {
            label: label.into(),
            precipitation,
        }
    }

    /// Classify a weather label such as `"雷阵雨"` or `"Heavy snow"`.
    pub fn from_label(label: impl Into<String>) -> Self {
        let label = label.into();
        let lowered = label.to_lowercase();
        let precipitation = PRECIPITATION_MARKERS
            .iter()
            .any(|marker| lowered.contains(marker));
        Self {
            label,
            precipitation,
        }
    }

    /// Whether cost shaping should apply rain penalties.
    #[must_use]
    pub const fn has_precipitation(&self) -> bool {
        self.precipitation
    }
}

/// Road conditions used to penalise long, driven legs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrafficContext {
    /// Whether roads are congested.
    pub congested: bool,
    /// Multiplier applied to long legs while congested.
    pub delay_factor: f64,
}

impl TrafficContext {
    /// Congested roads with the given delay multiplier.
    #[must_use]
    pub const fn congested(delay_factor: f64) -> Self {
        Self {
            congested: true,
            delay_factor,
        }
    }

    /// Free-flowing roads.
    #[must_use]
    pub const fn free_flow() -> Self {
        Self {
            congested: false,
            delay_factor: 1.0,
        }
    }

    /// Congestion by time of day: rush hours are 07:00-09:00 and 17:00-19:00.
    ///
    /// # Examples
    /// ```
    /// use gatewalk_core::TrafficContext;
    ///
    /// assert!(TrafficContext::for_hour(8, 1.6).congested);
    /// assert!(!TrafficContext::for_hour(12, 1.6).congested);
    /// ```
    #[must_use]
    pub fn for_hour(hour: u8, delay_factor: f64) -> Self {
        if (7..9).contains(&hour) || (17..19).contains(&hour) {
            Self::congested(delay_factor)
        } else {
            Self::free_flow()
        }
    }

    /// The multiplier that applies to long legs.
    #[must_use]
    pub const fn effective_delay(&self) -> f64 {
        if self.congested {
            self.delay_factor
        } else {
            1.0
        }
    }
}

impl Default for TrafficContext {
    fn default() -> Self {
        Self::free_flow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("小雨", true)]
    #[case("雷阵雨", true)]
    #[case("大雪", true)]
    #[case("雾", true)]
    #[case("Thunderstorm", true)]
    #[case("Drizzle", true)]
    #[case("晴", false)]
    #[case("多云", false)]
    #[case("Sunny", false)]
    #[case("", false)]
    fn classifies_weather_labels(#[case] label: &str, #[case] expected: bool) {
        assert_eq!(WeatherContext::from_label(label).has_precipitation(), expected);
    }

    #[rstest]
    #[case(6, false)]
    #[case(7, true)]
    #[case(8, true)]
    #[case(9, false)]
    #[case(16, false)]
    #[case(17, true)]
    #[case(18, true)]
    #[case(19, false)]
    fn rush_hours_are_congested(#[case] hour: u8, #[case] congested: bool) {
        assert_eq!(TrafficContext::for_hour(hour, 1.5).congested, congested);
    }

    #[rstest]
    fn free_flow_has_unit_delay() {
        let traffic = TrafficContext::for_hour(12, 3.0);
        assert!((traffic.effective_delay() - 1.0).abs() < f64::EPSILON);
    }
}
