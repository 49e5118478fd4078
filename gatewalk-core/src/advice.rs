//! Per-leg travel advice: which modes suit a leg and what to watch for.
//!
//! Advice is derived from the leg length, the day's weather and the hour the
//! leg is expected to start. The first leg of a day starts at the request's
//! departure hour and every later leg a fixed number of hours after the one
//! before it.

use std::fmt;
use std::time::Duration;

use crate::{Leg, SpeedModel, TrafficContext, TravelMode, WeatherContext};

/// A way of covering one leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TransportMode {
    /// By car or taxi.
    Driving,
    /// By bus or metro.
    Transit,
    /// On foot.
    Walking,
    /// By bicycle.
    Cycling,
}

impl TransportMode {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Transit => "transit",
            Self::Walking => "walking",
            Self::Cycling => "cycling",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something worth knowing before setting off on a leg.
///
/// # Examples
/// ```
/// use gatewalk_core::TravelTip;
///
/// let tip = TravelTip::LongWalk { distance_m: 1800.0 };
/// assert_eq!(tip.to_string(), "long walk (1.8 km); pace yourself");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum TravelTip {
    /// Walking in wet weather.
    CarryRainGear {
        /// The day's weather label.
        weather: String,
    },
    /// Cycling in wet weather.
    SlipperyRoads {
        /// The day's weather label.
        weather: String,
    },
    /// Wet weather favours public transport.
    TransitIsSheltered {
        /// The day's weather label.
        weather: String,
    },
    /// Driving in wet weather.
    DriveSlowly {
        /// The day's weather label.
        weather: String,
    },
    /// Roads are likely congested at this hour.
    RoadCongestion,
    /// Public transport is likely crowded at this hour.
    CrowdedTransit,
    /// The walk is longer than most visitors would choose.
    LongWalk {
        /// Leg length in metres.
        distance_m: f64,
    },
    /// The ride is longer than most visitors would choose.
    LongRide {
        /// Leg length in metres.
        distance_m: f64,
    },
}

impl fmt::Display for TravelTip {
    #[expect(clippy::float_arithmetic, reason = "metres to kilometres")]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CarryRainGear { weather } => write!(f, "{weather} today; bring rain gear"),
            Self::SlipperyRoads { weather } => write!(
                f,
                "{weather} today; roads are slippery, consider another mode"
            ),
            Self::TransitIsSheltered { weather } => {
                write!(f, "{weather} today; public transport keeps you dry")
            }
            Self::DriveSlowly { weather } => write!(f, "{weather} today; drive slowly"),
            Self::RoadCongestion => f.write_str(
                "roads may be congested now; allow extra time or take public transport",
            ),
            Self::CrowdedTransit => f.write_str("public transport may be crowded at rush hour"),
            Self::LongWalk { distance_m } => {
                write!(f, "long walk ({:.1} km); pace yourself", distance_m / 1000.0)
            }
            Self::LongRide { distance_m } => {
                write!(f, "long ride ({:.1} km); ride carefully", distance_m / 1000.0)
            }
        }
    }
}

/// One way of covering a leg with its estimate and tips.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransportOption {
    /// How the leg is covered.
    pub mode: TransportMode,
    /// Leg length in metres.
    pub distance_m: f64,
    /// Estimated travel time.
    pub duration: Duration,
    /// Advice for this mode.
    pub tips: Vec<TravelTip>,
}

/// Advice for one leg of a day.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LegAdvice {
    /// Hour of day (0-23) the leg is expected to start.
    pub hour: u8,
    /// Modes on offer, driving first.
    pub options: Vec<TransportOption>,
}

/// Thresholds used by [`TravelAdvisor`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdviceConfig {
    /// Cycling speed in km/h.
    pub cycling_kmh: f64,
    /// Transit is offered for legs strictly longer than this.
    pub transit_min_m: f64,
    /// Walking is offered for legs strictly shorter than this.
    pub walking_max_m: f64,
    /// Cycling is offered for legs strictly shorter than this.
    pub cycling_max_m: f64,
    /// Walks strictly longer than this get a [`TravelTip::LongWalk`].
    pub long_walk_m: f64,
    /// Rides strictly longer than this get a [`TravelTip::LongRide`].
    pub long_ride_m: f64,
    /// Hours between the starts of consecutive legs.
    pub hours_per_stop: u8,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            cycling_kmh: 15.0,
            transit_min_m: 1000.0,
            walking_max_m: 2000.0,
            cycling_max_m: 5000.0,
            long_walk_m: 1500.0,
            long_ride_m: 4000.0,
            hours_per_stop: 2,
        }
    }
}

/// Produces [`LegAdvice`] for the legs of a day.
///
/// # Examples
/// ```
/// use gatewalk_core::{SpeedModel, TransportMode, TravelAdvisor, WeatherContext};
///
/// let advisor = TravelAdvisor::default();
/// let rain = WeatherContext::from_label("小雨");
/// let options = advisor.options(1200.0, 10, Some(&rain), &SpeedModel::default());
///
/// let modes: Vec<TransportMode> = options.iter().map(|option| option.mode).collect();
/// assert_eq!(modes.len(), 4);
/// assert_eq!(modes.first(), Some(&TransportMode::Driving));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TravelAdvisor {
    config: AdviceConfig,
}

impl TravelAdvisor {
    /// An advisor with explicit thresholds.
    #[must_use]
    pub const fn new(config: AdviceConfig) -> Self {
        Self { config }
    }

    /// The active thresholds.
    #[must_use]
    pub const fn config(&self) -> &AdviceConfig {
        &self.config
    }

    /// Advice for each of `legs`, the first starting at `departure_hour`.
    #[must_use]
    pub fn advise_day(
        &self,
        legs: &[Leg],
        departure_hour: u8,
        weather: Option<&WeatherContext>,
        speeds: &SpeedModel,
    ) -> Vec<LegAdvice> {
        legs.iter()
            .enumerate()
            .map(|(idx, hop)| {
                let hour = self.hour_of_leg(departure_hour, idx);
                LegAdvice {
                    hour,
                    options: self.options(hop.distance_m, hour, weather, speeds),
                }
            })
            .collect()
    }

    /// Modes on offer for a leg of `distance_m` metres starting at `hour`.
    ///
    /// Driving is always offered, transit above
    /// [`AdviceConfig::transit_min_m`], walking below
    /// [`AdviceConfig::walking_max_m`] and cycling below
    /// [`AdviceConfig::cycling_max_m`]. Empty legs get no options.
    #[must_use]
    pub fn options(
        &self,
        distance_m: f64,
        hour: u8,
        weather: Option<&WeatherContext>,
        speeds: &SpeedModel,
    ) -> Vec<TransportOption> {
        if distance_m.is_nan() || distance_m <= 0.0 {
            return Vec::new();
        }
        let config = &self.config;
        let offered = [
            (TransportMode::Driving, true),
            (TransportMode::Transit, distance_m > config.transit_min_m),
            (TransportMode::Walking, distance_m < config.walking_max_m),
            (TransportMode::Cycling, distance_m < config.cycling_max_m),
        ];
        offered
            .into_iter()
            .filter(|&(_, available)| available)
            .map(|(mode, _)| TransportOption {
                mode,
                distance_m,
                duration: self.duration_for(distance_m, mode, speeds),
                tips: self.tips(mode, distance_m, hour, weather),
            })
            .collect()
    }

    /// Tips for covering `distance_m` metres by `mode` at `hour`.
    ///
    /// Weather tips come first, then rush-hour tips, then distance tips.
    #[must_use]
    pub fn tips(
        &self,
        mode: TransportMode,
        distance_m: f64,
        hour: u8,
        weather: Option<&WeatherContext>,
    ) -> Vec<TravelTip> {
        let mut tips = Vec::new();
        if let Some(weather) = weather.filter(|w| w.has_precipitation()) {
            let label = weather.label.clone();
            tips.push(match mode {
                TransportMode::Walking => TravelTip::CarryRainGear { weather: label },
                TransportMode::Cycling => TravelTip::SlipperyRoads { weather: label },
                TransportMode::Transit => TravelTip::TransitIsSheltered { weather: label },
                TransportMode::Driving => TravelTip::DriveSlowly { weather: label },
            });
        }
        if TrafficContext::for_hour(hour, 1.0).congested {
            match mode {
                TransportMode::Driving => tips.push(TravelTip::RoadCongestion),
                TransportMode::Transit => tips.push(TravelTip::CrowdedTransit),
                TransportMode::Walking | TransportMode::Cycling => {}
            }
        }
        match mode {
            TransportMode::Walking if distance_m > self.config.long_walk_m => {
                tips.push(TravelTip::LongWalk { distance_m });
            }
            TransportMode::Cycling if distance_m > self.config.long_ride_m => {
                tips.push(TravelTip::LongRide { distance_m });
            }
            _ => {}
        }
        tips
    }

    #[expect(clippy::float_arithmetic, reason = "distance over speed")]
    fn duration_for(&self, distance_m: f64, mode: TransportMode, speeds: &SpeedModel) -> Duration {
        match mode {
            TransportMode::Driving => speeds.duration_for(distance_m, TravelMode::Driving),
            TransportMode::Transit => speeds.duration_for(distance_m, TravelMode::Transit),
            TransportMode::Walking => speeds.duration_for(distance_m, TravelMode::Walking),
            TransportMode::Cycling => {
                let metres_per_second = self.config.cycling_kmh * 1000.0 / 3600.0;
                Duration::try_from_secs_f64(distance_m / metres_per_second)
                    .unwrap_or(Duration::MAX)
            }
        }
    }

    fn hour_of_leg(&self, departure_hour: u8, leg: usize) -> u8 {
        let legs_in_a_day = u32::try_from(leg.checked_rem(24).unwrap_or(0)).unwrap_or(0);
        let offset = legs_in_a_day * u32::from(self.config.hours_per_stop);
        let hour = (u32::from(departure_hour) + offset).checked_rem(24).unwrap_or(0);
        u8::try_from(hour).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    const CALM_HOUR: u8 = 10;
    const RUSH_HOUR: u8 = 8;

    #[fixture]
    fn advisor() -> TravelAdvisor {
        TravelAdvisor::default()
    }

    fn modes(options: &[TransportOption]) -> Vec<TransportMode> {
        options.iter().map(|option| option.mode).collect()
    }

    #[rstest]
    #[case(500.0, vec![TransportMode::Driving, TransportMode::Walking, TransportMode::Cycling])]
    #[case(1000.0, vec![TransportMode::Driving, TransportMode::Walking, TransportMode::Cycling])]
    #[case(
        1500.0,
        vec![
            TransportMode::Driving,
            TransportMode::Transit,
            TransportMode::Walking,
            TransportMode::Cycling,
        ]
    )]
    #[case(3000.0, vec![TransportMode::Driving, TransportMode::Transit, TransportMode::Cycling])]
    #[case(5000.0, vec![TransportMode::Driving, TransportMode::Transit])]
    fn modes_follow_distance_bands(
        advisor: TravelAdvisor,
        #[case] distance_m: f64,
        #[case] expected: Vec<TransportMode>,
    ) {
        let options = advisor.options(distance_m, CALM_HOUR, None, &SpeedModel::default());
        assert_eq!(modes(&options), expected);
    }

    #[rstest]
    fn empty_leg_has_no_options(advisor: TravelAdvisor) {
        assert!(advisor.options(0.0, CALM_HOUR, None, &SpeedModel::default()).is_empty());
    }

    #[rstest]
    fn calm_dry_short_leg_has_no_tips(advisor: TravelAdvisor) {
        let options = advisor.options(800.0, CALM_HOUR, None, &SpeedModel::default());
        assert!(options.iter().all(|option| option.tips.is_empty()));
    }

    #[rstest]
    #[case(TransportMode::Walking, TravelTip::CarryRainGear { weather: "小雨".to_owned() })]
    #[case(TransportMode::Cycling, TravelTip::SlipperyRoads { weather: "小雨".to_owned() })]
    #[case(TransportMode::Transit, TravelTip::TransitIsSheltered { weather: "小雨".to_owned() })]
    #[case(TransportMode::Driving, TravelTip::DriveSlowly { weather: "小雨".to_owned() })]
    fn wet_weather_tip_depends_on_mode(
        advisor: TravelAdvisor,
        #[case] mode: TransportMode,
        #[case] expected: TravelTip,
    ) {
        let rain = WeatherContext::from_label("小雨");
        assert_eq!(advisor.tips(mode, 900.0, CALM_HOUR, Some(&rain)), vec![expected]);
    }

    #[rstest]
    fn dry_weather_adds_no_weather_tip(advisor: TravelAdvisor) {
        let sunny = WeatherContext::from_label("晴");
        assert!(
            advisor
                .tips(TransportMode::Walking, 900.0, CALM_HOUR, Some(&sunny))
                .is_empty()
        );
    }

    #[rstest]
    #[case(TransportMode::Driving, vec![TravelTip::RoadCongestion])]
    #[case(TransportMode::Transit, vec![TravelTip::CrowdedTransit])]
    #[case(TransportMode::Walking, vec![])]
    #[case(TransportMode::Cycling, vec![])]
    fn rush_hour_tips_cover_road_and_transit(
        advisor: TravelAdvisor,
        #[case] mode: TransportMode,
        #[case] expected: Vec<TravelTip>,
    ) {
        assert_eq!(advisor.tips(mode, 900.0, RUSH_HOUR, None), expected);
        assert!(advisor.tips(mode, 900.0, CALM_HOUR, None).is_empty());
    }

    #[rstest]
    #[case(TransportMode::Walking, 1500.0, None)]
    #[case(TransportMode::Walking, 1600.0, Some(TravelTip::LongWalk { distance_m: 1600.0 }))]
    #[case(TransportMode::Cycling, 4000.0, None)]
    #[case(TransportMode::Cycling, 4500.0, Some(TravelTip::LongRide { distance_m: 4500.0 }))]
    #[case(TransportMode::Driving, 9000.0, None)]
    fn long_walks_and_rides_are_flagged(
        advisor: TravelAdvisor,
        #[case] mode: TransportMode,
        #[case] distance_m: f64,
        #[case] expected: Option<TravelTip>,
    ) {
        let tips = advisor.tips(mode, distance_m, CALM_HOUR, None);
        assert_eq!(tips, expected.into_iter().collect::<Vec<_>>());
    }

    #[rstest]
    fn tips_are_ordered_weather_then_rush_hour(advisor: TravelAdvisor) {
        let rain = WeatherContext::from_label("Heavy rain");
        let tips = advisor.tips(TransportMode::Driving, 6000.0, RUSH_HOUR, Some(&rain));
        assert_eq!(
            tips,
            vec![
                TravelTip::DriveSlowly {
                    weather: "Heavy rain".to_owned()
                },
                TravelTip::RoadCongestion,
            ]
        );
    }

    #[rstest]
    fn cycling_duration_uses_cycling_speed(advisor: TravelAdvisor) {
        let options = advisor.options(1500.0, CALM_HOUR, None, &SpeedModel::default());
        let cycling = options
            .iter()
            .find(|option| option.mode == TransportMode::Cycling)
            .expect("cycling offered under 5 km");
        assert_eq!(cycling.duration.as_secs_f64().round(), 360.0);
    }

    #[rstest]
    fn legs_start_two_hours_apart(advisor: TravelAdvisor) {
        let hop = Leg {
            from: geo::Coord { x: 0.0, y: 0.0 },
            to: geo::Coord { x: 0.0, y: 0.01 },
            distance_m: 1100.0,
            mode: TravelMode::Transit,
            duration: Duration::from_secs(200),
        };
        let legs = vec![hop.clone(), hop.clone(), hop.clone(), hop];
        let advice = advisor.advise_day(&legs, 13, None, &SpeedModel::default());
        let hours: Vec<u8> = advice.iter().map(|leg| leg.hour).collect();
        assert_eq!(hours, vec![13, 15, 17, 19]);
        let driving_tips: Vec<Vec<TravelTip>> = advice
            .iter()
            .filter_map(|leg| leg.options.first())
            .map(|option| option.tips.clone())
            .collect();
        assert_eq!(
            driving_tips,
            vec![vec![], vec![], vec![TravelTip::RoadCongestion], vec![]]
        );
    }

    #[rstest]
    fn hours_wrap_past_midnight(advisor: TravelAdvisor) {
        assert_eq!(advisor.hour_of_leg(23, 1), 1);
        assert_eq!(advisor.hour_of_leg(9, 0), 9);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn tips_serialise_with_a_kind_tag() {
        let json = serde_json::to_value(TravelTip::LongWalk { distance_m: 1600.0 })
            .expect("serialise tip");
        assert_eq!(json, serde_json::json!({"kind": "long_walk", "distance_m": 1600.0}));
    }
}
