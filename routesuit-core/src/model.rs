use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::clothing::ClothingLevel;

/// One timestamped entry of a forecast time series, normalized across providers.
///
/// Missing measurements stay `None`; the analyzer decides per field how to
/// treat absence (temperatures are skipped when averaging, precipitation
/// counts as 0 when taking the maximum).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub time: DateTime<Utc>,
    /// Air temperature in °C.
    pub air_temperature: Option<f64>,
    /// Probability of precipitation in percent (0-100).
    pub precipitation_probability: Option<f64>,
    /// Expected precipitation amount in millimeters.
    pub precipitation_amount: Option<f64>,
}

/// The engine's verdict for a single commute window.
///
/// Built fresh on every analysis; the rain-for-later adjustment produces a
/// new value rather than mutating an existing one.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub needs_rain_gear: bool,
    pub clothing_level: ClothingLevel,
    /// Mean temperature over the commute window, °C.
    pub temperature_c: f64,
    /// Peak precipitation probability over the window, percent.
    pub precipitation_probability: f64,
    /// Peak precipitation amount over the window, millimeters.
    pub precipitation_amount: f64,
    /// True when rain gear is advised for the evening trip home, not for
    /// this commute itself. The precipitation figures then describe the
    /// evening window.
    pub rain_for_later: bool,
    /// Human-readable window label, e.g. "Morning commute (7 AM - 9 AM)".
    pub commute_label: String,
    /// Local calendar date the recommendation applies to.
    pub date: NaiveDate,
    /// "Today", "Tomorrow", or a formatted weekday and date.
    pub day_label: String,
}

/// Combined result for both daily commutes. Either side may be absent when
/// the forecast holds no usable future data for that window.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommuteRecommendations {
    pub morning: Option<Recommendation>,
    pub evening: Option<Recommendation>,
}

impl CommuteRecommendations {
    pub fn any_needs_rain_gear(&self) -> bool {
        self.morning.as_ref().is_some_and(|r| r.needs_rain_gear)
            || self.evening.as_ref().is_some_and(|r| r.needs_rain_gear)
    }
}
