//! The commute weather-recommendation engine.
//!
//! Pure functions from (forecast snapshot, config snapshot, "now") to
//! recommendations. No I/O, no shared state; "now" is injected so analyses
//! are deterministic and replayable in tests.

use chrono::{DateTime, NaiveDate, Timelike, Utc};

use crate::clothing::classify;
use crate::config::AppConfig;
use crate::format::format_hour;
use crate::model::{CommuteRecommendations, ForecastPoint, Recommendation};

/// "Today", "Tomorrow", or a formatted weekday and date such as
/// "Thursday, Sep 3".
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if today.succ_opt() == Some(date) {
        "Tomorrow".to_string()
    } else {
        date.format("%A, %b %-d").to_string()
    }
}

/// Analyze one commute window against a forecast.
///
/// Selects forecast points whose local hour-of-day falls in
/// `[start_hour, end_hour)` and which lie strictly in the future, then keeps
/// only the earliest local date among them (the next occurrence of the
/// window, today or tomorrow). Over that day's points the temperature is
/// averaged while precipitation takes the peak value: temperature describes
/// the ride as a whole, rain is a risk triggered by any single bad hour.
///
/// Returns `None` when the window has no future points in the forecast
/// horizon, or when none of the selected points carries a temperature.
pub fn analyze_window(
    forecast: &[ForecastPoint],
    start_hour: u32,
    end_hour: u32,
    commute_label: &str,
    config: &AppConfig,
    now: DateTime<Utc>,
) -> Option<Recommendation> {
    let today = now.with_timezone(&config.timezone).date_naive();

    // Future points inside the hour window, paired with their local date.
    let candidates: Vec<(NaiveDate, &ForecastPoint)> = forecast
        .iter()
        .filter_map(|point| {
            let local = point.time.with_timezone(&config.timezone);
            let in_window = local.hour() >= start_hour && local.hour() < end_hour;
            (in_window && point.time > now).then(|| (local.date_naive(), point))
        })
        .collect();

    // Next upcoming occurrence of the window.
    let commute_date = candidates.iter().map(|(date, _)| *date).min()?;
    let day_points: Vec<&ForecastPoint> = candidates
        .iter()
        .filter(|(date, _)| *date == commute_date)
        .map(|(_, point)| *point)
        .collect();

    let temperatures: Vec<f64> =
        day_points.iter().filter_map(|p| p.air_temperature).collect();
    if temperatures.is_empty() {
        return None;
    }
    let mean_temperature = temperatures.iter().sum::<f64>() / temperatures.len() as f64;

    let max_probability = day_points
        .iter()
        .map(|p| p.precipitation_probability.unwrap_or(0.0))
        .fold(0.0, f64::max);
    let max_amount = day_points
        .iter()
        .map(|p| p.precipitation_amount.unwrap_or(0.0))
        .fold(0.0, f64::max);

    let needs_rain_gear = max_probability > config.precipitation_probability_threshold
        || max_amount > config.precipitation_amount_threshold;

    Some(Recommendation {
        needs_rain_gear,
        clothing_level: classify(mean_temperature, config),
        temperature_c: mean_temperature,
        precipitation_probability: max_probability,
        precipitation_amount: max_amount,
        rain_for_later: false,
        commute_label: commute_label.to_string(),
        date: commute_date,
        day_label: day_label(commute_date, today),
    })
}

fn window_label(kind: &str, start_hour: u32, end_hour: u32) -> String {
    format!("{kind} commute ({} - {})", format_hour(start_hour), format_hour(end_hour))
}

/// Analyze both daily commutes and apply the cross-window rain rule.
///
/// The morning window is only analyzed while it has not yet fully elapsed
/// today; otherwise the morning card would show tomorrow's commute all
/// evening. The evening window is always analyzed and rolls to tomorrow on
/// its own once today's window has passed.
///
/// Rain-for-later: a dry morning ahead of a rainy evening is replaced by a
/// copy flagged `rain_for_later`, carrying the evening precipitation figures
/// so the advice cites the rain the rider will actually meet. A morning that
/// already needs rain gear keeps its own figures.
pub fn analyze_commutes(
    forecast: &[ForecastPoint],
    config: &AppConfig,
    now: DateTime<Utc>,
) -> CommuteRecommendations {
    let current_hour = now.with_timezone(&config.timezone).hour();

    let morning = if current_hour < config.morning_end_hour {
        analyze_window(
            forecast,
            config.morning_start_hour,
            config.morning_end_hour,
            &window_label("Morning", config.morning_start_hour, config.morning_end_hour),
            config,
            now,
        )
    } else {
        None
    };

    let evening = analyze_window(
        forecast,
        config.evening_start_hour,
        config.evening_end_hour,
        &window_label("Evening", config.evening_start_hour, config.evening_end_hour),
        config,
        now,
    );

    let evening_rain = evening.as_ref().filter(|e| e.needs_rain_gear);
    let morning = match (morning, evening_rain) {
        (Some(m), Some(e)) if !m.needs_rain_gear => Some(Recommendation {
            needs_rain_gear: true,
            rain_for_later: true,
            precipitation_probability: e.precipitation_probability,
            precipitation_amount: e.precipitation_amount,
            ..m
        }),
        (morning, _) => morning,
    };

    CommuteRecommendations { morning, evening }
}
