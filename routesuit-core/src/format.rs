//! Text rendering for recommendations: the per-commute advice message and
//! the compact daily notification summary. Presentation templates live here;
//! the branching they follow is part of the engine's contract.

use crate::clothing::message_for;
use crate::config::AppConfig;
use crate::model::{CommuteRecommendations, Recommendation};

/// Title and body of the daily push-style notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationText {
    pub title: String,
    pub body: String,
}

/// 12-hour AM/PM rendering of an hour-of-day, used in commute window labels.
pub fn format_hour(hour: u32) -> String {
    match hour {
        0 => "12 AM".to_string(),
        h if h < 12 => format!("{h} AM"),
        12 => "12 PM".to_string(),
        h => format!("{} PM", h - 12),
    }
}

/// Full advice text for one commute: the clothing message, then exactly one
/// rain line.
///
/// With `rain_for_later` the precipitation figures describe the evening
/// window and are always shown. A plain rain recommendation only cites the
/// figures that individually exceed their thresholds, so a trigger on amount
/// alone does not print an unremarkable probability.
pub fn recommendation_message(rec: &Recommendation, config: &AppConfig) -> String {
    let mut message = message_for(rec.clothing_level, config).to_string();
    message.push('\n');

    if rec.needs_rain_gear {
        if rec.rain_for_later {
            message.push_str(&format!(
                "Bring rain clothes for the trip home: {}% chance of rain, {:.1} mm expected.",
                rec.precipitation_probability as i64,
                rec.precipitation_amount,
            ));
        } else {
            message.push_str("Bring rain clothes.");
            if rec.precipitation_probability > config.precipitation_probability_threshold {
                message.push_str(&format!(
                    " {}% chance of rain.",
                    rec.precipitation_probability as i64
                ));
            }
            if rec.precipitation_amount > config.precipitation_amount_threshold {
                message.push_str(&format!(" {:.1} mm expected.", rec.precipitation_amount));
            }
        }
    } else {
        message.push_str("No rain expected.");
    }

    message
}

/// Compact two-line summary of both commutes for the daily notification.
/// `None` when neither window produced a recommendation.
pub fn notification_summary(recs: &CommuteRecommendations) -> Option<NotificationText> {
    if recs.morning.is_none() && recs.evening.is_none() {
        return None;
    }

    let mut body = String::new();
    if let Some(morning) = &recs.morning {
        body.push_str(&format!("To work: {:.1}°C", morning.temperature_c));
        if morning.needs_rain_gear {
            if morning.rain_for_later {
                body.push_str(", bring rain gear for later");
            } else {
                body.push_str(", rain clothes needed");
            }
        }
        if recs.evening.is_some() {
            body.push('\n');
        }
    }
    if let Some(evening) = &recs.evening {
        body.push_str(&format!("From work: {:.1}°C", evening.temperature_c));
        if evening.needs_rain_gear {
            body.push_str(", rain clothes needed");
        }
    }

    let title = if recs.any_needs_rain_gear() {
        "Bring rain clothes today!"
    } else {
        "Weather update"
    };

    Some(NotificationText { title: title.to_string(), body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clothing::ClothingLevel;
    use chrono::NaiveDate;

    fn rec(
        needs_rain_gear: bool,
        rain_for_later: bool,
        probability: f64,
        amount: f64,
    ) -> Recommendation {
        Recommendation {
            needs_rain_gear,
            clothing_level: ClothingLevel::Mild,
            temperature_c: 12.0,
            precipitation_probability: probability,
            precipitation_amount: amount,
            rain_for_later,
            commute_label: "Morning commute (7 AM - 9 AM)".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            day_label: "Today".to_string(),
        }
    }

    #[test]
    fn hour_display_covers_the_clock() {
        assert_eq!(format_hour(0), "12 AM");
        assert_eq!(format_hour(7), "7 AM");
        assert_eq!(format_hour(11), "11 AM");
        assert_eq!(format_hour(12), "12 PM");
        assert_eq!(format_hour(16), "4 PM");
        assert_eq!(format_hour(23), "11 PM");
    }

    #[test]
    fn dry_commute_message() {
        let cfg = AppConfig::default();
        let msg = recommendation_message(&rec(false, false, 10.0, 0.0), &cfg);

        assert_eq!(msg, "Long sleeves and a light jacket\nNo rain expected.");
    }

    #[test]
    fn rain_message_cites_both_figures_when_both_exceed() {
        let cfg = AppConfig::default();
        let msg = recommendation_message(&rec(true, false, 75.0, 2.3), &cfg);

        assert_eq!(
            msg,
            "Long sleeves and a light jacket\nBring rain clothes. 75% chance of rain. 2.3 mm expected."
        );
    }

    #[test]
    fn rain_message_omits_figures_under_their_thresholds() {
        let cfg = AppConfig::default();

        // Triggered by amount alone; the 30% probability stays quiet.
        let msg = recommendation_message(&rec(true, false, 30.0, 1.2), &cfg);
        assert_eq!(
            msg,
            "Long sleeves and a light jacket\nBring rain clothes. 1.2 mm expected."
        );

        // Triggered by probability alone.
        let msg = recommendation_message(&rec(true, false, 80.0, 0.2), &cfg);
        assert_eq!(
            msg,
            "Long sleeves and a light jacket\nBring rain clothes. 80% chance of rain."
        );
    }

    #[test]
    fn rain_for_later_message_always_cites_evening_figures() {
        let cfg = AppConfig::default();
        let msg = recommendation_message(&rec(true, true, 80.0, 1.5), &cfg);

        assert_eq!(
            msg,
            "Long sleeves and a light jacket\nBring rain clothes for the trip home: 80% chance of rain, 1.5 mm expected."
        );
    }

    #[test]
    fn notification_title_reflects_rain_need() {
        let dry = CommuteRecommendations {
            morning: Some(rec(false, false, 10.0, 0.0)),
            evening: Some(rec(false, false, 10.0, 0.0)),
        };
        let text = notification_summary(&dry).expect("summary");
        assert_eq!(text.title, "Weather update");
        assert_eq!(text.body, "To work: 12.0°C\nFrom work: 12.0°C");

        let wet = CommuteRecommendations {
            morning: Some(rec(true, true, 80.0, 1.5)),
            evening: Some(rec(true, false, 80.0, 1.5)),
        };
        let text = notification_summary(&wet).expect("summary");
        assert_eq!(text.title, "Bring rain clothes today!");
        assert_eq!(
            text.body,
            "To work: 12.0°C, bring rain gear for later\nFrom work: 12.0°C, rain clothes needed"
        );
    }

    #[test]
    fn notification_absent_without_any_recommendation() {
        assert_eq!(notification_summary(&CommuteRecommendations::default()), None);
    }

    #[test]
    fn notification_with_only_evening() {
        let recs = CommuteRecommendations {
            morning: None,
            evening: Some(rec(false, false, 10.0, 0.0)),
        };

        let text = notification_summary(&recs).expect("summary");
        assert_eq!(text.body, "From work: 12.0°C");
    }
}
