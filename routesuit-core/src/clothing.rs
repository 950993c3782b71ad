use crate::config::AppConfig;

/// Seven ordered clothing categories, level 1 (lightest clothing, warmest
/// weather) through level 7 (heaviest clothing, coldest weather).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClothingLevel {
    Hot,
    Warm,
    Mild,
    Cool,
    Cold,
    VeryCold,
    Freezing,
}

impl ClothingLevel {
    /// Numeric level, 1..=7.
    pub fn level(self) -> u8 {
        match self {
            ClothingLevel::Hot => 1,
            ClothingLevel::Warm => 2,
            ClothingLevel::Mild => 3,
            ClothingLevel::Cool => 4,
            ClothingLevel::Cold => 5,
            ClothingLevel::VeryCold => 6,
            ClothingLevel::Freezing => 7,
        }
    }
}

/// Map a temperature to a clothing level using the configured breakpoints.
///
/// A strictly-greater-than cascade: level 1 when the temperature is above the
/// `hot` breakpoint, and so on down to level 7 as the catch-all. A temperature
/// exactly equal to a breakpoint falls into the colder level.
pub fn classify(temperature_c: f64, config: &AppConfig) -> ClothingLevel {
    if temperature_c > config.temperature_hot {
        ClothingLevel::Hot
    } else if temperature_c > config.temperature_warm {
        ClothingLevel::Warm
    } else if temperature_c > config.temperature_mild {
        ClothingLevel::Mild
    } else if temperature_c > config.temperature_cool {
        ClothingLevel::Cool
    } else if temperature_c > config.temperature_cold {
        ClothingLevel::Cold
    } else if temperature_c > config.temperature_very_cold {
        ClothingLevel::VeryCold
    } else {
        ClothingLevel::Freezing
    }
}

/// Configured user-facing message for a clothing level. Total over all seven
/// levels; `AppConfig` always carries seven messages.
pub fn message_for(level: ClothingLevel, config: &AppConfig) -> &str {
    &config.clothing_messages[usize::from(level.level()) - 1]
}
