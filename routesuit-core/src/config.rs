use anyhow::{Context, Result, anyhow};
use chrono::Weekday;
use chrono_tz::Tz;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use thiserror::Error;

use crate::provider::ProviderId;

/// Violations reported by [`AppConfig::validate`].
///
/// Validation runs at the edit boundary (interactive configuration, config
/// file loading in the CLI). The engine itself never validates: a
/// misconfigured threshold cascade simply never reaches the skipped level.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} commute window must have hours in 0..=23 with start before end")]
    InvalidWindow(&'static str),
    #[error("temperature breakpoints must be strictly descending from hot to very cold")]
    UnorderedBreakpoints,
    #[error("precipitation thresholds must not be negative")]
    NegativeThreshold,
    #[error("clothing message for level {0} is empty")]
    EmptyClothingMessage(u8),
}

/// Application configuration, stored on disk as TOML.
///
/// The engine consumes this as an immutable snapshot per analysis call; it is
/// only ever mutated through the configuration surface of the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    // Forecast location.
    pub latitude: f64,
    pub longitude: f64,

    /// IANA timezone used to localize forecast timestamps and "now".
    pub timezone: Tz,

    // Commute windows, 24-hour clock, end exclusive.
    pub morning_start_hour: u32,
    pub morning_end_hour: u32,
    pub evening_start_hour: u32,
    pub evening_end_hour: u32,

    // Temperature breakpoints in °C, strictly descending. Each is the
    // exclusive lower bound of its clothing level; at or below
    // `temperature_very_cold` is level 7.
    pub temperature_hot: f64,
    pub temperature_warm: f64,
    pub temperature_mild: f64,
    pub temperature_cool: f64,
    pub temperature_cold: f64,
    pub temperature_very_cold: f64,

    /// Rain gear is advised when the peak probability over a commute window
    /// exceeds this percentage.
    pub precipitation_probability_threshold: f64,
    /// Rain gear is advised when the peak expected amount over a commute
    /// window exceeds this many millimeters.
    pub precipitation_amount_threshold: f64,

    /// User-facing clothing advice, one message per level 1..=7.
    pub clothing_messages: [String; 7],

    // Daily notification schedule.
    pub notification_hour: u32,
    pub notification_minute: u32,
    /// Weekday names ("mon".."sun"); notifications are only produced on
    /// listed days.
    pub notification_days: Vec<String>,

    /// Forecast provider id, e.g. "smhi" or "metno". Unset falls back to SMHI.
    pub default_provider: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            latitude: 57.781,
            longitude: 14.2048,
            timezone: Tz::Europe__Stockholm,
            morning_start_hour: 7,
            morning_end_hour: 9,
            evening_start_hour: 16,
            evening_end_hour: 19,
            temperature_hot: 20.0,
            temperature_warm: 15.0,
            temperature_mild: 10.0,
            temperature_cool: 5.0,
            temperature_cold: 0.0,
            temperature_very_cold: -5.0,
            precipitation_probability_threshold: 50.0,
            precipitation_amount_threshold: 0.5,
            clothing_messages: [
                "Shorts and t-shirt".to_string(),
                "T-shirt with a light jacket".to_string(),
                "Long sleeves and a light jacket".to_string(),
                "Sweater and jacket".to_string(),
                "Heavy jacket and layers".to_string(),
                "Winter coat and warm layers essential".to_string(),
                "Heavy winter gear required".to_string(),
            ],
            notification_hour: 7,
            notification_minute: 30,
            notification_days: ["mon", "tue", "wed", "thu", "fri"]
                .map(str::to_string)
                .to_vec(),
            default_provider: None,
        }
    }
}

/// Key renames between config schema versions. Earlier releases named the
/// temperature breakpoints after clothing weight; later ones name them after
/// the weather itself.
const MIGRATED_KEYS: &[(&str, &str)] = &[
    ("temperature_very_light", "temperature_hot"),
    ("temperature_light", "temperature_warm"),
    ("temperature_moderate", "temperature_mild"),
    ("temperature_warm_legacy", "temperature_cool"),
    ("temperature_very_warm", "temperature_cold"),
    ("temperature_cold_legacy", "temperature_very_cold"),
];

/// Rewrite old-schema keys in a parsed config document to their current
/// names. Runs before deserialization so the rest of the crate only ever
/// sees the current schema.
///
/// The schemas overlap on `temperature_warm` and `temperature_cold` with
/// different meanings; a document is treated as old-schema when it contains
/// any key that exists only in the old schema.
fn migrate_keys(doc: &mut toml::Table) {
    let old_schema = doc.contains_key("temperature_very_light")
        || doc.contains_key("temperature_light")
        || doc.contains_key("temperature_moderate")
        || doc.contains_key("temperature_very_warm");

    if !old_schema {
        return;
    }

    // Stash the ambiguous keys under unambiguous names first so the rename
    // table can move them without clobbering the new-schema meanings.
    if let Some(v) = doc.remove("temperature_warm") {
        doc.insert("temperature_warm_legacy".to_string(), v);
    }
    if let Some(v) = doc.remove("temperature_cold") {
        doc.insert("temperature_cold_legacy".to_string(), v);
    }

    for (old, new) in MIGRATED_KEYS {
        if let Some(value) = doc.remove(*old) {
            // An explicit new-schema value wins over a migrated one.
            doc.entry((*new).to_string()).or_insert(value);
        }
    }
}

impl AppConfig {
    /// Return the configured provider as a strongly-typed [`ProviderId`].
    ///
    /// Both supported providers are keyless open APIs, so an unconfigured
    /// provider falls back to SMHI rather than erroring.
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        match self.default_provider.as_deref() {
            Some(s) => ProviderId::try_from(s),
            None => Ok(ProviderId::Smhi),
        }
    }

    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    /// Edit-boundary validation. See [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let window_ok = |start: u32, end: u32| start < end && end <= 23;
        if !window_ok(self.morning_start_hour, self.morning_end_hour) {
            return Err(ConfigError::InvalidWindow("morning"));
        }
        if !window_ok(self.evening_start_hour, self.evening_end_hour) {
            return Err(ConfigError::InvalidWindow("evening"));
        }

        let breakpoints = [
            self.temperature_hot,
            self.temperature_warm,
            self.temperature_mild,
            self.temperature_cool,
            self.temperature_cold,
            self.temperature_very_cold,
        ];
        if breakpoints.windows(2).any(|pair| pair[0] <= pair[1]) {
            return Err(ConfigError::UnorderedBreakpoints);
        }

        if self.precipitation_probability_threshold < 0.0
            || self.precipitation_amount_threshold < 0.0
        {
            return Err(ConfigError::NegativeThreshold);
        }

        for (idx, message) in self.clothing_messages.iter().enumerate() {
            if message.trim().is_empty() {
                return Err(ConfigError::EmptyClothingMessage(idx as u8 + 1));
            }
        }

        Ok(())
    }

    /// Whether the daily notification should fire on the given weekday.
    pub fn is_notification_day(&self, weekday: Weekday) -> bool {
        self.notification_days
            .iter()
            .any(|day| day.parse::<Weekday>().is_ok_and(|d| d == weekday))
    }

    /// Load config from disk, or return defaults if no file exists yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse a TOML document, migrating old-schema keys first.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let mut doc: toml::Table = toml::from_str(contents)?;
        migrate_keys(&mut doc);
        let cfg: AppConfig = doc.try_into()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("se", "routesuit", "routesuit-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!(cfg.precipitation_probability_threshold, 50.0);
        assert_eq!(cfg.precipitation_amount_threshold, 0.5);
    }

    #[test]
    fn default_provider_falls_back_to_smhi() {
        let cfg = AppConfig::default();
        let id = cfg.default_provider_id().expect("fallback provider");
        assert_eq!(id, ProviderId::Smhi);
    }

    #[test]
    fn set_default_provider_roundtrip() {
        let mut cfg = AppConfig::default();
        cfg.set_default_provider(ProviderId::MetNo);

        let id = cfg.default_provider_id().expect("configured provider");
        assert_eq!(id, ProviderId::MetNo);
    }

    #[test]
    fn inverted_window_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.evening_start_hour = 19;
        cfg.evening_end_hour = 16;

        assert_eq!(cfg.validate(), Err(ConfigError::InvalidWindow("evening")));
    }

    #[test]
    fn out_of_range_hour_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.morning_end_hour = 24;

        assert_eq!(cfg.validate(), Err(ConfigError::InvalidWindow("morning")));
    }

    #[test]
    fn unordered_breakpoints_are_rejected() {
        let mut cfg = AppConfig::default();
        cfg.temperature_mild = 18.0;

        assert_eq!(cfg.validate(), Err(ConfigError::UnorderedBreakpoints));
    }

    #[test]
    fn empty_clothing_message_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.clothing_messages[3] = "  ".to_string();

        assert_eq!(cfg.validate(), Err(ConfigError::EmptyClothingMessage(4)));
    }

    #[test]
    fn toml_roundtrip_preserves_config() {
        let mut cfg = AppConfig::default();
        cfg.timezone = Tz::Europe__Oslo;
        cfg.precipitation_probability_threshold = 20.0;

        let toml = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed = AppConfig::from_toml(&toml).expect("parse");
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let cfg = AppConfig::from_toml("morning_start_hour = 6\n").expect("parse");

        assert_eq!(cfg.morning_start_hour, 6);
        assert_eq!(cfg.morning_end_hour, 9);
        assert_eq!(cfg.timezone, Tz::Europe__Stockholm);
    }

    #[test]
    fn old_schema_breakpoints_are_migrated() {
        let old = "\
temperature_very_light = 22.0
temperature_light = 16.0
temperature_moderate = 11.0
temperature_warm = 6.0
temperature_very_warm = 1.0
temperature_cold = -4.0
";
        let cfg = AppConfig::from_toml(old).expect("parse");

        assert_eq!(cfg.temperature_hot, 22.0);
        assert_eq!(cfg.temperature_warm, 16.0);
        assert_eq!(cfg.temperature_mild, 11.0);
        assert_eq!(cfg.temperature_cool, 6.0);
        assert_eq!(cfg.temperature_cold, 1.0);
        assert_eq!(cfg.temperature_very_cold, -4.0);
    }

    #[test]
    fn new_schema_keys_are_left_alone() {
        let new = "\
temperature_hot = 21.0
temperature_warm = 14.0
temperature_cold = -1.0
";
        let cfg = AppConfig::from_toml(new).expect("parse");

        assert_eq!(cfg.temperature_hot, 21.0);
        assert_eq!(cfg.temperature_warm, 14.0);
        assert_eq!(cfg.temperature_cold, -1.0);
        // Untouched fields keep their defaults.
        assert_eq!(cfg.temperature_very_cold, -5.0);
    }

    #[test]
    fn notification_days_match_weekdays() {
        let cfg = AppConfig::default();

        assert!(cfg.is_notification_day(Weekday::Mon));
        assert!(cfg.is_notification_day(Weekday::Fri));
        assert!(!cfg.is_notification_day(Weekday::Sat));
        assert!(!cfg.is_notification_day(Weekday::Sun));
    }

    #[test]
    fn unknown_notification_day_names_are_ignored() {
        let mut cfg = AppConfig::default();
        cfg.notification_days = vec!["notaday".to_string(), "sat".to_string()];

        assert!(cfg.is_notification_day(Weekday::Sat));
        assert!(!cfg.is_notification_day(Weekday::Mon));
    }
}
