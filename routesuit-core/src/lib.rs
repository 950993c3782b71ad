//! Core library for the `routesuit` CLI.
//!
//! This crate defines:
//! - Configuration handling (thresholds, commute windows, messages)
//! - The commute weather-recommendation engine
//! - Abstraction over forecast providers
//! - Message formatting for cards and notifications
//!
//! The engine itself (`analyze`) is pure: it maps a forecast snapshot, a
//! configuration snapshot, and an injected "now" to recommendations, with no
//! I/O and no shared state. It is used by `routesuit-cli`, but can also be
//! reused by other binaries or services.

pub mod analyze;
pub mod clothing;
pub mod config;
pub mod format;
pub mod model;
pub mod provider;

pub use analyze::{analyze_commutes, analyze_window};
pub use clothing::{ClothingLevel, classify, message_for};
pub use config::{AppConfig, ConfigError};
pub use format::{NotificationText, notification_summary, recommendation_message};
pub use model::{CommuteRecommendations, ForecastPoint, Recommendation};
pub use provider::{ForecastProvider, ProviderId};
