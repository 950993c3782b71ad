use crate::{
    config::AppConfig,
    model::ForecastPoint,
    provider::{metno::MetNoProvider, smhi::SmhiProvider},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod metno;
pub mod smhi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Smhi,
    MetNo,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Smhi => "smhi",
            ProviderId::MetNo => "metno",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::Smhi, ProviderId::MetNo]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "smhi" => Ok(ProviderId::Smhi),
            "metno" => Ok(ProviderId::MetNo),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: smhi, metno."
            )),
        }
    }
}

/// A source of hourly forecast data for a geographic point.
///
/// Implementations normalize their payloads into [`ForecastPoint`]s; missing
/// measurements stay absent rather than being zeroed, and entries with
/// unparseable timestamps are dropped rather than failing the whole fetch.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> anyhow::Result<Vec<ForecastPoint>>;
}

/// Construct a provider for an explicit ProviderId.
pub fn provider_for(id: ProviderId) -> Box<dyn ForecastProvider> {
    match id {
        ProviderId::Smhi => Box::new(SmhiProvider::new()),
        ProviderId::MetNo => Box::new(MetNoProvider::new()),
    }
}

/// Construct the provider named by the config's `default_provider` field.
pub fn default_provider_from_config(
    config: &AppConfig,
) -> anyhow::Result<Box<dyn ForecastProvider>> {
    let id = config.default_provider_id()?;
    Ok(provider_for(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let s = id.as_str();
            let parsed = ProviderId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn provider_id_is_case_insensitive() {
        let parsed = ProviderId::try_from("SMHI").expect("uppercase id");
        assert_eq!(parsed, ProviderId::Smhi);
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn default_provider_from_config_with_defaults() {
        let cfg = AppConfig::default();
        assert!(default_provider_from_config(&cfg).is_ok());
    }

    #[test]
    fn default_provider_from_config_rejects_unknown_name() {
        let mut cfg = AppConfig::default();
        cfg.default_provider = Some("yr".to_string());

        let err = default_provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }
}
