use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::model::ForecastPoint;

use super::ForecastProvider;

const BASE_URL: &str = "https://api.met.no/weatherapi/locationforecast/2.0/compact";

// met.no rejects anonymous clients; an identifying User-Agent is mandatory.
const USER_AGENT: &str = concat!("routesuit/", env!("CARGO_PKG_VERSION"));

/// MET Norway locationforecast API (compact variant). Keyless.
#[derive(Debug, Clone)]
pub struct MetNoProvider {
    http: Client,
}

impl MetNoProvider {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }
}

impl Default for MetNoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct MetNoResponse {
    properties: MetNoProperties,
}

#[derive(Debug, Deserialize)]
struct MetNoProperties {
    timeseries: Vec<MetNoTimeSeries>,
}

#[derive(Debug, Deserialize)]
struct MetNoTimeSeries {
    time: String,
    data: MetNoData,
}

#[derive(Debug, Deserialize)]
struct MetNoData {
    instant: MetNoInstant,
    next_1_hours: Option<MetNoNextHour>,
}

#[derive(Debug, Deserialize)]
struct MetNoInstant {
    details: MetNoInstantDetails,
}

#[derive(Debug, Deserialize)]
struct MetNoInstantDetails {
    air_temperature: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MetNoNextHour {
    details: Option<MetNoNextHourDetails>,
}

#[derive(Debug, Deserialize)]
struct MetNoNextHourDetails {
    precipitation_amount: Option<f64>,
    probability_of_precipitation: Option<f64>,
}

/// Parse a locationforecast payload. The far end of the horizon only carries
/// six-hour blocks; those entries keep their temperature but have no
/// `next_1_hours` details, so their precipitation fields stay absent.
/// Entries with an unparseable timestamp are dropped.
fn parse_forecast(body: &str) -> Result<Vec<ForecastPoint>> {
    let parsed: MetNoResponse =
        serde_json::from_str(body).context("Failed to parse met.no forecast JSON")?;

    let points = parsed
        .properties
        .timeseries
        .into_iter()
        .filter_map(|entry| {
            let time = DateTime::parse_from_rfc3339(&entry.time).ok()?.with_timezone(&Utc);
            let next_hour = entry.data.next_1_hours.and_then(|n| n.details);
            Some(ForecastPoint {
                time,
                air_temperature: entry.data.instant.details.air_temperature,
                precipitation_probability: next_hour
                    .as_ref()
                    .and_then(|d| d.probability_of_precipitation),
                precipitation_amount: next_hour.as_ref().and_then(|d| d.precipitation_amount),
            })
        })
        .collect();

    Ok(points)
}

#[async_trait]
impl ForecastProvider for MetNoProvider {
    async fn fetch_forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<ForecastPoint>> {
        let res = self
            .http
            .get(BASE_URL)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(&[("lat", format!("{latitude:.4}")), ("lon", format!("{longitude:.4}"))])
            .send()
            .await
            .context("Failed to send request to met.no")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read met.no response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "met.no forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        parse_forecast(&body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}
