use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::model::ForecastPoint;

use super::ForecastProvider;

const BASE_URL: &str = "https://opendata-download-metfcst.smhi.se/api";

/// SMHI open point-forecast API. Keyless; coordinates are truncated to four
/// decimals, the maximum precision the API accepts.
#[derive(Debug, Clone)]
pub struct SmhiProvider {
    http: Client,
}

impl SmhiProvider {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }
}

impl Default for SmhiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct SmhiResponse {
    #[serde(rename = "timeSeries")]
    time_series: Vec<SmhiTimeSeries>,
}

#[derive(Debug, Deserialize)]
struct SmhiTimeSeries {
    time: String,
    data: SmhiData,
}

#[derive(Debug, Deserialize)]
struct SmhiData {
    air_temperature: Option<f64>,
    probability_of_precipitation: Option<f64>,
    precipitation_amount_mean: Option<f64>,
}

/// Parse an SMHI payload into normalized forecast points. Entries with an
/// unparseable timestamp are dropped.
fn parse_forecast(body: &str) -> Result<Vec<ForecastPoint>> {
    let parsed: SmhiResponse =
        serde_json::from_str(body).context("Failed to parse SMHI forecast JSON")?;

    let points = parsed
        .time_series
        .into_iter()
        .filter_map(|entry| {
            let time = DateTime::parse_from_rfc3339(&entry.time).ok()?.with_timezone(&Utc);
            Some(ForecastPoint {
                time,
                air_temperature: entry.data.air_temperature,
                precipitation_probability: entry.data.probability_of_precipitation,
                precipitation_amount: entry.data.precipitation_amount_mean,
            })
        })
        .collect();

    Ok(points)
}

#[async_trait]
impl ForecastProvider for SmhiProvider {
    async fn fetch_forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<ForecastPoint>> {
        let url = format!(
            "{BASE_URL}/category/snow1g/version/1/geotype/point/lon/{longitude:.4}/lat/{latitude:.4}/data.json"
        );

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to send request to SMHI")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read SMHI response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "SMHI forecast request failed with status {}: {}",
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
