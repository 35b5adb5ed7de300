use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::{
    config::AppConfig,
    models::{Constructor, Driver, DriverStats},
};

use super::pricing;

/// HTTP client for the OpenF1 public API.
#[derive(Debug, Clone)]
pub struct OpenF1Client {
    http: Client,
    base_url: String,
    session_key: String,
}

impl OpenF1Client {
    /// Client for the API and session named in `config`.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("apexdraft/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session_key: config.session_key.clone(),
        })
    }

    /// Drivers in the configured session, priced and with their latest points.
    pub async fn drivers(&self) -> Result<Vec<Driver>> {
        let query = [("session_key", self.session_key.clone())];
        let (drivers, positions) = tokio::try_join!(
            self.fetch::<Vec<RawDriver>>("drivers", &query),
            self.fetch::<Vec<RawPosition>>("position", &query),
        )?;
        Ok(build_drivers(&drivers, &positions))
    }

    /// Teams in the configured session, priced and with logos.
    pub async fn constructors(&self) -> Result<Vec<Constructor>> {
        let query = [("session_key", self.session_key.clone())];
        let teams = self.fetch::<Vec<RawTeam>>("teams", &query).await?;
        Ok(build_constructors(&teams))
    }

    /// Position, points and lap summary for one driver.
    pub async fn driver_stats(&self, driver_number: u32) -> Result<DriverStats> {
        let query = [
            ("session_key", self.session_key.clone()),
            ("driver_number", driver_number.to_string()),
        ];
        let (positions, laps) = tokio::try_join!(
            self.fetch::<Vec<RawPosition>>("position", &query),
            self.fetch::<Vec<RawLap>>("laps", &query),
        )?;
        Ok(build_driver_stats(driver_number, &positions, &laps))
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "OpenF1 request");
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("failed to reach OpenF1 for {path}"))?;

        let status = response.status();
        if !status.is_success() {
            error!(path, %status, "OpenF1 request failed");
            bail!("Failed to fetch data from OpenF1 API for path: {path} ({status})");
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("failed to decode OpenF1 {path} payload"))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDriver {
    #[serde(default)]
    driver_number: Option<u32>,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    team_name: Option<String>,
    #[serde(default)]
    team_colour: Option<String>,
    #[serde(default)]
    headshot_url: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPosition {
    #[serde(default)]
    driver_number: Option<u32>,
    #[serde(default)]
    position: Option<u32>,
    #[serde(default)]
    points: Option<Value>,
    #[serde(default)]
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTeam {
    #[serde(default)]
    team_number: Option<u32>,
    #[serde(default)]
    team_name: Option<String>,
    #[serde(default)]
    team_colour: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLap {
    #[serde(default)]
    lap_number: Option<u32>,
    #[serde(default)]
    lap_duration: Option<f64>,
    #[serde(default)]
    rank_position: Option<u32>,
}

pub(crate) fn build_drivers(raw: &[RawDriver], positions: &[RawPosition]) -> Vec<Driver> {
    // Later rows win, so each driver ends up with their most recent points.
    let mut points = HashMap::new();
    for row in positions {
        if let (Some(number), Some(value)) = (row.driver_number, row.points.as_ref()) {
            if let Some(value) = value.as_f64() {
                points.insert(number, value);
            }
        }
    }

    raw.iter()
        .filter_map(|driver| {
            let Some(number) = driver.driver_number else {
                warn!(name = ?driver.full_name, "Skipping driver without a number");
                return None;
            };
            let name = driver
                .full_name
                .clone()
                .unwrap_or_else(|| format!("Driver #{number}"));
            Some(Driver {
                id: number,
                price: pricing::driver_price(&name),
                name,
                team_name: driver.team_name.clone().unwrap_or_default(),
                team_colour: normalize_colour(driver.team_colour.as_deref()),
                number: Some(number),
                headshot_url: driver.headshot_url.clone(),
                country_code: driver.country_code.clone(),
                points: points.get(&number).copied(),
            })
        })
        .collect()
}

pub(crate) fn build_constructors(raw: &[RawTeam]) -> Vec<Constructor> {
    raw.iter()
        .filter_map(|team| {
            let (Some(id), Some(name)) = (team.team_number, team.team_name.clone()) else {
                warn!(?team, "Skipping incomplete team");
                return None;
            };
            Some(Constructor {
                id,
                price: pricing::constructor_price(&name),
                logo_url: pricing::constructor_logo(&name),
                team_colour: normalize_colour(team.team_colour.as_deref()),
                name,
            })
        })
        .collect()
}

pub(crate) fn build_driver_stats(
    driver_number: u32,
    positions: &[RawPosition],
    laps: &[RawLap],
) -> DriverStats {
    let latest = positions.iter().max_by_key(|row| row.date);
    let fastest = laps
        .iter()
        .filter(|lap| lap.lap_duration.map(|d| d > 0.0).unwrap_or(false))
        .min_by(|a, b| {
            let a = a.lap_duration.unwrap_or(f64::MAX);
            let b = b.lap_duration.unwrap_or(f64::MAX);
            a.total_cmp(&b)
        });

    DriverStats {
        driver_number,
        position: latest.and_then(|row| row.position),
        points: latest
            .and_then(|row| row.points.as_ref())
            .and_then(Value::as_f64),
        fastest_lap_rank: fastest.and_then(|lap| lap.rank_position),
        fastest_lap_time: fastest
            .and_then(|lap| lap.lap_duration)
            .map(format_lap_time),
        laps_completed: laps
            .iter()
            .filter_map(|lap| lap.lap_number)
            .max()
            .unwrap_or(0),
    }
}

/// Format seconds as `m:ss.mmm`.
pub fn format_lap_time(seconds: f64) -> String {
    let total_ms = (seconds * 1000.0).round().max(0.0) as u64;
    let minutes = total_ms / 60_000;
    let secs = (total_ms / 1000) % 60;
    let millis = total_ms % 1000;
    format!("{minutes}:{secs:02}.{millis:03}")
}

static HEX_COLOUR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#?([0-9A-Fa-f]{6})$").expect("invalid colour regex"));

fn normalize_colour(input: Option<&str>) -> Option<String> {
    let value = input?.trim();
    HEX_COLOUR_RE
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::pricing::DEFAULT_PRICE, money::Price};

    #[test]
    fn builds_priced_drivers_with_points() -> Result<()> {
        let drivers: Vec<RawDriver> = serde_json::from_str(
            r#"[
                {"driver_number": 1, "full_name": "Max Verstappen", "team_name": "Red Bull Racing",
                 "team_colour": "3671c6", "headshot_url": "https://img/1.png", "country_code": "NED"},
                {"driver_number": 99, "full_name": "Test Driver", "team_name": "Alpine", "team_colour": "bad"},
                {"full_name": "No Number"}
            ]"#,
        )?;
        let positions: Vec<RawPosition> = serde_json::from_str(
            r#"[
                {"driver_number": 1, "position": 2, "points": 10, "date": "2024-03-02T15:00:00+00:00"},
                {"driver_number": 1, "position": 1, "points": 25, "date": "2024-03-02T16:00:00+00:00"},
                {"driver_number": 99, "position": 20, "points": "n/a"}
            ]"#,
        )?;

        let built = build_drivers(&drivers, &positions);
        assert_eq!(built.len(), 2);

        let max = &built[0];
        assert_eq!(max.id, 1);
        assert_eq!(max.price, Price::from_tenths(305));
        assert_eq!(max.points, Some(25.0));
        assert_eq!(max.team_colour.as_deref(), Some("3671C6"));
        assert_eq!(max.country_code.as_deref(), Some("NED"));

        let test = &built[1];
        assert_eq!(test.price, DEFAULT_PRICE);
        assert_eq!(test.points, None);
        assert_eq!(test.team_colour, None);
        Ok(())
    }

    #[test]
    fn builds_constructors_with_logos() -> Result<()> {
        let teams: Vec<RawTeam> = serde_json::from_str(
            r##"[
                {"team_number": 1, "team_name": "Ferrari", "team_colour": "#E8002D"},
                {"team_number": 2, "team_name": "Andretti"},
                {"team_name": "Nameless"}
            ]"##,
        )?;
        let built = build_constructors(&teams);
        assert_eq!(built.len(), 2);
        assert_eq!(built[0].price, Price::from_tenths(270));
        assert!(built[0].logo_url.is_some());
        assert_eq!(built[0].team_colour.as_deref(), Some("E8002D"));
        assert_eq!(built[1].price, DEFAULT_PRICE);
        assert_eq!(built[1].logo_url, None);
        Ok(())
    }

    #[test]
    fn stats_use_latest_position_and_fastest_lap() -> Result<()> {
        let positions: Vec<RawPosition> = serde_json::from_str(
            r#"[
                {"driver_number": 44, "position": 3, "points": 15, "date": "2024-03-02T16:00:00+00:00"},
                {"driver_number": 44, "position": 5, "points": 10, "date": "2024-03-02T15:00:00+00:00"}
            ]"#,
        )?;
        let laps: Vec<RawLap> = serde_json::from_str(
            r#"[
                {"lap_number": 1, "lap_duration": null},
                {"lap_number": 2, "lap_duration": 93.71, "rank_position": 4},
                {"lap_number": 3, "lap_duration": 92.4, "rank_position": 2},
                {"lap_number": 4, "lap_duration": 95.0}
            ]"#,
        )?;

        let stats = build_driver_stats(44, &positions, &laps);
        assert_eq!(stats.driver_number, 44);
        assert_eq!(stats.position, Some(3));
        assert_eq!(stats.points, Some(15.0));
        assert_eq!(stats.fastest_lap_rank, Some(2));
        assert_eq!(stats.fastest_lap_time.as_deref(), Some("1:32.400"));
        assert_eq!(stats.laps_completed, 4);
        Ok(())
    }

    #[test]
    fn stats_without_data_are_empty() {
        let stats = build_driver_stats(7, &[], &[]);
        assert_eq!(stats.position, None);
        assert_eq!(stats.fastest_lap_time, None);
        assert_eq!(stats.laps_completed, 0);
    }

    #[test]
    fn lap_times_format_as_minutes() {
        assert_eq!(format_lap_time(83.456), "1:23.456");
        assert_eq!(format_lap_time(59.9996), "1:00.000");
        assert_eq!(format_lap_time(7.05), "0:07.050");
    }
}
