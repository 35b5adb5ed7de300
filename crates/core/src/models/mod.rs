#![allow(missing_docs)]

//! Shared domain models.

use serde::{Deserialize, Serialize};

use crate::money::Price;

/// A draftable driver as supplied by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    /// Unique identifier (the permanent car number).
    pub id: u32,
    /// Full display name.
    pub name: String,
    /// Name of the team the driver races for.
    pub team_name: String,
    /// Team colour as six hex digits without `#`.
    #[serde(default)]
    pub team_colour: Option<String>,
    /// Car number shown on the card.
    #[serde(default)]
    pub number: Option<u32>,
    /// Portrait image URL.
    #[serde(default)]
    pub headshot_url: Option<String>,
    /// Three-letter country code.
    #[serde(default)]
    pub country_code: Option<String>,
    /// Championship points, `None` when no ranking exists yet.
    #[serde(default)]
    pub points: Option<f64>,
    /// Draft price in millions.
    pub price: Price,
}

impl Driver {
    /// Minimal driver with only the fields the draft rules care about.
    pub fn new(id: u32, name: impl Into<String>, team_name: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            team_name: team_name.into(),
            team_colour: None,
            number: Some(id),
            headshot_url: None,
            country_code: None,
            points: None,
            price,
        }
    }

    /// Returns a user-facing label combining number and name.
    pub fn display_name(&self) -> String {
        match self.number {
            Some(number) => format!("#{number} {}", self.name),
            None => self.name.clone(),
        }
    }
}

/// A draftable team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constructor {
    /// Unique identifier.
    pub id: u32,
    /// Team name.
    pub name: String,
    /// Draft price in millions.
    pub price: Price,
    /// Team colour as six hex digits without `#`.
    #[serde(default)]
    pub team_colour: Option<String>,
    /// Team logo URL.
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl Constructor {
    /// Minimal constructor with only the fields the draft rules care about.
    pub fn new(id: u32, name: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            team_colour: None,
            logo_url: None,
        }
    }
}

/// Session statistics for a single driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverStats {
    pub driver_number: u32,
    pub position: Option<u32>,
    pub points: Option<f64>,
    pub fastest_lap_rank: Option<u32>,
    /// Fastest lap formatted as `m:ss.mmm`.
    pub fastest_lap_time: Option<String>,
    pub laps_completed: u32,
}

/// Anything that can occupy a roster slot.
pub trait Draftable: Clone {
    /// Singular noun used in user-facing messages.
    const KIND: &'static str;

    fn id(&self) -> u32;
    fn name(&self) -> &str;
    fn price(&self) -> Price;
}

impl Draftable for Driver {
    const KIND: &'static str = "driver";

    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn price(&self) -> Price {
        self.price
    }
}

impl Draftable for Constructor {
    const KIND: &'static str = "constructor";

    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn price(&self) -> Price {
        self.price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_uses_camel_case_fields() {
        let json = r#"{
            "id": 1,
            "name": "Max Verstappen",
            "teamName": "Red Bull Racing",
            "teamColour": "3671C6",
            "number": 1,
            "headshotUrl": null,
            "countryCode": "NED",
            "points": null,
            "price": 30.5
        }"#;
        let driver: Driver = serde_json::from_str(json).unwrap();
        assert_eq!(driver.team_name, "Red Bull Racing");
        assert_eq!(driver.team_colour.as_deref(), Some("3671C6"));
        assert_eq!(driver.points, None);
        assert_eq!(driver.price, Price::from_tenths(305));
        assert_eq!(driver.display_name(), "#1 Max Verstappen");
    }

    #[test]
    fn constructor_optional_fields_default() {
        let json = r#"{"id": 9, "name": "Ferrari", "price": 27}"#;
        let team: Constructor = serde_json::from_str(json).unwrap();
        assert_eq!(team.logo_url, None);
        assert_eq!(Draftable::price(&team), Price::from_tenths(270));
        assert_eq!(Constructor::KIND, "constructor");
    }
}
