//! Bike catalog models.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Kind of bike, stored upper-case in the `type` column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BikeType {
    Sport,
    Cruiser,
    Touring,
    #[default]
    Standard,
}

/// Rental status, stored upper-case in the `status` column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BikeStatus {
    #[default]
    Available,
    Booked,
    Maintenance,
}

impl BikeType {
    pub fn as_str(self) -> &'static str {
        match self {
            BikeType::Sport => "SPORT",
            BikeType::Cruiser => "CRUISER",
            BikeType::Touring => "TOURING",
            BikeType::Standard => "STANDARD",
        }
    }
}

impl BikeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BikeStatus::Available => "AVAILABLE",
            BikeStatus::Booked => "BOOKED",
            BikeStatus::Maintenance => "MAINTENANCE",
        }
    }
}

impl fmt::Display for BikeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_lowercase())
    }
}

impl fmt::Display for BikeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_lowercase())
    }
}

impl FromStr for BikeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SPORT" => Ok(BikeType::Sport),
            "CRUISER" => Ok(BikeType::Cruiser),
            "TOURING" => Ok(BikeType::Touring),
            "STANDARD" => Ok(BikeType::Standard),
            other => Err(format!("unknown bike type: {}", other)),
        }
    }
}

impl FromStr for BikeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(BikeStatus::Available),
            "BOOKED" => Ok(BikeStatus::Booked),
            "MAINTENANCE" => Ok(BikeStatus::Maintenance),
            other => Err(format!("unknown bike status: {}", other)),
        }
    }
}

// Row decoding goes through the text columns.
impl TryFrom<String> for BikeType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for BikeStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Rentable bike from the `bikes` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Bike {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub year: i32,
    #[serde(rename = "type", default)]
    #[sqlx(rename = "type", try_from = "String")]
    pub bike_type: BikeType,
    pub city: String,
    pub price_per_hour: Decimal,
    #[serde(default)]
    #[sqlx(try_from = "String")]
    pub status: BikeStatus,
}

impl Bike {
    /// Display name, e.g. "Honda CBR600RR (2023)"
    pub fn display_name(&self) -> String {
        format!("{} {} ({})", self.brand, self.model, self.year)
    }

    pub fn is_available(&self) -> bool {
        self.status == BikeStatus::Available
    }
}

/// Optional filters for listing bikes. Text filters match case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BikeFilter {
    pub city: Option<String>,
    pub brand: Option<String>,
    #[serde(rename = "type")]
    pub bike_type: Option<BikeType>,
    pub status: Option<BikeStatus>,
}

impl BikeFilter {
    pub fn matches(&self, bike: &Bike) -> bool {
        let text_matches = |wanted: &Option<String>, actual: &str| {
            wanted
                .as_deref()
                .map_or(true, |w| w.trim().eq_ignore_ascii_case(actual))
        };

        text_matches(&self.city, &bike.city)
            && text_matches(&self.brand, &bike.brand)
            && self.bike_type.map_or(true, |t| t == bike.bike_type)
            && self.status.map_or(true, |s| s == bike.status)
    }
}
