//! Jurisdictions whose public-holiday calendars are tracked.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::TrackerError;

/// Supported office locations.
#[derive(
    Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub enum Location {
    #[default]
    #[serde(rename = "UK")]
    Uk,
    #[serde(rename = "US")]
    Us,
    Mexico,
}

impl Location {
    /// Every supported location, in display order.
    pub const ALL: [Location; 3] = [Location::Uk, Location::Us, Location::Mexico];

    pub fn code(self) -> &'static str {
        match self {
            Location::Uk => "UK",
            Location::Us => "US",
            Location::Mexico => "Mexico",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Location::Uk => "United Kingdom",
            Location::Us => "United States",
            Location::Mexico => "Mexico",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Location {
    type Err = TrackerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "uk" | "united kingdom" | "gb" => Ok(Location::Uk),
            "us" | "usa" | "united states" => Ok(Location::Us),
            "mexico" | "mx" | "méxico" => Ok(Location::Mexico),
            _ => Err(TrackerError::InvalidLocation(value.to_string())),
        }
    }
}
