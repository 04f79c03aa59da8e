//! Core type definitions used throughout the codebase

use crate::core::error::ExplorerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies one of the six tracked indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    LifeExpectancy,
    AirQuality,
    WaterQuality,
    PopulationGrowth,
    Gdp,
    CarbonEmissions,
}

impl FieldId {
    /// All fields, in storage order
    pub const ALL: [FieldId; 6] = [
        FieldId::LifeExpectancy,
        FieldId::AirQuality,
        FieldId::WaterQuality,
        FieldId::PopulationGrowth,
        FieldId::Gdp,
        FieldId::CarbonEmissions,
    ];

    /// The five user-adjustable fields, in slider order
    pub const PRIMARY: [FieldId; 5] = [
        FieldId::LifeExpectancy,
        FieldId::AirQuality,
        FieldId::WaterQuality,
        FieldId::PopulationGrowth,
        FieldId::Gdp,
    ];

    /// Position of this field in `ALL` (and in coefficient rows)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable camelCase identifier
    pub fn id(self) -> &'static str {
        match self {
            FieldId::LifeExpectancy => "lifeExpectancy",
            FieldId::AirQuality => "airQuality",
            FieldId::WaterQuality => "waterQuality",
            FieldId::PopulationGrowth => "populationGrowth",
            FieldId::Gdp => "gdp",
            FieldId::CarbonEmissions => "carbonEmissions",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            FieldId::LifeExpectancy => "Life Expectancy",
            FieldId::AirQuality => "Air Quality",
            FieldId::WaterQuality => "Water Quality",
            FieldId::PopulationGrowth => "Population Growth",
            FieldId::Gdp => "GDP per capita",
            FieldId::CarbonEmissions => "Carbon Emissions",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            FieldId::LifeExpectancy => "years",
            FieldId::AirQuality | FieldId::WaterQuality => "index",
            FieldId::PopulationGrowth => "%",
            FieldId::Gdp => "USD per capita",
            FieldId::CarbonEmissions => "t CO2 per capita",
        }
    }

    /// Declared valid range for this field
    pub fn range(self) -> ValueRange {
        match self {
            FieldId::LifeExpectancy => ValueRange::new(50.0, 100.0),
            FieldId::AirQuality | FieldId::WaterQuality => ValueRange::new(0.0, 100.0),
            FieldId::PopulationGrowth => ValueRange::new(-5.0, 5.0),
            FieldId::Gdp => ValueRange::new(0.0, 150_000.0),
            FieldId::CarbonEmissions => ValueRange::new(0.0, f64::INFINITY),
        }
    }

    /// Carbon emissions is always derived, never user-adjustable
    pub fn is_primary(self) -> bool {
        self != FieldId::CarbonEmissions
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for FieldId {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['_', '-', ' '], "");
        let field = match key.as_str() {
            "lifeexpectancy" | "le" | "life" => FieldId::LifeExpectancy,
            "airquality" | "aq" | "air" => FieldId::AirQuality,
            "waterquality" | "wq" | "water" => FieldId::WaterQuality,
            "populationgrowth" | "pg" | "population" => FieldId::PopulationGrowth,
            "gdp" | "gdppercapita" => FieldId::Gdp,
            "carbonemissions" | "co2" | "carbon" => FieldId::CarbonEmissions,
            _ => {
                return Err(ExplorerError::InvalidInput(format!(
                    "unknown indicator '{}'",
                    s
                )))
            }
        };
        Ok(field)
    }
}

/// The field a prediction holds fixed, or `None` for a full preview pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Field(FieldId),
    None,
}

impl Source {
    /// True if `field` is the one being held fixed
    pub fn holds(self, field: FieldId) -> bool {
        matches!(self, Source::Field(f) if f == field)
    }
}

impl From<FieldId> for Source {
    fn from(field: FieldId) -> Self {
        Source::Field(field)
    }
}

impl FromStr for Source {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("none") {
            Ok(Source::None)
        } else {
            s.parse().map(Source::Field)
        }
    }
}

/// Closed interval; `max` may be infinite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}
