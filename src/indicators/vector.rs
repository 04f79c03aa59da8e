//! Indicator vectors and country records

use crate::core::error::{ExplorerError, Result};
use crate::core::types::FieldId;
use serde::{Deserialize, Serialize};

/// The six tracked indicators for one country at one moment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorVector {
    /// Years
    pub life_expectancy: f64,
    /// Index, higher is better
    pub air_quality: f64,
    /// Index, higher is better
    pub water_quality: f64,
    /// Percent per year
    pub population_growth: f64,
    /// USD per capita
    pub gdp: f64,
    /// Metric tons CO2 per capita (always derived)
    pub carbon_emissions: f64,
}

impl IndicatorVector {
    pub fn new(
        life_expectancy: f64,
        air_quality: f64,
        water_quality: f64,
        population_growth: f64,
        gdp: f64,
        carbon_emissions: f64,
    ) -> Self {
        Self {
            life_expectancy,
            air_quality,
            water_quality,
            population_growth,
            gdp,
            carbon_emissions,
        }
    }

    pub fn get(&self, field: FieldId) -> f64 {
        match field {
            FieldId::LifeExpectancy => self.life_expectancy,
            FieldId::AirQuality => self.air_quality,
            FieldId::WaterQuality => self.water_quality,
            FieldId::PopulationGrowth => self.population_growth,
            FieldId::Gdp => self.gdp,
            FieldId::CarbonEmissions => self.carbon_emissions,
        }
    }

    pub fn set(&mut self, field: FieldId, value: f64) {
        match field {
            FieldId::LifeExpectancy => self.life_expectancy = value,
            FieldId::AirQuality => self.air_quality = value,
            FieldId::WaterQuality => self.water_quality = value,
            FieldId::PopulationGrowth => self.population_growth = value,
            FieldId::Gdp => self.gdp = value,
            FieldId::CarbonEmissions => self.carbon_emissions = value,
        }
    }

    /// Copy with one field replaced
    pub fn with(mut self, field: FieldId, value: f64) -> Self {
        self.set(field, value);
        self
    }

    /// Values in `FieldId::ALL` order
    pub fn to_array(&self) -> [f64; 6] {
        FieldId::ALL.map(|f| self.get(f))
    }

    /// Reject any non-finite field
    pub fn validate(&self) -> Result<()> {
        for field in FieldId::ALL {
            let value = self.get(field);
            if !value.is_finite() {
                return Err(ExplorerError::InvalidInput(format!(
                    "{} is not a finite number ({})",
                    field, value
                )));
            }
        }
        Ok(())
    }

    /// True if every field lies within its declared range
    pub fn in_range(&self) -> bool {
        FieldId::ALL
            .iter()
            .all(|&f| f.range().contains(self.get(f)))
    }

    /// Per-field change from `self` to `other`
    pub fn delta(&self, other: &IndicatorVector) -> Vec<(FieldId, f64)> {
        FieldId::ALL
            .iter()
            .map(|&f| (f, other.get(f) - self.get(f)))
            .collect()
    }

    /// Parse a vector from JSON, reporting missing or malformed fields as invalid input
    pub fn from_json(json: &str) -> Result<Self> {
        let vector: IndicatorVector = serde_json::from_str(json)
            .map_err(|e| ExplorerError::InvalidInput(format!("indicator vector: {}", e)))?;
        vector.validate()?;
        Ok(vector)
    }
}

/// Baseline statistics for a single country as stored in the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRecord {
    pub name: String,
    pub life_expectancy: f64,
    pub air_quality: f64,
    pub water_quality: f64,
    pub population_growth: f64,
    pub gdp: f64,
    /// Derived from the carbon equation at lookup time when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbon_emissions: Option<f64>,
}

impl CountryRecord {
    /// Vector with the given carbon value filled in
    pub fn to_vector(&self, carbon_emissions: f64) -> IndicatorVector {
        IndicatorVector::new(
            self.life_expectancy,
            self.air_quality,
            self.water_quality,
            self.population_growth,
            self.gdp,
            carbon_emissions,
        )
    }

    pub fn validate(&self) -> Result<()> {
        self.to_vector(self.carbon_emissions.unwrap_or(0.0))
            .validate()
            .map_err(|e| ExplorerError::InvalidInput(format!("{}: {}", self.name, e)))
    }
}
