//! Regression coefficient table
//!
//! Each indicator is an affine function of the other five. The table is
//! plain data so it can be inspected in tests and overridden from config.

use crate::core::error::{ExplorerError, Result};
use crate::core::types::FieldId;
use crate::indicators::IndicatorVector;
use serde::{Deserialize, Serialize};

/// `value = intercept + sum(weights[i] * vector[i])`
///
/// Weights are indexed by `FieldId::index()`. The weight on the field's own
/// slot is always zero. Evaluation saturates at `±f64::MAX` so that any finite
/// input yields a finite output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equation {
    pub intercept: f64,
    pub weights: [f64; 6],
}

impl Equation {
    pub const fn new(intercept: f64, weights: [f64; 6]) -> Self {
        Self { intercept, weights }
    }

    pub fn evaluate(&self, v: &IndicatorVector) -> f64 {
        self.weights
            .iter()
            .zip(v.to_array())
            .fold(self.intercept, |acc, (w, x)| saturate(acc + saturate(w * x)))
    }

    pub fn weight(&self, input: FieldId) -> f64 {
        self.weights[input.index()]
    }
}

fn saturate(x: f64) -> f64 {
    x.clamp(f64::MIN, f64::MAX)
}

/// One equation per indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoefficientTable {
    pub life_expectancy: Equation,
    pub air_quality: Equation,
    pub water_quality: Equation,
    pub population_growth: Equation,
    pub gdp: Equation,
    pub carbon_emissions: Equation,
}

//                                      LE         AQ        WQ         PG          GDP      CO2
const LIFE_EXPECTANCY: Equation =
    Equation::new(55.1562, [0.0, 0.0081, 0.1147, -3.9004, 0.0009, 0.0048]);
const AIR_QUALITY: Equation =
    Equation::new(3.7091, [2.7131, 0.0, 1.2923, -26.3698, -0.0366, 0.0017]);
const WATER_QUALITY: Equation =
    Equation::new(-47.0764, [1.3957, 0.0471, 0.0, 3.0430, 0.0023, -0.0010]);
const POPULATION_GROWTH: Equation =
    Equation::new(5.2874, [-0.0545, -0.0011, 0.0035, 0.0, -0.0001, -0.0003]);
const GDP: Equation =
    Equation::new(-3208.9994, [143.6661, -16.5578, 28.7421, -1246.5250, 0.0, -1.6768]);
const CARBON_EMISSIONS: Equation =
    Equation::new(2772.8667, [70.3028, 0.0762, -1.2057, -281.6896, -0.1628, 0.0]);

impl CoefficientTable {
    /// The fixed calibration constants
    pub fn calibrated() -> Self {
        Self {
            life_expectancy: LIFE_EXPECTANCY,
            air_quality: AIR_QUALITY,
            water_quality: WATER_QUALITY,
            population_growth: POPULATION_GROWTH,
            gdp: GDP,
            carbon_emissions: CARBON_EMISSIONS,
        }
    }

    pub fn equation(&self, field: FieldId) -> &Equation {
        match field {
            FieldId::LifeExpectancy => &self.life_expectancy,
            FieldId::AirQuality => &self.air_quality,
            FieldId::WaterQuality => &self.water_quality,
            FieldId::PopulationGrowth => &self.population_growth,
            FieldId::Gdp => &self.gdp,
            FieldId::CarbonEmissions => &self.carbon_emissions,
        }
    }

    /// Raw (unclamped) regression output for `field`
    pub fn evaluate(&self, field: FieldId, v: &IndicatorVector) -> f64 {
        self.equation(field).evaluate(v)
    }

    /// Carbon emissions derived from the five primary fields, floored at zero
    pub fn derive_carbon(&self, v: &IndicatorVector) -> f64 {
        self.carbon_emissions.evaluate(v).max(0.0)
    }

    /// Every coefficient finite, no self-dependence
    pub fn validate(&self) -> Result<()> {
        for field in FieldId::ALL {
            let eq = self.equation(field);
            if !eq.intercept.is_finite() || eq.weights.iter().any(|w| !w.is_finite()) {
                return Err(ExplorerError::ConfigError(format!(
                    "{} equation has a non-finite coefficient",
                    field
                )));
            }
            if eq.weight(field) != 0.0 {
                return Err(ExplorerError::ConfigError(format!(
                    "{} equation must not depend on itself",
                    field
                )));
            }
        }
        Ok(())
    }
}

impl Default for CoefficientTable {
    fn default() -> Self {
        Self::calibrated()
    }
}
