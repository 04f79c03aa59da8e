//! Fixed-round solver for the coupled indicator equations
//!
//! Carbon emissions depends on the five primary fields and every primary
//! field depends on carbon emissions, so a single pass is not
//! self-consistent. The solver runs a fixed number of Jacobi rounds over a
//! per-round snapshot; the round count is a cap, not a convergence test.

use crate::core::error::{ExplorerError, Result};
use crate::core::types::{FieldId, Source};
use crate::engine::coefficients::CoefficientTable;
use crate::indicators::IndicatorVector;

/// Rounds used by the calibrated engine
pub const DEFAULT_ROUNDS: u32 = 3;

/// Stateless predictor; cheap to share across threads
#[derive(Debug, Clone)]
pub struct PredictionEngine {
    table: CoefficientTable,
    rounds: u32,
}

impl PredictionEngine {
    pub fn new(table: CoefficientTable, rounds: u32) -> Result<Self> {
        table.validate()?;
        if rounds == 0 {
            return Err(ExplorerError::ConfigError(
                "prediction rounds must be at least 1".into(),
            ));
        }
        Ok(Self { table, rounds })
    }

    pub fn table(&self) -> &CoefficientTable {
        &self.table
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Resolve every field not held by `source`, then clamp.
    ///
    /// The held field is returned bit-for-bit as supplied.
    pub fn predict(&self, input: &IndicatorVector, source: Source) -> Result<IndicatorVector> {
        input.validate()?;
        if let Source::Field(field) = source {
            let held = input.get(field);
            if !field.range().contains(held) {
                return Err(ExplorerError::InvalidInput(format!(
                    "{} = {} is outside [{}, {}]",
                    field,
                    held,
                    field.range().min,
                    field.range().max
                )));
            }
        }

        let mut current = *input;
        for _ in 0..self.rounds {
            current = self.round(&current, source);
        }
        let output = clamp_outputs(current, source);
        debug_assert!(output.validate().is_ok() && output.in_range());

        tracing::debug!(
            ?source,
            rounds = self.rounds,
            carbon = output.carbon_emissions,
            "prediction resolved"
        );
        Ok(output)
    }

    /// Slider handler: set `field` to `value` and predict everything else
    pub fn apply_change(
        &self,
        vector: &IndicatorVector,
        field: FieldId,
        value: f64,
    ) -> Result<IndicatorVector> {
        self.predict(&vector.with(field, value), Source::Field(field))
    }

    /// Full pass with nothing held fixed
    pub fn preview(&self, vector: &IndicatorVector) -> Result<IndicatorVector> {
        self.predict(vector, Source::None)
    }

    /// One round: carbon first from the snapshot, then every free primary
    /// field from the snapshot's primaries plus the fresh carbon value.
    fn round(&self, snapshot: &IndicatorVector, source: Source) -> IndicatorVector {
        let mut inputs = *snapshot;
        if !source.holds(FieldId::CarbonEmissions) {
            inputs.carbon_emissions = self.table.evaluate(FieldId::CarbonEmissions, snapshot);
        }

        let mut next = inputs;
        for field in FieldId::PRIMARY {
            if !source.holds(field) {
                next.set(field, self.table.evaluate(field, &inputs));
            }
        }
        next
    }
}

impl Default for PredictionEngine {
    fn default() -> Self {
        Self {
            table: CoefficientTable::calibrated(),
            rounds: DEFAULT_ROUNDS,
        }
    }
}

/// Clamp every field except the held source into its declared range
fn clamp_outputs(mut v: IndicatorVector, source: Source) -> IndicatorVector {
    for field in FieldId::ALL {
        if !source.holds(field) {
            v.set(field, field.range().clamp(v.get(field)));
        }
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> IndicatorVector {
        IndicatorVector::new(75.0, 50.0, 50.0, 2.0, 25_000.0, 5.0)
    }

    #[test]
    fn test_source_is_held_exactly() {
        let engine = PredictionEngine::default();
        let out = engine
            .apply_change(&baseline(), FieldId::LifeExpectancy, 80.0)
            .unwrap();
        assert_eq!(out.life_expectancy, 80.0);
        assert!(out.in_range());
    }

    #[test]
    fn test_gdp_at_upper_bound() {
        let engine = PredictionEngine::default();
        let out = engine.apply_change(&baseline(), FieldId::Gdp, 150_000.0).unwrap();
        assert_eq!(out.gdp, 150_000.0);
        assert!(out.in_range());
        assert!(out.carbon_emissions >= 0.0);
    }

    #[test]
    fn test_single_round_matches_hand_computation() {
        let table = CoefficientTable::calibrated();
        let engine = PredictionEngine::new(table.clone(), 1).unwrap();
        let v = baseline();
        let out = engine.predict(&v, Source::Field(FieldId::Gdp)).unwrap();

        let carbon = table.evaluate(FieldId::CarbonEmissions, &v);
        let inputs = v.with(FieldId::CarbonEmissions, carbon);
        let le = table.evaluate(FieldId::LifeExpectancy, &inputs);
        assert_eq!(out.life_expectancy, FieldId::LifeExpectancy.range().clamp(le));
        assert_eq!(out.carbon_emissions, carbon.max(0.0));
    }

    #[test]
    fn test_carbon_as_source_recomputes_primaries() {
        let engine = PredictionEngine::default();
        let v = baseline().with(FieldId::CarbonEmissions, 12.0);
        let out = engine
            .predict(&v, Source::Field(FieldId::CarbonEmissions))
            .unwrap();
        assert_eq!(out.carbon_emissions, 12.0);
        assert!(out.in_range());
    }

    #[test]
    fn test_none_source_recomputes_everything() {
        let engine = PredictionEngine::default();
        let out = engine.preview(&baseline()).unwrap();
        assert!(out.in_range());
        assert_ne!(out, baseline());
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let engine = PredictionEngine::default();
        let v = baseline().with(FieldId::WaterQuality, f64::NAN);
        let err = engine.predict(&v, Source::None).unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidInput(_)));
    }

    #[test]
    fn test_out_of_range_source_rejected() {
        let engine = PredictionEngine::default();
        assert!(engine
            .apply_change(&baseline(), FieldId::PopulationGrowth, 7.5)
            .is_err());
        assert!(engine
            .apply_change(&baseline(), FieldId::CarbonEmissions, -1.0)
            .is_err());
    }

    #[test]
    fn test_extreme_held_carbon_stays_in_range() {
        let engine = PredictionEngine::default();
        for carbon in [1.0e300, 1.0e307, f64::MAX] {
            let v = baseline().with(FieldId::CarbonEmissions, carbon);
            let out = engine
                .predict(&v, Source::Field(FieldId::CarbonEmissions))
                .unwrap();
            assert_eq!(out.carbon_emissions, carbon);
            assert!(out.in_range(), "carbon = {}", carbon);
        }
    }

    #[test]
    fn test_explosive_table_saturates_then_clamps() {
        let mut table = CoefficientTable::calibrated();
        table.gdp.weights[FieldId::LifeExpectancy.index()] = 1.0e300;
        table.life_expectancy.weights[FieldId::Gdp.index()] = 1.0e300;
        let engine = PredictionEngine::new(table, 3).unwrap();
        let out = engine.preview(&baseline()).unwrap();
        assert!(out.validate().is_ok());
        assert!(out.in_range());
    }

    #[test]
    fn test_zero_rounds_rejected() {
        assert!(PredictionEngine::new(CoefficientTable::calibrated(), 0).is_err());
    }

    #[test]
    fn test_deterministic() {
        let engine = PredictionEngine::default();
        let a = engine.apply_change(&baseline(), FieldId::AirQuality, 31.4).unwrap();
        let b = engine.apply_change(&baseline(), FieldId::AirQuality, 31.4).unwrap();
        assert_eq!(a.to_array().map(f64::to_bits), b.to_array().map(f64::to_bits));
    }
}
