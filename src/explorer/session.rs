//! Per-user explorer state
//!
//! One session tracks the selected country and its current indicator
//! vector. Each slider change runs the engine and yields a
//! `SliderChangeEvent` that callers may hand to the explanation service.

use crate::core::error::{ExplorerError, Result};
use crate::core::types::FieldId;
use crate::engine::PredictionEngine;
use crate::indicators::{IndicatorStore, IndicatorVector};
use serde::Serialize;

/// One user-driven change, kept only long enough to request an explanation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderChangeEvent {
    pub field: FieldId,
    pub old_value: f64,
    pub new_value: f64,
    pub country: String,
    pub resulting: IndicatorVector,
}

impl SliderChangeEvent {
    pub fn change(&self) -> f64 {
        self.new_value - self.old_value
    }
}

pub struct ExplorerSession<'a> {
    store: &'a IndicatorStore,
    engine: &'a PredictionEngine,
    country: Option<String>,
    current: IndicatorVector,
    changes: u32,
}

impl<'a> ExplorerSession<'a> {
    pub fn new(store: &'a IndicatorStore, engine: &'a PredictionEngine) -> Self {
        Self {
            store,
            engine,
            country: None,
            current: IndicatorStore::default_vector(),
            changes: 0,
        }
    }

    /// Select a country and load its baseline; unknown names get the default vector
    pub fn select_country(&mut self, name: &str) -> IndicatorVector {
        self.current = self.store.get_baseline(name);
        self.country = Some(name.to_string());
        self.changes = 0;
        tracing::info!("Selected {}", name);
        self.current
    }

    /// Move one slider and re-predict every other indicator
    ///
    /// Only the five primary fields are sliders; carbon emissions is derived.
    pub fn set_indicator(&mut self, field: FieldId, value: f64) -> Result<SliderChangeEvent> {
        if !field.is_primary() {
            return Err(ExplorerError::InvalidInput(format!(
                "{} is derived and has no slider",
                field
            )));
        }
        let country = self
            .country
            .clone()
            .ok_or_else(|| ExplorerError::InvalidInput("no country selected".into()))?;

        let old_value = self.current.get(field);
        let resulting = self.engine.apply_change(&self.current, field, value)?;
        self.current = resulting;
        self.changes += 1;

        Ok(SliderChangeEvent {
            field,
            old_value,
            new_value: value,
            country,
            resulting,
        })
    }

    /// Discard all changes and reload the baseline
    pub fn reset(&mut self) -> Option<IndicatorVector> {
        let country = self.country.clone()?;
        Some(self.select_country(&country))
    }

    /// Full prediction with nothing held fixed (what the chart shows)
    pub fn preview(&self) -> Result<IndicatorVector> {
        self.engine.preview(&self.current)
    }

    /// Baseline of the selected country, for comparison
    pub fn baseline(&self) -> Option<IndicatorVector> {
        self.country.as_deref().map(|c| self.store.get_baseline(c))
    }

    pub fn current(&self) -> IndicatorVector {
        self.current
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Slider changes since the country was selected
    pub fn change_count(&self) -> u32 {
        self.changes
    }
}
