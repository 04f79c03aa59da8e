//! Gather indicator context for LLM prompts
//!
//! Every prompt carries the same statistics block so the model sees the
//! full, post-prediction picture rather than only the changed indicator.

use crate::core::types::FieldId;
use crate::indicators::IndicatorVector;

/// Country statistics rendered for a prompt
pub struct IndicatorContext {
    /// Name of the selected country
    pub country: String,
    /// Current (possibly user-modified) indicators
    pub values: IndicatorVector,
    /// Baseline indicators, when known, for a "changed since" section
    pub baseline: Option<IndicatorVector>,
}

impl IndicatorContext {
    pub fn new(country: impl Into<String>, values: IndicatorVector) -> Self {
        Self {
            country: country.into(),
            values,
            baseline: None,
        }
    }

    pub fn with_baseline(mut self, baseline: IndicatorVector) -> Self {
        self.baseline = Some(baseline);
        self
    }

    /// Generate the statistics block used in every prompt
    pub fn summary(&self) -> String {
        let mut s = format!("Current statistics for {}:\n", self.country);
        s.push_str(&statistics_block(&self.values));

        if let Some(baseline) = &self.baseline {
            let changed: Vec<_> = baseline
                .delta(&self.values)
                .into_iter()
                .filter(|(_, d)| d.abs() > 1e-9)
                .collect();
            if !changed.is_empty() {
                s.push_str("\nChanged from baseline:\n");
                for (field, d) in changed {
                    s.push_str(&format!(
                        "- {}: {:+.2} (was {})\n",
                        field.label(),
                        d,
                        format_value(field, baseline.get(field))
                    ));
                }
            }
        }

        s
    }
}

/// One line per indicator, units attached
pub fn statistics_block(v: &IndicatorVector) -> String {
    FieldId::ALL
        .iter()
        .map(|&f| format!("- {}: {}\n", f.label(), format_value(f, v.get(f))))
        .collect()
}

/// Display precision and units per indicator
pub fn format_value(field: FieldId, value: f64) -> String {
    match field {
        FieldId::LifeExpectancy => format!("{:.1} years", value),
        FieldId::AirQuality | FieldId::WaterQuality => format!("{:.1}/100", value),
        FieldId::PopulationGrowth => format!("{:.2}%", value),
        FieldId::Gdp => format!("${:.0}", value),
        FieldId::CarbonEmissions => format!("{:.2} tons CO2 per capita", value),
    }
}
