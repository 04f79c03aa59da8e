//! Baseline indicator lookup by country name
//!
//! The store never fails a lookup: unknown countries resolve to
//! `IndicatorStore::default_vector()` so the explorer is never blocked on
//! missing data.

use crate::core::error::{ExplorerError, Result};
use crate::engine::CoefficientTable;
use crate::indicators::vector::{CountryRecord, IndicatorVector};
use ahash::AHashMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Dataset shipped with the crate
const BUILTIN_DATASET: &str = include_str!("../../data/countries.toml");

#[derive(Deserialize)]
struct Dataset {
    #[serde(default)]
    country: Vec<CountryRecord>,
}

/// Read-only country table, loaded once at startup
#[derive(Debug, Clone)]
pub struct IndicatorStore {
    records: AHashMap<String, CountryRecord>,
    table: CoefficientTable,
}

impl IndicatorStore {
    /// Build a store from records; duplicate or non-finite records are rejected
    pub fn from_records(records: Vec<CountryRecord>, table: CoefficientTable) -> Result<Self> {
        let mut map = AHashMap::with_capacity(records.len());
        for record in records {
            record.validate()?;
            if map.contains_key(&record.name) {
                return Err(ExplorerError::InvalidInput(format!(
                    "duplicate country '{}'",
                    record.name
                )));
            }
            map.insert(record.name.clone(), record);
        }
        Ok(Self { records: map, table })
    }

    /// Parse a `[[country]]` TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, CoefficientTable::calibrated())
    }

    pub fn from_toml_str_with(content: &str, table: CoefficientTable) -> Result<Self> {
        let dataset: Dataset = toml::from_str(content)
            .map_err(|e| ExplorerError::ConfigError(format!("invalid country dataset: {}", e)))?;
        Self::from_records(dataset.country, table)
    }

    /// Load a dataset file from disk
    pub fn load(path: &Path, table: CoefficientTable) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let store = Self::from_toml_str_with(&content, table)?;
        tracing::info!("Loaded {} countries from {}", store.len(), path.display());
        Ok(store)
    }

    /// The embedded dataset
    pub fn builtin() -> Result<Self> {
        Self::builtin_with(CoefficientTable::calibrated())
    }

    pub fn builtin_with(table: CoefficientTable) -> Result<Self> {
        let store = Self::from_toml_str_with(BUILTIN_DATASET, table)?;
        tracing::info!("Loaded {} built-in countries", store.len());
        Ok(store)
    }

    /// Fallback for countries not in the table
    pub fn default_vector() -> IndicatorVector {
        IndicatorVector::new(75.0, 50.0, 50.0, 2.0, 25_000.0, 5.0)
    }

    /// Baseline for `name`, or the default vector when unknown
    pub fn get_baseline(&self, name: &str) -> IndicatorVector {
        match self.records.get(name) {
            Some(record) => {
                let carbon = record.carbon_emissions.unwrap_or_else(|| {
                    // Same equation the engine uses, so the baseline is consistent
                    self.table.derive_carbon(&record.to_vector(0.0))
                });
                record.to_vector(carbon)
            }
            None => {
                tracing::debug!("No data for '{}', using default indicators", name);
                Self::default_vector()
            }
        }
    }

    /// Country names in ascending lexicographic order
    pub fn list_countries(&self) -> Vec<String> {
        let mut names: Vec<String> = self.records.keys().cloned().collect();
        names.sort();
        names
    }

    /// Case-insensitive match: exact name first, then a unique prefix
    pub fn find(&self, query: &str) -> Option<&str> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        if let Some(name) = self.records.keys().find(|n| n.to_lowercase() == query) {
            return Some(name.as_str());
        }
        let mut matches = self
            .records
            .keys()
            .filter(|n| n.to_lowercase().starts_with(&query));
        match (matches.next(), matches.next()) {
            (Some(name), None) => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"
[[country]]
name = "Atlantis"
lifeExpectancy = 70.0
airQuality = 40.0
waterQuality = 60.0
populationGrowth = 1.0
gdp = 9000.0

[[country]]
name = "Borduria"
lifeExpectancy = 72.5
airQuality = 35.0
waterQuality = 55.0
populationGrowth = 0.4
gdp = 14000.0
carbonEmissions = 6.5
"#;

    #[test]
    fn test_builtin_dataset_loads() {
        let store = IndicatorStore::builtin().unwrap();
        assert!(store.len() > 100);
        assert!(store.contains("Canada"));
        let canada = store.get_baseline("Canada");
        assert_eq!(canada.life_expectancy, 82.3);
        assert_eq!(canada.carbon_emissions, 14.2);
    }

    #[test]
    fn test_stored_carbon_is_returned_as_is() {
        let store = IndicatorStore::from_toml_str(SMALL).unwrap();
        assert_eq!(store.get_baseline("Borduria").carbon_emissions, 6.5);
    }

    #[test]
    fn test_missing_carbon_is_derived() {
        let store = IndicatorStore::from_toml_str(SMALL).unwrap();
        let v = store.get_baseline("Atlantis");
        let expected = (2772.8667 + 70.3028 * 70.0 + 0.0762 * 40.0 - 1.2057 * 60.0
            - 281.6896 * 1.0
            - 0.1628 * 9000.0_f64)
            .max(0.0);
        assert!((v.carbon_emissions - expected).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_country_uses_default() {
        let store = IndicatorStore::from_toml_str(SMALL).unwrap();
        assert_eq!(
            store.get_baseline("Nonexistent Country XYZ"),
            IndicatorStore::default_vector()
        );
    }

    #[test]
    fn test_list_is_sorted() {
        let store = IndicatorStore::builtin().unwrap();
        let names = store.list_countries();
        assert!(names.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(names.len(), store.len());
    }

    #[test]
    fn test_duplicate_rejected() {
        let doubled = format!("{}\n{}", SMALL, SMALL);
        assert!(IndicatorStore::from_toml_str(&doubled).is_err());
    }

    #[test]
    fn test_malformed_dataset_rejected() {
        let result = IndicatorStore::from_toml_str("[[country]]\nname = \"X\"\n");
        assert!(matches!(result, Err(ExplorerError::ConfigError(_))));
    }

    #[test]
    fn test_find() {
        let store = IndicatorStore::builtin().unwrap();
        assert_eq!(store.find("canada"), Some("Canada"));
        assert_eq!(store.find("New Zeal"), Some("New Zealand"));
        // "South" matches South Africa, South Korea, South Sudan
        assert_eq!(store.find("south"), None);
        assert_eq!(store.find(""), None);
    }
}
