//! Integration tests for the indicator store
//!
//! These tests verify baseline lookup end to end:
//! - Unknown countries degrade to the default vector
//! - Missing carbon values are derived with the engine's equation
//! - Datasets load from disk through the config layer

use indicator_explorer::core::config::ExplorerConfig;
use indicator_explorer::core::types::FieldId;
use indicator_explorer::engine::CoefficientTable;
use indicator_explorer::IndicatorStore;

const DATASET: &str = r#"
[[country]]
name = "Zembla"
lifeExpectancy = 64.0
airQuality = 38.0
waterQuality = 44.0
populationGrowth = 2.6
gdp = 1200.0

[[country]]
name = "Elbonia"
lifeExpectancy = 61.0
airQuality = 30.0
waterQuality = 35.0
populationGrowth = 3.1
gdp = 700.0
carbonEmissions = 0.2
"#;

#[test]
fn test_nonexistent_country_returns_documented_default() {
    let store = IndicatorStore::builtin().unwrap();
    let v = store.get_baseline("Nonexistent Country XYZ");
    assert_eq!(v.life_expectancy, 75.0);
    assert_eq!(v.air_quality, 50.0);
    assert_eq!(v.water_quality, 50.0);
    assert_eq!(v.population_growth, 2.0);
    assert_eq!(v.gdp, 25_000.0);
    assert_eq!(v.carbon_emissions, 5.0);
}

#[test]
fn test_derived_carbon_matches_formula() {
    let store = IndicatorStore::from_toml_str(DATASET).unwrap();
    let v = store.get_baseline("Zembla");
    let raw = 2772.8667 + 70.3028 * 64.0 + 0.0762 * 38.0 - 1.2057 * 44.0 - 281.6896 * 2.6
        - 0.1628 * 1200.0;
    assert!((v.carbon_emissions - f64::max(0.0, raw)).abs() < 1e-9);
}

#[test]
fn test_derived_carbon_uses_store_table() {
    let mut table = CoefficientTable::calibrated();
    table.carbon_emissions.intercept = -2772.8667;
    let store = IndicatorStore::from_toml_str_with(DATASET, table.clone()).unwrap();
    let v = store.get_baseline("Zembla");
    assert_eq!(v.carbon_emissions, table.derive_carbon(&v));
}

#[test]
fn test_list_countries_sorted_ascending() {
    let store = IndicatorStore::from_toml_str(DATASET).unwrap();
    assert_eq!(store.list_countries(), vec!["Elbonia", "Zembla"]);
}

#[test]
fn test_builtin_baselines_are_finite_and_non_negative_carbon() {
    let store = IndicatorStore::builtin().unwrap();
    for name in store.list_countries() {
        let v = store.get_baseline(&name);
        assert!(v.validate().is_ok(), "{}", name);
        assert!(v.get(FieldId::CarbonEmissions) >= 0.0, "{}", name);
    }
}

#[test]
fn test_dataset_loads_from_config_path() {
    let path = std::env::temp_dir().join(format!(
        "indicator-explorer-dataset-{}.toml",
        std::process::id()
    ));
    std::fs::write(&path, DATASET).unwrap();

    let config_text = format!("[data]\ncountries = {:?}\n", path.to_string_lossy());
    let config = ExplorerConfig::from_toml_str(&config_text).unwrap();
    let store = config.build_store().unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(store.len(), 2);
    assert_eq!(store.get_baseline("Elbonia").carbon_emissions, 0.2);
    assert!(!store.contains("Canada"));
}

#[test]
fn test_missing_dataset_file_is_io_error() {
    let config = ExplorerConfig::from_toml_str(
        "[data]\ncountries = \"/definitely/not/here/countries.toml\"\n",
    )
    .unwrap();
    let err = config.build_store().unwrap_err();
    assert!(err.to_string().starts_with("IO error"));
}
