//! Indicator sweep
//!
//! Moves one indicator across its range in fixed steps and prints the
//! predicted response of every other indicator. With `--all` the sweep runs
//! for every country in the dataset in parallel.

use clap::Parser;
use indicator_explorer::core::config::ExplorerConfig;
use indicator_explorer::core::error::{ExplorerError, Result};
use indicator_explorer::core::types::FieldId;
use indicator_explorer::{IndicatorStore, IndicatorVector, PredictionEngine};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;

/// Sweep one indicator and record how the rest respond
#[derive(Parser, Debug)]
#[command(name = "sweep")]
#[command(about = "Sweep an indicator across its range and print predictions")]
struct Args {
    /// Indicator to move (lifeExpectancy, airQuality, waterQuality, populationGrowth, gdp)
    #[arg(long)]
    field: String,

    /// Country whose baseline is the starting point
    #[arg(long, default_value = "United States")]
    country: String,

    /// Sweep every country in the dataset
    #[arg(long, default_value_t = false)]
    all: bool,

    /// Number of points across the range
    #[arg(long, default_value_t = 11)]
    steps: usize,

    /// Emit JSON instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Serialize)]
struct SweepPoint {
    value: f64,
    predicted: IndicatorVector,
}

#[derive(Serialize)]
struct CountrySweep {
    country: String,
    field: FieldId,
    baseline: IndicatorVector,
    points: Vec<SweepPoint>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("indicator_explorer=warn")
        .init();

    let args = Args::parse();
    let field: FieldId = args.field.parse()?;
    if !field.is_primary() {
        return Err(ExplorerError::InvalidInput(
            "carbonEmissions is derived and cannot be swept".into(),
        ));
    }
    if args.steps < 2 {
        return Err(ExplorerError::InvalidInput("steps must be at least 2".into()));
    }

    let config = match &args.config {
        Some(path) => ExplorerConfig::load(path)?,
        None => ExplorerConfig::default(),
    };
    let store = config.build_store()?;
    let engine = config.build_engine()?;

    let countries = if args.all {
        store.list_countries()
    } else {
        vec![args.country.clone()]
    };

    // PARALLEL: each country's sweep is independent
    let sweeps: Vec<CountrySweep> = countries
        .par_iter()
        .map(|country| sweep_country(&store, &engine, country, field, args.steps))
        .collect::<Result<_>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&sweeps)?);
    } else {
        for sweep in &sweeps {
            print_table(sweep);
        }
    }

    Ok(())
}

fn sweep_country(
    store: &IndicatorStore,
    engine: &PredictionEngine,
    country: &str,
    field: FieldId,
    steps: usize,
) -> Result<CountrySweep> {
    let baseline = store.get_baseline(country);
    let range = field.range();
    let points = (0..steps)
        .map(|i| {
            let t = i as f64 / (steps - 1) as f64;
            let value = range.min + t * (range.max - range.min);
            let predicted = engine.apply_change(&baseline, field, value)?;
            Ok(SweepPoint { value, predicted })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CountrySweep {
        country: country.to_string(),
        field,
        baseline,
        points,
    })
}

fn print_table(sweep: &CountrySweep) {
    println!("\n=== {} : sweeping {} ===", sweep.country, sweep.field.label());
    println!(
        "{:>12} {:>8} {:>8} {:>8} {:>8} {:>10} {:>12}",
        "value", "LE", "AQ", "WQ", "PG", "GDP", "CO2"
    );
    for p in &sweep.points {
        let v = &p.predicted;
        println!(
            "{:>12.2} {:>8.1} {:>8.1} {:>8.1} {:>8.2} {:>10.0} {:>12.2}",
            p.value,
            v.life_expectancy,
            v.air_quality,
            v.water_quality,
            v.population_growth,
            v.gdp,
            v.carbon_emissions
        );
    }
}
