//! Indicator Explorer - Entry Point
//!
//! Interactive terminal explorer: pick a country, move one indicator, and
//! watch the prediction engine update the rest. Explanations are fetched
//! from an LLM when one is configured.

use clap::Parser;
use indicator_explorer::core::config::ExplorerConfig;
use indicator_explorer::core::error::Result;
use indicator_explorer::core::types::FieldId;
use indicator_explorer::explorer::ExplorerSession;
use indicator_explorer::llm::context::{format_value, IndicatorContext};
use indicator_explorer::llm::{ExplanationService, LlmClient};
use indicator_explorer::{IndicatorStore, IndicatorVector};

use std::io::{self, Write};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

/// Explore how country indicators move together
#[derive(Parser, Debug)]
#[command(name = "indicator-explorer")]
#[command(about = "Interactive country indicator explorer")]
struct Args {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Country to select on startup
    #[arg(long)]
    country: Option<String>,
}

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("indicator_explorer=info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ExplorerConfig::load(path)?,
        None => ExplorerConfig::default(),
    }
    .with_env_overrides();
    config.validate()?;

    let store = config.build_store()?;
    let engine = config.build_engine()?;

    // Try to create LLM client (optional - works without it)
    let explainer = match LlmClient::from_settings(&config.llm) {
        Ok(client) => {
            let secondary = config.llm.fallback_model.as_deref().map(|m| client.with_model(m));
            let mut service = ExplanationService::new(client);
            if let Some(secondary) = secondary {
                service = service.with_secondary(secondary);
            }
            Some(service)
        }
        Err(e) => {
            tracing::warn!("{} - running without explanations", e);
            None
        }
    };

    tracing::info!("Indicator Explorer starting with {} countries", store.len());

    // Create the async runtime for LLM calls
    let rt = Runtime::new()?;
    let mut session = ExplorerSession::new(&store, &engine);

    print_help(explainer.is_some());

    if let Some(name) = &args.country {
        select(&mut session, &store, name);
        display_status(&session);
    }

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        let (command, rest) = match input.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (input, ""),
        };

        match command {
            "quit" | "q" => break,
            "help" | "h" => print_help(explainer.is_some()),
            "list" | "l" => {
                let names = store.list_countries();
                let filtered: Vec<_> = names
                    .iter()
                    .filter(|n| n.to_lowercase().starts_with(&rest.to_lowercase()))
                    .collect();
                for chunk in filtered.chunks(4) {
                    let row: Vec<String> = chunk.iter().map(|n| format!("{:<24}", n)).collect();
                    println!("  {}", row.join(""));
                }
            }
            "select" | "c" => {
                if rest.is_empty() {
                    println!("Usage: select <country>");
                    continue;
                }
                select(&mut session, &store, rest);
                display_status(&session);
                if let (Some(service), Some(country)) = (&explainer, session.country()) {
                    let insight = rt.block_on(service.country_insight(country, &session.current()));
                    println!("\n{}\n", insight);
                }
            }
            "set" => {
                let mut parts = rest.split_whitespace();
                let (Some(field), Some(value)) = (parts.next(), parts.next()) else {
                    println!("Usage: set <indicator> <value>");
                    continue;
                };
                let field: FieldId = match field.parse() {
                    Ok(f) => f,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                let Ok(value) = value.parse::<f64>() else {
                    println!("Not a number: {}", value);
                    continue;
                };
                let before = session.current();
                match session.set_indicator(field, value) {
                    Ok(event) => {
                        display_changes(&before, &event.resulting);
                        if let Some(service) = &explainer {
                            let facts = rt.block_on(service.slider_facts(&event));
                            println!();
                            for (i, fact) in facts.iter().enumerate() {
                                println!("  {}. {}", i + 1, fact);
                            }
                            println!();
                        }
                    }
                    Err(e) => println!("Could not apply change: {}", e),
                }
            }
            "status" | "s" => display_status(&session),
            "preview" | "p" => match session.preview() {
                Ok(predicted) => {
                    println!("Predicted values (nothing held fixed):");
                    display_bars(&predicted);
                }
                Err(e) => println!("Prediction failed: {}", e),
            },
            "reset" | "r" => match session.reset() {
                Some(_) => display_status(&session),
                None => println!("No country selected"),
            },
            "ask" => {
                let Some(country) = session.country() else {
                    println!("Select a country first");
                    continue;
                };
                let mut ctx = IndicatorContext::new(country, session.current());
                if let Some(baseline) = session.baseline() {
                    ctx = ctx.with_baseline(baseline);
                }
                match &explainer {
                    Some(service) => println!("\n{}\n", rt.block_on(service.ask(rest, &ctx))),
                    None => println!("{}", ctx.summary()),
                }
            }
            _ => println!("Unknown command. Type 'help' for the list of commands."),
        }
    }

    Ok(())
}

fn print_help(has_llm: bool) {
    println!("\n=== INDICATOR EXPLORER ===");
    println!("Move one indicator and see how the others respond");
    println!();
    println!("Commands:");
    println!("  list [prefix]        - List countries");
    println!("  select <country>     - Select a country and load its baseline");
    println!("  set <indicator> <v>  - Move a slider (le, aq, wq, pg, gdp)");
    println!("  status / s           - Show current indicators");
    println!("  preview / p          - Full prediction with nothing held fixed");
    println!("  reset / r            - Restore the country's baseline");
    if has_llm {
        println!("  ask <question>       - Ask about the current statistics");
    }
    println!("  quit / q             - Exit");
    println!();
}

/// Resolve a typed name against the store; unknown names still select
fn select(session: &mut ExplorerSession<'_>, store: &IndicatorStore, query: &str) {
    match store.find(query) {
        Some(name) => {
            session.select_country(name);
        }
        None => {
            println!("No data for '{}', using default indicators", query);
            session.select_country(query);
        }
    }
}

fn display_status(session: &ExplorerSession<'_>) {
    let Some(country) = session.country() else {
        println!("No country selected");
        return;
    };
    println!(
        "\n--- {} ({} change{}) ---",
        country,
        session.change_count(),
        if session.change_count() == 1 { "" } else { "s" }
    );
    let current = session.current();
    for field in FieldId::ALL {
        println!("  {:<18} {}", field.label(), format_value(field, current.get(field)));
    }
    println!();
}

fn display_changes(before: &IndicatorVector, after: &IndicatorVector) {
    for (field, delta) in before.delta(after) {
        let marker = if delta.abs() < 1e-9 { " " } else { "*" };
        println!(
            " {} {:<18} {:>28}  ({:+.2})",
            marker,
            field.label(),
            format_value(field, after.get(field)),
            delta
        );
    }
}

/// Text stand-in for the bar chart: each bar is scaled to its field range
fn display_bars(v: &IndicatorVector) {
    const WIDTH: f64 = 40.0;
    for field in FieldId::PRIMARY {
        let range = field.range();
        let share = (v.get(field) - range.min) / (range.max - range.min);
        let bar = "#".repeat((share * WIDTH).round() as usize);
        println!(
            "  {:<18} {:<40} {}",
            field.label(),
            bar,
            format_value(field, v.get(field))
        );
    }
    println!(
        "  {:<18} {}",
        FieldId::CarbonEmissions.label(),
        format_value(FieldId::CarbonEmissions, v.carbon_emissions)
    );
}
