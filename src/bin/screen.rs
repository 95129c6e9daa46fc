// Screening CLI
//
// Usage: screen [--json] <gender> <age> <months|years> <height_cm> <weight_kg>
// Example: screen laki-laki 2 years 86.5 11.9
//
// Environment:
//   SCREENING_CONFIG    JSON config file (optional)
//   SCREENING_DATA_DIR  directory with the four WHO tables (overrides config)

use anyhow::{bail, Context};
use growth_screening::{Age, EngineConfig, Gender, ScreeningRequest, Screener};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "Usage: screen [--json] <gender> <age> <months|years> <height_cm> <weight_kg>";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "growth_screening=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let json = if let Some(pos) = args.iter().position(|a| a == "--json") {
        args.remove(pos);
        true
    } else {
        false
    };

    if args.len() != 5 {
        bail!("{}", USAGE);
    }

    let request = parse_request(&args)?;

    let mut config = match std::env::var("SCREENING_CONFIG") {
        Ok(path) => EngineConfig::load(&PathBuf::from(path))?,
        Err(_) => EngineConfig::default(),
    };
    if let Ok(dir) = std::env::var("SCREENING_DATA_DIR") {
        config = config.with_data_dir(dir);
    }

    let screener = Screener::from_config(&config)?;
    let result = screener.screen_request(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("--- Screening result ---");
        print!("{}", result);
        println!("------------------------");
    }

    Ok(())
}

fn parse_request(args: &[String]) -> anyhow::Result<ScreeningRequest> {
    let gender: Gender = args[0].parse()?;
    let value: f64 = args[1]
        .parse()
        .with_context(|| format!("Age '{}' is not a number", args[1]))?;
    let age = Age {
        value,
        unit: args[2].parse()?,
    };
    let height_cm: f64 = args[3]
        .parse()
        .with_context(|| format!("Height '{}' is not a number", args[3]))?;
    let weight_kg: f64 = args[4]
        .parse()
        .with_context(|| format!("Weight '{}' is not a number", args[4]))?;

    Ok(ScreeningRequest {
        name: None,
        gender,
        age,
        height_cm,
        weight_kg,
    })
}
