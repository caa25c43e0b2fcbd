//! PowerGrab - Entry Point
//!
//! Loads the map for a day, flies one drone over it and writes the move log
//! and the annotated map.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use powergrab::core::config::SimulationConfig;
use powergrab::core::error::{PowergrabError, Result};
use powergrab::drone::PolicyKind;
use powergrab::geometry::Position;
use powergrab::map::{fetch_map, load_from_file, load_from_json, map_url, MapSnapshot};
use powergrab::simulation::{output_stem, write_outputs, Flight};

/// Fly a drone over a day's PowerGrab map
#[derive(Parser, Debug)]
#[command(name = "powergrab")]
#[command(about = "Simulate a drone collecting coins and power from charging stations")]
#[command(allow_negative_numbers = true)]
struct Args {
    /// Day of the month of the map
    day: u32,

    /// Month of the map
    month: u32,

    /// Year of the map
    year: i32,

    /// Starting latitude
    latitude: f64,

    /// Starting longitude
    longitude: f64,

    /// Random seed for deterministic runs
    #[arg(value_parser = parse_seed)]
    seed: u64,

    /// Drone policy: stateless or stateful
    #[arg(value_parser = parse_policy)]
    policy: PolicyKind,

    /// Read the map from a local GeoJSON file instead of downloading it
    #[arg(long)]
    map_file: Option<PathBuf>,

    /// TOML file overriding the simulation defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the output files are written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Override the move cap
    #[arg(long)]
    max_moves: Option<u32>,

    /// Log every move
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn parse_seed(s: &str) -> Result<u64> {
    s.trim()
        .parse()
        .map_err(|_| PowergrabError::InvalidSeed(s.to_string()))
}

fn parse_policy(s: &str) -> Result<PolicyKind> {
    s.parse()
}

fn map_date(day: u32, month: u32, year: i32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        PowergrabError::InvalidDate(format!("{:02}/{:02}/{:04}", day, month, year))
    })
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_file(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(max_moves) = args.max_moves {
        config.max_moves = max_moves;
    }
    config.validate()?;
    Ok(config)
}

fn load_map(args: &Args, config: &SimulationConfig, date: NaiveDate) -> Result<MapSnapshot> {
    match &args.map_file {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading map from file");
            load_from_file(path)
        }
        None => {
            let body = fetch_map(&map_url(&config.map_url_base, date))?;
            load_from_json(&body)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "powergrab=debug"
    } else {
        "powergrab=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let date = map_date(args.day, args.month, args.year)?;
    let config = load_config(&args)?;
    let map = load_map(&args, &config, date)?;

    let start = Position::new(args.latitude, args.longitude);
    let flight = Flight::new(map.pois.clone(), start, args.seed, args.policy, &config)?;
    let (log, _) = flight.run()?;

    let stem = output_stem(args.policy, date);
    write_outputs(&args.output_dir, &stem, &map.document, &log)?;

    println!("{}", log.summary());
    Ok(())
}
