//! # Tychos Command Line
//!
//! Loads the celestial parameter table (network with cache, or a local file),
//! builds the default system, moves it to the requested instant and prints the
//! position of each body in Earth-centred scene coordinates.
//!
//! Logging goes to stderr through `env_logger`; set `RUST_LOG=info` (or
//! `debug`) to see where the parameters came from.

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Parser;
use log::warn;
use serde::Serialize;
use std::path::PathBuf;
use tychos_lib::config::{Config, CONFIG_FILE};
use tychos_lib::system::{build_default_system, BODIES};
use tychos_lib::{celestial_data, positions, time, BodyPosition};

#[derive(Parser, Debug)]
#[command(name = "tychos")]
#[command(about = "Positions of the Sun, Moon and planets in a Tychonic deferent model")]
struct Cli {
    /// Instant to compute, RFC 3339 (defaults to now)
    #[arg(long)]
    date: Option<DateTime<Utc>>,

    /// Simulation time in tropical years since the model epoch
    #[arg(long, conflicts_with = "date", allow_hyphen_values = true)]
    sim_time: Option<f64>,

    /// Read the parameter table from a local JSON file instead of the network
    #[arg(long)]
    params: Option<PathBuf>,

    /// Configuration file
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Body to report (repeatable, defaults to all physical bodies)
    #[arg(long = "body")]
    bodies: Vec<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

/// JSON output document.
#[derive(Serialize)]
struct Report {
    sim_time: f64,
    date: Option<DateTime<Utc>>,
    julian_day: f64,
    bodies: Vec<BodyPosition>,
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::load_from_path(&cli.config);
    let constants = &config.constants;

    let table = match &cli.params {
        Some(path) => celestial_data::load_from_file(path)
            .with_context(|| format!("reading parameters from {}", path.display()))?,
        None => {
            // Create Tokio runtime for the one async fetch
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(celestial_data::fetch(&config.data))
                .with_context(|| format!("fetching parameters from {}", config.data.url))?
        }
    };

    let mut tree = build_default_system(&table).context("building the default system")?;

    let sim_time = match cli.sim_time {
        Some(t) => t,
        None => time::datetime_to_sim(constants, cli.date.unwrap_or_else(Utc::now)),
    };
    tree.set_time(sim_time);

    let names: Vec<&str> = if cli.bodies.is_empty() {
        BODIES.to_vec()
    } else {
        cli.bodies.iter().map(String::as_str).collect()
    };
    for name in &names {
        if tree.find(name).is_none() {
            warn!("Unknown body '{}'", name);
        }
    }
    let rows = positions(&tree, names.iter().copied());

    let report = Report {
        sim_time,
        date: time::sim_to_datetime(constants, sim_time),
        julian_day: time::sim_to_jd(constants, sim_time),
        bodies: rows,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&report);
    }
    Ok(())
}

fn print_table(report: &Report) {
    match report.date {
        Some(date) => println!("{}  (t = {:.6} y, JD {:.4})", date, report.sim_time, report.julian_day),
        None => println!("t = {:.6} y", report.sim_time),
    }
    println!(
        "{:<10} {:>14} {:>14} {:>14} {:>14}",
        "body", "x", "y", "z", "distance"
    );
    for row in &report.bodies {
        println!(
            "{:<10} {:>14.4} {:>14.4} {:>14.4} {:>14.4}",
            row.name, row.x, row.y, row.z, row.distance
        );
    }
}
