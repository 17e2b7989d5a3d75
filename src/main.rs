//! KP-CDST command line interface
//!
//! Thin presentation collaborator: loads the engine configuration, reads a
//! `PatientInput` JSON record from a file or stdin, and prints the computed
//! profile as JSON. All scoring logic lives in the library.
//!
//! # Usage
//!
//! ```bash
//! # Score a patient record against the built-in published defaults
//! kp-cdst --patient patient.json
//!
//! # With a tuned deployment config and national projection
//! kp-cdst --config clinic.toml --patient patient.json --uptake 0.05
//!
//! # National projection at the configured default uptake fraction
//! kp-cdst --patient patient.json --project
//!
//! # Read the patient record from stdin
//! cat patient.json | kp-cdst
//!
//! # Print the effective configuration (defaults merged with overrides)
//! kp-cdst --dump-config
//! ```
//!
//! # Environment Variables
//!
//! - `KP_CDST_CONFIG`: path to a config TOML (overridden by `--config`)
//! - `RUST_LOG`: logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use kp_cdst::{CdstConfig, Engine, PatientInput};
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "kp-cdst")]
#[command(about = "Kynurenine Pathway Clinical Decision Support scoring engine")]
#[command(version)]
struct CliArgs {
    /// Path to a config TOML (default: $KP_CDST_CONFIG, then ./cdst_config.toml)
    #[arg(short, long, env = "KP_CDST_CONFIG")]
    config: Option<PathBuf>,

    /// Path to a PatientInput JSON record (default: read stdin)
    #[arg(short, long)]
    patient: Option<PathBuf>,

    /// Also project the top-ranked option nationally at the configured
    /// default uptake fraction
    #[arg(long)]
    project: bool,

    /// Uptake fraction for the national projection (implies --project)
    #[arg(long, value_name = "FRACTION")]
    uptake: Option<f64>,

    /// Emit compact single-line JSON instead of pretty-printed output
    #[arg(long)]
    compact: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => CdstConfig::load_from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => CdstConfig::load(),
    };

    if args.dump_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let engine = Engine::new(config).context("engine configuration rejected")?;

    let raw = match &args.patient {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading patient record {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading patient record from stdin")?;
            buf
        }
    };
    let input: PatientInput =
        serde_json::from_str(&raw).context("parsing patient record JSON")?;

    let profile = engine.compute_profile(&input)?;
    info!(tier = %profile.risk.tier, options = profile.ranking.len(), "profile computed");

    let mut output = serde_json::to_value(&profile)?;
    if args.project || args.uptake.is_some() {
        if let Some(top) = profile.ranking.first() {
            let projection = match args.uptake {
                Some(uptake) => engine.project_national(top, uptake)?,
                None => engine.project_national_default(top)?,
            };
            output["national_projection"] = serde_json::to_value(&projection)?;
        }
    }

    if args.compact {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}
