#![deny(unsafe_code)]
//! CLI binary for the strata GPU context.
//!
//! Subcommands:
//! - `simulate`: run a synthetic frame loop on the headless driver and
//!   report driver traffic
//! - `config`: print the default context configuration

mod error;
mod simulate;

use clap::{Parser, Subcommand};
use error::CliError;
use std::process;
use strata_core::{ContextConfig, HeadlessDriver};

#[derive(Parser)]
#[command(name = "strata", about = "GPU object and render-state cache CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Drive a headless context through N frames and report driver calls.
    Simulate {
        /// Number of frames.
        #[arg(short, long, default_value_t = 60)]
        frames: usize,

        /// Textured quads drawn per frame.
        #[arg(short, long, default_value_t = 16)]
        objects: usize,

        /// Context configuration as a JSON string.
        #[arg(long, default_value = "{}")]
        config: String,

        /// Pretend the driver has no vertex array objects.
        #[arg(long)]
        no_vertex_arrays: bool,
    },
    /// Print the default context configuration.
    Config,
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Config => {
            let config = ContextConfig::default();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("texture_units: {}", config.texture_units);
                println!("texture_pool_capacity: {}", config.texture_pool_capacity);
                println!("vertex_array_cache: {}", config.vertex_array_cache);
            }
        }
        Command::Simulate {
            frames,
            objects,
            config,
            no_vertex_arrays,
        } => {
            let params: serde_json::Value = serde_json::from_str(&config)
                .map_err(|e| CliError::Input(format!("invalid --config JSON: {e}")))?;
            let config = ContextConfig::from_json(&params)?;
            let driver = if no_vertex_arrays {
                HeadlessDriver::without_vertex_arrays()
            } else {
                HeadlessDriver::new()
            };

            let report = simulate::simulate(frames, objects, config, driver)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{} frames x {} objects: {} driver calls ({} draws)",
                    report.frames, report.objects, report.total_calls, report.draw_calls
                );
                for (name, count) in &report.calls {
                    println!("  {name:<24} {count}");
                }
                println!(
                    "pooled textures: {}, cached vertex arrays: {}",
                    report.stats.pooled_textures, report.stats.cached_vertex_arrays
                );
                if report.invalid_deletes > 0 {
                    log::warn!("{} deletes named dead objects", report.invalid_deletes);
                }
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
