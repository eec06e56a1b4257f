//! vizkit command-line tool.
//!
//! - `generate`: synthetic demo rows as JSON
//! - `inspect`: layers, bounds and level-of-detail counts of a TopoJSON file
//! - `render`: choropleth map as SVG or PNG, optionally after zoom steps

mod commands;
mod config;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use viz_common::VizError;

#[derive(Parser, Debug)]
#[command(name = "vizkit")]
#[command(about = "Generate demo data and render choropleth maps from TopoJSON")]
struct Args {
    /// Log level
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate synthetic rows
    Generate {
        /// Generator config (YAML or JSON); built-in defaults when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarize a topology
    Inspect {
        /// TopoJSON file
        topology: PathBuf,

        /// Render config; defaults plus VIZKIT_* overrides when omitted
        #[arg(short, long, env = "VIZKIT_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Render a choropleth map
    Render {
        /// TopoJSON file
        topology: PathBuf,

        /// JSON array of data records
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Render config; defaults plus VIZKIT_* overrides when omitted
        #[arg(short, long, env = "VIZKIT_CONFIG")]
        config: Option<PathBuf>,

        /// Zoom steps applied in order: in, out or reset
        #[arg(long = "zoom", value_delimiter = ',')]
        zoom: Vec<String>,

        /// Write PNG instead of SVG
        #[arg(long)]
        png: bool,

        /// PNG pixels per map pixel
        #[arg(long, default_value = "1.0")]
        pixel_ratio: f32,

        /// Output file; stdout when omitted (SVG only)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so stdout stays clean for command output
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);
    let installed = if args.log_json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    if let Err(e) = installed {
        eprintln!("Failed to install log subscriber: {}", e);
        return ExitCode::FAILURE;
    }

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<VizError>() {
            Some(viz) => {
                error!(code = viz.code(), "{}", viz);
                // 2 for bad input, 1 for everything else
                ExitCode::from(if viz.is_input_error() { 2 } else { 1 })
            }
            None => {
                error!("{:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Generate { config, output } => {
            let rows = commands::generate(config.as_deref())?;
            write_output(output.as_deref(), rows.as_bytes())?;
        }

        Command::Inspect { topology, config } => {
            let config = commands::load_config(config.as_deref())?;
            let topology = commands::load_topology(&topology)?;
            let summary = commands::inspect(topology, &config)?;
            let json = serde_json::to_string_pretty(&summary)?;
            write_output(None, json.as_bytes())?;
        }

        Command::Render {
            topology,
            data,
            config,
            zoom,
            png,
            pixel_ratio,
            output,
        } => {
            let config = commands::load_config(config.as_deref())?;
            let steps = commands::parse_steps(&zoom)?;
            let topology = commands::load_topology(&topology)?;
            let data = match data {
                Some(path) => commands::load_data(&path)?,
                None => Vec::new(),
            };

            let rendered = commands::render(topology, data, &config, &steps)?;
            if png {
                let output = output.ok_or_else(|| VizError::InvalidConfig {
                    field: "output".to_string(),
                    message: "--png requires --output".to_string(),
                })?;
                let bytes = commands::rasterize(&rendered.svg, &config, pixel_ratio)?;
                write_output(Some(&output), &bytes)?;
            } else {
                write_output(output.as_deref(), rendered.svg.as_bytes())?;
            }
        }
    }

    Ok(())
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = bytes.len(), "Wrote output");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}
