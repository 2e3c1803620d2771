//! Wafer map CLI.
//!
//! Loads a wafer description (YAML or JSON) and reports on it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

use wafer_common::WaferError;
use wafermap::{AggregationMode, DiePos, Highlight, WaferData, WaferDescription};
use wafermap_cli::{OutputFormat, WaferReport};

#[derive(Parser, Debug)]
#[command(name = "wafermap-cli")]
#[command(about = "Grade and inspect wafer maps from description files", long_about = None)]
struct Cli {
    /// Wafer description file (.yaml, .yml or .json)
    #[arg(short, long, env = "WAFERMAP_FILE", global = true)]
    file: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "WAFERMAP_LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the description and print a summary
    Info,

    /// Export every graded die
    Scan {
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Print the merged grade of every die in drawing order
    Grade {
        /// Override the aggregation mode (testing, counting, bincode)
        #[arg(short, long)]
        mode: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Show each layer's payload for one die
    Pick {
        /// Logical row
        #[arg(long, allow_hyphen_values = true)]
        row: i32,

        /// Logical column
        #[arg(long, allow_hyphen_values = true)]
        col: i32,

        /// Output format (csv prints JSON)
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Print the legend bands, or the color for one value
    Legend {
        /// Value to look up
        #[arg(long, allow_hyphen_values = true)]
        value: Option<f64>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Lay out the dies for rendering
    Plan {
        /// Drop dies that leave the usable circle
        #[arg(long)]
        bounding: bool,

        /// Highlight dies with this bin code
        #[arg(long, allow_hyphen_values = true)]
        highlight: Option<i32>,

        /// Color dies through the legend instead of pass/fail
        #[arg(long)]
        legend: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli.log_level, cli.json_logs) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(err) = run(cli) {
        error!(error = %err, "Command failed");
        eprintln!("Error: {:#}", err);
        let code = err
            .downcast_ref::<WaferError>()
            .map(WaferError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    // Reports go to stdout, logs to stderr.
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn load(file: Option<&PathBuf>) -> Result<(WaferDescription, WaferData)> {
    let path = file.context("No wafer description given (use --file or WAFERMAP_FILE)")?;
    info!(file = %path.display(), "Loading wafer description");

    let desc = WaferDescription::from_file(path)?;
    let wafer = desc.build()?;
    Ok((desc, wafer))
}

fn run(cli: Cli) -> Result<()> {
    let (desc, mut wafer) = load(cli.file.as_ref())?;

    match cli.command {
        Commands::Info => {
            println!("{}", WaferReport::format_summary(&desc, &wafer));
        }

        Commands::Scan { output } => {
            let dies = wafer.scan();
            match output {
                OutputFormat::Json => println!("{}", WaferReport::format_json(&dies)?),
                OutputFormat::Csv => {
                    println!("{}", WaferReport::scan_csv_header());
                    println!("{}", WaferReport::format_scan_csv(&dies));
                }
                OutputFormat::Table => println!("{}", WaferReport::format_scan_table(&dies)),
            }
        }

        Commands::Grade { mode, output } => {
            if let Some(mode) = mode {
                wafer.set_mode(AggregationMode::from_name(&mode));
            }
            match output {
                OutputFormat::Json => {
                    println!("{}", WaferReport::format_json(&wafer.grade_grid())?)
                }
                OutputFormat::Csv => println!("{}", WaferReport::format_grid_csv(&wafer)),
                OutputFormat::Table => println!("{}", WaferReport::format_grid_table(&wafer)),
            }
        }

        Commands::Pick { row, col, output } => {
            let pos = DiePos::new(row, col);
            let cell = wafer.to_draw(pos).ok_or_else(|| {
                WaferError::InvalidBounds(format!("die ({}, {}) is outside the wafer", row, col))
            })?;
            debug!(row, col, draw_row = cell.row, draw_col = cell.col, "Picking die");

            let payloads = wafer.pick(cell);
            match output {
                OutputFormat::Table => {
                    println!("{}", WaferReport::format_pick_table(&wafer, &payloads))
                }
                OutputFormat::Json | OutputFormat::Csv => println!(
                    "{}",
                    WaferReport::format_json(&WaferReport::pick_json(&wafer, &payloads))?
                ),
            }
        }

        Commands::Legend { value, output } => {
            let legend = desc.legend();
            match (value, output) {
                (Some(value), _) => println!("{}", legend.select(value)),
                (None, OutputFormat::Json) => {
                    println!("{}", WaferReport::format_json(&legend.bands())?)
                }
                (None, OutputFormat::Csv) => {
                    println!("x1,x2,color");
                    for band in legend.bands() {
                        println!("{},{},{}", band.x1, band.x2, band.color);
                    }
                }
                (None, OutputFormat::Table) => {
                    println!("{}", WaferReport::format_legend_table(&legend))
                }
            }
        }

        Commands::Plan {
            bounding,
            highlight,
            legend,
            output,
        } => {
            let layout = desc
                .layout
                .clone()
                .with_bounding(bounding || desc.layout.check_bounding);
            let highlight = highlight.map(Highlight::new).or(desc.highlight);

            let tiles = if legend {
                layout.plan(&wafer, &desc.legend(), highlight.as_ref())
            } else {
                layout.plan(&wafer, &desc.palette, highlight.as_ref())
            };
            info!(tiles = tiles.len(), "Planned wafer layout");

            match output {
                OutputFormat::Json => println!("{}", WaferReport::format_json(&tiles)?),
                OutputFormat::Csv => {
                    println!("{}", WaferReport::plan_csv_header());
                    println!("{}", WaferReport::format_plan_csv(&tiles));
                }
                OutputFormat::Table => println!("{}", WaferReport::format_plan_table(&tiles)),
            }
        }
    }

    Ok(())
}
