//! Polaroid CLI: frame a photo and export it without a browser.
//!
//! Usage:
//!   polaroid export <IMAGE> [OPTIONS]   Frame one image and write a PNG
//!   polaroid defaults                   Print the default parameters as JSON

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod logging;

use commands::export::{ExportJob, ParamOverrides};

#[derive(Parser)]
#[command(
    name = "polaroid",
    about = "Frame photos polaroid-style and export them as PNG",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Frame one image and write the exported PNG
    Export {
        /// Image to frame
        input: PathBuf,

        /// JSON parameter file (see `polaroid defaults`)
        #[arg(short, long)]
        params: Option<PathBuf>,

        #[command(flatten)]
        overrides: ParamOverrides,

        /// TrueType/OpenType font for captions; the file stem is its family
        /// name. May be repeated; the first one is the fallback.
        #[arg(long = "font")]
        fonts: Vec<PathBuf>,

        /// Horizontal pan of the photo (px)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        pan_x: f64,

        /// Vertical pan of the photo (px)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        pan_y: f64,

        /// Output file path [default: polaroid-<epoch-ms>.png]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the default frame parameters as JSON
    Defaults,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    logging::init_logging(&logging::LoggingConfig {
        level: log_level.to_string(),
        json: cli.log_json,
    });

    match cli.command {
        Commands::Export {
            input,
            params,
            overrides,
            fonts,
            pan_x,
            pan_y,
            output,
        } => {
            commands::export::run(ExportJob {
                input,
                params,
                overrides,
                fonts,
                pan: (pan_x, pan_y),
                output,
            })?;
            Ok(())
        }
        Commands::Defaults => commands::defaults::run(),
    }
}
