//! Hospivot CLI - Summarize hospital satisfaction surveys
//!
//! # Commands
//!
//! ```bash
//! hospivot serve                          # Start HTTP server (port 3000)
//! hospivot preview encuesta.xlsx          # First rows of the raw sheet
//! hospivot pivot encuesta.xlsx -o out.xlsx
//! hospivot chart encuesta.xlsx -o chart.svg
//! ```
//!
//! Pipeline defaults can be overridden with `HOSPIVOT_*` variables or a
//! `.env` file; `--skip-rows` wins over both.

use clap::{Parser, Subcommand};
use hospivot::{parse_file, render_svg, run_file, write_xlsx, PipelineConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hospivot")]
#[command(about = "Pivot, export and chart hospital satisfaction surveys", long_about = None)]
struct Cli {
    /// Rows to skip before the header row (default: 5)
    #[arg(long, global = true)]
    skip_rows: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Directory with the built frontend
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Print the first rows of the raw sheet as JSON
    Preview {
        /// Input spreadsheet (XLSX, XLS, ODS or CSV)
        input: PathBuf,

        /// Number of data rows
        #[arg(short = 'n', long)]
        rows: Option<usize>,
    },

    /// Print the pivoted table as JSON, optionally save it as XLSX
    Pivot {
        /// Input spreadsheet (XLSX, XLS, ODS or CSV)
        input: PathBuf,

        /// Output workbook
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep hospital rows only
        #[arg(long)]
        hospitals_only: bool,
    },

    /// Render the hospitals chart as SVG
    Chart {
        /// Input spreadsheet (XLSX, XLS, ODS or CSV)
        input: PathBuf,

        /// Output SVG file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr, stdout carries command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match load_config(cli.skip_rows) {
        Ok(config) => match cli.command {
            Commands::Serve { port, static_dir } => cmd_serve(port, static_dir, config).await,
            Commands::Preview { input, rows } => cmd_preview(&input, rows, &config),
            Commands::Pivot {
                input,
                output,
                hospitals_only,
            } => cmd_pivot(&input, output.as_deref(), hospitals_only, &config),
            Commands::Chart { input, output } => cmd_chart(&input, &output, &config),
        },
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(skip_rows: Option<usize>) -> Result<PipelineConfig, hospivot::ConfigError> {
    let config = PipelineConfig::from_env()?;
    Ok(match skip_rows {
        Some(n) => config.with_skip_rows(n),
        None => config,
    })
}

async fn cmd_serve(
    port: u16,
    static_dir: Option<PathBuf>,
    config: PipelineConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    hospivot::server::start_server(port, static_dir, config).await
}

fn cmd_preview(
    input: &Path,
    rows: Option<usize>,
    config: &PipelineConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let sheet = parse_file(input, config.skip_rows)?;
    tracing::info!("📄 {} ({})", input.display(), sheet.source);

    let preview = sheet.preview(rows.unwrap_or(config.preview_rows));
    println!("{}", serde_json::to_string_pretty(&preview)?);
    Ok(())
}

fn cmd_pivot(
    input: &Path,
    output: Option<&Path>,
    hospitals_only: bool,
    config: &PipelineConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = run_file(input, config)?;
    let table = if hospitals_only { &result.hospitals } else { &result.pivot };

    if let Some(path) = output {
        let bytes = write_xlsx(table, &config.sheet_name)?;
        fs::write(path, bytes)?;
        tracing::info!("💾 Saved to: {}", path.display());
    }

    println!("{}", serde_json::to_string_pretty(table)?);
    Ok(())
}

fn cmd_chart(
    input: &Path,
    output: &Path,
    config: &PipelineConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = run_file(input, config)?;
    let svg = render_svg(&result.hospitals)?;
    fs::write(output, svg)?;
    tracing::info!("💾 Saved to: {}", output.display());
    Ok(())
}
