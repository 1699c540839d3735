//! Main application entry point

use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pc_data::ChartConfig;

mod app;

use app::ParcoordsApp;

/// Interactive parallel coordinates for CSV files
#[derive(Parser, Debug)]
#[command(name = "parcoords", version, about)]
struct Args {
    /// CSV file to plot
    #[arg(required_unless_present = "dump_config")]
    file: Option<PathBuf>,

    /// Chart configuration (JSON); built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ChartConfig::load(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => ChartConfig::default(),
    };

    if args.dump_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let path = args.file.context("No CSV file given")?;
    info!(path = %path.display(), "Starting parallel coordinates");

    let runtime = tokio::runtime::Runtime::new().context("Failed to start the async runtime")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 480.0]),
        default_theme: eframe::Theme::Dark,
        persist_window: false,
        ..Default::default()
    };

    let title = format!("Parallel Coordinates - {}", path.display());
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Box::new(ParcoordsApp::new(cc, runtime, path, config))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
