//! label-lens - Food label scanning core
//!
//! Matches OCR-recognized label tokens against classifier-flagged
//! ingredients and projects highlight rectangles for a renderer. Camera
//! capture, the OCR engine, the classifier model and the UI are external
//! collaborators; this binary wires their outputs through the core for one
//! scan.

mod analysis;
mod app;
mod classifier;
mod config;
mod ocr;
mod overlay;
mod scan;
mod shared;

use anyhow::Result;
use clap::Parser;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::app::{run_scan, ScanRequest};
use crate::config::AppConfig;
use crate::scan::ScanStatus;
use crate::shared::SharedAppState;

/// label-lens - locate flagged ingredients on a photographed food label
#[derive(Parser, Debug)]
#[command(name = "label-lens")]
#[command(about = "Match OCR label tokens against flagged ingredients and emit highlight rects")]
struct Args {
    /// OCR document JSON for the captured frame
    #[arg(long)]
    ocr: PathBuf,

    /// Captured image file, read for its true pixel dimensions
    #[arg(long)]
    image: Option<PathBuf>,

    /// Comma-separated flagged terms; skips the classifier endpoint
    #[arg(long)]
    terms: Option<String>,

    /// Classifier endpoint override
    #[arg(long)]
    endpoint: Option<String>,

    /// Configuration file (defaults to the per-user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum OCR confidence override (0-100)
    #[arg(long)]
    min_confidence: Option<f32>,

    /// Token length guard override
    #[arg(long)]
    min_token_length: Option<usize>,

    /// Pretty-print the scan result JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = load_or_create_config(args.config.as_deref());
    if let Some(endpoint) = args.endpoint.clone() {
        config.classifier.endpoint = endpoint;
    }
    if let Some(min_confidence) = args.min_confidence {
        config.matching.min_confidence = min_confidence;
    }
    if let Some(min_token_length) = args.min_token_length {
        config.matching.min_token_length = min_token_length;
    }

    let shared_state = Arc::new(RwLock::new(SharedAppState::new(config)));

    let request = ScanRequest {
        ocr_path: args.ocr,
        image_path: args.image,
        terms: args.terms.map(|list| {
            list.split(',')
                .map(|term| term.trim().to_string())
                .filter(|term| !term.is_empty())
                .collect()
        }),
    };

    let result = run_scan(&shared_state, &request)?;

    match result.status {
        ScanStatus::Flagged => info!("Found {} flagged item(s)", result.overlays.len()),
        ScanStatus::Clean => info!("Clean label"),
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", json);

    Ok(())
}

/// Load configuration from file or create default
fn load_or_create_config(path_override: Option<&std::path::Path>) -> AppConfig {
    if let Some(path) = path_override {
        match config::load_config(path) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", path);
                return config;
            }
            Err(e) => {
                tracing::warn!("Could not load {:?}: {}; using defaults", path, e);
                return AppConfig::default();
            }
        }
    }

    if let Ok(config_dir) = config::get_config_dir() {
        let config_path = config_dir.join("config.toml");
        if config_path.exists() {
            if let Ok(config) = config::load_config(&config_path) {
                info!("Loaded configuration from {:?}", config_path);
                return config;
            }
        }
    }
    info!("Using default configuration");
    AppConfig::default()
}
