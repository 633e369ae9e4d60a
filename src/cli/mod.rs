//! Command-line front end.

pub mod logfile;
pub mod search;

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use thiserror::Error;
use tracing::{info, warn};

use crate::constants::DEFAULT_CLI_THRESHOLD;
use crate::embedding::{EncoderConfig, LazyEmbedder};
use crate::matching::MatchEngine;
use crate::telemetry::{self, TelemetryError};

pub use search::{SearchInput, Searcher};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Find the phrase closest in meaning to a query
    Search(SearchArgs),
    /// Run the HTTP server (configured through SEMFIND_* variables)
    Serve,
    /// Probe a running server's /healthz; exit code 0 when healthy
    HealthCheck {
        /// Server port (defaults to SEMFIND_PORT or 5000)
        #[clap(long)]
        port: Option<u16>,
    },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SearchArgs {
    /// Search query
    #[clap(short, long)]
    pub search: String,

    /// Text to search in
    #[clap(short, long, required_unless_present = "file", conflicts_with = "file")]
    pub text: Option<String>,

    /// File to search, line by line
    #[clap(short, long)]
    pub file: Option<PathBuf>,

    /// Similarity threshold
    #[clap(long, default_value_t = DEFAULT_CLI_THRESHOLD, allow_negative_numbers = true)]
    pub threshold: f32,

    /// Log file (default: semantic_search_log/search_<N>.log)
    #[clap(long)]
    pub log_file: Option<PathBuf>,

    /// Sentence-encoder model directory (default: SEMFIND_MODEL_PATH, else stub)
    #[clap(long)]
    pub model_path: Option<PathBuf>,
}

impl SearchArgs {
    pub fn input(&self) -> SearchInput {
        match (&self.text, &self.file) {
            (Some(text), _) => SearchInput::Text(text.clone()),
            (None, Some(path)) => SearchInput::File(path.clone()),
            (None, None) => SearchInput::Text(String::new()),
        }
    }

    pub fn encoder_config(&self) -> EncoderConfig {
        match self.model_path {
            Some(ref path) => EncoderConfig::new(path.clone())
                .with_max_seq_len(EncoderConfig::max_seq_len_from_env()),
            None => EncoderConfig::from_env(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to choose a log file: {0}")]
    LogPath(#[source] io::Error),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Runs `semfind search`: sets up logging, then prints results to stdout.
pub fn run_search(args: SearchArgs) -> Result<(), CliError> {
    let log_path = match args.log_file.clone() {
        Some(path) => path,
        None => logfile::default_log_path().map_err(CliError::LogPath)?,
    };
    telemetry::init_cli_logging(&log_path)?;

    info!(
        search = %args.search,
        text = ?args.text,
        file = ?args.file,
        threshold = args.threshold,
        log_file = %log_path.display(),
        "Search started"
    );

    let encoder = args.encoder_config();
    if encoder.testing_stub {
        warn!("No model path configured, running embedder in stub mode");
    }
    let engine = MatchEngine::new(LazyEmbedder::from_config(encoder));
    let searcher = Searcher::new(engine, args.threshold);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    searcher.run(&mut out, &args.input(), &args.search)?;
    out.flush()?;

    info!("Search finished");
    Ok(())
}
