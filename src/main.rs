use botsalmon::{EngineConfig, UciEngine};
use clap::Parser;
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

/// UCI chess engine front-end with a concurrent command pipeline.
///
/// Speaks UCI on stdin/stdout, so it plugs into any UCI-compatible GUI.
/// Logging goes to stderr and is controlled through `RUST_LOG`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of command workers (overrides the configuration file)
    #[arg(short, long)]
    workers: Option<usize>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match EngineConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                error!("cannot load {}: {}", path.display(), err);
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    if let Err(err) = config.validate() {
        error!("{}", err);
        return ExitCode::FAILURE;
    }

    let engine = UciEngine::new(config);
    match engine.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
