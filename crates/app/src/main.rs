use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use pendulum_core::{AppConfig, Simulation, TracingPlayback};
use tracing_subscriber::EnvFilter;

fn main() -> pendulum_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            duration_ms,
            fps,
        } => run(config.as_deref(), duration_ms, fps),
        Commands::Trace { config, output } => run_trace(config.as_deref(), &output),
        Commands::Defaults => print_defaults(),
    }
}

fn load_config(path: Option<&Path>) -> pendulum_core::Result<AppConfig> {
    match path {
        Some(path) => {
            tracing::info!(?path, "loading configuration");
            AppConfig::load(path)
        }
        None => Ok(AppConfig::default()),
    }
}

fn run(
    config: Option<&Path>,
    duration_ms: Option<f64>,
    fps: Option<f64>,
) -> pendulum_core::Result<()> {
    let mut config = load_config(config)?;
    if let Some(duration_ms) = duration_ms {
        config.simulation.duration_ms = duration_ms;
    }
    if let Some(fps) = fps {
        config.simulation.fps = fps;
    }

    let report = Simulation::new(config)?.run(&mut TracingPlayback);
    for track in &report.tracks {
        tracing::info!(
            track = track.id,
            sample = %track.sample,
            triggers = report.events_for(track.id).count(),
            position = track.position,
            "track summary"
        );
    }
    Ok(())
}

fn run_trace(config: Option<&Path>, output: &Path) -> pendulum_core::Result<()> {
    let config = load_config(config)?;
    let report = Simulation::new(config)?.run(&mut TracingPlayback);
    tracing::info!(?output, events = report.events.len(), "writing trigger trace");
    std::fs::write(output, report.to_json_pretty()?)?;
    Ok(())
}

fn print_defaults() -> pendulum_core::Result<()> {
    let json = serde_json::to_string_pretty(&AppConfig::default())?;
    println!("{json}");
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Oscillating step sequencer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the sequencer headless and log every trigger.
    Run {
        /// JSON configuration file; the default kit is used when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the simulated duration in milliseconds.
        #[arg(long)]
        duration_ms: Option<f64>,
        /// Override the simulated frame rate.
        #[arg(long)]
        fps: Option<f64>,
    },
    /// Run headless and write the trigger report as JSON.
    Trace {
        /// JSON configuration file; the default kit is used when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output path for the generated report.
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the default configuration as JSON.
    Defaults,
}
