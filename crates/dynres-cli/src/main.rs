use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "dynres",
    about = "dynres — adaptive render-resolution scaling",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive the controller live against a trace or a synthetic load wave.
    ///
    /// Prints one console directive per applied action. Stops on Ctrl-C;
    /// a trace that runs dry leaves the loop idling on unavailable
    /// readings until then.
    Run {
        /// Utilization trace file (one reading per line, `-` for none)
        #[arg(long, conflicts_with = "synthetic")]
        trace: Option<PathBuf>,
        /// Use the built-in synthetic load wave instead of a trace
        #[arg(long)]
        synthetic: bool,
        /// Tick interval in milliseconds
        #[arg(long, default_value = "250")]
        interval_ms: u64,
        /// Controller config file (flat JSON, six fields)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Console variable the directives set
        #[arg(long, default_value = dynres_host::DEFAULT_SCALE_CVAR)]
        cvar: String,
    },
    /// Replay a trace offline and report every action.
    Simulate {
        /// Utilization trace file
        trace: PathBuf,
        /// Per-tick elapsed seconds fed to telemetry
        #[arg(long, default_value = "1.0")]
        tick_secs: f64,
        /// Controller config file (flat JSON, six fields)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Starting resolution percentage
        #[arg(long, default_value = "50")]
        start: u8,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a config file and show what coercion would change.
    CheckConfig {
        /// Config file to check
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,dynres=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            trace,
            synthetic,
            interval_ms,
            config,
            cvar,
        } => commands::run::run(trace, synthetic, interval_ms, config, &cvar).await,
        Commands::Simulate {
            trace,
            tick_secs,
            config,
            start,
            json,
        } => commands::simulate::simulate(&trace, tick_secs, config, start, json),
        Commands::CheckConfig { config } => commands::check::check(&config),
    }
}
