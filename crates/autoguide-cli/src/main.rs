mod commands;
mod reporter;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "autoguide", about = "Closed-loop telescope autoguider")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Guide the mount from a frame source
    Run(commands::run::RunArgs),
    /// Locate the guide star in every frame without a mount
    Analyze(commands::analyze::AnalyzeArgs),
    /// Guide a simulated drifting star
    Simulate(commands::simulate::SimulateArgs),
    /// Send a manual jog to the mount
    Jog(commands::jog::JogArgs),
    /// Print telemetry arriving from the mount
    Listen(commands::listen::ListenArgs),
    /// Print or save the default guiding configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Jog(args) => commands::jog::run(args),
        Commands::Listen(args) => commands::listen::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
