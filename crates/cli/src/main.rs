mod args;
mod commands;
pub mod defaults;
mod printing;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use args::{ForwardArgs, InitArgs, SimulateArgs, StatsArgs};
use commands::{forward, init, simulate, stats};

/// hgtcoal: coalescent simulator with homologous gene transfer
///
/// Builds the ancestral recombination graph of a sample of bacterial
/// genomes backward in time, paints mutations on it forward in time, and
/// summarizes the resulting divergence.
#[derive(Parser, Debug)]
#[command(name = "hgtcoal")]
#[command(author, version, about = "Coalescent simulation with homologous gene transfer", long_about = None)]
struct Cli {
    /// Number of threads to use for parallel processing
    ///
    /// If not specified, defaults to the number of logical CPUs.
    #[arg(short = 't', long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a configuration file from defaults and command-line overrides.
    Init(Box<InitArgs>),

    /// Simulate replicates and write the sampled genomes.
    ///
    /// Each replicate builds a genealogy backward in time and then mutates
    /// a random root genome down it.
    Simulate(Box<SimulateArgs>),

    /// Simulate replicates and report divergence and covariance statistics.
    Stats(Box<StatsArgs>),

    /// Evolve Wright-Fisher populations forward in time and compare their
    /// divergence with the coalescent expectation.
    Forward(Box<ForwardArgs>),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(defaults::LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    match cli.command {
        Commands::Init(args) => init::init_config(&args)?,
        Commands::Simulate(args) => simulate::simulate(&args)?,
        Commands::Stats(args) => stats::report_stats(&args)?,
        Commands::Forward(args) => forward::run_forward(&args)?,
    }

    Ok(())
}
