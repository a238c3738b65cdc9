use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use hgtcoal_sim::simulation::SimulationConfig;

use crate::defaults;

/// Model parameters shared by every command.
///
/// Values given on the command line override those read from `--config`;
/// anything left unset falls back to the built-in defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct ModelArgs {
    /// JSON configuration file to start from
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Population size (N)
    #[arg(short = 'N', long)]
    pub population_size: Option<usize>,

    /// Number of sampled genomes (n)
    #[arg(short = 'n', long)]
    pub sample_size: Option<usize>,

    /// Genome length in sites (L)
    #[arg(short = 'L', long)]
    pub genome_length: Option<usize>,

    /// Mutation rate per site per generation
    #[arg(short = 'u', long)]
    pub mutation_rate: Option<f64>,

    /// Transfer rate per site per generation
    #[arg(long)]
    pub transfer_rate: Option<f64>,

    /// Length of a transferred fragment in sites
    #[arg(short = 'f', long)]
    pub fragment_length: Option<usize>,

    /// Number of independent replicates
    #[arg(short, long)]
    pub replicates: Option<usize>,

    /// Random seed (default: random)
    #[arg(short, long)]
    pub seed: Option<u64>,
}

impl ModelArgs {
    /// Merge the configuration file, if any, with command-line overrides.
    pub fn resolve(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => SimulationConfig::default(),
        };

        let p = &mut config.population;
        if let Some(v) = self.population_size {
            p.population_size = v;
        }
        if let Some(v) = self.sample_size {
            p.sample_size = v;
        }
        if let Some(v) = self.genome_length {
            p.genome_length = v;
        }
        if let Some(v) = self.mutation_rate {
            p.mutation_rate = v;
        }
        if let Some(v) = self.transfer_rate {
            p.transfer_rate = v;
        }
        if let Some(v) = self.fragment_length {
            p.fragment_length = v;
        }
        if let Some(v) = self.replicates {
            config.replicates = v;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate().context("Invalid simulation parameters")?;
        Ok(config)
    }
}

fn read_config(path: &Path) -> Result<SimulationConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse configuration {}", path.display()))
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceFormat {
    Fasta,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Pretty,
    Json,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Where to write the configuration
    #[arg(short, long, default_value = defaults::CONFIG_FILE)]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Directory for the sampled sequences (not written if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Sequence output format
    #[arg(long, value_enum, default_value = "fasta")]
    pub format: SequenceFormat,

    /// Also write each ancestral recombination graph as JSON
    #[arg(long)]
    pub history: bool,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Largest distance between sites for the covariance profile
    #[arg(long, default_value_t = defaults::MAX_DISTANCE)]
    pub max_distance: usize,

    /// Report format
    #[arg(long, value_enum, default_value = "pretty")]
    pub format: ReportFormat,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,
}

#[derive(Args, Debug)]
pub struct ForwardArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Generations evolved before the first sample
    #[arg(long, default_value_t = defaults::BURN_IN)]
    pub burn_in: usize,

    /// Generations evolved after the burn-in
    #[arg(short, long, default_value_t = defaults::GENERATIONS)]
    pub generations: usize,

    /// Generations between samples
    #[arg(long, default_value_t = defaults::SAMPLE_EVERY)]
    pub sample_every: usize,

    /// Report format
    #[arg(long, value_enum, default_value = "pretty")]
    pub format: ReportFormat,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,
}
