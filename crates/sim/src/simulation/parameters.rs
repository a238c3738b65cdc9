//! Simulation parameters and configuration.
//!
//! `PopulationParams` describes the population genetic model of one run;
//! `SimulationConfig` adds the batch settings (replicate count and master
//! seed). Both are plain serde structs so they can be read from JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Parameters of the coalescent with homologous gene transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationParams {
    /// Number of haploid genomes in the population (`N`)
    pub population_size: usize,
    /// Number of genomes sampled at the present (`n`)
    pub sample_size: usize,
    /// Genome length in sites (`L`)
    pub genome_length: usize,
    /// Point mutation rate per site per generation (`mu`)
    pub mutation_rate: f64,
    /// Transfer rate per site per generation (`tau`)
    pub transfer_rate: f64,
    /// Length of a transferred block in sites (`f`)
    pub fragment_length: usize,
}

impl Default for PopulationParams {
    fn default() -> Self {
        Self {
            population_size: 100,
            sample_size: 10,
            genome_length: 1000,
            mutation_rate: 1e-4,
            transfer_rate: 0.0,
            fragment_length: 100,
        }
    }
}

impl PopulationParams {
    /// Check every constraint on the parameters.
    ///
    /// The fragment length is only constrained when transfer is enabled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::NotPositive {
                name: "population size",
            });
        }
        if self.sample_size == 0 {
            return Err(ConfigError::NotPositive {
                name: "sample size",
            });
        }
        if self.sample_size > self.population_size {
            return Err(ConfigError::SampleTooLarge {
                sample_size: self.sample_size,
                population_size: self.population_size,
            });
        }
        if self.genome_length == 0 {
            return Err(ConfigError::NotPositive {
                name: "genome length",
            });
        }
        check_rate("mutation rate", self.mutation_rate)?;
        check_rate("transfer rate", self.transfer_rate)?;
        if self.transfer_rate > 0.0
            && (self.fragment_length == 0 || self.fragment_length >= self.genome_length)
        {
            return Err(ConfigError::FragmentLength {
                fragment_length: self.fragment_length,
                genome_length: self.genome_length,
            });
        }
        Ok(())
    }

    /// Population-scaled transfer rate `p = 2 N tau L`: twice the expected
    /// number of transfers per lineage per coalescent time unit.
    #[inline]
    pub fn scaled_transfer_rate(&self) -> f64 {
        2.0 * self.population_size as f64 * self.transfer_rate * self.genome_length as f64
    }

    /// Population-scaled mutation rate `theta = 2 N mu` per site.
    #[inline]
    pub fn theta(&self) -> f64 {
        2.0 * self.population_size as f64 * self.mutation_rate
    }
}

fn check_rate(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidRate { name, value })
    }
}

impl fmt::Display for PopulationParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "N={} n={} L={} mu={} tau={} f={}",
            self.population_size,
            self.sample_size,
            self.genome_length,
            self.mutation_rate,
            self.transfer_rate,
            self.fragment_length
        )
    }
}

/// Top-level configuration of a batch of replicate runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Model parameters shared by every replicate
    #[serde(default)]
    pub population: PopulationParams,
    /// Number of independent replicates
    #[serde(default = "default_replicates")]
    pub replicates: usize,
    /// Optional master RNG seed for reproducibility
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_replicates() -> usize {
    1
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(PopulationParams::default(), default_replicates(), None)
    }
}

impl SimulationConfig {
    /// Create new simulation configuration.
    pub fn new(population: PopulationParams, replicates: usize, seed: Option<u64>) -> Self {
        Self {
            population,
            replicates,
            seed,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.population.validate()?;
        if self.replicates == 0 {
            return Err(ConfigError::NotPositive { name: "replicates" });
        }
        Ok(())
    }
}
