//! Builder pattern for creating simulations.
//!
//! Provides a fluent API for configuring and creating simulations with
//! sensible defaults and validation.

use crate::errors::ConfigError;
use crate::simulation::{PopulationParams, Simulation, SimulationConfig};

/// Builder for constructing Simulation instances with a fluent API.
///
/// # Examples
///
/// ```
/// use hgtcoal_sim::simulation::SimulationBuilder;
///
/// // Pure coalescent
/// let sim = SimulationBuilder::new()
///     .population_size(100)
///     .sample_size(10)
///     .genome_length(1000)
///     .build()
///     .unwrap();
///
/// // With mutation, transfer and a fixed seed
/// let mut sim = SimulationBuilder::new()
///     .population_size(100)
///     .sample_size(10)
///     .genome_length(1000)
///     .mutation_rate(1e-4)
///     .transfer(1e-6, 100)
///     .replicates(4)
///     .seed(42)
///     .build()
///     .unwrap();
/// let runs = sim.run_replicates().unwrap();
/// assert_eq!(runs.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct SimulationBuilder {
    // Required parameters
    population_size: Option<usize>,
    sample_size: Option<usize>,
    genome_length: Option<usize>,

    // Evolutionary parameters (with defaults)
    mutation_rate: f64,                     // Default: 0.0 (no mutation)
    transfer: Option<(f64, usize)>,         // Default: None (no transfer)
    replicates: usize,                      // Default: 1
    seed: Option<u64>,                      // Default: None (random)
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationBuilder {
    /// Create a new simulation builder with default values.
    pub fn new() -> Self {
        Self {
            population_size: None,
            sample_size: None,
            genome_length: None,
            mutation_rate: 0.0,
            transfer: None,
            replicates: 1,
            seed: None,
        }
    }

    /// Start from an existing configuration.
    pub fn from_config(config: &SimulationConfig) -> Self {
        let p = &config.population;
        Self {
            population_size: Some(p.population_size),
            sample_size: Some(p.sample_size),
            genome_length: Some(p.genome_length),
            mutation_rate: p.mutation_rate,
            transfer: Some((p.transfer_rate, p.fragment_length)),
            replicates: config.replicates,
            seed: config.seed,
        }
    }

    /// Set the population size (required).
    pub fn population_size(mut self, size: usize) -> Self {
        self.population_size = Some(size);
        self
    }

    /// Set the number of sampled genomes (required).
    pub fn sample_size(mut self, size: usize) -> Self {
        self.sample_size = Some(size);
        self
    }

    /// Set the genome length in sites (required).
    pub fn genome_length(mut self, length: usize) -> Self {
        self.genome_length = Some(length);
        self
    }

    /// Set the per-site, per-generation mutation rate (default: 0.0).
    pub fn mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Enable transfer with a per-site, per-generation rate and a block
    /// length in sites.
    pub fn transfer(mut self, rate: f64, fragment_length: usize) -> Self {
        self.transfer = Some((rate, fragment_length));
        self
    }

    /// Set the number of replicates (default: 1).
    pub fn replicates(mut self, replicates: usize) -> Self {
        self.replicates = replicates;
        self
    }

    /// Set the master random seed for reproducibility.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Assemble the configuration without creating the engine.
    pub fn build_config(&self) -> Result<SimulationConfig, ConfigError> {
        let population_size = self.population_size.ok_or(ConfigError::MissingParameter {
            name: "population size",
        })?;
        let sample_size = self.sample_size.ok_or(ConfigError::MissingParameter {
            name: "sample size",
        })?;
        let genome_length = self.genome_length.ok_or(ConfigError::MissingParameter {
            name: "genome length",
        })?;
        let (transfer_rate, fragment_length) = self.transfer.unwrap_or((0.0, 0));

        let config = SimulationConfig::new(
            PopulationParams {
                population_size,
                sample_size,
                genome_length,
                mutation_rate: self.mutation_rate,
                transfer_rate,
                fragment_length,
            },
            self.replicates,
            self.seed,
        );
        config.validate()?;
        Ok(config)
    }

    /// Build the simulation.
    pub fn build(self) -> Result<Simulation, ConfigError> {
        Simulation::new(self.build_config()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> SimulationBuilder {
        SimulationBuilder::new()
            .population_size(20)
            .sample_size(5)
            .genome_length(100)
    }

    #[test]
    fn test_builder_minimal() {
        let sim = minimal().build().unwrap();
        assert_eq!(sim.params().population_size, 20);
        assert_eq!(sim.params().transfer_rate, 0.0);
        assert_eq!(sim.config().replicates, 1);
    }

    #[test]
    fn test_builder_missing_parameters() {
        let err = SimulationBuilder::new()
            .population_size(10)
            .genome_length(100)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingParameter {
                name: "sample size"
            }
        );
    }

    #[test]
    fn test_builder_with_transfer() {
        let config = minimal().transfer(1e-4, 10).build_config().unwrap();
        assert_eq!(config.population.transfer_rate, 1e-4);
        assert_eq!(config.population.fragment_length, 10);
    }

    #[test]
    fn test_builder_rejects_long_fragment() {
        let err = minimal().transfer(1e-4, 100).build().unwrap_err();
        assert!(matches!(err, ConfigError::FragmentLength { .. }));
    }

    #[test]
    fn test_builder_with_seed() {
        let mut a = minimal().mutation_rate(1e-3).seed(42).build().unwrap();
        let mut b = minimal().mutation_rate(1e-3).seed(42).build().unwrap();
        assert_eq!(a.run_replicates().unwrap(), b.run_replicates().unwrap());
    }

    #[test]
    fn test_builder_from_config_roundtrip() {
        let config = minimal().transfer(1e-4, 10).seed(9).build_config().unwrap();
        let again = SimulationBuilder::from_config(&config)
            .build_config()
            .unwrap();
        assert_eq!(again, config);
    }
}
