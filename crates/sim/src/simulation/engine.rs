//! Simulation engine.
//!
//! A run is one backward graph construction followed by one forward overlay.
//! Replicates are independent runs: the engine draws a `u64` seed per
//! replicate from its master generator and then executes them in parallel,
//! each on its own `Xoshiro256PlusPlus`.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

use crate::ancestry::EvolutionHistory;
use crate::base::Sequence;
use crate::errors::{ConfigError, ReplicateError, SimulationError};
use crate::evolution::PointMutation;
use crate::simulation::{
    ForwardOverlay, GraphBuilder, PopulationParams, SampledGenomes, SimulationConfig,
};

/// Everything produced by one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    /// Position of the run within its batch.
    pub replicate: usize,
    /// Seed that reproduces the run through [`Simulation::run_once`].
    pub seed: u64,
    pub history: EvolutionHistory,
    /// Sampled genomes, indexed by leaf.
    pub sequences: Vec<Sequence>,
    /// Number of point mutations applied during the overlay.
    pub mutations: usize,
}

/// Main simulation engine.
#[derive(Debug)]
pub struct Simulation {
    /// Simulation configuration
    config: SimulationConfig,
    builder: GraphBuilder,
    overlay: ForwardOverlay,
    /// Master generator that hands out replicate seeds
    rng: Xoshiro256PlusPlus,
}

impl Simulation {
    /// Create a simulation, validating the configuration before any random
    /// number is drawn.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let params = config.population.clone();
        let mutation = PointMutation::new(params.mutation_rate)?;
        let overlay = ForwardOverlay::new(params.genome_length, mutation);
        let builder = GraphBuilder::new(params)?;

        let rng = match config.seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_seed(rand::rng().random()),
        };

        Ok(Self {
            config,
            builder,
            overlay,
            rng,
        })
    }

    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[inline]
    pub fn params(&self) -> &PopulationParams {
        &self.config.population
    }

    /// Run a single replicate from `seed`.
    pub fn run_once(&self, seed: u64) -> Result<RunResult, SimulationError> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut result = self.run_with_rng(&mut rng)?;
        result.seed = seed;
        Ok(result)
    }

    /// Run a single replicate drawing from a caller-owned generator.
    ///
    /// The returned `seed` is zero since the run is not tied to one.
    pub fn run_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<RunResult, SimulationError> {
        let history = self.builder.build(rng)?;
        let SampledGenomes {
            sequences,
            mutations,
        } = self.overlay.paint(&history, rng)?;

        Ok(RunResult {
            replicate: 0,
            seed: 0,
            history,
            sequences,
            mutations,
        })
    }

    /// Run every configured replicate in parallel.
    ///
    /// Results are ordered by replicate index and depend only on the master
    /// seed, not on the number of threads.
    pub fn run_replicates(&mut self) -> Result<Vec<RunResult>, ReplicateError> {
        self.run_replicates_with(|_| {})
    }

    /// Like [`Simulation::run_replicates`], calling `on_done` as each
    /// replicate finishes (in completion order).
    pub fn run_replicates_with<F>(&mut self, on_done: F) -> Result<Vec<RunResult>, ReplicateError>
    where
        F: Fn(&RunResult) + Sync,
    {
        let seeds: Vec<u64> = (0..self.config.replicates)
            .map(|_| self.rng.random())
            .collect();

        tracing::info!(
            replicates = seeds.len(),
            params = %self.config.population,
            "running replicates"
        );

        let this = &*self;
        seeds
            .par_iter()
            .enumerate()
            .map(|(replicate, &seed)| -> Result<RunResult, ReplicateError> {
                let mut result = this.run_once(seed).map_err(|source| ReplicateError {
                    replicate,
                    seed,
                    params: this.config.population.clone(),
                    source,
                })?;
                result.replicate = replicate;
                tracing::debug!(
                    replicate,
                    seed,
                    events = result.history.events().len(),
                    mutations = result.mutations,
                    "replicate finished"
                );
                on_done(&result);
                Ok(result)
            })
            .collect()
    }
}
