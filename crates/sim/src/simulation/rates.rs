//! Competing event rates of the backward process.
//!
//! With `k` active lineages the process waits an exponential time with rate
//! `k(k-1)/2 + k p/2` (coalescent units) and then performs a transfer with
//! probability `p / (k - 1 + p)`, otherwise a coalescence. `p` is the
//! population-scaled transfer rate `2 N tau L`.

use rand::Rng;
use rand_distr::{Distribution, Exp1};

use crate::ancestry::EventKind;
use crate::simulation::PopulationParams;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateModel {
    population_size: usize,
    transfer_weight: f64,
}

impl RateModel {
    pub fn new(params: &PopulationParams) -> Self {
        Self {
            population_size: params.population_size,
            transfer_weight: params.scaled_transfer_rate(),
        }
    }

    /// Scaled transfer rate in effect with `k` lineages.
    ///
    /// Zero once the pool has reached the population size, so a transfer can
    /// never push the number of lineages above `N`.
    #[inline]
    pub fn transfer_weight(&self, k: usize) -> f64 {
        if k >= self.population_size {
            0.0
        } else {
            self.transfer_weight
        }
    }

    /// Total event rate with `k` lineages, in coalescent time units.
    #[inline]
    pub fn total_rate(&self, k: usize) -> f64 {
        let k = k as f64;
        let p = self.transfer_weight(k as usize);
        (k * (k - 1.0) + k * p) / 2.0
    }

    /// Probability that the next event is a transfer.
    #[inline]
    pub fn transfer_probability(&self, k: usize) -> f64 {
        let p = self.transfer_weight(k);
        if p > 0.0 {
            p / (k as f64 - 1.0 + p)
        } else {
            0.0
        }
    }

    /// Waiting time to the next event, in generations.
    ///
    /// The total rate is zero, and the time infinite, only for a single
    /// lineage with no transfer weight. A single lineage with transfer still
    /// splits at rate `p/2`; the backward builder stops at one lineage and
    /// never asks.
    pub fn sample_waiting_time<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> f64 {
        let rate = self.total_rate(k);
        let units: f64 = Exp1.sample(rng);
        units / rate * self.population_size as f64
    }

    pub fn sample_kind<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> EventKind {
        if rng.random::<f64>() < self.transfer_probability(k) {
            EventKind::Transfer
        } else {
            EventKind::Coalescence
        }
    }
}
