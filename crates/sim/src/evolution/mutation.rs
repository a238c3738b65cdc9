//! Point mutations along a branch.
//!
//! Substitutions are modelled as a Poisson process over the branch: the
//! number of hits on a sequence of length `L` after `t` generations is
//! Poisson with mean `t * mu * L`, and each hit lands on a uniformly chosen
//! site and replaces its base with one of the other three symbols (Jukes-Cantor
//! style). Sites may be hit more than once, so the number of observed
//! differences can be lower than the number of mutations drawn.

use rand::Rng;
use rand_distr::{Distribution, Poisson};
use serde::{Deserialize, Serialize};

use crate::base::Sequence;
use crate::errors::ConfigError;

/// Uniform point-mutation model with a per-site, per-generation rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointMutation {
    rate: f64,
}

impl PointMutation {
    /// Create a model with the given per-site, per-generation rate.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidRate` if `rate` is negative, NaN or
    /// infinite.
    pub fn new(rate: f64) -> Result<Self, ConfigError> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(ConfigError::InvalidRate {
                name: "mutation rate",
                value: rate,
            });
        }
        Ok(Self { rate })
    }

    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Mean number of mutations on a branch of `generations` generations
    /// carrying `length` sites.
    #[inline]
    pub fn expected_count(&self, generations: f64, length: usize) -> f64 {
        generations * self.rate * length as f64
    }

    /// Draw the number of mutations hitting a branch.
    ///
    /// Returns zero without touching the generator when the expected count
    /// is not positive.
    pub fn sample_count<R: Rng + ?Sized>(
        &self,
        generations: f64,
        length: usize,
        rng: &mut R,
    ) -> usize {
        let lambda = self.expected_count(generations, length);
        if !(lambda > 0.0) {
            return 0;
        }
        match Poisson::new(lambda) {
            Ok(poisson) => poisson.sample(rng) as usize,
            // Only reachable for a non-finite mean, which validation excludes.
            Err(_) => 0,
        }
    }

    /// Mutate `sequence` in place as if it had evolved for `generations`.
    ///
    /// # Returns
    /// The number of mutations applied (every one changes a base, though a
    /// later hit may revert an earlier one).
    pub fn mutate_sequence<R: Rng + ?Sized>(
        &self,
        sequence: &mut Sequence,
        generations: f64,
        rng: &mut R,
    ) -> usize {
        let len = sequence.len();
        if len == 0 {
            return 0;
        }

        let count = self.sample_count(generations, len, rng);
        let bases = sequence.as_mut_slice();
        for _ in 0..count {
            let pos = rng.random_range(0..len);
            bases[pos] = bases[pos].random_other(rng);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Nucleotide;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_point_mutation_rejects_bad_rates() {
        assert!(PointMutation::new(-1e-3).is_err());
        assert!(PointMutation::new(f64::NAN).is_err());
        assert!(PointMutation::new(f64::INFINITY).is_err());
        assert!(PointMutation::new(0.0).is_ok());
    }

    #[test]
    fn test_expected_count() {
        let model = PointMutation::new(1e-4).unwrap();
        assert!((model.expected_count(200.0, 1000) - 20.0).abs() < 1e-9);
        assert_eq!(model.expected_count(0.0, 1000), 0.0);
    }

    #[test]
    fn test_mutate_sequence_zero_rate() {
        let model = PointMutation::new(0.0).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut seq = Sequence::uniform(Nucleotide::A, 100);

        assert_eq!(model.mutate_sequence(&mut seq, 1e6, &mut rng), 0);
        assert_eq!(seq, Sequence::uniform(Nucleotide::A, 100));
    }

    #[test]
    fn test_mutate_sequence_zero_length_branch() {
        let model = PointMutation::new(0.5).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut seq = Sequence::uniform(Nucleotide::C, 50);

        assert_eq!(model.mutate_sequence(&mut seq, 0.0, &mut rng), 0);
        assert_eq!(seq, Sequence::uniform(Nucleotide::C, 50));
    }

    #[test]
    fn test_mutate_sequence_empty() {
        let model = PointMutation::new(0.5).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut seq = Sequence::new();
        assert_eq!(model.mutate_sequence(&mut seq, 10.0, &mut rng), 0);
    }

    #[test]
    fn test_mutate_sequence_changes_bases() {
        let model = PointMutation::new(1e-3).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut seq = Sequence::uniform(Nucleotide::G, 1000);

        let count = model.mutate_sequence(&mut seq, 10.0, &mut rng);
        let changed = seq.as_slice().iter().filter(|&&b| b != Nucleotide::G).count();
        // Mean 10 hits; repeated hits can only lower the number of changed sites
        assert!(count > 0);
        assert!(changed <= count);
        assert!(changed > 0);
    }

    #[test]
    fn test_mutation_count_matches_poisson_mean() {
        let model = PointMutation::new(1e-3).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let trials = 2000;

        let total: usize = (0..trials)
            .map(|_| model.sample_count(5.0, 1000, &mut rng))
            .sum();
        let mean = total as f64 / trials as f64;
        // Mean 5, standard error ~0.05
        assert!((mean - 5.0).abs() < 0.3, "mean = {mean}");
    }

    #[test]
    fn test_mutate_sequence_deterministic() {
        let model = PointMutation::new(1e-2).unwrap();
        let mut rng1 = Xoshiro256PlusPlus::seed_from_u64(9);
        let mut rng2 = Xoshiro256PlusPlus::seed_from_u64(9);
        let mut seq1 = Sequence::uniform(Nucleotide::T, 300);
        let mut seq2 = seq1.clone();

        let n1 = model.mutate_sequence(&mut seq1, 3.0, &mut rng1);
        let n2 = model.mutate_sequence(&mut seq2, 3.0, &mut rng2);
        assert_eq!(n1, n2);
        assert_eq!(seq1, seq2);
    }
}
