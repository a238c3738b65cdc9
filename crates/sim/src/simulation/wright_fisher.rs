//! Forward-time Wright-Fisher population with point mutation and transfer.
//!
//! Every generation each genome picks its parent uniformly from the previous
//! generation. Mutations and transfers then arrive together as one Poisson
//! number of events with mean `N L (mu + tau)`. Each event hits a uniform
//! genome and site and is a mutation with probability `mu / (mu + tau)`,
//! otherwise a transfer: the `f` sites starting at the hit site are copied
//! from a donor drawn uniformly from the other genomes, wrapping past the
//! end of the circular genome.
//!
//! This is the generation-by-generation counterpart of the coalescent in
//! [`crate::simulation::backward`] and serves as an independent check of
//! its divergence statistics.

use rand::Rng;
use rand::seq::index;
use rand_distr::{Distribution, Poisson};

use crate::base::Sequence;
use crate::errors::ConfigError;
use crate::simulation::PopulationParams;

/// Events applied during one or more generations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationEvents {
    pub mutations: usize,
    pub transfers: usize,
}

impl std::ops::AddAssign for GenerationEvents {
    fn add_assign(&mut self, other: Self) {
        self.mutations += other.mutations;
        self.transfers += other.transfers;
    }
}

/// A population of full genomes evolved forward in time.
#[derive(Debug, Clone)]
pub struct WrightFisher {
    params: PopulationParams,
    genomes: Vec<Sequence>,
    /// `None` when neither mutation nor transfer can occur
    events: Option<Poisson<f64>>,
    /// Probability that an event is a mutation
    mutation_share: f64,
    generation: usize,
}

impl WrightFisher {
    /// Create a monomorphic population: every genome is a copy of one random
    /// reference sequence.
    pub fn new<R: Rng + ?Sized>(
        params: PopulationParams,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        params.validate()?;

        let total = params.mutation_rate + params.transfer_rate;
        let mean = params.population_size as f64 * params.genome_length as f64 * total;
        let events = if mean > 0.0 {
            let poisson = Poisson::new(mean).map_err(|_| ConfigError::InvalidRate {
                name: "event rate",
                value: mean,
            })?;
            Some(poisson)
        } else {
            None
        };
        let mutation_share = if total > 0.0 {
            params.mutation_rate / total
        } else {
            1.0
        };

        let reference = Sequence::random(params.genome_length, rng);
        let genomes = vec![reference; params.population_size];

        Ok(Self {
            params,
            genomes,
            events,
            mutation_share,
            generation: 0,
        })
    }

    #[inline]
    pub fn params(&self) -> &PopulationParams {
        &self.params
    }

    #[inline]
    pub fn genomes(&self) -> &[Sequence] {
        &self.genomes
    }

    /// Number of generations evolved so far.
    #[inline]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.genomes.len()
    }

    /// One generation: reproduction followed by mutation and transfer.
    pub fn evolve<R: Rng + ?Sized>(&mut self, rng: &mut R) -> GenerationEvents {
        self.reproduce(rng);
        let events = self.manipulate(rng);
        tracing::trace!(
            generation = self.generation,
            mutations = events.mutations,
            transfers = events.transfers,
            "generation evolved"
        );
        events
    }

    /// Evolve `generations` generations and return the summed events.
    pub fn run<R: Rng + ?Sized>(&mut self, generations: usize, rng: &mut R) -> GenerationEvents {
        let mut total = GenerationEvents::default();
        for _ in 0..generations {
            total += self.evolve(rng);
        }
        total
    }

    /// Wright-Fisher resampling: each new genome copies a uniformly chosen
    /// genome of the previous generation.
    pub fn reproduce<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let n = self.genomes.len();
        let next: Vec<Sequence> = (0..n)
            .map(|_| self.genomes[rng.random_range(0..n)].clone())
            .collect();
        self.genomes = next;
        self.generation += 1;
    }

    /// Draw this generation's events and apply them.
    pub fn manipulate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> GenerationEvents {
        let mut applied = GenerationEvents::default();
        let count = match &self.events {
            Some(poisson) => poisson.sample(rng) as usize,
            None => return applied,
        };

        let n = self.genomes.len();
        let length = self.params.genome_length;
        for _ in 0..count {
            let genome = rng.random_range(0..n);
            let site = rng.random_range(0..length);
            if rng.random::<f64>() < self.mutation_share {
                let bases = self.genomes[genome].as_mut_slice();
                bases[site] = bases[site].random_other(rng);
                applied.mutations += 1;
            } else if self.transfer(genome, site, rng) {
                applied.transfers += 1;
            }
        }
        applied
    }

    /// Copy the block of `fragment_length` sites starting at `begin` from a
    /// random donor into `recipient`.
    ///
    /// Returns `false` without drawing anything when the population has no
    /// other genome to act as donor.
    fn transfer<R: Rng + ?Sized>(&mut self, recipient: usize, begin: usize, rng: &mut R) -> bool {
        let n = self.genomes.len();
        if n < 2 {
            return false;
        }
        let mut donor = rng.random_range(0..n - 1);
        if donor >= recipient {
            donor += 1;
        }

        let length = self.params.genome_length;
        let end = begin + self.params.fragment_length;
        let (to, from) = pair_mut(&mut self.genomes, recipient, donor);
        let (to, from) = (to.as_mut_slice(), from.as_slice());
        if end <= length {
            to[begin..end].copy_from_slice(&from[begin..end]);
        } else {
            to[begin..].copy_from_slice(&from[begin..]);
            let wrapped = (end - length).min(length);
            to[..wrapped].copy_from_slice(&from[..wrapped]);
        }
        true
    }

    /// Copies of `size` distinct genomes drawn uniformly without replacement
    /// (all of them if `size` exceeds the population).
    pub fn sample<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Vec<Sequence> {
        let n = self.genomes.len();
        index::sample(rng, n, size.min(n))
            .into_iter()
            .map(|i| self.genomes[i].clone())
            .collect()
    }
}

/// Mutable access to `genomes[a]` alongside shared access to `genomes[b]`.
fn pair_mut(genomes: &mut [Sequence], a: usize, b: usize) -> (&mut Sequence, &Sequence) {
    debug_assert_ne!(a, b);
    if a < b {
        let (lo, hi) = genomes.split_at_mut(b);
        (&mut lo[a], &hi[0])
    } else {
        let (lo, hi) = genomes.split_at_mut(a);
        (&mut hi[0], &lo[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Nucleotide;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn params(mutation_rate: f64, transfer_rate: f64) -> PopulationParams {
        PopulationParams {
            population_size: 20,
            sample_size: 5,
            genome_length: 50,
            mutation_rate,
            transfer_rate,
            fragment_length: 4,
        }
    }

    #[test]
    fn test_new_population_is_monomorphic() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let pop = WrightFisher::new(params(1e-3, 0.0), &mut rng).unwrap();

        assert_eq!(pop.size(), 20);
        assert_eq!(pop.generation(), 0);
        assert!(pop.genomes().iter().all(|g| g.len() == 50));
        assert!(pop.genomes().iter().all(|g| g == &pop.genomes()[0]));
    }

    #[test]
    fn test_new_rejects_invalid_params() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut p = params(1e-3, 1e-3);
        p.fragment_length = 0;
        assert!(matches!(
            WrightFisher::new(p, &mut rng),
            Err(ConfigError::FragmentLength { .. })
        ));
    }

    #[test]
    fn test_without_events_genomes_never_change() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut pop = WrightFisher::new(params(0.0, 0.0), &mut rng).unwrap();
        let reference = pop.genomes()[0].clone();

        let events = pop.run(50, &mut rng);
        assert_eq!(events, GenerationEvents::default());
        assert_eq!(pop.generation(), 50);
        assert!(pop.genomes().iter().all(|g| g == &reference));
    }

    #[test]
    fn test_mutation_only_population() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut pop = WrightFisher::new(params(1e-3, 0.0), &mut rng).unwrap();

        // One expected event per generation
        let events = pop.run(200, &mut rng);
        assert_eq!(events.transfers, 0);
        assert!(events.mutations > 100, "mutations = {}", events.mutations);
    }

    #[test]
    fn test_event_count_matches_rates() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        let mut pop = WrightFisher::new(params(1e-3, 1e-3), &mut rng).unwrap();

        // N L (mu + tau) = 2 events per generation, half of them transfers
        let events = pop.run(500, &mut rng);
        let total = events.mutations + events.transfers;
        assert!((850..1150).contains(&total), "total = {total}");
        assert!((400..600).contains(&events.transfers), "{events:?}");
    }

    #[test]
    fn test_transfer_copies_block_from_donor() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut p = params(0.0, 1e-3);
        p.population_size = 2;
        p.sample_size = 2;
        p.genome_length = 10;
        let mut pop = WrightFisher::new(p, &mut rng).unwrap();
        pop.genomes = vec![
            Sequence::uniform(Nucleotide::A, 10),
            Sequence::uniform(Nucleotide::C, 10),
        ];

        assert!(pop.transfer(0, 2, &mut rng));
        assert_eq!(pop.genomes[0].to_string(), "AACCCCAAAA");
        assert_eq!(pop.genomes[1].to_string(), "CCCCCCCCCC");
    }

    #[test]
    fn test_transfer_wraps_around_genome_end() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut p = params(0.0, 1e-3);
        p.population_size = 2;
        p.sample_size = 2;
        p.genome_length = 10;
        let mut pop = WrightFisher::new(p, &mut rng).unwrap();
        pop.genomes = vec![
            Sequence::uniform(Nucleotide::A, 10),
            Sequence::uniform(Nucleotide::G, 10),
        ];

        assert!(pop.transfer(1, 8, &mut rng));
        assert_eq!(pop.genomes[1].to_string(), "AAGGGGGGAA");
        assert_eq!(pop.genomes[0].to_string(), "AAAAAAAAAA");
    }

    #[test]
    fn test_single_genome_skips_transfer() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut p = params(0.0, 0.05);
        p.population_size = 1;
        p.sample_size = 1;
        let mut pop = WrightFisher::new(p, &mut rng).unwrap();
        let reference = pop.genomes()[0].clone();

        let events = pop.run(20, &mut rng);
        assert_eq!(events.transfers, 0);
        assert_eq!(pop.genomes()[0], reference);
    }

    #[test]
    fn test_sample_draws_distinct_genomes() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut pop = WrightFisher::new(params(1e-3, 0.0), &mut rng).unwrap();
        pop.genomes = (0..20).map(|_| Sequence::random(50, &mut rng)).collect();

        let sample = pop.sample(8, &mut rng);
        assert_eq!(sample.len(), 8);
        for (i, a) in sample.iter().enumerate() {
            assert!(pop.genomes().contains(a));
            assert!(sample[i + 1..].iter().all(|b| b != a));
        }
        assert_eq!(pop.sample(100, &mut rng).len(), 20);
    }

    #[test]
    fn test_evolution_is_reproducible() {
        let run = |seed| {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
            let mut pop = WrightFisher::new(params(1e-3, 1e-3), &mut rng).unwrap();
            pop.run(100, &mut rng);
            pop.genomes().to_vec()
        };
        assert_eq!(run(3), run(3));
        assert_ne!(run(3), run(4));
    }
}
