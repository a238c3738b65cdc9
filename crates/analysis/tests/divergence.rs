//! Simulated divergence against its analytical expectation.

use hgtcoal_analysis::covariance::{MismatchMatrix, expected_ks};
use hgtcoal_analysis::diversity::nucleotide_diversity;
use hgtcoal_sim::simulation::{PopulationParams, SimulationBuilder, WrightFisher};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

const POPULATION: usize = 100;
const MUTATION: f64 = 1e-4;
const LENGTH: usize = 1000;

fn pooled_matrix(transfer_rate: f64, seed: u64) -> MismatchMatrix {
    let mut builder = SimulationBuilder::new()
        .population_size(POPULATION)
        .sample_size(2)
        .genome_length(LENGTH)
        .mutation_rate(MUTATION)
        .replicates(400)
        .seed(seed);
    if transfer_rate > 0.0 {
        builder = builder.transfer(transfer_rate, 100);
    }
    let mut sim = builder.build().unwrap();

    let mut matrix = MismatchMatrix::new(LENGTH);
    for run in sim.run_replicates().unwrap() {
        matrix.add_sample(&run.sequences);
    }
    matrix
}

#[test]
fn test_clonal_divergence_matches_expected_ks() {
    let matrix = pooled_matrix(0.0, 42);
    assert_eq!(matrix.len(), 400);

    let expected = expected_ks(POPULATION, MUTATION, 0.0, 100, 4);
    let observed = matrix.divergence().mean;
    let rel = (observed - expected).abs() / expected;
    assert!(rel < 0.25, "observed {observed}, expected {expected}");
}

#[test]
fn test_transfer_keeps_mean_divergence() {
    // Transfer reshuffles genealogies along the genome but every site
    // still follows the same marginal coalescent.
    let matrix = pooled_matrix(1e-6, 7);
    let expected = expected_ks(POPULATION, MUTATION, 0.0, 100, 4);
    let observed = matrix.divergence().mean;
    let rel = (observed - expected).abs() / expected;
    assert!(rel < 0.25, "observed {observed}, expected {expected}");
}

#[test]
fn test_diversity_of_a_sample() {
    let mut sim = SimulationBuilder::new()
        .population_size(POPULATION)
        .sample_size(10)
        .genome_length(LENGTH)
        .mutation_rate(MUTATION)
        .seed(3)
        .build()
        .unwrap();
    let run = sim.run_replicates().unwrap().remove(0);

    let pi = nucleotide_diversity(&run.sequences);
    let matrix = MismatchMatrix::from_sequences(&run.sequences);
    assert_eq!(matrix.len(), 45);
    assert!((matrix.divergence().mean - pi).abs() < 1e-12);
}

#[test]
fn test_covariances_of_simulated_sample() {
    let matrix = pooled_matrix(1e-6, 11);
    let covs = matrix.covariances(50);

    assert_eq!(covs.structure.len(), 50);
    // At distance zero the joint probability is the mean divergence.
    assert!((covs.joint[0] - matrix.divergence().mean).abs() < 1e-12);
    for l in 0..50 {
        assert!((covs.structure[l] - (covs.joint[l] - covs.product[l])).abs() < 1e-15);
        assert!(
            (covs.random[l] - (covs.product[l] - covs.marginal_product[l])).abs() < 1e-15
        );
    }
}

/// Mean pairwise divergence of a Wright-Fisher population at equilibrium,
/// averaged over samples taken every few generations.
fn forward_divergence(transfer_rate: f64, seed: u64) -> f64 {
    let params = PopulationParams {
        population_size: 100,
        sample_size: 10,
        genome_length: 200,
        mutation_rate: 1e-3,
        transfer_rate,
        fragment_length: 20,
    };
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut pop = WrightFisher::new(params, &mut rng).unwrap();

    pop.run(500, &mut rng);
    let mut total = 0.0;
    let mut samples = 0;
    for _ in 0..400 {
        pop.run(5, &mut rng);
        total += nucleotide_diversity(&pop.sample(10, &mut rng));
        samples += 1;
    }
    total / samples as f64
}

#[test]
fn test_forward_clonal_divergence_matches_expected_ks() {
    let expected = expected_ks(100, 1e-3, 0.0, 20, 4);
    let observed = forward_divergence(0.0, 42);
    let rel = (observed - expected).abs() / expected;
    assert!(rel < 0.25, "observed {observed}, expected {expected}");
}

#[test]
fn test_forward_transfer_divergence_matches_expected_ks() {
    let expected = expected_ks(100, 1e-3, 1e-3, 20, 4);
    let observed = forward_divergence(1e-3, 5);
    let rel = (observed - expected).abs() / expected;
    assert!(rel < 0.25, "observed {observed}, expected {expected}");
}
