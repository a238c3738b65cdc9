//! Population genetics analysis tools for hgtcoal
//!
//! This module provides:
//! - Pairwise distances and mismatch positions
//! - Diversity metrics (π, Tajima's D, θ_W)
//! - Divergence moments and mismatch covariances along the genome
//! - The analytical expectation of pairwise divergence

pub mod covariance;
pub mod distance;
pub mod diversity;
pub mod utils;

// Re-export commonly used functions
pub use covariance::{Covariances, Divergence, MismatchMatrix, expected_ks};
pub use distance::{distance_matrix, hamming_distance, mismatch_positions, pairwise_distances};
pub use diversity::{nucleotide_diversity, segregating_sites, tajimas_d, wattersons_theta};
