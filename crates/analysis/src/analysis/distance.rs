//! Distance calculations for sequences
//!
//! Provides functions for calculating genetic distances between the sampled
//! genomes of one run.

use crate::analysis::utils::hamming_distance_fast;
use hgtcoal_sim::base::Sequence;
use rayon::prelude::*;

/// Number of positions at which two sequences differ.
///
/// Sequences of unequal length are compared over their common prefix.
#[inline]
pub fn hamming_distance(a: &Sequence, b: &Sequence) -> usize {
    hamming_distance_fast(a, b)
}

/// Sorted positions at which two sequences differ.
pub fn mismatch_positions(a: &Sequence, b: &Sequence) -> Vec<usize> {
    a.as_slice()
        .iter()
        .zip(b.as_slice())
        .enumerate()
        .filter_map(|(pos, (x, y))| (x != y).then_some(pos))
        .collect()
}

/// Calculate pairwise distances between all sequences
///
/// # Returns
///
/// Vector of pairwise Hamming distances (unnormalized) for all pairs
/// `(i, j)` with `i < j`, in row-major order.
///
/// # Examples
///
/// ```
/// use hgtcoal_analysis::distance::pairwise_distances;
/// use hgtcoal_sim::base::Sequence;
/// use std::str::FromStr;
///
/// let seqs: Vec<Sequence> = ["AAAA", "AAAT", "TTTT"]
///     .iter()
///     .map(|s| Sequence::from_str(s).unwrap())
///     .collect();
/// assert_eq!(pairwise_distances(&seqs), vec![1, 4, 3]);
/// ```
pub fn pairwise_distances(sequences: &[Sequence]) -> Vec<usize> {
    let n = sequences.len();
    let mut distances = Vec::with_capacity(n * n.saturating_sub(1) / 2);

    for i in 0..n {
        for j in (i + 1)..n {
            distances.push(hamming_distance_fast(&sequences[i], &sequences[j]));
        }
    }

    distances
}

/// Calculate full distance matrix
///
/// Returns an n×n matrix of pairwise distances normalized by sequence
/// length. Element `[i][j]` is the fraction of sites at which sequence `i`
/// and sequence `j` differ.
pub fn distance_matrix(sequences: &[Sequence]) -> Vec<Vec<f64>> {
    let n = sequences.len();
    if n == 0 {
        return Vec::new();
    }

    let length = sequences[0].len() as f64;
    if length == 0.0 {
        return vec![vec![0.0; n]; n];
    }

    // Compute matrix in parallel by rows
    (0..n)
        .into_par_iter()
        .map(|i| {
            (0..n)
                .map(|j| {
                    if i == j {
                        0.0
                    } else {
                        hamming_distance_fast(&sequences[i], &sequences[j]) as f64 / length
                    }
                })
                .collect()
        })
        .collect()
}
