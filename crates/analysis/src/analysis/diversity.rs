//! Diversity metrics for population genetics
//!
//! Implements standard measures of genetic diversity over a sample of
//! equal-length genomes:
//! - Nucleotide diversity (π)
//! - Tajima's D
//! - Watterson's estimator (θ_W)

use crate::analysis::utils::{hamming_distance_fast, harmonic_number};
use hgtcoal_sim::base::Sequence;
use rayon::prelude::*;

/// Calculate nucleotide diversity (π) for a sample
///
/// Nucleotide diversity is the average number of nucleotide differences
/// per site between two sequences.
///
/// # Formula
///
/// $$\pi = \frac{\sum_{i<j} d_{ij}}{n(n-1)/2 \cdot L}$$
///
/// where $d_{ij}$ is the number of differences between sequences $i$ and $j$,
/// $n$ is the number of sequences, and $L$ is the sequence length.
///
/// # Examples
///
/// ```
/// use hgtcoal_analysis::diversity::nucleotide_diversity;
/// use hgtcoal_sim::base::Sequence;
/// use std::str::FromStr;
///
/// let seqs = vec![Sequence::from_str("AAAA").unwrap(), Sequence::from_str("AATT").unwrap()];
/// assert_eq!(nucleotide_diversity(&seqs), 0.5);
/// ```
pub fn nucleotide_diversity(sequences: &[Sequence]) -> f64 {
    let n = sequences.len();
    if n < 2 {
        return 0.0;
    }

    let length = sequences[0].len();
    if length == 0 {
        return 0.0;
    }

    // Calculate pairwise differences in parallel
    let total_differences: usize = (0..n)
        .into_par_iter()
        .map(|i| {
            (i + 1..n)
                .map(|j| hamming_distance_fast(&sequences[i], &sequences[j]))
                .sum::<usize>()
        })
        .sum();

    let num_comparisons = n * (n - 1) / 2;
    total_differences as f64 / (num_comparisons * length) as f64
}

/// Calculate Tajima's D statistic
///
/// Compares π with θ_W; negative values indicate an excess of rare
/// variants, positive values an excess of intermediate-frequency variants.
///
/// # References
///
/// Tajima, F. (1989). Statistical method for testing the neutral mutation
/// hypothesis by DNA polymorphism. Genetics, 123(3), 585-595.
pub fn tajimas_d(sequences: &[Sequence]) -> f64 {
    let n = sequences.len();
    if n < 2 {
        return 0.0;
    }

    let length = sequences[0].len();
    if length == 0 {
        return 0.0;
    }

    let pi = nucleotide_diversity(sequences);
    let theta_w = wattersons_theta(sequences);

    // If both are zero, no variation
    if pi == 0.0 && theta_w == 0.0 {
        return 0.0;
    }

    // Calculate variance components
    let n_f64 = n as f64;
    let a1 = harmonic_number(n);
    let a2: f64 = (1..n).map(|i| 1.0 / (i * i) as f64).sum();

    let b1 = (n_f64 + 1.0) / (3.0 * (n_f64 - 1.0));
    let b2 = 2.0 * (n_f64 * n_f64 + n_f64 + 3.0) / (9.0 * n_f64 * (n_f64 - 1.0));

    let c1 = b1 - 1.0 / a1;
    let c2 = b2 - (n_f64 + 2.0) / (a1 * n_f64) + a2 / (a1 * a1);

    let e1 = c1 / a1;
    let e2 = c2 / (a1 * a1 + a2);

    let s = segregating_sites(sequences) as f64;
    if s == 0.0 {
        return 0.0;
    }

    // Variance of (π - θ_W)
    let var = e1 * s + e2 * s * (s - 1.0);
    if var <= 0.0 {
        return 0.0;
    }

    (pi - theta_w) * length as f64 / var.sqrt()
}

/// Calculate Watterson's estimator (θ_W) per site
///
/// # Formula
///
/// $$\theta_W = \frac{S}{a_n L}$$
///
/// where $S$ is the number of segregating sites and
/// $a_n = \sum_{i=1}^{n-1} \frac{1}{i}$
pub fn wattersons_theta(sequences: &[Sequence]) -> f64 {
    let n = sequences.len();
    if n < 2 {
        return 0.0;
    }

    let length = sequences[0].len();
    if length == 0 {
        return 0.0;
    }

    let s = segregating_sites(sequences) as f64;
    s / (harmonic_number(n) * length as f64)
}

/// Number of positions at which not all sequences carry the same base.
pub fn segregating_sites(sequences: &[Sequence]) -> usize {
    let Some(first) = sequences.first() else {
        return 0;
    };

    (0..first.len())
        .filter(|&pos| {
            let base = first.get(pos);
            sequences.iter().any(|seq| seq.get(pos) != base)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn seqs(texts: &[&str]) -> Vec<Sequence> {
        texts.iter().map(|s| Sequence::from_str(s).unwrap()).collect()
    }

    #[test]
    fn test_nucleotide_diversity_identical() {
        let sequences = seqs(&["ACGT", "ACGT", "ACGT"]);
        assert_eq!(nucleotide_diversity(&sequences), 0.0);
        assert_eq!(segregating_sites(&sequences), 0);
        assert_eq!(tajimas_d(&sequences), 0.0);
    }

    #[test]
    fn test_nucleotide_diversity_values() {
        // Pairs: (0,1)=1, (0,2)=2, (1,2)=1 over 4 sites
        let sequences = seqs(&["AAAA", "AAAT", "AATT"]);
        assert!((nucleotide_diversity(&sequences) - 4.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_wattersons_theta() {
        let sequences = seqs(&["AAAA", "AAAT", "AATT"]);
        assert_eq!(segregating_sites(&sequences), 2);
        // S / (a_3 * L) = 2 / (1.5 * 4)
        assert!((wattersons_theta(&sequences) - 2.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_small_samples() {
        let one = seqs(&["ACGT"]);
        assert_eq!(nucleotide_diversity(&one), 0.0);
        assert_eq!(wattersons_theta(&one), 0.0);
        assert_eq!(tajimas_d(&one), 0.0);
        assert_eq!(segregating_sites(&[]), 0);
    }

    #[test]
    fn test_tajimas_d_sign() {
        // One singleton per site: excess of rare variants
        let rare = seqs(&["AAAAAA", "TAAAAA", "ATAAAA", "AATAAA", "AAATAA", "AAAATA"]);
        assert!(tajimas_d(&rare) < 0.0);

        // Every site split in half: excess of intermediate variants
        let common = seqs(&["AAAA", "AAAA", "AAAA", "TTTT", "TTTT", "TTTT"]);
        assert!(tajimas_d(&common) > 0.0);
    }
}
