//! Utility functions for analysis module
//!
//! Shared helper functions used across analysis submodules.

use hgtcoal_sim::base::Sequence;

/// Calculate mean of a vector
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate the unbiased sample variance
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let mean_val = mean(values);
    values.iter().map(|v| (v - mean_val).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Optimized Hamming distance calculation between two sequences
///
/// Compares up to the length of the shorter sequence.
#[inline]
pub fn hamming_distance_fast(seq1: &Sequence, seq2: &Sequence) -> usize {
    let len = seq1.len().min(seq2.len());
    let indices1 = &seq1.as_slice()[..len];
    let indices2 = &seq2.as_slice()[..len];

    // Process in chunks of 8 for better CPU pipelining
    let mut distance = 0;
    let mut chunks1 = indices1.chunks_exact(8);
    let mut chunks2 = indices2.chunks_exact(8);
    for (a, b) in (&mut chunks1).zip(&mut chunks2) {
        for k in 0..8 {
            distance += (a[k] != b[k]) as usize;
        }
    }

    // Process remaining elements
    for (a, b) in chunks1.remainder().iter().zip(chunks2.remainder()) {
        distance += (a != b) as usize;
    }

    distance
}

/// Cache for commonly used harmonic numbers
/// Note: harmonic_number(n) = sum_{i=1}^{n-1} 1/i
static HARMONIC_CACHE: [f64; 11] = [
    0.0,                // n=0 (unused)
    0.0,                // n=1
    1.0,                // n=2
    1.5,                // n=3
    1.8333333333333333, // n=4
    2.083333333333333,  // n=5
    2.283333333333333,  // n=6
    2.45,               // n=7
    2.5928571428571425, // n=8
    2.7178571428571425, // n=9
    2.8289682539682537, // n=10
];

/// Calculate harmonic number efficiently
#[inline]
pub fn harmonic_number(n: usize) -> f64 {
    if n < HARMONIC_CACHE.len() {
        HARMONIC_CACHE[n]
    } else {
        (1..n).map(|i| 1.0 / i as f64).sum()
    }
}
