//! Divergence and mismatch covariance statistics.
//!
//! Every pair of sampled genomes contributes one row: the sorted positions
//! at which the two differ. From these rows we estimate the mean and
//! variance of pairwise divergence, and how the probability of a mismatch
//! at one site depends on a mismatch `l` sites upstream on a circular
//! genome. Transfer of homologous blocks shortens the range of that
//! dependence relative to a clonal population.

use crate::analysis::distance::mismatch_positions;
use crate::analysis::utils::{mean, variance};
use hgtcoal_sim::base::Sequence;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Mean and variance of per-pair divergence (fraction of differing sites).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Divergence {
    pub mean: f64,
    pub variance: f64,
}

/// Mismatch correlation profile, indexed by distance `l` along the genome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Covariances {
    /// Structure covariance, `P(XY at distance l) - <X·Y>_l`
    pub structure: Vec<f64>,
    /// Random covariance, `<X·Y>_l - <X>_l <Y>_l`
    pub random: Vec<f64>,
    /// Probability that a pair mismatches at both `x` and `x + l`
    pub joint: Vec<f64>,
    /// Mean over sites of the product of column mismatch frequencies, `<X·Y>_l`
    pub product: Vec<f64>,
    /// Product of the mean column frequencies, `<X>_l <Y>_l`
    pub marginal_product: Vec<f64>,
}

/// Sorted mismatch positions of many sequence pairs over a common genome
/// length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MismatchMatrix {
    length: usize,
    rows: Vec<Vec<usize>>,
}

impl MismatchMatrix {
    /// An empty matrix over genomes of `length` sites.
    pub fn new(length: usize) -> Self {
        Self {
            length,
            rows: Vec::new(),
        }
    }

    /// Build a matrix from raw rows of mismatch positions.
    ///
    /// Rows are sorted and positions outside `0..length` are dropped.
    pub fn from_rows(length: usize, rows: Vec<Vec<usize>>) -> Self {
        let mut matrix = Self::new(length);
        for row in rows {
            matrix.push_row(row);
        }
        matrix
    }

    /// One row for each pair `(i, j)`, `i < j`, of `sequences`.
    ///
    /// The genome length is taken from the first sequence.
    pub fn from_sequences(sequences: &[Sequence]) -> Self {
        let length = sequences.first().map_or(0, Sequence::len);
        let mut matrix = Self::new(length);
        matrix.add_sample(sequences);
        matrix
    }

    /// Append the pairs of another sample (e.g. another replicate) of
    /// genomes with the same length.
    pub fn add_sample(&mut self, sequences: &[Sequence]) {
        let n = sequences.len();
        let rows: Vec<Vec<usize>> = (0..n)
            .into_par_iter()
            .flat_map_iter(|i| {
                (i + 1..n).map(move |j| mismatch_positions(&sequences[i], &sequences[j]))
            })
            .collect();
        for row in rows {
            self.push_row(row);
        }
    }

    fn push_row(&mut self, mut row: Vec<usize>) {
        let length = self.length;
        row.retain(|&pos| pos < length);
        row.sort_unstable();
        row.dedup();
        self.rows.push(row);
    }

    /// Genome length in sites.
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of rows (sequence pairs).
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn rows(&self) -> &[Vec<usize>] {
        &self.rows
    }

    /// Mean and sample variance of per-pair divergence.
    pub fn divergence(&self) -> Divergence {
        if self.length == 0 {
            return Divergence {
                mean: 0.0,
                variance: 0.0,
            };
        }
        let values: Vec<f64> = self
            .rows
            .iter()
            .map(|row| row.len() as f64 / self.length as f64)
            .collect();
        Divergence {
            mean: mean(&values),
            variance: variance(&values),
        }
    }

    /// Mismatch covariances for distances `0..max_l` on a circular genome.
    ///
    /// `max_l` is capped at the genome length. Rows are counted in parallel
    /// and the partial counts summed.
    pub fn covariances(&self, max_l: usize) -> Covariances {
        let length = self.length;
        let max_l = max_l.min(length);
        if self.rows.is_empty() || max_l == 0 {
            return Covariances::default();
        }

        let (xs, xy) = self
            .rows
            .par_iter()
            .fold(
                || (vec![0usize; length], vec![0usize; max_l]),
                |(mut xs, mut xy), row| {
                    count_row(row, length, &mut xs, &mut xy);
                    (xs, xy)
                },
            )
            .reduce(
                || (vec![0usize; length], vec![0usize; max_l]),
                |(mut xs, mut xy), (xs2, xy2)| {
                    xs.iter_mut().zip(xs2).for_each(|(a, b)| *a += b);
                    xy.iter_mut().zip(xy2).for_each(|(a, b)| *a += b);
                    (xs, xy)
                },
            );

        let size = self.rows.len() as f64;
        let xs_p: Vec<f64> = xs.iter().map(|&c| c as f64 / size).collect();
        let joint: Vec<f64> = xy
            .iter()
            .map(|&c| c as f64 / (size * length as f64))
            .collect();

        let mut out = Covariances {
            structure: Vec::with_capacity(max_l),
            random: Vec::with_capacity(max_l),
            joint,
            product: Vec::with_capacity(max_l),
            marginal_product: Vec::with_capacity(max_l),
        };
        for l in 0..max_l {
            let (mut xy_sum, mut x_sum, mut y_sum) = (0.0, 0.0, 0.0);
            for x in 0..length {
                let y = (x + l) % length;
                xy_sum += xs_p[x] * xs_p[y];
                x_sum += xs_p[x];
                y_sum += xs_p[y];
            }
            let n = length as f64;
            let product = xy_sum / n;
            let marginal = (x_sum / n) * (y_sum / n);

            out.structure.push(out.joint[l] - product);
            out.random.push(product - marginal);
            out.product.push(product);
            out.marginal_product.push(marginal);
        }
        out
    }
}

/// Add the column counts and the circular co-occurrence counts of one
/// sorted row.
fn count_row(row: &[usize], length: usize, xs: &mut [usize], xy: &mut [usize]) {
    let max_l = xy.len();
    let m = row.len();
    for (xi, &x) in row.iter().enumerate() {
        xs[x] += 1;
        // Walking forward from x around the circle visits increasing distances.
        for step in 0..m {
            let y = row[(xi + step) % m];
            let d = (y + length - x) % length;
            if d >= max_l {
                break;
            }
            xy[d] += 1;
        }
    }
}

/// Expected pairwise divergence per site at mutation-drift-transfer
/// equilibrium.
///
/// `population_size` is `N`, `mutation_rate` and `transfer_rate` are per
/// site per generation, `fragment_length` is the transferred block length
/// and `alphabet` the number of character states (4 for DNA).
///
/// ```
/// use hgtcoal_analysis::covariance::expected_ks;
///
/// let ks = expected_ks(1000, 1e-4, 0.0, 100, 4);
/// assert!((ks - 0.157911).abs() < 1e-5);
/// ```
pub fn expected_ks(
    population_size: usize,
    mutation_rate: f64,
    transfer_rate: f64,
    fragment_length: usize,
    alphabet: usize,
) -> f64 {
    if !(mutation_rate > 0.0) || alphabet < 2 {
        return 0.0;
    }
    let n = population_size as f64;
    let a = alphabet as f64;
    let l = fragment_length as f64;

    // Probability of any event per generation on a pair, and the ratio of
    // transfer to mutation.
    let total = 2.0 * (mutation_rate + transfer_rate * l);
    let ratio = l * transfer_rate / mutation_rate;
    let u_star = 1.0 - (-total * (1.0 + 1.0 / ((a - 1.0) * (1.0 + ratio)))).exp();

    n * u_star / (ratio + a / (a - 1.0) * (n * u_star + 1.0 - u_star))
}
