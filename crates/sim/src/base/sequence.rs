use std::fmt;
use std::str::FromStr;

use rand::Rng;

use super::Nucleotide;
use crate::errors::{InvalidSequence, OutOfBounds};

/// Fixed-length genome sequence backed by a vector of Nucleotides.
///
/// Sequences are painted and mutated in place by the forward overlay and
/// handed out, read-only, to downstream statistics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence(Vec<Nucleotide>);

impl Sequence {
    /// Create a new, empty `Sequence`.
    ///
    /// ```rust
    /// # use hgtcoal_sim::base::Sequence;
    /// let seq = Sequence::new();
    /// assert_eq!(seq.len(), 0);
    /// ```
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create a `Sequence` from a vector of `Nucleotide`s.
    pub fn from_nucleotides(nucleotides: Vec<Nucleotide>) -> Self {
        Self(nucleotides)
    }

    /// Create a sequence of `length` bases, all equal to `base`.
    pub fn uniform(base: Nucleotide, length: usize) -> Self {
        Self(vec![base; length])
    }

    /// Create a sequence of `length` bases drawn independently and uniformly
    /// from the alphabet.
    pub fn random<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Self {
        Self((0..length).map(|_| Nucleotide::random(rng)).collect())
    }

    /// Return the length of the sequence in bases.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` if the sequence contains no bases.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the `Nucleotide` at `index`, or `None` if out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Nucleotide> {
        self.0.get(index).copied()
    }

    /// Set the base at `index` to `base`.
    ///
    /// Returns `OutOfBounds` if `index` is greater than or equal to the
    /// sequence length.
    #[inline]
    pub fn set(&mut self, index: usize, base: Nucleotide) -> Result<(), OutOfBounds> {
        let len = self.len();
        self.0
            .get_mut(index)
            .map(|slot| *slot = base)
            .ok_or(OutOfBounds { index, len })
    }

    /// Borrow the underlying `Nucleotide` slice.
    #[inline]
    pub fn as_slice(&self) -> &[Nucleotide] {
        &self.0
    }

    /// Borrow the mutable underlying `Nucleotide` slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Nucleotide] {
        &mut self.0
    }

    /// Overwrite the closed range `[begin, end]` with the bases of `source`
    /// at the same positions.
    ///
    /// Returns `OutOfBounds` if `end` falls outside either sequence.
    pub fn copy_range_from(
        &mut self,
        source: &Sequence,
        begin: usize,
        end: usize,
    ) -> Result<(), OutOfBounds> {
        let limit = self.len().min(source.len());
        if end >= limit {
            return Err(OutOfBounds {
                index: end,
                len: limit,
            });
        }
        if begin <= end {
            self.0[begin..=end].copy_from_slice(&source.0[begin..=end]);
        }
        Ok(())
    }

    /// Uppercase ASCII bytes (`b"ACGT..."`).
    pub fn to_ascii_bytes(&self) -> Vec<u8> {
        self.0.iter().map(|nuc| nuc.to_ascii()).collect()
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &nuc in &self.0 {
            write!(f, "{}", nuc.to_char())?;
        }
        Ok(())
    }
}

impl FromStr for Sequence {
    type Err = InvalidSequence;

    /// Parse a textual representation (e.g. "ACGT") into a `Sequence`.
    ///
    /// Case-insensitive; any character outside the DNA alphabet produces an
    /// `InvalidSequence` error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let data: Result<Vec<Nucleotide>, _> = s
            .chars()
            .map(|c| {
                u8::try_from(c)
                    .ok()
                    .and_then(Nucleotide::from_ascii)
                    .ok_or(InvalidSequence::InvalidChar(c))
            })
            .collect();

        Ok(Self(data?))
    }
}
