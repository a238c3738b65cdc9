use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::InvalidNucleotide;

/// A DNA nucleotide base.
///
/// `Nucleotide` is a compact, Copyable representation of DNA bases backed by
/// a single byte (u8). The mapping of variants to integers is stable and used
/// throughout the crate (A=0, C=1, G=2, T=3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Nucleotide {
    A = 0,
    C = 1,
    G = 2,
    T = 3,
}

impl Nucleotide {
    /// Number of symbols in the alphabet.
    pub const COUNT: usize = 4;

    /// Every symbol, in index order.
    pub const ALL: [Nucleotide; Self::COUNT] = [Self::A, Self::C, Self::G, Self::T];

    /// Convert from u8 index (0-3)
    #[inline(always)]
    pub const fn from_index(idx: u8) -> Option<Self> {
        match idx {
            0 => Some(Self::A),
            1 => Some(Self::C),
            2 => Some(Self::G),
            3 => Some(Self::T),
            _ => None,
        }
    }

    /// Convert to the compact u8 index (0-3).
    #[inline(always)]
    pub const fn to_index(self) -> u8 {
        self as u8
    }

    /// Convert from an ASCII byte (`b'A'`, `b'C'`, `b'G'`, `b'T'`) and also
    /// accepts lowercase bytes. Returns `None` for non-standard characters.
    #[inline]
    pub const fn from_ascii(byte: u8) -> Option<Self> {
        match byte {
            b'A' | b'a' => Some(Self::A),
            b'C' | b'c' => Some(Self::C),
            b'G' | b'g' => Some(Self::G),
            b'T' | b't' => Some(Self::T),
            _ => None,
        }
    }

    /// Convert to an uppercase ASCII byte representing this nucleotide.
    #[inline(always)]
    pub const fn to_ascii(self) -> u8 {
        match self {
            Self::A => b'A',
            Self::C => b'C',
            Self::G => b'G',
            Self::T => b'T',
        }
    }

    /// Convert to an uppercase `char` representing this nucleotide.
    #[inline(always)]
    pub const fn to_char(self) -> char {
        self.to_ascii() as char
    }

    /// Draw a base uniformly from the alphabet.
    #[inline]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::COUNT)]
    }

    /// Draw a base uniformly from the alphabet, resampling until it differs
    /// from `self`.
    ///
    /// Used for point substitutions so that every mutation is an actual state
    /// change.
    #[inline]
    pub fn random_other<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        loop {
            let candidate = Self::random(rng);
            if candidate != self {
                return candidate;
            }
        }
    }
}

impl TryFrom<u8> for Nucleotide {
    type Error = InvalidNucleotide;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::from_ascii(byte).ok_or(InvalidNucleotide(byte))
    }
}

impl From<Nucleotide> for u8 {
    #[inline(always)]
    fn from(nuc: Nucleotide) -> u8 {
        nuc.to_index()
    }
}

impl From<Nucleotide> for char {
    #[inline(always)]
    fn from(nuc: Nucleotide) -> char {
        nuc.to_char()
    }
}

impl fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_nucleotide_index_roundtrip() {
        for (i, nuc) in Nucleotide::ALL.iter().enumerate() {
            assert_eq!(nuc.to_index() as usize, i);
            assert_eq!(Nucleotide::from_index(i as u8), Some(*nuc));
        }
        assert_eq!(Nucleotide::from_index(4), None);
        assert_eq!(Nucleotide::from_index(255), None);
    }

    #[test]
    fn test_nucleotide_from_ascii() {
        assert_eq!(Nucleotide::from_ascii(b'A'), Some(Nucleotide::A));
        assert_eq!(Nucleotide::from_ascii(b'c'), Some(Nucleotide::C));
        assert_eq!(Nucleotide::from_ascii(b'G'), Some(Nucleotide::G));
        assert_eq!(Nucleotide::from_ascii(b't'), Some(Nucleotide::T));

        // Invalid
        assert_eq!(Nucleotide::from_ascii(b'N'), None);
        assert_eq!(Nucleotide::from_ascii(b' '), None);
    }

    #[test]
    fn test_nucleotide_try_from_invalid() {
        let err = Nucleotide::try_from(b'X').unwrap_err();
        assert_eq!(err, InvalidNucleotide(b'X'));
        assert!(err.to_string().contains("'X'"));
    }

    #[test]
    fn test_nucleotide_display() {
        assert_eq!(format!("{}", Nucleotide::G), "G");
        assert_eq!(char::from(Nucleotide::T), 'T');
    }

    #[test]
    fn test_random_covers_alphabet() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut counts = [0usize; Nucleotide::COUNT];
        for _ in 0..4000 {
            counts[Nucleotide::random(&mut rng).to_index() as usize] += 1;
        }
        for &count in &counts {
            assert!(count > 800, "counts = {counts:?}");
            assert!(count < 1200, "counts = {counts:?}");
        }
    }

    #[test]
    fn test_random_other_always_changes() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        for base in Nucleotide::ALL {
            let mut seen = [false; Nucleotide::COUNT];
            for _ in 0..300 {
                let other = base.random_other(&mut rng);
                assert_ne!(other, base);
                seen[other.to_index() as usize] = true;
            }
            // All three alternatives are reachable
            assert_eq!(seen.iter().filter(|&&s| s).count(), 3);
        }
    }

    #[test]
    fn test_nucleotide_size() {
        assert_eq!(std::mem::size_of::<Nucleotide>(), 1);
    }
}
