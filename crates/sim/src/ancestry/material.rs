//! Ancestral material algebra.
//!
//! A lineage in the genealogy is an ancestor of the sample only at some
//! genome positions. That set of positions is an [`Assembly`]: a sorted list
//! of disjoint, non-adjacent closed intervals ([`Fragment`]s). Coalescence
//! unions the material of two lineages ([`merge`]) and a transfer partitions
//! the material of one lineage around the transferred block ([`split`],
//! [`split_circular`]).
//!
//! All operations are pure. They allocate fresh assemblies and never touch
//! their inputs, since one assembly value may be shared by several nodes of
//! the arena while a simulation is running.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// A closed interval `[begin, end]` of genome coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fragment {
    pub begin: usize,
    pub end: usize,
}

impl Fragment {
    /// Create the fragment `[begin, end]`. Callers guarantee `begin <= end`.
    #[inline]
    pub const fn new(begin: usize, end: usize) -> Self {
        debug_assert!(begin <= end);
        Self { begin, end }
    }

    /// Number of positions covered.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.begin + 1
    }

    /// Fragments always cover at least one position.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    pub const fn contains(&self, position: usize) -> bool {
        self.begin <= position && position <= self.end
    }
}

/// A normalized set of fragments: sorted by `begin`, pairwise disjoint and
/// never adjacent (touching fragments are stored as one).
///
/// The empty assembly means "no ancestral material".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Fragment>", into = "Vec<Fragment>")]
pub struct Assembly(Vec<Fragment>);

impl Assembly {
    /// The empty assembly.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Material covering a whole genome of `length` positions, i.e.
    /// `[0, length - 1]`. Empty if `length` is zero.
    pub fn full(length: usize) -> Self {
        if length == 0 {
            Self::new()
        } else {
            Self(vec![Fragment::new(0, length - 1)])
        }
    }

    /// Build an assembly from fragments that are already normalized.
    ///
    /// # Errors
    /// Returns `ConfigError::Material` if a fragment is reversed or the list
    /// is not sorted, disjoint and non-adjacent.
    pub fn from_fragments(fragments: Vec<Fragment>) -> Result<Self, ConfigError> {
        if let Some(bad) = fragments.iter().find(|f| f.begin > f.end) {
            return Err(ConfigError::Material(format!(
                "reversed fragment [{}, {}]",
                bad.begin, bad.end
            )));
        }
        let assembly = Self(fragments);
        if !assembly.is_normalized() {
            return Err(ConfigError::Material(
                "fragments must be sorted, disjoint and non-adjacent".into(),
            ));
        }
        Ok(assembly)
    }

    /// Convenience constructor from `(begin, end)` pairs.
    pub fn from_pairs(pairs: &[(usize, usize)]) -> Result<Self, ConfigError> {
        Self::from_fragments(
            pairs
                .iter()
                .map(|&(begin, end)| Fragment { begin, end })
                .collect(),
        )
    }

    /// Borrow the fragments.
    #[inline]
    pub fn fragments(&self) -> &[Fragment] {
        &self.0
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.0.iter()
    }

    /// Number of fragments (not positions; see [`Assembly::coverage`]).
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the assembly carries no material.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of positions covered.
    pub fn coverage(&self) -> usize {
        self.0.iter().map(Fragment::len).sum()
    }

    /// Whether `position` is part of this material.
    pub fn contains(&self, position: usize) -> bool {
        let idx = self.0.partition_point(|f| f.end < position);
        self.0.get(idx).is_some_and(|f| f.contains(position))
    }

    /// Check the sorted / disjoint / non-adjacent invariant.
    pub fn is_normalized(&self) -> bool {
        self.0.iter().all(|f| f.begin <= f.end)
            && self
                .0
                .windows(2)
                .all(|w| w[0].end.checked_add(1).is_some_and(|next| next < w[1].begin))
    }

    /// True if every position lies below `genome_length`.
    pub fn fits_within(&self, genome_length: usize) -> bool {
        self.0.last().is_none_or(|f| f.end < genome_length)
    }
}

impl TryFrom<Vec<Fragment>> for Assembly {
    type Error = ConfigError;

    fn try_from(fragments: Vec<Fragment>) -> Result<Self, Self::Error> {
        Self::from_fragments(fragments)
    }
}

impl From<Assembly> for Vec<Fragment> {
    fn from(assembly: Assembly) -> Self {
        assembly.0
    }
}

impl<'a> IntoIterator for &'a Assembly {
    type Item = &'a Fragment;
    type IntoIter = std::slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Union of two assemblies.
///
/// The fragments of both sides are pooled, sorted by `begin` and swept once
/// from left to right. A fragment starting at or right after the running end
/// extends the open interval; a gap closes it. The empty assembly is the
/// identity on either side.
pub fn merge(a: &Assembly, b: &Assembly) -> Assembly {
    let mut pooled: Vec<Fragment> = a.iter().chain(b.iter()).copied().collect();
    pooled.sort_unstable_by_key(|f| f.begin);

    let mut merged = Vec::with_capacity(pooled.len());
    let mut pooled = pooled.into_iter();
    let Some(mut open) = pooled.next() else {
        return Assembly::new();
    };
    for frag in pooled {
        if frag.begin <= open.end.saturating_add(1) {
            open.end = open.end.max(frag.end);
        } else {
            merged.push(open);
            open = frag;
        }
    }
    merged.push(open);

    Assembly(merged)
}

/// Partition `a` around the closed interval `[begin, end]`.
///
/// Returns `(outside, inside)`: the material lying outside the interval and
/// the material lying within it. Both halves stay normalized and either may
/// be empty. An empty interval (`begin > end`) leaves everything outside.
pub fn split(a: &Assembly, begin: usize, end: usize) -> (Assembly, Assembly) {
    if begin > end {
        return (a.clone(), Assembly::new());
    }

    let frags = a.fragments();
    // First fragment reaching `begin`, and first fragment starting past `end`.
    let lo = frags.partition_point(|f| f.end < begin);
    let hi = frags.partition_point(|f| f.begin <= end);

    let mut outside = Vec::with_capacity(frags.len() + 1);
    let mut inside = Vec::with_capacity(hi.saturating_sub(lo));

    outside.extend_from_slice(&frags[..lo]);
    for f in &frags[lo..hi] {
        if f.begin < begin {
            outside.push(Fragment::new(f.begin, begin - 1));
        }
        inside.push(Fragment::new(f.begin.max(begin), f.end.min(end)));
        if f.end > end {
            outside.push(Fragment::new(end + 1, f.end));
        }
    }
    outside.extend_from_slice(&frags[hi..]);

    (Assembly(outside), Assembly(inside))
}

/// Partition `a` around an interval on a circular genome of `genome_length`
/// positions.
///
/// The interval starts at `begin` (which must be below `genome_length`) and
/// runs up to `end`, which may exceed the genome length; the excess wraps
/// around to position 0. Returns `(outside, inside)` like [`split`].
pub fn split_circular(
    a: &Assembly,
    begin: usize,
    end: usize,
    genome_length: usize,
) -> (Assembly, Assembly) {
    if end < genome_length {
        return split(a, begin, end);
    }
    if end - begin + 1 >= genome_length {
        return (Assembly::new(), a.clone());
    }
    // The wrapped interval is [begin, L-1] + [0, end-L]; its complement
    // [end-L+1, begin-1] is a plain interval.
    let (inside, outside) = split(a, end - genome_length + 1, begin - 1);
    (outside, inside)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn asm(pairs: &[(usize, usize)]) -> Assembly {
        Assembly::from_pairs(pairs).unwrap()
    }

    fn positions(a: &Assembly) -> Vec<usize> {
        a.iter().flat_map(|f| f.begin..=f.end).collect()
    }

    /// A random normalized assembly inside `[0, genome_length)`.
    fn random_assembly<R: Rng>(rng: &mut R, genome_length: usize) -> Assembly {
        let mut fragments = Vec::new();
        let mut pos = rng.random_range(0..genome_length);
        while pos < genome_length {
            let end = (pos + rng.random_range(0..20)).min(genome_length - 1);
            fragments.push(Fragment::new(pos, end));
            pos = end + 2 + rng.random_range(0..30);
        }
        Assembly::from_fragments(fragments).unwrap()
    }

    #[test]
    fn test_merge_overlapping() {
        let merged = merge(&asm(&[(0, 100)]), &asm(&[(44, 90)]));
        assert_eq!(merged, asm(&[(0, 100)]));
    }

    #[test]
    fn test_merge_disjoint() {
        let merged = merge(&asm(&[(0, 100)]), &asm(&[(120, 130)]));
        assert_eq!(merged, asm(&[(0, 100), (120, 130)]));
    }

    #[test]
    fn test_merge_unordered_inputs() {
        let a = asm(&[(0, 100)]);
        let b = asm(&[(90, 110), (120, 130)]);
        assert_eq!(merge(&a, &b), asm(&[(0, 110), (120, 130)]));
        assert_eq!(merge(&b, &a), asm(&[(0, 110), (120, 130)]));
    }

    #[test]
    fn test_merge_fuses_adjacent() {
        let merged = merge(&asm(&[(0, 9)]), &asm(&[(10, 20)]));
        assert_eq!(merged, asm(&[(0, 20)]));
    }

    #[test]
    fn test_merge_empty_is_identity() {
        let a = asm(&[(3, 7), (12, 40)]);
        assert_eq!(merge(&a, &Assembly::new()), a);
        assert_eq!(merge(&Assembly::new(), &a), a);
        assert!(merge(&Assembly::new(), &Assembly::new()).is_empty());
    }

    #[test]
    fn test_merge_does_not_touch_inputs() {
        let a = asm(&[(0, 5)]);
        let b = asm(&[(3, 9)]);
        let _ = merge(&a, &b);
        assert_eq!(a, asm(&[(0, 5)]));
        assert_eq!(b, asm(&[(3, 9)]));
    }

    #[test]
    fn test_split_reference_case() {
        let a = asm(&[(0, 30), (44, 90), (120, 150)]);
        let (outside, inside) = split(&a, 50, 130);
        assert_eq!(inside, asm(&[(50, 90), (120, 130)]));
        assert_eq!(outside, asm(&[(0, 30), (44, 49), (131, 150)]));
    }

    #[test]
    fn test_split_entirely_outside() {
        let a = asm(&[(0, 30), (200, 250)]);
        let (outside, inside) = split(&a, 50, 130);
        assert!(inside.is_empty());
        assert_eq!(outside, a);
    }

    #[test]
    fn test_split_entirely_inside() {
        let a = asm(&[(60, 70), (80, 100)]);
        let (outside, inside) = split(&a, 50, 130);
        assert!(outside.is_empty());
        assert_eq!(inside, a);
    }

    #[test]
    fn test_split_inside_single_fragment() {
        let (outside, inside) = split(&asm(&[(0, 99)]), 40, 59);
        assert_eq!(outside, asm(&[(0, 39), (60, 99)]));
        assert_eq!(inside, asm(&[(40, 59)]));
    }

    #[test]
    fn test_split_boundaries_are_inclusive() {
        let a = asm(&[(10, 20)]);
        let (outside, inside) = split(&a, 20, 30);
        assert_eq!(outside, asm(&[(10, 19)]));
        assert_eq!(inside, asm(&[(20, 20)]));

        let (outside, inside) = split(&a, 0, 10);
        assert_eq!(outside, asm(&[(11, 20)]));
        assert_eq!(inside, asm(&[(10, 10)]));
    }

    #[test]
    fn test_split_empty_interval() {
        let a = asm(&[(0, 10)]);
        let (outside, inside) = split(&a, 6, 5);
        assert_eq!(outside, a);
        assert!(inside.is_empty());
    }

    #[test]
    fn test_split_empty_assembly() {
        let (outside, inside) = split(&Assembly::new(), 0, 10);
        assert!(outside.is_empty());
        assert!(inside.is_empty());
    }

    #[test]
    fn test_split_circular_without_wrap() {
        let a = Assembly::full(100);
        assert_eq!(split_circular(&a, 10, 20, 100), split(&a, 10, 20));
    }

    #[test]
    fn test_split_circular_wraps() {
        let a = Assembly::full(100);
        // [90, 99] + [0, 4]
        let (outside, inside) = split_circular(&a, 90, 104, 100);
        assert_eq!(inside, asm(&[(0, 4), (90, 99)]));
        assert_eq!(outside, asm(&[(5, 89)]));
    }

    #[test]
    fn test_split_circular_whole_genome() {
        let a = asm(&[(5, 10), (50, 60)]);
        let (outside, inside) = split_circular(&a, 30, 129, 100);
        assert!(outside.is_empty());
        assert_eq!(inside, a);
    }

    #[test]
    fn test_split_conserves_coverage() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2024);
        let genome_length = 400;
        for _ in 0..500 {
            let a = random_assembly(&mut rng, genome_length);
            let begin = rng.random_range(0..genome_length);
            let end = begin + rng.random_range(0..genome_length - 1);

            let (outside, inside) = split_circular(&a, begin, end, genome_length);
            assert!(outside.is_normalized());
            assert!(inside.is_normalized());
            assert_eq!(outside.coverage() + inside.coverage(), a.coverage());
            assert_eq!(merge(&outside, &inside), a);

            // Inside is exactly the positions of `a` hit by the interval
            for pos in positions(&a) {
                let shifted = if pos < begin { pos + genome_length } else { pos };
                assert_eq!(inside.contains(pos), shifted <= end, "pos {pos}");
            }
        }
    }

    #[test]
    fn test_merge_output_is_normalized() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(99);
        for _ in 0..500 {
            let a = random_assembly(&mut rng, 300);
            let b = random_assembly(&mut rng, 300);
            let merged = merge(&a, &b);
            assert!(merged.is_normalized());

            let mut expected: Vec<usize> = positions(&a);
            expected.extend(positions(&b));
            expected.sort_unstable();
            expected.dedup();
            assert_eq!(positions(&merged), expected);
        }
    }

    #[test]
    fn test_contains_and_coverage() {
        let a = asm(&[(2, 4), (10, 10)]);
        assert_eq!(a.coverage(), 4);
        assert!(a.contains(2));
        assert!(a.contains(4));
        assert!(!a.contains(5));
        assert!(a.contains(10));
        assert!(!a.contains(11));
        assert!(!Assembly::new().contains(0));
    }

    #[test]
    fn test_from_fragments_rejects_unnormalized() {
        assert!(Assembly::from_pairs(&[(10, 20), (0, 5)]).is_err());
        assert!(Assembly::from_pairs(&[(0, 10), (5, 20)]).is_err());
        assert!(Assembly::from_pairs(&[(0, 10), (11, 20)]).is_err());
        assert!(Assembly::from_pairs(&[(8, 3)]).is_err());
        assert!(Assembly::from_pairs(&[(0, 10), (12, 20)]).is_ok());
    }

    #[test]
    fn test_full_assembly() {
        assert_eq!(Assembly::full(10), asm(&[(0, 9)]));
        assert!(Assembly::full(0).is_empty());
        assert!(Assembly::full(10).fits_within(10));
        assert!(!Assembly::full(11).fits_within(10));
    }

    #[test]
    fn test_serde_validates_on_load() {
        let a = asm(&[(0, 3), (7, 9)]);
        let json = serde_json::to_string(&a).unwrap();
        let back: Assembly = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);

        let bad = r#"[{"begin":5,"end":9},{"begin":0,"end":2}]"#;
        assert!(serde_json::from_str::<Assembly>(bad).is_err());
    }
}
