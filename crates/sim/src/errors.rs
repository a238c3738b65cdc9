use std::error;
use std::fmt;

use thiserror::Error;

use crate::simulation::PopulationParams;

/// Error returned when attempting to convert an invalid byte/character into
/// a `Nucleotide`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidNucleotide(pub u8);

impl fmt::Display for InvalidNucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid nucleotide byte: {} ('{}')", self.0, self.0 as char)
    }
}

impl error::Error for InvalidNucleotide {}

/// Error type for failures when parsing a `Sequence`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidSequence {
    /// A character was not recognized as a valid nucleotide.
    InvalidChar(char),
}

impl fmt::Display for InvalidSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChar(c) => write!(f, "Invalid character in sequence: '{c}'"),
        }
    }
}

impl error::Error for InvalidSequence {}

/// Error returned when an index is outside the valid range for a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds {
    /// The index that was requested
    pub index: usize,

    /// The current length of the sequence (upper bound)
    pub len: usize,
}

impl fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Index {} out of bounds (len = {})", self.index, self.len)
    }
}

impl error::Error for OutOfBounds {}

/// Rejected population or simulation parameters.
///
/// Always raised while constructing a simulation, before any random number
/// has been drawn.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A required builder parameter was never set.
    #[error("missing required parameter: {name}")]
    MissingParameter { name: &'static str },

    /// A count that must be strictly positive was zero.
    #[error("{name} must be positive")]
    NotPositive { name: &'static str },

    /// A rate was negative, NaN or infinite.
    #[error("{name} must be a finite, non-negative number (got {value})")]
    InvalidRate { name: &'static str, value: f64 },

    /// More samples were requested than individuals exist.
    #[error("sample size {sample_size} exceeds population size {population_size}")]
    SampleTooLarge {
        sample_size: usize,
        population_size: usize,
    },

    /// Transfer is enabled but the fragment length is not in `1..genome_length`.
    #[error(
        "transfer fragment length {fragment_length} must lie in 1..{genome_length} when transfer rate is positive"
    )]
    FragmentLength {
        fragment_length: usize,
        genome_length: usize,
    },

    /// A fragment or assembly read from outside did not describe valid material.
    #[error("invalid ancestral material: {0}")]
    Material(String),
}

/// A broken structural invariant of the ancestral material algebra, the
/// lineage pool or the event log.
///
/// These indicate a defect rather than bad input and are never recovered from.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("assembly of node {node} is not sorted, disjoint and non-adjacent")]
    UnnormalizedAssembly { node: usize },

    #[error("node {node} carries no ancestral material")]
    EmptyLineage { node: usize },

    #[error("node {node} appears more than once in the active pool")]
    DuplicateLineage { node: usize },

    #[error("active pool holds {size} lineages, more than the population size {limit}")]
    PoolOverflow { size: usize, limit: usize },

    #[error("history ended with {size} lineages in the pool instead of one")]
    UnresolvedPool { size: usize },

    #[error("node index {node} is outside the arena (len = {len})")]
    DanglingNode { node: usize, len: usize },

    #[error("event {event} has time {time}, earlier than the preceding event ({previous})")]
    TimeReversal {
        event: usize,
        time: f64,
        previous: f64,
    },

    #[error("event {event} does not match the structure of its participants: {reason}")]
    MalformedEvent { event: usize, reason: &'static str },

    #[error("node {node} has no sequence assigned when it is needed")]
    MissingSequence { node: usize },
}

/// Errors raised by a simulation run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("internal invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// A failed replicate, carrying what is needed to reproduce it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("replicate {replicate} (seed {seed}, {params}) failed: {source}")]
pub struct ReplicateError {
    pub replicate: usize,
    pub seed: u64,
    pub params: PopulationParams,
    #[source]
    pub source: SimulationError,
}
