//! Shared default values for the command-line interface.
//! Model parameters default to `PopulationParams::default()`.

pub const CONFIG_FILE: &str = "hgtcoal.json";

/// Largest distance reported by `stats`.
pub const MAX_DISTANCE: usize = 100;

/// Generations `forward` discards before sampling.
pub const BURN_IN: usize = 500;

/// Generations `forward` evolves after the burn-in.
pub const GENERATIONS: usize = 2000;

/// Generations between two samples taken by `forward`.
pub const SAMPLE_EVERY: usize = 5;

/// Character states of a nucleotide site.
pub const ALPHABET_SIZE: usize = 4;

/// Log filter used when `RUST_LOG` is not set.
pub const LOG_FILTER: &str = "warn";
