//! # Simulation Crate
//!
//! The `sim` crate implements the coalescent with homologous gene transfer.
//! It builds an ancestral recombination graph backward in time, tracking the
//! ancestral material of every lineage as a set of genome intervals, and then
//! overlays random root sequences and Poisson point mutations forward in
//! time to produce the sampled genomes.

pub mod ancestry;
pub mod base;
pub mod errors;
pub mod evolution;
pub mod prelude;
pub mod simulation;

pub use base::{Nucleotide, Sequence};
