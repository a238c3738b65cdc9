//! # Analysis Crate
//!
//! Statistics over the genomes sampled by `hgtcoal-sim`: pairwise distances,
//! diversity estimators, and the divergence and mismatch-correlation
//! statistics used to detect homologous gene transfer.

pub mod analysis;

pub use analysis::*;
