//! Base types for sequence representation.
//!
//! This module provides the nucleotide alphabet and the fixed-length genome
//! sequences painted by the forward overlay.

mod nucleotide;
mod sequence;

pub use nucleotide::Nucleotide;
pub use sequence::Sequence;
