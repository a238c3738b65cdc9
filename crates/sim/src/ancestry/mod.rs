//! Ancestral recombination graph: the interval algebra over ancestral
//! material and the append-only node arena built by the backward simulation.

pub mod history;
pub mod material;

pub use history::{Event, EventKind, EvolutionHistory, Node, NodeId};
pub use material::{Assembly, Fragment, merge, split, split_circular};
