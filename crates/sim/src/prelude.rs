//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use hgtcoal_sim::prelude::*;
//!
//! let mut sim = SimulationBuilder::new()
//!     .population_size(50)
//!     .sample_size(4)
//!     .genome_length(100)
//!     .mutation_rate(1e-3)
//!     .seed(1)
//!     .build()
//!     .unwrap();
//! let runs = sim.run_replicates().unwrap();
//! assert_eq!(runs[0].sequences.len(), 4);
//! ```

pub use crate::ancestry::{Assembly, Event, EventKind, EvolutionHistory, Fragment, Node, NodeId};
pub use crate::base::{Nucleotide, Sequence};
pub use crate::errors::{self, ConfigError, InvariantViolation, ReplicateError, SimulationError};
pub use crate::evolution::PointMutation;
pub use crate::simulation::{
    PopulationParams, RunResult, Simulation, SimulationBuilder, SimulationConfig, WrightFisher,
};
