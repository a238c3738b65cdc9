//! Simulation of the coalescent with homologous gene transfer.
//!
//! - `parameters`: population genetic parameters and batch configuration
//! - `rates`: competing coalescence and transfer rates
//! - `backward`: construction of the ancestral recombination graph
//! - `forward`: sequence painting and mutation along the graph
//! - `engine`: single runs and parallel replicate batches
//! - `builder`: fluent construction of a `Simulation`
//! - `wright_fisher`: forward-time population used to check the coalescent

pub mod backward;
pub mod builder;
pub mod engine;
pub mod forward;
pub mod parameters;
pub mod rates;
pub mod wright_fisher;

pub use backward::GraphBuilder;
pub use builder::SimulationBuilder;
pub use engine::{RunResult, Simulation};
pub use forward::{ForwardOverlay, SampledGenomes};
pub use parameters::{PopulationParams, SimulationConfig};
pub use rates::RateModel;
pub use wright_fisher::{GenerationEvents, WrightFisher};
