//! Evolutionary processes applied along the branches of a finished history.
//!
//! - **Mutation**: Poisson-distributed point substitutions (Jukes-Cantor)

pub mod mutation;

pub use mutation::PointMutation;
