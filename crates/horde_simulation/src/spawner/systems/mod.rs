//! Spawner systems

pub mod population;

// Re-export all systems
pub use population::*;
