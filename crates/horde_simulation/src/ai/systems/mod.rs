//! AI systems

pub mod sensing;

// Re-export all systems
pub use sensing::*;
