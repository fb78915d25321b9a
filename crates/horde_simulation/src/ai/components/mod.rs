//! AI components

pub mod perception;


// Re-export all components
pub use perception::*;
