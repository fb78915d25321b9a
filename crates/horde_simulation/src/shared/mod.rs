//! Shared domain — cross-cutting утилиты
//!
//! Содержит:
//! - geometry: углы обзора, look rotation, yaw
//! - occlusion: LineOfSight resource + OcclusionTest backends

pub mod geometry;
pub mod occlusion;

pub use geometry::*;
pub use occlusion::*;
