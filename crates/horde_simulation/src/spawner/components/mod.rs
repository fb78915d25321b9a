//! Spawner components: пул slot'ов, маршруты, зона, lifecycle, конфиг.

pub mod config;
pub mod lifecycle;
pub mod pool;
pub mod routes;
pub mod spawner;
pub mod zone;

#[cfg(test)]
mod zone_tests;

pub use config::*;
pub use lifecycle::*;
pub use pool::*;
pub use routes::*;
pub use spawner::*;
pub use zone::*;
