//! Ошибки конфигурации спавнера
//!
//! Любая из них переводит спавнер в inert (лог + ноль спавнов), процесс не падает.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpawnerConfigError {
    #[error("spawner has no spawn points")]
    NoSpawnPoints,

    #[error("enemy template is not assigned")]
    MissingTemplate,

    #[error("deactivation distance {deactivation} is below activation distance {activation}")]
    InvalidHysteresis { activation: f32, deactivation: f32 },

    #[error("`{field}` must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    #[error("`{field}` must be non-negative, got {value}")]
    NegativeDuration { field: &'static str, value: f32 },

    #[error("failed to parse spawner config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
