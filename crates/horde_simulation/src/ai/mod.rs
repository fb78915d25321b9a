//! AI domain — perception агентов (Patrol/Chase)
//!
//! Содержит:
//! - Components: Perception, PerceptionConfig, Sighting, PerceptionDisabled
//! - Systems: disable_agents_without_navigation, update_perception, drive_agents
//! - Events: PerceptionChanged

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

pub use components::*;
pub use events::*;
pub use systems::*;

/// AI Plugin
///
/// Регистрирует perception системы в `SimulationSet::Perception` (после спавнеров).
/// Порядок выполнения:
/// 1. disable_agents_without_navigation — агенты без NavAgent выключаются
/// 2. update_perception — sense + Patrol/Chase transitions
/// 3. drive_agents — state → NavAgent intent
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PerceptionChanged>().add_systems(
            FixedUpdate,
            (disable_agents_without_navigation, update_perception, drive_agents)
                .chain() // Последовательное выполнение для детерминизма
                .in_set(crate::SimulationSet::Perception),
        );
    }
}
