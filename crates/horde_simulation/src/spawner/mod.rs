//! Spawner domain — популяция врагов вокруг якорей-спавнеров
//!
//! Содержит:
//! - Components: SpawnPointPool, PatrolRouteCatalog, ZoneActivation, LifecycleManager, EnemySpawner
//! - Config: SpawnerConfig (RON) + SpawnerConfigError
//! - Systems: tick_spawners, handle_enemy_deaths, reap_orphaned_enemies, clear_spawn_markers
//! - Events: EnemySpawned, EnemyDied, ZoneStateChanged

use bevy::prelude::*;

pub mod components;
pub mod error;
pub mod events;
pub mod systems;

pub use components::*;
pub use error::*;
pub use events::*;
pub use systems::*;

use crate::SimulationSet;

/// Spawner Plugin
///
/// Порядок в тике:
/// 1. Lifecycle: handle_enemy_deaths → reap_orphaned_enemies (slots освобождаются до спавна)
/// 2. Spawning: tick_spawners (zone, затем respawn)
/// 3. Cleanup: clear_spawn_markers
pub struct SpawnerPlugin;

impl Plugin for SpawnerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EnemySpawned>()
            .add_event::<EnemyDied>()
            .add_event::<ZoneStateChanged>()
            .add_systems(
                FixedUpdate,
                (
                    (handle_enemy_deaths, reap_orphaned_enemies)
                        .chain()
                        .in_set(SimulationSet::Lifecycle),
                    tick_spawners.in_set(SimulationSet::Spawning),
                    clear_spawn_markers.in_set(SimulationSet::Cleanup),
                ),
            );
    }
}
