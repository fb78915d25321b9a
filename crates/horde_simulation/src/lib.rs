//! Horde Simulation Core
//!
//! ECS-симуляция популяции врагов на Bevy 0.16 (headless, deterministic)
//!
//! Слои:
//! - spawner: spawn slots, patrol routes, зона активации, lifecycle популяции
//! - ai: perception агентов (Patrol/Chase)
//! - navigation / player / shared: контракты хост-движка (navmesh, игрок, occlusion)
//!
//! Хост-движок (рендер, физика, navmesh) вне crate'а, ECS видит только контракты.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod logger;
pub mod navigation;
pub mod player;
pub mod shared;
pub mod spawner;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, Perception, PerceptionChanged, PerceptionConfig, PerceptionState};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel, LogPrinter};
pub use navigation::{HeadlessNavigationPlugin, NavAgent, NavigationAgent};
pub use player::{Player, PlayerHandle};
pub use shared::{LineOfSight, ObstacleField, ObstacleMask, OcclusionTest, OpenField};
pub use spawner::{
    EnemyAgent, EnemyDied, EnemySpawned, EnemySpawner, LifecycleManager, SpawnerConfig, SpawnerPlugin,
    SpawnerTelemetry, ZoneState, ZoneStateChanged,
};

/// Фазы тика симуляции (FixedUpdate, строго последовательно)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Резолв PlayerHandle
    Player,
    /// Смерти и orphan'ы освобождают slots
    Lifecycle,
    /// Зона, затем respawn
    Spawning,
    /// Perception агентов (только не JustSpawned)
    Perception,
    /// Headless навигация (HeadlessNavigationPlugin)
    Navigation,
    /// Снятие JustSpawned
    Cleanup,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// HeadlessNavigationPlugin подключается отдельно: в игре NavAgent ведёт хост-движок.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Seed из create_headless_app не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<PlayerHandle>()
            .init_resource::<LineOfSight>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Player,
                    SimulationSet::Lifecycle,
                    SimulationSet::Spawning,
                    SimulationSet::Perception,
                    SimulationSet::Navigation,
                    SimulationSet::Cleanup,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                player::resolve_player_handle.in_set(SimulationSet::Player),
            )
            // Подсистемы
            .add_plugins((SpawnerPlugin, AIPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время ручное: каждый `app.update()` = ровно один fixed tick (1/60 с),
/// независимо от wall clock.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)) // 60Hz FixedUpdate
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
