//! ECS компоненты спавнера и заспавненных агентов

use bevy::prelude::*;

use crate::spawner::{LifecycleManager, SlotIndex, SpawnerConfig, SpawnerTelemetry};

/// Спавнер врагов (якорь зоны = Transform этой entity)
///
/// Каждый спавнер владеет своим LifecycleManager, никаких глобальных счётчиков,
/// несколько зон живут независимо.
#[derive(Component, Debug)]
#[require(Transform)]
pub struct EnemySpawner {
    manager: LifecycleManager<Entity>,
}

impl EnemySpawner {
    pub fn new(config: SpawnerConfig) -> Self {
        Self {
            manager: LifecycleManager::new(config),
        }
    }

    pub fn manager(&self) -> &LifecycleManager<Entity> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut LifecycleManager<Entity> {
        &mut self.manager
    }

    pub fn telemetry(&self) -> SpawnerTelemetry {
        self.manager.telemetry()
    }
}

/// Враг, созданный спавнером. Slot принадлежит агенту до notify_death.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct EnemyAgent {
    pub spawner: Entity,
    pub slot: SlotIndex,
}

/// Агент заспавнен в этом тике, perception стартует со следующего
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct JustSpawned;
