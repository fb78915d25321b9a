//! Navigation domain — контракт navigation agent'а
//!
//! Содержит:
//! - NavigationAgent (trait, который потребляет perception)
//! - NavAgent (ECS компонент-реализация)
//! - advance_nav_agents (headless driver, прямолинейное движение)

use bevy::prelude::*;

pub mod agent;
pub mod systems;

pub use agent::*;
pub use systems::*;

/// Headless navigation plugin
///
/// Подключается только в headless симуляции (тесты, demo).
/// С реальным navmesh хост-движок сам обновляет NavAgent.
/// Порядок задаёт `SimulationSet::Navigation` (после AI, до cleanup).
pub struct HeadlessNavigationPlugin;

impl Plugin for HeadlessNavigationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            advance_nav_agents.in_set(crate::SimulationSet::Navigation),
        );
    }
}
