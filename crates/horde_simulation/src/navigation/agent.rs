//! Navigation agent contract + ECS компонент
//!
//! Архитектура:
//! - AI системы пишут high-level intent (destination + speed) через `NavigationAgent`
//! - Хост-движок (navmesh) читает NavAgent, строит путь, пишет назад remaining_distance/velocity
//! - Headless режим: `advance_nav_agents` двигает по прямой (без pathfinding)

use bevy::prelude::*;

/// Контракт navigation agent'а, который потребляет perception
pub trait NavigationAgent {
    fn set_destination(&mut self, target: Vec3);
    fn reset_path(&mut self);
    fn has_path(&self) -> bool;
    fn path_pending(&self) -> bool;
    fn remaining_distance(&self) -> f32;
    fn velocity(&self) -> Vec3;
    /// Скорость доворота (slerp rate per second)
    fn angular_speed(&self) -> f32;
    fn speed(&self) -> f32;
    fn set_speed(&mut self, speed: f32);
}

/// Navigation state агента
///
/// `path_pending` поднимается на каждый `set_destination` и сбрасывается
/// когда навигация пересчитала путь (remaining_distance снова валиден).
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    pub destination: Option<Vec3>,
    pub path_pending: bool,
    pub remaining_distance: f32,
    pub velocity: Vec3,
    pub speed: f32,
    pub angular_speed: f32,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self::new(2.0, 120.0)
    }
}

impl NavAgent {
    pub fn new(speed: f32, angular_speed: f32) -> Self {
        Self {
            destination: None,
            path_pending: false,
            remaining_distance: 0.0,
            velocity: Vec3::ZERO,
            speed,
            angular_speed,
        }
    }
}

impl NavigationAgent for NavAgent {
    fn set_destination(&mut self, target: Vec3) {
        self.destination = Some(target);
        self.path_pending = true;
    }

    fn reset_path(&mut self) {
        self.destination = None;
        self.path_pending = false;
        self.remaining_distance = 0.0;
        self.velocity = Vec3::ZERO;
    }

    fn has_path(&self) -> bool {
        self.destination.is_some()
    }

    fn path_pending(&self) -> bool {
        self.path_pending
    }

    fn remaining_distance(&self) -> f32 {
        self.remaining_distance
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn angular_speed(&self) -> f32 {
        self.angular_speed
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }
}
