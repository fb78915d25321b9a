//! Perception components (Patrol/Chase state machine, sensing config, sighting).
//!
//! Логика без ECS: `sense` → `update` (решение) → `drive` (действие через NavigationAgent).
//! Системы в `ai::systems` только собирают входы из мира.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::navigation::NavigationAgent;
use crate::shared::{angle_to_degrees, look_rotation_flat, ObstacleMask, OcclusionTest};
use crate::spawner::PatrolRoute;

/// Состояние агента
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum PerceptionState {
    /// Обход маршрута (или стоит, если маршрута нет)
    #[default]
    Patrol,
    /// Преследование игрока
    Chase,
}

/// Параметры perception/движения агента (из EnemyTemplate)
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct PerceptionConfig {
    pub detection_radius: f32,
    /// Полный угол конуса обзора (градусы)
    pub field_of_view_angle: f32,
    pub obstacle_mask: ObstacleMask,
    /// Подъём глаз и точки цели над pivot'ом
    pub eye_height: f32,
    pub patrol_speed: f32,
    pub chase_speed: f32,
    pub patrol_point_threshold: f32,
    pub wait_time_at_patrol_point: f32,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            detection_radius: 10.0,
            field_of_view_angle: 90.0,
            obstacle_mask: ObstacleMask::ENVIRONMENT,
            eye_height: 0.5,
            patrol_speed: 2.0,
            chase_speed: 4.0,
            patrol_point_threshold: 1.0,
            wait_time_at_patrol_point: 1.0,
        }
    }
}

/// Результат одного опроса сенсоров
///
/// `in_range` решает Patrol/Chase ("слышит" игрока). `spotted` (в конусе + LOS)
/// строже и доступен коллабораторам, но переход не гейтит.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Sighting {
    pub distance: f32,
    pub in_range: bool,
    pub in_cone: bool,
    pub line_of_sight: bool,
    pub spotted: bool,
}

impl Sighting {
    /// Игрока нет
    pub const NONE: Self = Self {
        distance: f32::INFINITY,
        in_range: false,
        in_cone: false,
        line_of_sight: false,
        spotted: false,
    };
}

impl Default for Sighting {
    fn default() -> Self {
        Self::NONE
    }
}

/// Опрос сенсоров агента. Конус и linecast считаются только в радиусе обнаружения.
pub fn sense<O: OcclusionTest + ?Sized>(
    agent: &Transform,
    player: Option<Vec3>,
    config: &PerceptionConfig,
    occlusion: &O,
) -> Sighting {
    let Some(player) = player else {
        return Sighting::NONE;
    };

    let distance = agent.translation.distance(player);
    let in_range = distance <= config.detection_radius;
    if !in_range {
        return Sighting {
            distance,
            ..Sighting::NONE
        };
    }

    let forward = agent.rotation * Vec3::NEG_Z;
    let in_cone = angle_to_degrees(forward, player - agent.translation) < config.field_of_view_angle / 2.0;

    let lift = Vec3::Y * config.eye_height;
    let line_of_sight = !occlusion.linecast(agent.translation + lift, player + lift, config.obstacle_mask);

    Sighting {
        distance,
        in_range,
        in_cone,
        line_of_sight,
        spotted: in_cone && line_of_sight,
    }
}

/// Perception controller агента: состояние, маршрут, прогресс патруля
#[derive(Component, Debug, Clone, Default)]
pub struct Perception {
    state: PerceptionState,
    route: Option<PatrolRoute>,
    patrol_index: usize,
    waiting: bool,
    wait_timer: f32,
    /// Погоня только что закончилась: destination ещё указывает на игрока
    resume_route: bool,
    last_sighting: Sighting,
}

impl Perception {
    pub fn new(route: Option<PatrolRoute>) -> Self {
        Self {
            route: route.filter(|r| !r.is_empty()),
            ..Default::default()
        }
    }

    pub fn state(&self) -> PerceptionState {
        self.state
    }

    pub fn route(&self) -> Option<&PatrolRoute> {
        self.route.as_ref()
    }

    pub fn patrol_index(&self) -> usize {
        self.patrol_index
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    pub fn wait_timer(&self) -> f32 {
        self.wait_timer
    }

    pub fn last_sighting(&self) -> Sighting {
        self.last_sighting
    }

    /// SetPatrolPoints: новый маршрут с начала. Пустой → агент стоит.
    pub fn set_patrol_points(&mut self, route: Option<PatrolRoute>) {
        match route.filter(|r| !r.is_empty()) {
            Some(route) => {
                self.route = Some(route);
                self.patrol_index = 0;
            }
            None => {
                self.route = None;
                crate::log_warning("Perception: no valid patrol points provided, agent will idle");
            }
        }
    }

    /// ResetAIState: патруль с первой точки (после спавна или переиспользования агента)
    pub fn reset_ai_state<N: NavigationAgent + ?Sized>(&mut self, nav: &mut N, config: &PerceptionConfig) {
        self.state = PerceptionState::Patrol;
        self.patrol_index = 0;
        self.waiting = false;
        self.wait_timer = 0.0;
        self.resume_route = false;
        self.last_sighting = Sighting::NONE;

        nav.reset_path();
        nav.set_speed(config.patrol_speed);
        if let Some(first) = self.route.as_ref().and_then(|r| r.get(0)) {
            nav.set_destination(first);
        }
    }

    /// Решение Patrol/Chase по свежему sighting. Возвращает (from, to) при смене состояния.
    pub fn update(&mut self, sighting: Sighting) -> Option<(PerceptionState, PerceptionState)> {
        self.last_sighting = sighting;

        let next = if sighting.in_range {
            PerceptionState::Chase
        } else {
            PerceptionState::Patrol
        };

        if next == self.state {
            return None;
        }

        let previous = self.state;
        self.state = next;
        match next {
            // Погоня отменяет ожидание на точке
            PerceptionState::Chase => self.waiting = false,
            PerceptionState::Patrol => self.resume_route = true,
        }
        Some((previous, next))
    }

    /// Действие по текущему состоянию: скорость, destination, доворот
    pub fn drive<N: NavigationAgent + ?Sized>(
        &mut self,
        transform: &mut Transform,
        nav: &mut N,
        player: Option<Vec3>,
        config: &PerceptionConfig,
        delta: f32,
    ) {
        if self.state == PerceptionState::Chase {
            if let Some(player) = player {
                self.chase(transform, nav, player, config, delta);
                return;
            }
        }

        nav.set_speed(config.patrol_speed);

        if self.route.is_some() {
            self.patrol(nav, config, delta);
        } else if nav.has_path() {
            nav.reset_path();
        }
        self.resume_route = false;
    }

    fn chase<N: NavigationAgent + ?Sized>(
        &mut self,
        transform: &mut Transform,
        nav: &mut N,
        player: Vec3,
        config: &PerceptionConfig,
        delta: f32,
    ) {
        self.waiting = false;
        nav.set_speed(config.chase_speed);
        nav.set_destination(player);

        if let Some(target_rotation) = look_rotation_flat(player - transform.translation) {
            let t = (delta * nav.angular_speed()).clamp(0.0, 1.0);
            transform.rotation = transform.rotation.slerp(target_rotation, t);
        }
    }

    fn patrol<N: NavigationAgent + ?Sized>(&mut self, nav: &mut N, config: &PerceptionConfig, delta: f32) {
        let Some(route) = self.route.as_ref() else {
            return;
        };
        if self.patrol_index >= route.len() {
            self.patrol_index = 0;
        }

        // Возврат на маршрут: к текущей точке, а не к последней позиции игрока
        if self.resume_route {
            self.waiting = false;
            if let Some(current) = route.get(self.patrol_index) {
                nav.set_destination(current);
            }
            return;
        }

        if self.waiting {
            self.wait_timer -= delta;
            if self.wait_timer <= 0.0 {
                self.waiting = false;
                self.patrol_index = (self.patrol_index + 1) % route.len();
                if let Some(next) = route.get(self.patrol_index) {
                    nav.set_destination(next);
                }
            }
            return;
        }

        if nav.remaining_distance() < config.patrol_point_threshold && !nav.path_pending() {
            self.waiting = true;
            self.wait_timer = config.wait_time_at_patrol_point;
        } else if !nav.has_path() || nav.velocity().length_squared() == 0.0 {
            if let Some(current) = route.get(self.patrol_index) {
                nav.set_destination(current);
            }
        }
    }
}

/// Marker: у агента нет NavAgent, perception для него выключен
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PerceptionDisabled;
