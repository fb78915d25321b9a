//! Data-driven конфиг спавнера (RON)
//!
//! Позы и waypoints — plain `[f32; 3]`, ориентация — yaw в градусах.
//! Все поля имеют defaults (как в исходном тюнинге уровня), так что в RON
//! достаточно указать spawn_points и отличия.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ai::PerceptionConfig;
use crate::shared::yaw_rotation;
use crate::spawner::SpawnerConfigError;

/// Поза spawn slot'а
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotPose {
    pub position: [f32; 3],
    #[serde(default)]
    pub yaw_degrees: f32,
}

impl SlotPose {
    pub fn new(position: Vec3, yaw_degrees: f32) -> Self {
        Self {
            position: position.to_array(),
            yaw_degrees,
        }
    }

    pub fn translation(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn rotation(&self) -> Quat {
        yaw_rotation(self.yaw_degrees)
    }
}

/// Что делать с живыми агентами при повторной активации после absence reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Reflect)]
pub enum ZoneResetPolicy {
    /// Живые остаются (их slots перезахватываются), добираем до cap
    #[default]
    TopUp,
    /// Все живые снимаются, полный respawn
    Wipe,
}

/// Активация зоны (hysteresis + absence reset)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// false → зона активна с первого тика, спавн до cap сразу
    pub activate_on_player_proximity: bool,
    pub activation_distance: f32,
    /// Должна быть ≥ activation_distance
    pub deactivation_distance: f32,
    pub enable_zone_reset: bool,
    /// Секунды непрерывного отсутствия за deactivation_distance
    pub zone_reset_time: f32,
    pub reset_policy: ZoneResetPolicy,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            activate_on_player_proximity: true,
            activation_distance: 20.0,
            deactivation_distance: 25.0,
            enable_zone_reset: true,
            zone_reset_time: 30.0,
            reset_policy: ZoneResetPolicy::TopUp,
        }
    }
}

/// Respawn throttling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RespawnConfig {
    /// Cooldown между попытками спавна (секунды)
    pub respawn_time: f32,
    pub enable_proximity_respawn: bool,
    /// Игрок ближе → попытка откладывается на `proximity_backoff`
    pub min_distance_for_respawn: f32,
    pub proximity_backoff: f32,
}

impl Default for RespawnConfig {
    fn default() -> Self {
        Self {
            respawn_time: 5.0,
            enable_proximity_respawn: true,
            min_distance_for_respawn: 15.0,
            proximity_backoff: 1.0,
        }
    }
}

/// Шаблон врага (аналог prefab)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTemplate {
    /// Визуальный prefab для хост-движка
    pub prefab: String,
    pub perception: PerceptionConfig,
    pub angular_speed: f32,
}

impl Default for EnemyTemplate {
    fn default() -> Self {
        Self {
            prefab: "res://actors/zombie.tscn".to_string(),
            perception: PerceptionConfig::default(),
            angular_speed: 120.0,
        }
    }
}

/// Полный конфиг одного спавнера
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    pub name: String,
    pub max_active_enemies: usize,
    pub spawn_points: Vec<SlotPose>,
    pub patrol_routes: Vec<Vec<[f32; 3]>>,
    pub zone: ZoneConfig,
    pub respawn: RespawnConfig,
    /// None = configuration error (спавнер inert)
    pub enemy_template: Option<EnemyTemplate>,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            name: "spawner".to_string(),
            max_active_enemies: 3,
            spawn_points: Vec::new(),
            patrol_routes: Vec::new(),
            zone: ZoneConfig::default(),
            respawn: RespawnConfig::default(),
            enemy_template: Some(EnemyTemplate::default()),
        }
    }
}

impl SpawnerConfig {
    /// Небольшая зона для headless demo: 4 slots по кругу, 2 маршрута
    pub fn demo() -> Self {
        Self {
            name: "demo".to_string(),
            spawn_points: vec![
                SlotPose::new(Vec3::new(3.0, 0.0, 0.0), 90.0),
                SlotPose::new(Vec3::new(0.0, 0.0, 3.0), 180.0),
                SlotPose::new(Vec3::new(-3.0, 0.0, 0.0), 270.0),
                SlotPose::new(Vec3::new(0.0, 0.0, -3.0), 0.0),
            ],
            patrol_routes: vec![
                vec![[6.0, 0.0, 6.0], [6.0, 0.0, -6.0], [-6.0, 0.0, -6.0]],
                vec![[-4.0, 0.0, 4.0], [4.0, 0.0, 4.0]],
            ],
            ..Default::default()
        }
    }

    pub fn from_ron_str(source: &str) -> Result<Self, SpawnerConfigError> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SpawnerConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron_str(&source)
    }

    /// Проверка конфигурации. Пустой каталог маршрутов — не ошибка (агенты стоят).
    pub fn validate(&self) -> Result<(), SpawnerConfigError> {
        if self.spawn_points.is_empty() {
            return Err(SpawnerConfigError::NoSpawnPoints);
        }
        if self.enemy_template.is_none() {
            return Err(SpawnerConfigError::MissingTemplate);
        }
        // NaN проходит любое сравнение, поэтому до проверок порядка
        let numbers = [
            ("activation_distance", self.zone.activation_distance),
            ("deactivation_distance", self.zone.deactivation_distance),
            ("zone_reset_time", self.zone.zone_reset_time),
            ("respawn_time", self.respawn.respawn_time),
            ("min_distance_for_respawn", self.respawn.min_distance_for_respawn),
            ("proximity_backoff", self.respawn.proximity_backoff),
        ];
        for (field, value) in numbers {
            if !value.is_finite() {
                return Err(SpawnerConfigError::NonFinite { field, value });
            }
        }

        if self.zone.deactivation_distance < self.zone.activation_distance {
            return Err(SpawnerConfigError::InvalidHysteresis {
                activation: self.zone.activation_distance,
                deactivation: self.zone.deactivation_distance,
            });
        }

        let durations = [
            ("respawn_time", self.respawn.respawn_time),
            ("proximity_backoff", self.respawn.proximity_backoff),
            ("zone_reset_time", self.zone.zone_reset_time),
        ];
        for (field, value) in durations {
            if value < 0.0 {
                return Err(SpawnerConfigError::NegativeDuration { field, value });
            }
        }

        Ok(())
    }
}
