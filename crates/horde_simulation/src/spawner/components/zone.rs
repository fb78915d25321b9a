//! ZoneActivation — hysteresis state machine зоны спавнера.
//!
//! Dormant → Active → PendingReset → Active. Прямого Active → Dormant нет:
//! активированная зона перевооружается только через absence reset.
//!
//! Два радиуса (activation ≤ deactivation) не дают зоне мерцать на границе,
//! reset требует непрерывного отсутствия игрока ≥ zone_reset_time.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::spawner::ZoneConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum ZoneState {
    #[default]
    Dormant,
    Active,
    PendingReset,
}

/// Результат одной оценки зоны (side effects выполняет LifecycleManager)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneTransition {
    None,
    /// Dormant → Active: заполнить до cap, взвести cooldown
    Activated,
    /// Игрок ушёл за deactivation_distance, таймер отсутствия запущен
    AbsenceStarted,
    /// Игрок вернулся в activation radius до reset, таймер сброшен
    AbsenceCleared,
    /// Active → PendingReset
    ResetArmed,
    /// PendingReset → Active: reset_all + top-up
    Reactivated,
}

#[derive(Debug, Clone, Default)]
pub struct ZoneActivation {
    state: ZoneState,
    player_absent_since: Option<f32>,
}

impl ZoneActivation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ZoneState {
        self.state
    }

    pub fn player_absent_since(&self) -> Option<f32> {
        self.player_absent_since
    }

    /// Зона разрешает обычный respawn (Active и не ждёт reset)
    pub fn allows_respawn(&self) -> bool {
        self.state == ZoneState::Active
    }

    /// Активация без игрока (activate_on_player_proximity = false)
    pub fn force_active(&mut self) {
        self.state = ZoneState::Active;
        self.player_absent_since = None;
    }

    /// Оценка зоны на тик. `now` — время симуляции в секундах.
    pub fn evaluate(&mut self, distance: f32, now: f32, config: &ZoneConfig) -> ZoneTransition {
        let inside = distance <= config.activation_distance;
        let beyond = distance > config.deactivation_distance;

        match self.state {
            ZoneState::Dormant => {
                if inside {
                    self.state = ZoneState::Active;
                    self.player_absent_since = None;
                    ZoneTransition::Activated
                } else {
                    ZoneTransition::None
                }
            }

            ZoneState::Active => {
                if !config.enable_zone_reset {
                    return ZoneTransition::None;
                }

                if beyond {
                    let since = match self.player_absent_since {
                        Some(since) => since,
                        None => {
                            self.player_absent_since = Some(now);
                            if config.zone_reset_time > 0.0 {
                                return ZoneTransition::AbsenceStarted;
                            }
                            now
                        }
                    };

                    if now - since >= config.zone_reset_time {
                        self.state = ZoneState::PendingReset;
                        ZoneTransition::ResetArmed
                    } else {
                        ZoneTransition::None
                    }
                } else if inside && self.player_absent_since.take().is_some() {
                    ZoneTransition::AbsenceCleared
                } else {
                    // Hysteresis band: таймер не стартует и не сбрасывается
                    ZoneTransition::None
                }
            }

            ZoneState::PendingReset => {
                if inside {
                    self.state = ZoneState::Active;
                    self.player_absent_since = None;
                    ZoneTransition::Reactivated
                } else {
                    ZoneTransition::None
                }
            }
        }
    }
}
