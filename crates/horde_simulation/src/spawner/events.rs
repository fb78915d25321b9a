//! Spawner events
//!
//! EnemyDied — входящий (от health/damage системы), остальные — исходящие.

use bevy::prelude::*;

use crate::spawner::{SlotIndex, ZoneState};

/// Спавнер создал врага в slot'е
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemySpawned {
    pub spawner: Entity,
    pub enemy: Entity,
    pub slot: SlotIndex,
}

/// Враг умер (HP == 0). Отправляется ровно один раз, спавнер освобождает slot.
///
/// Entity может быть despawned в том же кадре, маршрутизация идёт по учёту спавнера.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyDied {
    pub entity: Entity,
}

/// Зона спавнера сменила состояние
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneStateChanged {
    pub spawner: Entity,
    pub from: ZoneState,
    pub to: ZoneState,
}
