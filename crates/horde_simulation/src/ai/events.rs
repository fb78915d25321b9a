//! AI Events — переходы perception state machine
//!
//! Коллабораторы (анимация, звук, HUD) подписываются вместо опроса Perception.

use bevy::prelude::*;

use crate::ai::PerceptionState;

/// Агент сменил Patrol ↔ Chase
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerceptionChanged {
    pub entity: Entity,
    pub from: PerceptionState,
    pub to: PerceptionState,
}
