//! Player locator
//!
//! Игрок находится по typed marker'у (`Player`), а не по строковому тегу.
//! Entity резолвится один раз и кэшируется в `PlayerHandle`; если игрок ещё не
//! заспавнен — симуляция продолжает работу (спавнеры ждут, агенты патрулируют).

use bevy::ecs::query::QueryFilter;
use bevy::prelude::*;

/// Marker component для player-controlled entity
///
/// В single-player режиме только один entity имеет этот компонент.
/// AI системы используют `Without<Player>` чтобы не конфликтовать по Transform.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Кэшированный handle игрока
#[derive(Resource, Debug, Default)]
pub struct PlayerHandle {
    entity: Option<Entity>,
    warned_missing: bool,
}

impl PlayerHandle {
    pub fn entity(&self) -> Option<Entity> {
        self.entity
    }

    pub fn is_available(&self) -> bool {
        self.entity.is_some()
    }

    /// `FindPlayer()`: текущий Transform игрока (если он есть)
    pub fn find_player<F: QueryFilter>(&self, players: &Query<&Transform, F>) -> Option<Transform> {
        let entity = self.entity?;
        players.get(entity).ok().copied()
    }
}

/// Система: резолв/валидация PlayerHandle
///
/// Запускается первой в тике. Перерезолвит handle если игрок despawned
/// (например respawn игрока после смерти).
pub fn resolve_player_handle(
    mut handle: ResMut<PlayerHandle>,
    players: Query<Entity, With<Player>>,
) {
    if let Some(entity) = handle.entity {
        if players.contains(entity) {
            return;
        }
        crate::log_warning(&format!("PlayerHandle: cached player {:?} is gone, re-resolving", entity));
        handle.entity = None;
    }

    match players.iter().next() {
        Some(entity) => {
            handle.entity = Some(entity);
            handle.warned_missing = false;
            crate::log_info(&format!("PlayerHandle: resolved player {:?}", entity));
        }
        None => {
            if !handle.warned_missing {
                handle.warned_missing = true;
                crate::log_warning("PlayerHandle: no Player entity yet (spawners wait, agents patrol)");
            }
        }
    }
}
