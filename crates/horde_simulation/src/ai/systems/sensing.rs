//! Perception systems (sensing, Patrol/Chase decisions, navigation intent).

use bevy::prelude::*;

use crate::ai::{sense, Perception, PerceptionChanged, PerceptionConfig, PerceptionDisabled};
use crate::navigation::NavAgent;
use crate::player::{Player, PlayerHandle};
use crate::shared::LineOfSight;
use crate::spawner::JustSpawned;

/// Система: выключить perception у агентов без NavAgent
///
/// Агент остаётся в мире (и в учёте спавнера), просто не думает.
pub fn disable_agents_without_navigation(
    mut commands: Commands,
    agents: Query<Entity, (With<Perception>, Without<NavAgent>, Without<PerceptionDisabled>)>,
) {
    for entity in agents.iter() {
        crate::log_error(&format!(
            "Perception: {:?} has no NavAgent, perception disabled",
            entity
        ));
        commands.entity(entity).insert(PerceptionDisabled);
    }
}

/// Система: sense + Patrol/Chase transitions
///
/// Агенты этого тика (`JustSpawned`) пропускаются, они думают со следующего.
pub fn update_perception(
    mut agents: Query<
        (Entity, &Transform, &PerceptionConfig, &mut Perception),
        (With<NavAgent>, Without<JustSpawned>, Without<PerceptionDisabled>, Without<Player>),
    >,
    player_handle: Res<PlayerHandle>,
    players: Query<&Transform, With<Player>>,
    line_of_sight: Res<LineOfSight>,
    mut changes: EventWriter<PerceptionChanged>,
) {
    let player = player_handle.find_player(&players).map(|t| t.translation);

    for (entity, transform, config, mut perception) in agents.iter_mut() {
        let sighting = sense(transform, player, config, &*line_of_sight);

        if let Some((from, to)) = perception.update(sighting) {
            crate::log(&format!(
                "Perception: {:?} {:?} → {:?} (distance {:.1}, spotted {})",
                entity, from, to, sighting.distance, sighting.spotted
            ));
            changes.write(PerceptionChanged { entity, from, to });
        }
    }
}

/// Система: состояние → NavAgent intent (speed, destination) + доворот при погоне
pub fn drive_agents(
    mut agents: Query<
        (&mut Transform, &mut NavAgent, &PerceptionConfig, &mut Perception),
        (Without<JustSpawned>, Without<PerceptionDisabled>, Without<Player>),
    >,
    player_handle: Res<PlayerHandle>,
    players: Query<&Transform, With<Player>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let player = player_handle.find_player(&players).map(|t| t.translation);

    for (mut transform, mut nav, config, mut perception) in agents.iter_mut() {
        perception.drive(&mut transform, &mut *nav, player, config, delta);
    }
}
