//! Spawner systems (zone + respawn tick, death routing, orphan reaping).

use bevy::ecs::entity::Entities;
use bevy::prelude::*;

use crate::ai::{Perception, PerceptionConfig};
use crate::navigation::NavAgent;
use crate::player::{Player, PlayerHandle};
use crate::spawner::{
    EnemyAgent, EnemyDied, EnemyFactory, EnemySpawned, EnemySpawner, JustSpawned, SpawnRequest,
    ZoneStateChanged,
};
use crate::DeterministicRng;

/// Путь к визуальному prefab'у (хост-движок создаёт node по нему)
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct EnemyPrefab(pub String);

/// Factory для ECS: агент = entity с perception + navigation компонентами
struct CommandsFactory<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    spawner: Entity,
}

impl EnemyFactory<Entity> for CommandsFactory<'_, '_, '_> {
    fn instantiate(&mut self, request: SpawnRequest<'_>) -> Option<Entity> {
        let template = request.template;
        let config: PerceptionConfig = template.perception.clone();

        let mut nav = NavAgent::new(config.patrol_speed, template.angular_speed);
        let mut perception = Perception::new(request.route.cloned());
        perception.reset_ai_state(&mut nav, &config);

        let entity = self
            .commands
            .spawn((
                EnemyAgent {
                    spawner: self.spawner,
                    slot: request.slot,
                },
                JustSpawned,
                request.pose,
                config,
                perception,
                nav,
                EnemyPrefab(template.prefab.clone()),
            ))
            .id();

        Some(entity)
    }
}

/// Система: тик всех спавнеров (start → zone → respawn)
///
/// Дистанция считается от Transform спавнера (якорь зоны) до игрока.
/// Порядок спавнеров фиксирован (по Entity): RNG общий.
pub fn tick_spawners(
    mut commands: Commands,
    mut spawners: Query<(Entity, &Transform, &mut EnemySpawner), Without<Player>>,
    player_handle: Res<PlayerHandle>,
    players: Query<&Transform, With<Player>>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
    mut spawned_events: EventWriter<EnemySpawned>,
    mut zone_events: EventWriter<ZoneStateChanged>,
) {
    let now = time.elapsed_secs();
    let player = player_handle.find_player(&players).map(|t| t.translation);

    let mut ordered: Vec<_> = spawners.iter_mut().collect();
    ordered.sort_by_key(|(entity, _, _)| *entity);

    for (spawner_entity, anchor, mut spawner) in ordered {
        let distance = player.map(|p| anchor.translation.distance(p));
        let before = spawner.manager().zone_state();

        let mut factory = CommandsFactory {
            commands: &mut commands,
            spawner: spawner_entity,
        };
        let report = spawner
            .manager_mut()
            .tick(distance, now, &mut rng.rng, &mut factory);

        let after = spawner.manager().zone_state();
        if before != after {
            crate::log_info(&format!(
                "Spawner '{}' ({:?}): zone {:?} → {:?}",
                spawner.manager().name(),
                spawner_entity,
                before,
                after
            ));
            zone_events.write(ZoneStateChanged {
                spawner: spawner_entity,
                from: before,
                to: after,
            });
        }

        for (enemy, slot) in report.spawned {
            spawned_events.write(EnemySpawned {
                spawner: spawner_entity,
                enemy,
                slot,
            });
        }

        for enemy in report.retired {
            commands.entity(enemy).despawn();
        }
    }
}

/// Система: EnemyDied → notify_death владельца
///
/// Владелец ищется по учёту спавнеров (entity к этому моменту может быть уже despawned).
pub fn handle_enemy_deaths(mut deaths: EventReader<EnemyDied>, mut spawners: Query<&mut EnemySpawner>) {
    for death in deaths.read() {
        let owner = spawners
            .iter_mut()
            .find(|spawner| spawner.manager().owns(death.entity));

        match owner {
            Some(mut spawner) => {
                spawner.manager_mut().notify_death(death.entity);
            }
            None => {
                crate::log_warning(&format!(
                    "EnemyDied for {:?}: no spawner owns it (duplicate or foreign notice), ignored",
                    death.entity
                ));
            }
        }
    }
}

/// Система: агенты, исчезнувшие без EnemyDied, возвращают slot
pub fn reap_orphaned_enemies(mut spawners: Query<&mut EnemySpawner>, entities: &Entities) {
    for mut spawner in spawners.iter_mut() {
        let orphans: Vec<Entity> = spawner
            .manager()
            .live_agents()
            .map(|(agent, _)| agent)
            .filter(|agent| !entities.contains(*agent))
            .collect();

        for orphan in orphans {
            crate::log_warning(&format!(
                "Spawner '{}': enemy {:?} despawned without death notice, releasing slot",
                spawner.manager().name(),
                orphan
            ));
            spawner.manager_mut().notify_death(orphan);
        }
    }
}

/// Система: снять JustSpawned в конце тика (perception стартует со следующего)
pub fn clear_spawn_markers(mut commands: Commands, fresh: Query<Entity, With<JustSpawned>>) {
    for entity in fresh.iter() {
        commands.entity(entity).remove::<JustSpawned>();
    }
}
