//! Perception integration test
//!
//! Агенты из спавнера в полном App: JustSpawned пропускает первый тик,
//! Patrol ↔ Chase, PerceptionChanged события, агенты без NavAgent.

use bevy::prelude::*;
use horde_simulation::ai::{PerceptionDisabled, Sighting};
use horde_simulation::spawner::SlotPose;
use horde_simulation::*;

fn create_horde_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins((SimulationPlugin, HeadlessNavigationPlugin));
    app
}

/// Один slot на (2, 0, 0), без маршрутов
fn single_guard_config() -> SpawnerConfig {
    SpawnerConfig {
        name: "guard".to_string(),
        max_active_enemies: 1,
        spawn_points: vec![SlotPose::new(Vec3::new(2.0, 0.0, 0.0), 0.0)],
        ..Default::default()
    }
}

fn first_agent(app: &mut App) -> Option<Entity> {
    let world = app.world_mut();
    let mut query = world.query_filtered::<Entity, With<EnemyAgent>>();
    query.iter(world).next()
}

/// Прогон до появления агента (максимум 5 тиков)
fn wait_for_agent(app: &mut App) -> Entity {
    for _ in 0..5 {
        app.update();
        if let Some(agent) = first_agent(app) {
            return agent;
        }
    }
    panic!("spawner did not produce an agent");
}

fn perception_of(app: &App, agent: Entity) -> &Perception {
    app.world().get::<Perception>(agent).unwrap()
}

#[test]
fn test_fresh_agent_thinks_from_next_tick() {
    let mut app = create_horde_app(42);
    app.world_mut()
        .spawn((EnemySpawner::new(single_guard_config()), Transform::default()));
    app.world_mut().spawn((Player, Transform::from_xyz(8.0, 0.0, 0.0)));

    let agent = wait_for_agent(&mut app);

    // Тик спавна: perception не запускался
    assert_eq!(perception_of(&app, agent).last_sighting(), Sighting::NONE);
    assert_eq!(perception_of(&app, agent).state(), PerceptionState::Patrol);

    for _ in 0..2 {
        app.update();
        if perception_of(&app, agent).state() == PerceptionState::Chase {
            break;
        }
    }

    // Игрок на 6 (< detection_radius 10) — погоня
    assert_eq!(perception_of(&app, agent).state(), PerceptionState::Chase);
    let nav = app.world().get::<NavAgent>(agent).unwrap();
    assert_eq!(nav.speed, PerceptionConfig::default().chase_speed);
    assert_eq!(nav.destination, Some(Vec3::new(8.0, 0.0, 0.0)));
}

#[test]
fn test_chase_and_disengage_emit_events() {
    let mut app = create_horde_app(42);
    app.world_mut()
        .spawn((EnemySpawner::new(single_guard_config()), Transform::default()));
    let player = app.world_mut().spawn((Player, Transform::from_xyz(8.0, 0.0, 0.0))).id();

    let agent = wait_for_agent(&mut app);
    let mut changes = Vec::new();

    for _ in 0..5 {
        app.update();
        changes.extend(app.world_mut().resource_mut::<Events<PerceptionChanged>>().drain());
    }

    // Игрок убегает далеко (агент быстрее не станет, 4 м/с)
    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(player) {
        transform.translation = Vec3::new(19.0, 0.0, 60.0);
    }
    for _ in 0..5 {
        app.update();
        changes.extend(app.world_mut().resource_mut::<Events<PerceptionChanged>>().drain());
    }

    assert_eq!(
        changes,
        vec![
            PerceptionChanged {
                entity: agent,
                from: PerceptionState::Patrol,
                to: PerceptionState::Chase,
            },
            PerceptionChanged {
                entity: agent,
                from: PerceptionState::Chase,
                to: PerceptionState::Patrol,
            },
        ]
    );

    // Без маршрута агент остаётся на месте
    let nav = app.world().get::<NavAgent>(agent).unwrap();
    assert!(nav.destination.is_none());
}

#[test]
fn test_occluded_player_behind_is_still_chased() {
    let mut app = create_horde_app(42);
    app.insert_resource(LineOfSight::new(
        ObstacleField::new().with_obstacle(Vec3::new(2.0, 0.5, 4.0), 1.0, ObstacleMask::ENVIRONMENT),
    ));
    app.world_mut()
        .spawn((EnemySpawner::new(single_guard_config()), Transform::default()));
    // Агент смотрит в -Z, игрок сзади (+Z) за стеной, дистанция 9
    app.world_mut().spawn((Player, Transform::from_xyz(2.0, 0.0, 9.0)));

    let agent = wait_for_agent(&mut app);
    // Первый sense — ещё в позе спавна (погоня потом развернёт агента)
    for _ in 0..3 {
        app.update();
        if perception_of(&app, agent).last_sighting() != Sighting::NONE {
            break;
        }
    }

    let perception = perception_of(&app, agent);
    let sighting = perception.last_sighting();
    assert!(sighting.in_range);
    assert!(!sighting.in_cone);
    assert!(!sighting.line_of_sight);
    assert_eq!(perception.state(), PerceptionState::Chase);
}

#[test]
fn test_far_player_is_ignored() {
    let mut app = create_horde_app(42);
    app.world_mut()
        .spawn((EnemySpawner::new(single_guard_config()), Transform::default()));
    // 11 от агента, но внутри зоны активации спавнера
    app.world_mut().spawn((Player, Transform::from_xyz(13.0, 0.0, 0.0)));

    let agent = wait_for_agent(&mut app);
    for _ in 0..10 {
        app.update();
    }

    assert_eq!(perception_of(&app, agent).state(), PerceptionState::Patrol);
    assert!((perception_of(&app, agent).last_sighting().distance - 11.0).abs() < 1e-4);
}

#[test]
fn test_patrolling_agent_walks_its_route() {
    let mut config = single_guard_config();
    config.patrol_routes = vec![vec![[2.0, 0.0, 0.0], [2.0, 0.0, -4.0]]];

    let mut app = create_horde_app(42);
    app.world_mut().spawn((EnemySpawner::new(config), Transform::default()));
    app.world_mut().spawn((Player, Transform::from_xyz(0.0, 0.0, 19.0)));

    let agent = wait_for_agent(&mut app);

    // 1 с ожидания + 4 м при 2 м/с: дальняя точка достигнута задолго до 6 с
    let mut visited_far_end = false;
    for _ in 0..(60 * 6) {
        app.update();
        let position = app.world().get::<Transform>(agent).unwrap().translation;
        if position.distance(Vec3::new(2.0, 0.0, -4.0)) < 0.01 {
            visited_far_end = true;
        }
    }

    assert!(visited_far_end);
    assert_eq!(perception_of(&app, agent).state(), PerceptionState::Patrol);
}

#[test]
fn test_agent_without_navigation_is_disabled() {
    let mut app = create_horde_app(42);
    let agent = app
        .world_mut()
        .spawn((
            Perception::new(None),
            PerceptionConfig::default(),
            Transform::default(),
        ))
        .id();
    app.world_mut().spawn((Player, Transform::from_xyz(1.0, 0.0, 0.0)));

    for _ in 0..3 {
        app.update();
    }

    assert!(app.world().get::<PerceptionDisabled>(agent).is_some());
    assert_eq!(perception_of(&app, agent).state(), PerceptionState::Patrol);
}

#[test]
fn test_agents_patrol_without_player() {
    let mut config = single_guard_config();
    config.zone.activate_on_player_proximity = false;
    config.patrol_routes = vec![vec![[2.0, 0.0, 0.0], [6.0, 0.0, 0.0]]];

    let mut app = create_horde_app(42);
    app.world_mut().spawn((EnemySpawner::new(config), Transform::default()));

    let agent = wait_for_agent(&mut app);
    for _ in 0..(60 * 3) {
        app.update();
    }

    let position = app.world().get::<Transform>(agent).unwrap().translation;
    assert!(position.x > 2.5, "agent did not leave its first waypoint: {:?}", position);
    assert_eq!(perception_of(&app, agent).state(), PerceptionState::Patrol);
}
