//! Headless симуляция Horde
//!
//! Один спавнер + игрок по скрипту: подход → бой → уход на reset → возврат.
//! Опционально: путь к RON конфигу спавнера первым аргументом.

use bevy::prelude::*;
use horde_simulation::{
    create_headless_app, log_error, EnemyDied, EnemySpawner, HeadlessNavigationPlugin, Player, SimulationPlugin,
    SpawnerConfig,
};

const TICKS: u32 = 60 * 90;

/// Позиция игрока в момент времени (секунды): 40 → 5 → 60 → 5
fn scripted_player_position(seconds: f32) -> Vec3 {
    let x = match seconds {
        s if s < 10.0 => 40.0 - 3.5 * s,
        s if s < 30.0 => 5.0,
        s if s < 40.0 => 5.0 + 5.5 * (s - 30.0),
        s if s < 80.0 => 60.0,
        _ => 5.0,
    };
    Vec3::new(x, 0.0, 0.0)
}

fn load_config() -> SpawnerConfig {
    match std::env::args().nth(1) {
        Some(path) => SpawnerConfig::load(&path).unwrap_or_else(|error| {
            log_error(&format!("Failed to load '{}': {}, using demo config", path, error));
            SpawnerConfig::demo()
        }),
        None => SpawnerConfig::demo(),
    }
}

fn main() {
    let seed = 42;
    println!("Starting Horde headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins((SimulationPlugin, HeadlessNavigationPlugin));

    let spawner = app
        .world_mut()
        .spawn((EnemySpawner::new(load_config()), Transform::default()))
        .id();
    let player = app
        .world_mut()
        .spawn((Player, Transform::from_translation(scripted_player_position(0.0))))
        .id();

    for tick in 0..TICKS {
        let seconds = tick as f32 / 60.0;
        if let Some(mut transform) = app.world_mut().get_mut::<Transform>(player) {
            transform.translation = scripted_player_position(seconds);
        }

        // Игрок "убивает" одного врага на 20-й секунде
        if tick == 60 * 20 {
            let victim = app
                .world()
                .get::<EnemySpawner>(spawner)
                .and_then(|s| s.manager().live_agents().next().map(|(agent, _)| agent));
            if let Some(victim) = victim {
                app.world_mut().send_event(EnemyDied { entity: victim });
                app.world_mut().despawn(victim);
            }
        }

        app.update();

        if tick % 300 == 0 {
            if let Some(spawner) = app.world().get::<EnemySpawner>(spawner) {
                let telemetry = spawner.telemetry();
                println!(
                    "t={:>5.1}s player.x={:>5.1} zone={:?} live={}/{} free_slots={} resets={}",
                    seconds,
                    scripted_player_position(seconds).x,
                    telemetry.zone_state,
                    telemetry.live_count,
                    telemetry.max_count,
                    telemetry.free_slots,
                    telemetry.zone_resets
                );
            }
        }
    }

    println!("Simulation complete!");
}
