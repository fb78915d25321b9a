//! Headless navigation driver
//!
//! Прямолинейное движение к destination (без navmesh). Используется в headless app,
//! тестах и demo binary. В игре NavAgent обслуживает хост-движок.

use bevy::prelude::*;
use crate::navigation::NavAgent;
use crate::shared::look_rotation_flat;

/// Система: продвинуть агентов к destination на speed * delta
///
/// Пересчитывает remaining_distance (снимает path_pending), пишет velocity,
/// доворачивает агента по направлению движения.
pub fn advance_nav_agents(
    mut agents: Query<(&mut Transform, &mut NavAgent)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut nav) in agents.iter_mut() {
        step_agent(&mut transform, &mut nav, delta);
    }
}

pub(crate) fn step_agent(transform: &mut Transform, nav: &mut NavAgent, delta: f32) {
    let Some(destination) = nav.destination else {
        nav.velocity = Vec3::ZERO;
        nav.remaining_distance = 0.0;
        nav.path_pending = false;
        return;
    };

    nav.path_pending = false;

    let to_destination = destination - transform.translation;
    let distance = to_destination.length();
    let step = nav.speed.max(0.0) * delta;

    if distance <= step || distance <= f32::EPSILON {
        transform.translation = destination;
        nav.velocity = Vec3::ZERO;
        nav.remaining_distance = 0.0;
        return;
    }

    let direction = to_destination / distance;
    transform.translation += direction * step;
    nav.velocity = direction * nav.speed;
    nav.remaining_distance = distance - step;

    if let Some(target_rotation) = look_rotation_flat(direction) {
        let t = (delta * nav.angular_speed).clamp(0.0, 1.0);
        transform.rotation = transform.rotation.slerp(target_rotation, t);
    }
}
