//! Геометрия для perception: углы обзора, yaw, flatten на up-axis.
//!
//! Конвенция Bevy: forward = -Z, up = +Y.

use bevy::prelude::*;

/// Угол (градусы) между forward агента и направлением на цель.
///
/// Возвращает 0 для вырожденных векторов (цель в той же точке).
pub fn angle_to_degrees(forward: Vec3, to_target: Vec3) -> f32 {
    let forward = forward.normalize_or_zero();
    let to_target = to_target.normalize_or_zero();
    if forward == Vec3::ZERO || to_target == Vec3::ZERO {
        return 0.0;
    }
    forward.angle_between(to_target).to_degrees()
}

/// Проекция на горизонтальную плоскость (y = 0)
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Rotation вокруг Y, при которой forward (-Z) смотрит в `direction`.
///
/// `None` если направление после flatten нулевое.
pub fn look_rotation_flat(direction: Vec3) -> Option<Quat> {
    let flat = flatten(direction);
    if flat.length_squared() <= f32::EPSILON {
        return None;
    }
    let flat = flat.normalize();
    Some(Quat::from_rotation_y(f32::atan2(-flat.x, -flat.z)))
}

/// Yaw (градусы) → rotation. Используется для поз spawn slot'ов из конфига.
pub fn yaw_rotation(yaw_degrees: f32) -> Quat {
    Quat::from_rotation_y(yaw_degrees.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_angle_straight_ahead() {
        assert!(angle_to_degrees(Vec3::NEG_Z, Vec3::new(0.0, 0.0, -5.0)) < EPS);
    }

    #[test]
    fn test_angle_behind() {
        let angle = angle_to_degrees(Vec3::NEG_Z, Vec3::Z);
        assert!((angle - 180.0).abs() < EPS);
    }

    #[test]
    fn test_angle_degenerate() {
        assert_eq!(angle_to_degrees(Vec3::NEG_Z, Vec3::ZERO), 0.0);
    }

    #[test]
    fn test_look_rotation_faces_direction() {
        for dir in [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z, Vec3::new(1.0, 3.0, 1.0)] {
            let rotation = look_rotation_flat(dir).unwrap();
            let forward = rotation * Vec3::NEG_Z;
            let expected = flatten(dir).normalize();
            assert!(
                forward.distance(expected) < EPS,
                "dir {:?}: forward {:?} != {:?}",
                dir,
                forward,
                expected
            );
        }
    }

    #[test]
    fn test_look_rotation_vertical_is_none() {
        assert!(look_rotation_flat(Vec3::Y * 4.0).is_none());
    }

    #[test]
    fn test_yaw_rotation_quarter_turn() {
        // +90° вокруг Y: -Z → -X
        let forward = yaw_rotation(90.0) * Vec3::NEG_Z;
        assert!(forward.distance(Vec3::NEG_X) < EPS);
    }
}
