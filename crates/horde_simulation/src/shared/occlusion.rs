//! Occlusion (line-of-sight) абстракция
//!
//! Physics движок (raycast) вне симуляции. ECS видит только `OcclusionTest::linecast`.
//! Для headless сценариев и тестов есть `ObstacleField` (сферы-окклюдеры на слоях).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Битовая маска слоёв препятствий (аналог physics collision mask)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub struct ObstacleMask(pub u32);

impl ObstacleMask {
    pub const NONE: Self = Self(0);
    /// Layer 3: Environment (стены, ящики, terrain)
    pub const ENVIRONMENT: Self = Self(0b100);
    /// Layer 5: Props (двери, разрушаемые укрытия)
    pub const PROPS: Self = Self(0b1_0000);
    pub const ALL: Self = Self(u32::MAX);

    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for ObstacleMask {
    fn default() -> Self {
        Self::ENVIRONMENT
    }
}

impl std::ops::BitOr for ObstacleMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Linecast contract: `true` если отрезок from→to пересекает препятствие из `mask`
pub trait OcclusionTest: Send + Sync {
    fn linecast(&self, from: Vec3, to: Vec3, mask: ObstacleMask) -> bool;
}

/// Пустой мир: ничего не загораживает
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenField;

impl OcclusionTest for OpenField {
    fn linecast(&self, _from: Vec3, _to: Vec3, _mask: ObstacleMask) -> bool {
        false
    }
}

/// Сферический окклюдер
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub center: Vec3,
    pub radius: f32,
    pub layers: ObstacleMask,
}

/// Набор сферических препятствий (headless замена physics raycast)
#[derive(Debug, Clone, Default)]
pub struct ObstacleField {
    pub obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_obstacle(mut self, center: Vec3, radius: f32, layers: ObstacleMask) -> Self {
        self.obstacles.push(Obstacle { center, radius, layers });
        self
    }
}

impl OcclusionTest for ObstacleField {
    fn linecast(&self, from: Vec3, to: Vec3, mask: ObstacleMask) -> bool {
        self.obstacles
            .iter()
            .filter(|obstacle| obstacle.layers.intersects(mask))
            .any(|obstacle| segment_hits_sphere(from, to, obstacle.center, obstacle.radius))
    }
}

fn segment_hits_sphere(from: Vec3, to: Vec3, center: Vec3, radius: f32) -> bool {
    let segment = to - from;
    let length_sq = segment.length_squared();
    let t = if length_sq <= f32::EPSILON {
        0.0
    } else {
        ((center - from).dot(segment) / length_sq).clamp(0.0, 1.0)
    };
    let closest = from + segment * t;
    closest.distance_squared(center) <= radius * radius
}

/// Resource: текущий occlusion backend
///
/// По умолчанию `OpenField`. Хост с настоящей физикой подменяет через `LineOfSight::new`.
#[derive(Resource)]
pub struct LineOfSight(Box<dyn OcclusionTest>);

impl LineOfSight {
    pub fn new(test: impl OcclusionTest + 'static) -> Self {
        Self(Box::new(test))
    }

    pub fn is_blocked(&self, from: Vec3, to: Vec3, mask: ObstacleMask) -> bool {
        self.0.linecast(from, to, mask)
    }
}

impl OcclusionTest for LineOfSight {
    fn linecast(&self, from: Vec3, to: Vec3, mask: ObstacleMask) -> bool {
        self.is_blocked(from, to, mask)
    }
}

impl Default for LineOfSight {
    fn default() -> Self {
        Self::new(OpenField)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_field_never_blocks() {
        let los = LineOfSight::default();
        assert!(!los.is_blocked(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0), ObstacleMask::ALL));
    }

    #[test]
    fn test_obstacle_between_points_blocks() {
        let field = ObstacleField::new().with_obstacle(Vec3::new(5.0, 0.5, 0.0), 1.0, ObstacleMask::ENVIRONMENT);
        assert!(field.linecast(
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::new(10.0, 0.5, 0.0),
            ObstacleMask::ENVIRONMENT
        ));
    }

    #[test]
    fn test_obstacle_off_segment_does_not_block() {
        // Сфера за концом отрезка
        let field = ObstacleField::new().with_obstacle(Vec3::new(15.0, 0.0, 0.0), 1.0, ObstacleMask::ENVIRONMENT);
        assert!(!field.linecast(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), ObstacleMask::ENVIRONMENT));
    }

    #[test]
    fn test_mask_filters_layers() {
        let field = ObstacleField::new().with_obstacle(Vec3::new(5.0, 0.0, 0.0), 1.0, ObstacleMask::PROPS);
        let from = Vec3::ZERO;
        let to = Vec3::new(10.0, 0.0, 0.0);

        assert!(!field.linecast(from, to, ObstacleMask::ENVIRONMENT));
        assert!(field.linecast(from, to, ObstacleMask::ENVIRONMENT | ObstacleMask::PROPS));
    }
}
