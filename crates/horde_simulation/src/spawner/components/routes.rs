//! Patrol routes: маршрут = упорядоченные waypoints, каталог = набор маршрутов спавнера.

use bevy::prelude::*;
use rand::Rng;
use std::sync::Arc;

/// Неизменяемый маршрут патруля. Пустой маршрут валиден ("не патрулировать").
///
/// Waypoints в `Arc`: один маршрут делят все агенты, которым он выпал.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PatrolRoute {
    waypoints: Arc<[Vec3]>,
}

impl PatrolRoute {
    pub fn new(waypoints: impl Into<Vec<Vec3>>) -> Self {
        let waypoints: Vec<Vec3> = waypoints.into();
        Self {
            waypoints: waypoints.into(),
        }
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.waypoints.get(index).copied()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PatrolRouteCatalog {
    routes: Vec<PatrolRoute>,
}

impl PatrolRouteCatalog {
    pub fn new(routes: Vec<PatrolRoute>) -> Self {
        Self { routes }
    }

    pub fn from_points(routes: &[Vec<[f32; 3]>]) -> Self {
        Self::new(
            routes
                .iter()
                .map(|points| PatrolRoute::new(points.iter().copied().map(Vec3::from_array).collect::<Vec<_>>()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// true если ни один маршрут не содержит waypoints (агенты не будут патрулировать)
    pub fn has_no_waypoints(&self) -> bool {
        self.routes.iter().all(PatrolRoute::is_empty)
    }

    pub fn routes(&self) -> &[PatrolRoute] {
        &self.routes
    }

    /// Равномерно случайный маршрут. None для пустого каталога.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&PatrolRoute> {
        if self.routes.is_empty() {
            return None;
        }
        self.routes.get(rng.gen_range(0..self.routes.len()))
    }
}
