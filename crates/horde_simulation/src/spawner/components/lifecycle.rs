//! LifecycleManager — популяция одного спавнера.
//!
//! Компонует SpawnPointPool + PatrolRouteCatalog + ZoneActivation.
//! Generic по handle агента (`Entity` в ECS, любой Copy + Ord в тестах).
//!
//! Инварианты:
//! - live_count ≤ max_active_enemies
//! - occupied slots == live agents (live_count = размер карты agent → slot)
//! - повторный notify_death того же агента ничего не меняет

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::spawner::{
    EnemyTemplate, PatrolRoute, PatrolRouteCatalog, SlotIndex, SpawnPointPool, SpawnerConfig,
    SpawnerConfigError, ZoneActivation, ZoneResetPolicy, ZoneState, ZoneTransition,
};

/// Данные для создания агента (factory получает всё что нужно, без доступа к менеджеру)
#[derive(Debug, Clone, Copy)]
pub struct SpawnRequest<'a> {
    pub slot: SlotIndex,
    pub pose: Transform,
    /// None = каталог пуст или выпал пустой маршрут (агент стоит)
    pub route: Option<&'a PatrolRoute>,
    pub template: &'a EnemyTemplate,
}

/// Создание агента (ECS: Commands::spawn, тесты: счётчик)
pub trait EnemyFactory<A> {
    /// None = отказ (slot вернётся в пул)
    fn instantiate(&mut self, request: SpawnRequest<'_>) -> Option<A>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome<A> {
    Spawned(A),
    AtCapacity,
    /// Спавнер выключен ошибкой конфигурации
    Inert,
    /// Все slots заняты, попытка повторится на следующем eligible тике
    PoolExhausted,
    FactoryRejected,
}

/// Итог одного тика спавнера
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnerTick<A> {
    pub zone: ZoneTransition,
    pub spawned: Vec<(A, SlotIndex)>,
    /// Агенты, снятые политикой Wipe (ECS слой их despawn'ит)
    pub retired: Vec<A>,
}

impl<A> Default for SpawnerTick<A> {
    fn default() -> Self {
        Self {
            zone: ZoneTransition::None,
            spawned: Vec::new(),
            retired: Vec::new(),
        }
    }
}

/// Read-only телеметрия (HUD, gizmos, отладка)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnerTelemetry {
    pub name: String,
    pub live_count: usize,
    pub max_count: usize,
    pub zone_state: ZoneState,
    pub free_slots: usize,
    pub zone_resets: u32,
    pub inert: bool,
}

#[derive(Debug)]
pub struct LifecycleManager<A> {
    config: SpawnerConfig,
    pool: SpawnPointPool,
    routes: PatrolRouteCatalog,
    zone: ZoneActivation,
    live: BTreeMap<A, SlotIndex>,
    next_spawn_at: f32,
    started: bool,
    zone_resets: u32,
    inert: Option<SpawnerConfigError>,
}

impl<A: Copy + Ord + std::fmt::Debug> LifecycleManager<A> {
    /// Валидирует конфиг; ошибка логируется и делает спавнер inert
    pub fn new(config: SpawnerConfig) -> Self {
        let inert = match config.validate() {
            Ok(()) => None,
            Err(error) => {
                crate::log_error(&format!("Spawner '{}': {} → spawner disabled", config.name, error));
                Some(error)
            }
        };

        let routes = PatrolRouteCatalog::from_points(&config.patrol_routes);
        if inert.is_none() && routes.has_no_waypoints() {
            crate::log_warning(&format!(
                "Spawner '{}': no patrol routes defined, enemies will not patrol",
                config.name
            ));
        }

        Self {
            pool: SpawnPointPool::new(&config.spawn_points),
            routes,
            zone: ZoneActivation::new(),
            live: BTreeMap::new(),
            next_spawn_at: 0.0,
            started: false,
            zone_resets: 0,
            inert,
            config,
        }
    }

    pub fn config(&self) -> &SpawnerConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn max_count(&self) -> usize {
        self.config.max_active_enemies
    }

    pub fn zone_state(&self) -> ZoneState {
        self.zone.state()
    }

    pub fn zone(&self) -> &ZoneActivation {
        &self.zone
    }

    pub fn pool(&self) -> &SpawnPointPool {
        &self.pool
    }

    pub fn routes(&self) -> &PatrolRouteCatalog {
        &self.routes
    }

    pub fn inert_reason(&self) -> Option<&SpawnerConfigError> {
        self.inert.as_ref()
    }

    pub fn is_inert(&self) -> bool {
        self.inert.is_some()
    }

    pub fn zone_resets(&self) -> u32 {
        self.zone_resets
    }

    pub fn next_spawn_at(&self) -> f32 {
        self.next_spawn_at
    }

    pub fn owns(&self, agent: A) -> bool {
        self.live.contains_key(&agent)
    }

    pub fn slot_of(&self, agent: A) -> Option<SlotIndex> {
        self.live.get(&agent).copied()
    }

    pub fn live_agents(&self) -> impl Iterator<Item = (A, SlotIndex)> + '_ {
        self.live.iter().map(|(agent, slot)| (*agent, *slot))
    }

    pub fn telemetry(&self) -> SpawnerTelemetry {
        SpawnerTelemetry {
            name: self.config.name.clone(),
            live_count: self.live_count(),
            max_count: self.max_count(),
            zone_state: self.zone_state(),
            free_slots: self.pool.free_count(),
            zone_resets: self.zone_resets,
            inert: self.is_inert(),
        }
    }

    /// SpawnEnemy(): один агент, если есть место, шаблон и свободный slot
    pub fn spawn_enemy<R, F>(&mut self, rng: &mut R, factory: &mut F) -> SpawnOutcome<A>
    where
        R: Rng + ?Sized,
        F: EnemyFactory<A> + ?Sized,
    {
        if self.live.len() >= self.config.max_active_enemies {
            return SpawnOutcome::AtCapacity;
        }

        if self.inert.is_some() {
            return SpawnOutcome::Inert;
        }

        let Some(template) = self.config.enemy_template.as_ref() else {
            crate::log_error(&format!("Spawner '{}': enemy template not assigned", self.config.name));
            return SpawnOutcome::Inert;
        };

        let Some(slot) = self.pool.acquire(rng) else {
            crate::log_warning(&format!(
                "Spawner '{}': no free spawn points, waiting for release",
                self.config.name
            ));
            return SpawnOutcome::PoolExhausted;
        };

        let Some(pose) = self.pool.slot(slot).map(|s| s.transform()) else {
            return SpawnOutcome::PoolExhausted;
        };

        let route = match self.routes.pick(rng) {
            Some(route) if !route.is_empty() => Some(route),
            Some(_) => {
                crate::log_warning(&format!(
                    "Spawner '{}': selected patrol route is empty, enemy will idle",
                    self.config.name
                ));
                None
            }
            None => None,
        };

        let request = SpawnRequest {
            slot,
            pose,
            route,
            template,
        };

        let Some(agent) = factory.instantiate(request) else {
            self.pool.release(slot);
            crate::log_warning(&format!("Spawner '{}': factory rejected spawn at slot {}", self.config.name, slot.0));
            return SpawnOutcome::FactoryRejected;
        };

        self.live.insert(agent, slot);
        crate::log(&format!(
            "Spawner '{}': enemy {:?} spawned at slot {}. Active: {}/{}",
            self.config.name,
            agent,
            slot.0,
            self.live.len(),
            self.config.max_active_enemies
        ));

        SpawnOutcome::Spawned(agent)
    }

    /// NotifyDeath(agent): освобождает slot. Повторный вызов → false, без изменений.
    pub fn notify_death(&mut self, agent: A) -> bool {
        let Some(slot) = self.live.remove(&agent) else {
            crate::log_warning(&format!(
                "Spawner '{}': death notice for unknown agent {:?} ignored",
                self.config.name, agent
            ));
            return false;
        };

        self.pool.release(slot);
        crate::log(&format!(
            "Spawner '{}': enemy {:?} died, slot {} released. Active: {}/{}",
            self.config.name,
            agent,
            slot.0,
            self.live.len(),
            self.config.max_active_enemies
        ));
        true
    }

    /// Один тик: start → zone → respawn cadence.
    ///
    /// `player_distance` = None пока игрок не найден (тогда только start logic).
    pub fn tick<R, F>(
        &mut self,
        player_distance: Option<f32>,
        now: f32,
        rng: &mut R,
        factory: &mut F,
    ) -> SpawnerTick<A>
    where
        R: Rng + ?Sized,
        F: EnemyFactory<A> + ?Sized,
    {
        let mut report = SpawnerTick::default();

        if self.inert.is_some() {
            return report;
        }

        if !self.started {
            self.start(now, rng, factory, &mut report);
        }

        let Some(distance) = player_distance else {
            return report;
        };

        report.zone = self.zone.evaluate(distance, now, &self.config.zone);

        match report.zone {
            ZoneTransition::Activated => {
                crate::log_info(&format!("Spawner '{}' activated by player proximity", self.config.name));
                self.fill(rng, factory, &mut report);
                self.next_spawn_at = now + self.config.respawn.respawn_time;
            }
            ZoneTransition::ResetArmed => {
                crate::log_info(&format!(
                    "Spawner '{}': zone ready for full reset on re-entry",
                    self.config.name
                ));
            }
            ZoneTransition::Reactivated => {
                self.reset_zone(rng, factory, &mut report);
                self.next_spawn_at = now + self.config.respawn.respawn_time;
            }
            ZoneTransition::AbsenceStarted => {
                crate::log(&format!("Spawner '{}': player left zone, reset timer started", self.config.name));
            }
            ZoneTransition::AbsenceCleared | ZoneTransition::None => {}
        }

        self.respawn_cadence(distance, now, rng, factory, &mut report);

        report
    }

    fn start<R, F>(&mut self, now: f32, rng: &mut R, factory: &mut F, report: &mut SpawnerTick<A>)
    where
        R: Rng + ?Sized,
        F: EnemyFactory<A> + ?Sized,
    {
        self.started = true;

        if !self.config.zone.activate_on_player_proximity {
            self.zone.force_active();
            self.fill(rng, factory, report);
        }

        self.next_spawn_at = now + self.config.respawn.respawn_time;
    }

    fn fill<R, F>(&mut self, rng: &mut R, factory: &mut F, report: &mut SpawnerTick<A>)
    where
        R: Rng + ?Sized,
        F: EnemyFactory<A> + ?Sized,
    {
        while self.live.len() < self.config.max_active_enemies {
            match self.spawn_enemy(rng, factory) {
                SpawnOutcome::Spawned(agent) => {
                    if let Some(slot) = self.slot_of(agent) {
                        report.spawned.push((agent, slot));
                    }
                }
                _ => break,
            }
        }
    }

    /// PendingReset → Active: reset_all пула + top-up (или полный wipe)
    fn reset_zone<R, F>(&mut self, rng: &mut R, factory: &mut F, report: &mut SpawnerTick<A>)
    where
        R: Rng + ?Sized,
        F: EnemyFactory<A> + ?Sized,
    {
        self.zone_resets += 1;

        match self.config.zone.reset_policy {
            ZoneResetPolicy::TopUp => {
                self.pool.reset_all();
                // Slots выживших агентов не должны оставаться свободными
                for slot in self.live.values() {
                    self.pool.claim(*slot);
                }
            }
            ZoneResetPolicy::Wipe => {
                report.retired.extend(self.live.keys().copied());
                self.live.clear();
                self.pool.reset_all();
            }
        }

        crate::log_info(&format!(
            "Spawner '{}': player re-entered zone, resetting ({:?}, {} survivors)",
            self.config.name,
            self.config.zone.reset_policy,
            self.live.len()
        ));

        self.fill(rng, factory, report);
    }

    fn respawn_cadence<R, F>(
        &mut self,
        distance: f32,
        now: f32,
        rng: &mut R,
        factory: &mut F,
        report: &mut SpawnerTick<A>,
    ) where
        R: Rng + ?Sized,
        F: EnemyFactory<A> + ?Sized,
    {
        if !self.zone.allows_respawn() {
            return;
        }

        if self.live.len() >= self.config.max_active_enemies {
            return;
        }

        if now < self.next_spawn_at {
            return;
        }

        let respawn = &self.config.respawn;
        if respawn.enable_proximity_respawn && distance < respawn.min_distance_for_respawn {
            self.next_spawn_at = now + respawn.proximity_backoff;
            return;
        }

        if let SpawnOutcome::Spawned(agent) = self.spawn_enemy(rng, factory) {
            if let Some(slot) = self.slot_of(agent) {
                report.spawned.push((agent, slot));
            }
        }
        self.next_spawn_at = now + self.config.respawn.respawn_time;
    }
}
