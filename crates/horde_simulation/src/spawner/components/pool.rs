//! SpawnPointPool — фиксированный набор spawn slot'ов с флагом занятости.
//!
//! Инвариант: slot никогда не выдаётся дважды (acquire берёт только свободные).
//! Мутирует пул только LifecycleManager.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::spawner::SlotPose;

/// Индекс slot'а в пуле (стабилен всё время жизни спавнера)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect, Serialize, Deserialize)]
pub struct SlotIndex(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnSlot {
    pub position: Vec3,
    pub orientation: Quat,
    pub occupied: bool,
}

impl SpawnSlot {
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).with_rotation(self.orientation)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpawnPointPool {
    slots: Vec<SpawnSlot>,
    /// Сколько раз отработал reset_all
    resets: u32,
}

impl SpawnPointPool {
    pub fn new(poses: &[SlotPose]) -> Self {
        let slots = poses
            .iter()
            .map(|pose| SpawnSlot {
                position: pose.translation(),
                orientation: pose.rotation(),
                occupied: false,
            })
            .collect();
        Self { slots, resets: 0 }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: SlotIndex) -> Option<&SpawnSlot> {
        self.slots.get(index.0)
    }

    pub fn is_occupied(&self, index: SlotIndex) -> bool {
        self.slot(index).map(|slot| slot.occupied).unwrap_or(false)
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.occupied).count()
    }

    pub fn free_count(&self) -> usize {
        self.len() - self.occupied_count()
    }

    /// Случайный (равномерно) свободный slot → occupied. None если всё занято.
    pub fn acquire<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<SlotIndex> {
        let free: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.occupied)
            .map(|(index, _)| index)
            .collect();

        if free.is_empty() {
            return None;
        }

        let index = free[rng.gen_range(0..free.len())];
        self.slots[index].occupied = true;
        Some(SlotIndex(index))
    }

    /// Освободить slot. Idempotent: свободный или несуществующий slot → no-op (false).
    pub fn release(&mut self, index: SlotIndex) -> bool {
        match self.slots.get_mut(index.0) {
            Some(slot) if slot.occupied => {
                slot.occupied = false;
                true
            }
            _ => false,
        }
    }

    /// Занять конкретный slot (перезахват после reset_all). false если уже занят/нет такого.
    pub fn claim(&mut self, index: SlotIndex) -> bool {
        match self.slots.get_mut(index.0) {
            Some(slot) if !slot.occupied => {
                slot.occupied = true;
                true
            }
            _ => false,
        }
    }

    /// Все slots → free, независимо от живых агентов.
    /// Вызывающий обязан синхронизировать агентов (см. ZoneResetPolicy).
    pub fn reset_all(&mut self) {
        for slot in &mut self.slots {
            slot.occupied = false;
        }
        self.resets += 1;
    }

    pub fn reset_count(&self) -> u32 {
        self.resets
    }

    pub fn occupancy(&self) -> Vec<bool> {
        self.slots.iter().map(|slot| slot.occupied).collect()
    }
}
