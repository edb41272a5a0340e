//! Fixed-capacity enemy pool.
//!
//! Slots are claimed in index order as the spawn cadence grows and are never
//! reused within a session. A falling enemy's height is recomputed from its
//! spawn tick every frame rather than accumulated.

use rand::Rng;
use thiserror::Error;

use crate::config::{ESCAPE_Y, POOL_CAPACITY, PROXIMITY_Y, SCREEN_WIDTH, SPAWN_MARGIN};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlotStatus {
    #[default]
    Empty,
    Falling,
    Dead,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct EnemySlot {
    pub status: SlotStatus,
    pub x: u8,
    pub spawn_tick: u8,
    pub y: u16,
}

/// Every slot has been claimed; the session spawns nothing more.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("every enemy slot is already claimed")]
pub struct PoolExhausted;

/// A falling enemy crossed the escape line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Escape {
    pub slot: usize,
    pub y: u16,
}

/// Height of an enemy after falling since `spawn_tick`.
pub fn fall_distance(spawn_tick: u8, now: u8, fall_speed: u8) -> u16 {
    u16::from(now.wrapping_sub(spawn_tick)) * u16::from(fall_speed)
}

pub struct EnemyPool {
    slots: [EnemySlot; POOL_CAPACITY],
    claimed: usize,
}

impl EnemyPool {
    pub const fn new() -> Self {
        const EMPTY: EnemySlot = EnemySlot { status: SlotStatus::Empty, x: 0, spawn_tick: 0, y: 0 };
        Self { slots: [EMPTY; POOL_CAPACITY], claimed: 0 }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Slots handed out so far this session.
    pub fn claimed(&self) -> usize {
        self.claimed
    }

    /// Slots currently falling.
    pub fn alive(&self) -> usize {
        self.claimed_slots().iter().filter(|s| s.status == SlotStatus::Falling).count()
    }

    pub fn slot(&self, index: usize) -> Option<&EnemySlot> {
        self.slots.get(index)
    }

    pub fn claimed_slots(&self) -> &[EnemySlot] {
        &self.slots[..self.claimed]
    }

    /// Claims the next slot if the cadence is ahead of the pool.
    ///
    /// At most one slot per call.
    pub fn spawn<R: Rng>(&mut self, cadence: u16, tick: u8, rng: &mut R) -> Result<Option<usize>, PoolExhausted> {
        if usize::from(cadence) <= self.claimed {
            return Ok(None);
        }
        let index = self.claimed;
        let slot = self.slots.get_mut(index).ok_or(PoolExhausted)?;
        *slot = EnemySlot {
            status: SlotStatus::Falling,
            x: rng.gen_range(0..SCREEN_WIDTH - SPAWN_MARGIN),
            spawn_tick: tick,
            y: 0,
        };
        self.claimed += 1;
        Ok(Some(index))
    }

    /// Recomputes every falling height for `tick`.
    ///
    /// Returns the first enemy past the escape line, if any.
    pub fn advance(&mut self, tick: u8, fall_speed: u8) -> Option<Escape> {
        let mut escape = None;
        for (index, slot) in self.slots[..self.claimed].iter_mut().enumerate() {
            if slot.status != SlotStatus::Falling {
                continue;
            }
            slot.y = fall_distance(slot.spawn_tick, tick, fall_speed);
            if slot.y > ESCAPE_Y && escape.is_none() {
                escape = Some(Escape { slot: index, y: slot.y });
            }
        }
        escape
    }

    /// Kills a falling enemy. Returns false for anything else.
    pub fn kill(&mut self, index: usize) -> bool {
        if index >= self.claimed {
            debug_assert!(index < POOL_CAPACITY, "slot index {} out of range", index);
            return false;
        }
        match self.slots.get_mut(index) {
            Some(slot) if slot.status == SlotStatus::Falling => {
                slot.status = SlotStatus::Dead;
                true
            }
            _ => false,
        }
    }

    /// Any falling enemy inside the proximity band.
    pub fn any_approaching(&self) -> bool {
        self.claimed_slots()
            .iter()
            .any(|s| s.status == SlotStatus::Falling && s.y > PROXIMITY_Y && s.y <= ESCAPE_Y)
    }
}

impl Default for EnemyPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    #[test]
    fn spawns_follow_cadence_one_per_call() {
        let mut pool = EnemyPool::new();
        let mut rng = rng();
        assert_eq!(pool.spawn(0, 0, &mut rng), Ok(None));
        assert_eq!(pool.spawn(2, 5, &mut rng), Ok(Some(0)));
        assert_eq!(pool.spawn(2, 6, &mut rng), Ok(Some(1)));
        assert_eq!(pool.spawn(2, 7, &mut rng), Ok(None));
        assert_eq!(pool.claimed(), 2);
        assert_eq!(pool.slot(0).map(|s| s.spawn_tick), Some(5));
        assert_eq!(pool.slot(1).map(|s| s.spawn_tick), Some(6));
    }

    #[test]
    fn spawn_x_stays_inside_margin() {
        let mut pool = EnemyPool::new();
        let mut rng = rng();
        for n in 1..=POOL_CAPACITY as u16 {
            pool.spawn(n, 0, &mut rng).unwrap();
        }
        assert!(pool.claimed_slots().iter().all(|s| s.x < SCREEN_WIDTH - SPAWN_MARGIN));
    }

    #[test]
    fn exhaustion_is_reported_not_written() {
        let mut pool = EnemyPool::new();
        let mut rng = rng();
        for n in 1..=POOL_CAPACITY as u16 {
            assert!(pool.spawn(n, 0, &mut rng).unwrap().is_some());
        }
        assert_eq!(pool.spawn(200, 0, &mut rng), Err(PoolExhausted));
        assert_eq!(pool.claimed(), POOL_CAPACITY);
    }

    #[test]
    fn height_is_a_function_of_elapsed_ticks() {
        let mut pool = EnemyPool::new();
        let mut rng = rng();
        pool.spawn(1, 250, &mut rng).unwrap();
        for tick in [250u8, 252, 251, 255, 0, 3] {
            pool.advance(tick, 4);
            let expected = u16::from(tick.wrapping_sub(250)) * 4;
            assert_eq!(pool.slot(0).unwrap().y, expected);
        }
    }

    #[test]
    fn escape_reported_past_threshold() {
        let mut pool = EnemyPool::new();
        let mut rng = rng();
        pool.spawn(1, 0, &mut rng).unwrap();
        assert_eq!(pool.advance(10, 4), None);
        assert_eq!(pool.advance(11, 4), Some(Escape { slot: 0, y: 44 }));
    }

    #[test]
    fn dead_slots_stay_dead() {
        let mut pool = EnemyPool::new();
        let mut rng = rng();
        pool.spawn(1, 0, &mut rng).unwrap();
        assert!(pool.kill(0));
        assert!(!pool.kill(0));
        assert!(!pool.kill(1));
        assert_eq!(pool.advance(30, 5), None);
        assert_eq!(pool.alive(), 0);
        assert_eq!(pool.spawn(1, 30, &mut rng), Ok(None));
    }

    #[test]
    fn proximity_band_is_half_open() {
        let mut pool = EnemyPool::new();
        let mut rng = rng();
        pool.spawn(1, 0, &mut rng).unwrap();
        pool.advance(2, 5);
        assert!(!pool.any_approaching());
        pool.advance(3, 5);
        assert!(pool.any_approaching());
        pool.advance(8, 5);
        assert!(pool.any_approaching());
    }
}
