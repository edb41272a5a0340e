//! Shot-versus-enemy hit testing.

use crate::config::{HIT_REACH_LEFT, HIT_REACH_RIGHT, WIN_SCORE};
use crate::pool::{EnemyPool, SlotStatus};

/// Kill count for the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Score(u8);

impl Score {
    pub const fn new() -> Self {
        Self(0)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn award(&mut self, kills: u8) {
        self.0 = self.0.saturating_add(kills).min(WIN_SCORE);
    }

    pub fn is_won(&self) -> bool {
        self.0 == WIN_SCORE
    }
}

/// Hit window around an enemy sprite, asymmetric by one pixel.
pub fn is_hit(player_x: u8, enemy_x: u8) -> bool {
    (player_x > enemy_x && player_x - enemy_x < HIT_REACH_LEFT)
        || (player_x <= enemy_x && enemy_x - player_x < HIT_REACH_RIGHT)
}

/// Resolves one shot at `player_x` against every falling enemy.
///
/// All overlapping enemies die; returns how many.
pub fn resolve(pool: &mut EnemyPool, player_x: u8, score: &mut Score) -> u8 {
    let mut kills = 0u8;
    for index in 0..pool.claimed() {
        let Some(slot) = pool.slot(index) else { break };
        if slot.status != SlotStatus::Falling || !is_hit(player_x, slot.x) {
            continue;
        }
        if pool.kill(index) {
            debug!("slot {} hit at x {}", index, player_x);
            kills += 1;
        }
    }
    score.award(kills);
    kills
}
