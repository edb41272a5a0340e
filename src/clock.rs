//! Game clock advanced by the game-tick interrupt.

/// In-session game time and spawn cadence.
///
/// Only moves while a session is active. The tick wraps at 256; consumers
/// must use wrapping differences.
#[derive(Clone, Copy, Debug)]
pub struct TickClock {
    tick: u8,
    cadence: u16,
    spawn_interval: u8,
    active: bool,
}

impl TickClock {
    pub const fn new() -> Self {
        Self { tick: 0, cadence: 0, spawn_interval: 1, active: false }
    }

    /// Zeroes the counters and activates the clock for a new session.
    pub fn start(&mut self, spawn_interval: u8) {
        self.tick = 0;
        self.cadence = 0;
        self.spawn_interval = spawn_interval.max(1);
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// One game period elapsed.
    pub fn advance(&mut self) {
        if !self.active {
            return;
        }
        self.tick = self.tick.wrapping_add(1);
        if self.tick % self.spawn_interval == 0 {
            self.cadence = self.cadence.saturating_add(1);
        }
    }

    pub fn current_tick(&self) -> u8 {
        self.tick
    }

    /// Number of enemies due since the session started.
    pub fn cadence(&self) -> u16 {
        self.cadence
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}
