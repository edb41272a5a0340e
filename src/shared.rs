//! State shared between the interrupt handlers and the main loop.
//!
//! Everything an ISR writes lives here, behind one critical-section mutex.
//! The main loop never sees the raw fields, only snapshots and the
//! operations below.

use core::cell::RefCell;
use critical_section::Mutex;

use crate::clock::TickClock;
use crate::debounce::{DebounceChannel, Oscillator};

/// Clock values read atomically by the main loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockSnapshot {
    pub tick: u8,
    pub cadence: u16,
    pub active: bool,
}

/// What the sampling ISR should do with the fire lamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LampCommand {
    On,
    Off,
    Hold,
}

struct IsrState {
    clock: TickClock,
    fire: DebounceChannel,
    kill: DebounceChannel,
    oscillator: Oscillator,
}

pub struct InterruptState {
    inner: Mutex<RefCell<IsrState>>,
}

impl InterruptState {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(IsrState {
                clock: TickClock::new(),
                fire: DebounceChannel::new(),
                kill: DebounceChannel::new(),
                oscillator: Oscillator::new(),
            })),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut IsrState) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    /// Game-tick interrupt body.
    pub fn on_game_tick(&self) {
        self.with(|s| s.clock.advance());
    }

    /// Sampling interrupt body: debounces both switches and steps the
    /// oscillator.
    ///
    /// A pressed kill switch clears the session flag on every sample it is
    /// held for.
    pub fn on_input_sample(&self, fire_raw: bool, kill_raw: bool) -> LampCommand {
        self.with(|s| {
            s.oscillator.step();

            let lamp = if s.fire.sample(fire_raw) {
                if s.clock.is_active() { LampCommand::On } else { LampCommand::Hold }
            } else {
                LampCommand::Off
            };

            if s.kill.sample(kill_raw) {
                s.clock.deactivate();
            }
            lamp
        })
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        self.with(|s| ClockSnapshot {
            tick: s.clock.current_tick(),
            cadence: s.clock.cadence(),
            active: s.clock.is_active(),
        })
    }

    pub fn is_active(&self) -> bool {
        self.with(|s| s.clock.is_active())
    }

    /// Consumes a pending fire-button press.
    pub fn poll_fire_click(&self) -> bool {
        self.with(|s| s.fire.poll_click())
    }

    /// Restarts game time for a new session.
    pub fn start_session(&self, spawn_interval: u8) {
        self.with(|s| s.clock.start(spawn_interval));
    }

    /// Current proximity duty value.
    pub fn proximity_duty(&self) -> u8 {
        self.with(|s| s.oscillator.value())
    }
}

impl Default for InterruptState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_only_count_inside_a_session() {
        let shared = InterruptState::new();
        shared.on_game_tick();
        assert_eq!(shared.snapshot().tick, 0);

        shared.start_session(10);
        for _ in 0..10 {
            shared.on_game_tick();
        }
        assert_eq!(
            shared.snapshot(),
            ClockSnapshot { tick: 10, cadence: 1, active: true }
        );
    }

    #[test]
    fn held_kill_switch_ends_the_session() {
        let shared = InterruptState::new();
        shared.start_session(3);
        for _ in 0..3 {
            shared.on_input_sample(false, true);
            assert!(shared.is_active());
        }
        shared.on_input_sample(false, true);
        assert!(!shared.is_active());

        // still held: a restarted session is cleared again
        shared.start_session(3);
        shared.on_input_sample(false, true);
        assert!(!shared.is_active());
    }

    #[test]
    fn fire_lamp_follows_debounced_fire() {
        let shared = InterruptState::new();
        for _ in 0..4 {
            assert_eq!(shared.on_input_sample(false, false), LampCommand::Off);
        }
        for _ in 0..3 {
            shared.on_input_sample(true, false);
        }
        assert_eq!(shared.on_input_sample(true, false), LampCommand::Hold);

        shared.start_session(1);
        assert_eq!(shared.on_input_sample(true, false), LampCommand::On);
        assert!(shared.poll_fire_click());
        assert!(!shared.poll_fire_click());
    }

    #[test]
    fn oscillator_steps_with_every_sample() {
        let shared = InterruptState::new();
        shared.on_input_sample(false, false);
        shared.on_input_sample(false, false);
        assert_eq!(shared.proximity_duty(), 4);
    }
}
