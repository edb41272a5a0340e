//! Session lifecycle: menu, rounds, terminal states and replays.
//!
//! [`GameSession`] owns the state machine and its context and is the only
//! place that talks to [`InterruptState`] on the session's behalf.

use crate::session_fsm::{FrameInput, Session, SessionEvent, SessionFsm};
use crate::shared::InterruptState;

/// Externally visible session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Username,
    DifficultySelect,
    Confirm,
    Replay,
    Playing,
    GameOver,
    Won,
}

impl Phase {
    pub fn is_menu(self) -> bool {
        matches!(self, Phase::Username | Phase::DifficultySelect | Phase::Confirm)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::GameOver | Phase::Won)
    }

    fn in_round(self) -> bool {
        matches!(self, Phase::Playing | Phase::GameOver | Phase::Won)
    }
}

pub struct GameSession {
    fsm: SessionFsm,
    session: Session,
}

impl GameSession {
    pub fn new(seed: u64) -> Self {
        let mut session = Session::new(seed);
        let mut fsm = SessionFsm::Username;
        fsm.init(&mut session);
        Self { fsm, session }
    }

    /// Replaces the placement generator's seed.
    pub fn reseed(&mut self, seed: u64) {
        self.session.reseed(seed);
    }

    pub fn phase(&self) -> Phase {
        match self.fsm {
            SessionFsm::Username => Phase::Username,
            SessionFsm::DifficultySelect => Phase::DifficultySelect,
            SessionFsm::Confirm => Phase::Confirm,
            SessionFsm::Replay => Phase::Replay,
            SessionFsm::Playing => Phase::Playing,
            SessionFsm::GameOver => Phase::GameOver,
            SessionFsm::Won => Phase::Won,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Next console prompt to print, if a state asked for one.
    pub fn take_prompt(&mut self) -> Option<&'static str> {
        self.session.take_prompt()
    }

    /// Feeds one console byte to the menu. Ignored outside the menu.
    pub fn console_byte(&mut self, shared: &InterruptState, byte: u8) -> Phase {
        if self.phase().is_menu() {
            self.dispatch(SessionEvent::Console(byte));
            self.arm(shared);
        }
        self.phase()
    }

    /// One main-loop iteration.
    ///
    /// Replays the round if the kill switch cleared the session, otherwise
    /// runs a playing frame with the current clock and fire edge. Terminal
    /// states stay frozen.
    pub fn step(&mut self, shared: &InterruptState, player_x: u8) -> Phase {
        if self.phase().in_round() && !shared.is_active() {
            info!("session cleared from {}", self.phase());
            self.dispatch(SessionEvent::SessionCleared);
        }
        self.arm(shared);

        if self.phase() == Phase::Playing {
            let clock = shared.snapshot();
            let fire = shared.poll_fire_click();
            self.dispatch(SessionEvent::Frame(FrameInput {
                tick: clock.tick,
                cadence: clock.cadence,
                player_x,
                fire,
            }));
        }
        self.phase()
    }

    /// Blocks in a terminal state until the kill switch clears the session,
    /// calling `idle` between checks.
    pub fn wait_for_reset(&self, shared: &InterruptState, mut idle: impl FnMut(&Self)) {
        if !self.phase().is_terminal() {
            return;
        }
        while shared.is_active() {
            idle(self);
        }
    }

    /// Restarts game time and enters `Playing` if a round reset is pending.
    fn arm(&mut self, shared: &InterruptState) {
        if self.phase() == Phase::Replay {
            shared.start_session(self.session.difficulty().spawn_interval());
            self.dispatch(SessionEvent::Start);
        }
    }

    fn dispatch(&mut self, event: SessionEvent) {
        self.fsm.dispatch(&mut self.session, &event);
    }
}
