use heapless::String;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use typed_fsm::{state_machine, Transition};

use crate::collision::{self, Score};
use crate::config::{Difficulty, USERNAME_LEN};
use crate::pool::{EnemyPool, PoolExhausted};

pub const WELCOME_PROMPT: &str = "Welcome! Please Enter a Username (4 characters only):\n\r";
pub const DIFFICULTY_PROMPT: &str = "\nEnter a Difficulty Level:\n\r1 - Novice\n\r2 - Pro\n\r3 - Master\n\r";
pub const READY_PROMPT: &str = "\nAll set up! Press any button to continue...\n\n\r";

/// The last shot fired, shown for the tick it was fired on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shot {
    pub x: u8,
    pub fired_tick: u8,
}

impl Shot {
    pub fn visible_at(&self, tick: u8) -> bool {
        tick == self.fired_tick
    }
}

/// Everything the main loop gathered for one playing frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameInput {
    pub tick: u8,
    pub cadence: u16,
    pub player_x: u8,
    pub fire: bool,
}

// FSM Events
#[derive(Clone, Copy, Debug)]
pub enum SessionEvent {
    Console(u8),
    Start,
    Frame(FrameInput),
    SessionCleared,
}

enum FrameOutcome {
    Continue,
    Escaped,
    Cleared,
}

// FSM Context
pub struct Session {
    username: String<USERNAME_LEN>,
    difficulty: Difficulty,
    pool: EnemyPool,
    score: Score,
    shot: Option<Shot>,
    player_x: u8,
    tick: u8,
    round: u16,
    prompt: Option<&'static str>,
    rng: SmallRng,
    exhaustion_logged: bool,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        Self {
            username: String::new(),
            difficulty: Difficulty::Pro,
            pool: EnemyPool::new(),
            score: Score::new(),
            shot: None,
            player_x: 0,
            tick: 0,
            round: 0,
            prompt: None,
            rng: SmallRng::seed_from_u64(seed),
            exhaustion_logged: false,
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn pool(&self) -> &EnemyPool {
        &self.pool
    }

    pub fn score(&self) -> u8 {
        self.score.value()
    }

    pub fn shot(&self) -> Option<Shot> {
        self.shot
    }

    pub fn player_x(&self) -> u8 {
        self.player_x
    }

    pub fn tick(&self) -> u8 {
        self.tick
    }

    /// Bumped every time a round is reset.
    pub fn round(&self) -> u16 {
        self.round
    }

    pub fn take_prompt(&mut self) -> Option<&'static str> {
        self.prompt.take()
    }

    /// Returns true once the name is complete.
    fn push_username_byte(&mut self, byte: u8) -> bool {
        let ch = if byte.is_ascii_graphic() { char::from(byte) } else { '?' };
        let _ = self.username.push(ch);
        self.username.len() == USERNAME_LEN
    }

    /// Fresh pool and score; difficulty and name carry over.
    fn reset_round(&mut self) {
        self.pool.reset();
        self.score = Score::new();
        self.shot = None;
        self.tick = 0;
        self.round = self.round.wrapping_add(1);
        self.exhaustion_logged = false;
    }

    fn play_frame(&mut self, input: &FrameInput) -> FrameOutcome {
        self.tick = input.tick;
        self.player_x = input.player_x;

        match self.pool.spawn(input.cadence, input.tick, &mut self.rng) {
            Ok(Some(slot)) => debug!("slot {} spawned at tick {}", slot, input.tick),
            Ok(None) => {}
            Err(PoolExhausted) => {
                if !self.exhaustion_logged {
                    warn!("enemy pool exhausted, spawning stopped");
                    self.exhaustion_logged = true;
                }
            }
        }

        if let Some(escape) = self.pool.advance(input.tick, self.difficulty.fall_speed()) {
            info!("slot {} escaped at y {}", escape.slot, escape.y);
            return FrameOutcome::Escaped;
        }

        if input.fire {
            self.shot = Some(Shot { x: input.player_x, fired_tick: input.tick });
            collision::resolve(&mut self.pool, input.player_x, &mut self.score);
        }

        if self.score.is_won() {
            return FrameOutcome::Cleared;
        }
        FrameOutcome::Continue
    }
}

// State Machine Definition
state_machine! {
    Name: SessionFsm,
    Context: Session,
    Event: SessionEvent,
    States: {
        // Menu: four username bytes
        Username => {
            entry: |ctx| {
                ctx.username.clear();
                ctx.prompt = Some(WELCOME_PROMPT);
            }
            process: |ctx, evt| {
                match evt {
                    SessionEvent::Console(byte) => {
                        if ctx.push_username_byte(*byte) {
                            Transition::To(SessionFsm::DifficultySelect)
                        } else {
                            Transition::None
                        }
                    }
                    _ => Transition::None,
                }
            }
        },

        // Menu: one selector byte
        DifficultySelect => {
            entry: |ctx| {
                ctx.prompt = Some(DIFFICULTY_PROMPT);
            }
            process: |ctx, evt| {
                match evt {
                    SessionEvent::Console(byte) => {
                        ctx.difficulty = Difficulty::from_selector(*byte);
                        info!("difficulty {}", ctx.difficulty);
                        Transition::To(SessionFsm::Confirm)
                    }
                    _ => Transition::None,
                }
            }
        },

        // Menu: any byte starts the game
        Confirm => {
            entry: |ctx| {
                ctx.prompt = Some(READY_PROMPT);
            }
            process: |_ctx, evt| {
                match evt {
                    SessionEvent::Console(_) => Transition::To(SessionFsm::Replay),
                    _ => Transition::None,
                }
            }
        },

        // Round reset; waits for game time to be restarted
        Replay => {
            entry: |ctx| {
                ctx.reset_round();
            }
            process: |_ctx, evt| {
                match evt {
                    SessionEvent::Start => Transition::To(SessionFsm::Playing),
                    _ => Transition::None,
                }
            }
        },

        Playing => {
            entry: |ctx| {
                info!("round started as {}", ctx.username.as_str());
            }
            process: |ctx, evt| {
                match evt {
                    SessionEvent::Frame(input) => match ctx.play_frame(input) {
                        FrameOutcome::Continue => Transition::None,
                        FrameOutcome::Escaped => Transition::To(SessionFsm::GameOver),
                        FrameOutcome::Cleared => Transition::To(SessionFsm::Won),
                    },
                    SessionEvent::SessionCleared => Transition::To(SessionFsm::Replay),
                    _ => Transition::None,
                }
            }
        },

        // Frozen until the kill switch
        GameOver => {
            entry: |ctx| {
                info!("game over, score {}", ctx.score.value());
            }
            process: |_ctx, evt| {
                match evt {
                    SessionEvent::SessionCleared => Transition::To(SessionFsm::Replay),
                    _ => Transition::None,
                }
            }
        },

        Won => {
            entry: |ctx| {
                info!("round won, score {}", ctx.score.value());
            }
            process: |_ctx, evt| {
                match evt {
                    SessionEvent::SessionCleared => Transition::To(SessionFsm::Replay),
                    _ => Transition::None,
                }
            }
        }
    }
}
