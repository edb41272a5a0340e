#![allow(dead_code)]

use core::convert::Infallible;

use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use turret_defense::config::{SCREEN_BANKS, SCREEN_WIDTH};
use turret_defense::lcd::BankDisplay;
use turret_defense::pool::SlotStatus;
use turret_defense::sprite::Sprite;
use turret_defense::{GameSession, InterruptState, Phase};

const W: usize = SCREEN_WIDTH as usize;
const BANKS: usize = SCREEN_BANKS as usize;

/// In-memory panel with the same auto-advancing address as the real one.
pub struct Panel {
    pub cells: [[u8; W]; BANKS],
    pub writes: usize,
    x: usize,
    bank: usize,
}

impl Panel {
    pub fn new() -> Self {
        Self { cells: [[0; W]; BANKS], writes: 0, x: 0, bank: 0 }
    }

    pub fn columns(&self, x: u8, bank: u8) -> [u8; 8] {
        let mut out = [0; 8];
        for (i, col) in out.iter_mut().enumerate() {
            *col = self.cells[bank as usize][x as usize + i];
        }
        out
    }

    /// Whether `sprite` is drawn at `(x, bank)`.
    pub fn shows(&self, sprite: &Sprite, x: u8, bank: u8) -> bool {
        &self.columns(x, bank) == sprite.columns()
    }

    pub fn bank_is_blank(&self, bank: u8) -> bool {
        self.cells[bank as usize].iter().all(|&c| c == 0)
    }
}

impl BankDisplay for Panel {
    type Error = Infallible;

    fn set_address(&mut self, x: u8, bank: u8) -> Result<(), Infallible> {
        self.x = x as usize % W;
        self.bank = bank as usize % BANKS;
        Ok(())
    }

    fn write_column(&mut self, column: u8) -> Result<(), Infallible> {
        self.cells[self.bank][self.x] = column;
        self.writes += 1;
        self.x += 1;
        if self.x == W {
            self.x = 0;
            self.bank = (self.bank + 1) % BANKS;
        }
        Ok(())
    }
}

/// PWM output with an 8-bit duty range.
#[derive(Default)]
pub struct Pwm {
    pub duty: u16,
}

impl ErrorType for Pwm {
    type Error = Infallible;
}

impl SetDutyCycle for Pwm {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        self.duty = duty;
        Ok(())
    }
}

/// Runs the console menu and returns a session in `Playing`.
pub fn start(shared: &InterruptState, selector: u8, seed: u64) -> GameSession {
    let mut game = GameSession::new(seed);
    for &b in b"test" {
        game.console_byte(shared, b);
    }
    game.console_byte(shared, selector);
    game.console_byte(shared, b'\r');
    assert_eq!(game.phase(), Phase::Playing);
    game
}

pub fn ticks(shared: &InterruptState, n: usize) {
    for _ in 0..n {
        shared.on_game_tick();
    }
}

pub fn press_fire(shared: &InterruptState) {
    for _ in 0..4 {
        shared.on_input_sample(true, false);
    }
}

pub fn release_fire(shared: &InterruptState) {
    for _ in 0..4 {
        shared.on_input_sample(false, false);
    }
}

pub fn hold_kill_switch(shared: &InterruptState) {
    for _ in 0..4 {
        shared.on_input_sample(false, true);
    }
}

pub fn release_kill_switch(shared: &InterruptState) {
    for _ in 0..4 {
        shared.on_input_sample(false, false);
    }
}

/// Shoots the first falling enemy every tick until the round ends, calling
/// `frame` after each step.
pub fn shoot_until_over(shared: &InterruptState, game: &mut GameSession, mut frame: impl FnMut(&GameSession)) {
    let mut guard = 0;
    while game.phase() == Phase::Playing {
        ticks(shared, 1);
        game.step(shared, 1);
        frame(game);
        let target = game
            .session()
            .pool()
            .claimed_slots()
            .iter()
            .find(|s| s.status == SlotStatus::Falling)
            .map(|s| s.x);
        if let Some(x) = target {
            press_fire(shared);
            game.step(shared, x);
            frame(game);
            release_fire(shared);
        }
        guard += 1;
        assert!(guard < 1_000);
    }
}
