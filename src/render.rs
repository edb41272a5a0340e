//! Per-frame drawing and the proximity indicator.
//!
//! The scheduler remembers where it last drew each sprite so a frame only
//! erases and redraws what it owns. A HUD redraw clears the panel and
//! forgets all of that; every new round starts with one.

use core::fmt::{Debug, Write as FmtWrite};

use embedded_hal::pwm::SetDutyCycle;
use heapless::String;
use thiserror::Error;

use crate::axis;
use crate::config::{POOL_CAPACITY, SCREEN_BANKS};
use crate::controller::{GameSession, Phase};
use crate::lcd::{BankDisplay, TextRow};
use crate::pool::SlotStatus;
use crate::session_fsm::Session;
use crate::sprite::{BULLET, ENEMY, SHOT_BASE, TURRET};

const TURRET_BANK: u8 = 3;
const SHOT_BASE_BANK: u8 = 2;
const BULLET_BANKS: [u8; 2] = [1, 0];
const HUD_RULE_BANK: u8 = 4;
const HUD_BANK: u8 = 5;

#[derive(Debug, Error)]
pub enum FrameError<D: Debug, P: Debug> {
    #[error("display transfer failed: {0:?}")]
    Display(D),
    #[error("proximity output failed: {0:?}")]
    Indicator(P),
}

pub struct RenderScheduler<D, P> {
    display: D,
    indicator: P,
    last_phase: Option<Phase>,
    round: Option<u16>,
    hud_score: Option<u8>,
    turret: Option<u8>,
    shot_x: Option<u8>,
    enemies: [Option<(u8, u8)>; POOL_CAPACITY],
    indicator_on: bool,
}

impl<D, P> RenderScheduler<D, P>
where
    D: BankDisplay,
    P: SetDutyCycle,
{
    pub fn new(display: D, indicator: P) -> Self {
        Self {
            display,
            indicator,
            last_phase: None,
            round: None,
            hud_score: None,
            turret: None,
            shot_x: None,
            enemies: [None; POOL_CAPACITY],
            indicator_on: false,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn indicator(&self) -> &P {
        &self.indicator
    }

    pub fn is_indicator_on(&self) -> bool {
        self.indicator_on
    }

    /// Forces a full redraw on the next frame.
    pub fn invalidate(&mut self) {
        self.last_phase = None;
    }

    /// Draws whatever the session's phase calls for.
    ///
    /// `duty` is the oscillator value used if an enemy is approaching.
    pub fn render(&mut self, game: &GameSession, duty: u8) -> Result<(), FrameError<D::Error, P::Error>> {
        let phase = game.phase();
        let entered = self.last_phase != Some(phase);
        self.last_phase = Some(phase);

        match phase {
            Phase::Username | Phase::DifficultySelect | Phase::Confirm => {
                if entered {
                    self.display.clear().map_err(FrameError::Display)?;
                }
                self.set_indicator(None)?;
                self.draw_menu(phase, game.session()).map_err(FrameError::Display)
            }
            Phase::Replay => Ok(()),
            Phase::Playing => {
                let round = game.session().round();
                if entered || self.round != Some(round) {
                    self.round = Some(round);
                    self.hud_score = None;
                }
                self.draw_playing(game.session(), duty)
            }
            Phase::GameOver | Phase::Won => {
                self.set_indicator(None)?;
                if entered && phase == Phase::Won {
                    self.display.clear().map_err(FrameError::Display)?;
                }
                self.draw_terminal(phase, game.session()).map_err(FrameError::Display)
            }
        }
    }

    fn draw_playing(&mut self, session: &Session, duty: u8) -> Result<(), FrameError<D::Error, P::Error>> {
        if self.hud_score != Some(session.score()) {
            self.draw_hud(session).map_err(FrameError::Display)?;
        }
        self.draw_sprites(session).map_err(FrameError::Display)?;

        let approaching = session.pool().any_approaching();
        self.set_indicator(approaching.then_some(duty))
    }

    fn draw_hud(&mut self, session: &Session) -> Result<(), D::Error> {
        self.display.clear()?;
        self.turret = None;
        self.shot_x = None;
        self.enemies = [None; POOL_CAPACITY];

        let mut score: String<4> = String::new();
        let _ = write!(score, "{}", session.score());

        TextRow::new().print(0, "_____________________").write_to(&mut self.display, HUD_RULE_BANK)?;
        TextRow::new()
            .print(0, session.username())
            .print(35, session.difficulty().label())
            .print(72, &score)
            .write_to(&mut self.display, HUD_BANK)?;

        self.hud_score = Some(session.score());
        Ok(())
    }

    fn draw_sprites(&mut self, session: &Session) -> Result<(), D::Error> {
        if let Some(x) = self.shot_x {
            self.display.erase_sprite(x, SHOT_BASE_BANK)?;
            for bank in BULLET_BANKS {
                self.display.erase_sprite(x, bank)?;
            }
        }
        if let Some(shot) = session.shot() {
            if shot.visible_at(session.tick()) {
                self.display.draw_sprite(&SHOT_BASE, shot.x, SHOT_BASE_BANK)?;
                for bank in BULLET_BANKS {
                    self.display.draw_sprite(&BULLET, shot.x, bank)?;
                }
            }
            self.shot_x = Some(shot.x);
        }

        if let Some(x) = self.turret.take() {
            self.display.erase_sprite(x, TURRET_BANK)?;
        }
        let x = session.player_x();
        if !axis::is_hidden(x) {
            self.display.draw_sprite(&TURRET, x, TURRET_BANK)?;
            self.turret = Some(x);
        }

        for (slot, drawn) in session.pool().claimed_slots().iter().zip(self.enemies.iter_mut()) {
            let target = match slot.status {
                SlotStatus::Falling => Some((slot.x, (slot.y / 8) as u8)).filter(|&(_, bank)| bank < SCREEN_BANKS),
                _ => None,
            };
            if let Some((x, bank)) = *drawn {
                if target != Some((x, bank)) {
                    self.display.erase_sprite(x, bank)?;
                }
            }
            *drawn = target;
            // redrawn even in place: shot erasure may have cut through it
            if let Some((x, bank)) = target {
                self.display.draw_sprite(&ENEMY, x, bank)?;
            }
        }
        Ok(())
    }

    fn draw_menu(&mut self, phase: Phase, session: &Session) -> Result<(), D::Error> {
        TextRow::new().print(15, "UART SETUP").write_to(&mut self.display, 1)?;
        TextRow::new()
            .print(5, "UserName:")
            .print(50, session.username())
            .write_to(&mut self.display, 2)?;

        let mut row = TextRow::new();
        row.print(5, "Difficulty:");
        if phase == Phase::Confirm {
            row.print(60, session.difficulty().label());
        }
        row.write_to(&mut self.display, 3)
    }

    fn draw_terminal(&mut self, phase: Phase, session: &Session) -> Result<(), D::Error> {
        if phase == Phase::Won {
            return TextRow::new().print(20, "You Won!").write_to(&mut self.display, 2);
        }
        let mut score: String<12> = String::new();
        let _ = write!(score, "Score: {}", session.score());
        TextRow::new().print(15, "Game Over").write_to(&mut self.display, 1)?;
        TextRow::new().print(20, &score).write_to(&mut self.display, 2)
    }

    fn set_indicator(&mut self, duty: Option<u8>) -> Result<(), FrameError<D::Error, P::Error>> {
        match duty {
            Some(duty) => {
                self.indicator_on = true;
                self.indicator
                    .set_duty_cycle_fraction(u16::from(duty), u16::from(u8::MAX))
                    .map_err(FrameError::Indicator)
            }
            None if self.indicator_on => {
                self.indicator_on = false;
                self.indicator.set_duty_cycle_fully_off().map_err(FrameError::Indicator)
            }
            None => Ok(()),
        }
    }
}
