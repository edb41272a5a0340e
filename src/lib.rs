//! SPDX-License-Identifier: MIT OR Apache-2.0
//!
//! # Turret Defense
//!
//! Real-time core of a single-player falling-enemy shooter for a small
//! microcontroller with an 84×48 bank-addressed LCD, two switches, a
//! potentiometer and a PWM output:
//! - **Interrupt state:** game clock, debounced switches and the duty
//!   oscillator, shared with ISRs through a critical section (`shared.rs`).
//! - **Enemy pool:** fixed slots with tick-driven positions (`pool.rs`).
//! - **FSM:** typed session state machine from menu to replay
//!   (`session_fsm.rs`, `controller.rs`).
//! - **Rendering:** erase/redraw scheduling on the LCD (`render.rs`).
//!
//! The RP2350 firmware lives in `main.rs` behind the `rp2350` feature; the
//! library itself is hardware-independent and tested on the host.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod axis;
pub mod clock;
pub mod collision;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod lcd;
pub mod pool;
pub mod render;
pub mod session_fsm;
pub mod shared;
pub mod sprite;

pub use controller::{GameSession, Phase};
pub use render::RenderScheduler;
pub use shared::InterruptState;
