//! SPDX-License-Identifier: MIT OR Apache-2.0
//!
//! # Turret Defense firmware
//!
//! - **Hardware Module:** HAL bring-up for the board (`hardware.rs`).
//! - **USB Module:** serial setup console with its interrupt (`usb_module.rs`).
//! - **Game core:** the `turret_defense` library, driven from the main loop
//!   and the two timer-alarm interrupts below.
//!
//! Target: Raspberry Pi Pico 2 (RP2350).

#![no_std]
#![no_main]

// --- Imports ---
use core::cell::RefCell;
use critical_section::Mutex;
use defmt::*;
use defmt_rtt as _;
use embedded_hal::digital::{InputPin, OutputPin};
use panic_probe as _;

// --- Modules ---
mod hardware;
mod usb_module;

use turret_defense::axis::AnalogAxis;
use turret_defense::shared::LampCommand;
use turret_defense::{GameSession, InterruptState, RenderScheduler};

// --- HAL Selection ---
use rp235x_hal as hal;
use hal::entry;

use rp235x_hal::pac::interrupt;

// --- Bootloader Configuration ---

#[unsafe(link_section = ".start_block")]
#[used]
pub static IMAGE_DEF: hal::block::ImageDef = hal::block::ImageDef::secure_exe();

// --- Shared State ---

static SHARED: InterruptState = InterruptState::new();
static GAME_ALARM: Mutex<RefCell<Option<hardware::GameAlarm>>> = Mutex::new(RefCell::new(None));
static SAMPLER: Mutex<RefCell<Option<hardware::Sampler>>> = Mutex::new(RefCell::new(None));

/// Entry point.
#[entry]
fn main() -> ! {
    info!("Program start");

    // 1. Initialize Hardware Stack
    let hw = hardware::init();

    // 2. Publish ISR-owned hardware, then let the alarms fire
    critical_section::with(|cs| {
        GAME_ALARM.borrow_ref_mut(cs).replace(hw.game_alarm);
        SAMPLER.borrow_ref_mut(cs).replace(hw.sampler);
    });
    hardware::enable_interrupts();

    // 3. Game state
    let timer = hw.timer;
    let mut axis = AnalogAxis::new(hw.axis);
    let mut scheduler = RenderScheduler::new(hw.lcd, hw.proximity);
    let mut game = GameSession::new(timer.get_counter().ticks());
    let mut menu_dirty = true;

    // 4. Main Application Loop
    loop {
        if game.phase().is_menu() {
            if let Some(byte) = usb_module::read_byte() {
                // key timing is the only entropy on the board
                game.reseed(timer.get_counter().ticks());
                game.console_byte(&SHARED, byte);
                menu_dirty = true;
            }
        } else {
            let x = axis.sample();
            game.step(&SHARED, x);
        }

        if let Some(prompt) = game.take_prompt() {
            usb_module::write(prompt.as_bytes());
        }

        if !game.phase().is_menu() || menu_dirty {
            menu_dirty = false;
            if let Err(err) = scheduler.render(&game, SHARED.proximity_duty()) {
                warn!("render failed: {}", Debug2Format(&err));
            }
        }

        game.wait_for_reset(&SHARED, |game| {
            cortex_m::asm::wfi();
            if let Err(err) = scheduler.render(game, SHARED.proximity_duty()) {
                warn!("render failed: {}", Debug2Format(&err));
            }
        });
    }
}

// --- Interrupt Handlers ---

#[allow(non_snake_case)]
#[interrupt]
fn TIMER0_IRQ_0() {
    critical_section::with(|cs| {
        if let Some(alarm) = GAME_ALARM.borrow_ref_mut(cs).as_mut() {
            alarm.rearm();
        }
    });
    SHARED.on_game_tick();
}

#[allow(non_snake_case)]
#[interrupt]
fn TIMER0_IRQ_1() {
    critical_section::with(|cs| {
        if let Some(sampler) = SAMPLER.borrow_ref_mut(cs).as_mut() {
            sampler.rearm();
            let fire = sampler.fire.is_high().unwrap_or(false);
            let kill = sampler.kill.is_high().unwrap_or(false);

            match SHARED.on_input_sample(fire, kill) {
                LampCommand::On => {
                    let _ = sampler.lamp.set_high();
                }
                LampCommand::Off => {
                    let _ = sampler.lamp.set_low();
                }
                LampCommand::Hold => {}
            }
        }
    });
}

// --- Metadata ---

#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [hal::binary_info::EntryAddr; 4] = [
    hal::binary_info::rp_cargo_bin_name!(),
    hal::binary_info::rp_cargo_version!(),
    hal::binary_info::rp_program_description!(c"Turret Defense"),
    hal::binary_info::rp_program_build_attribute!()
];
