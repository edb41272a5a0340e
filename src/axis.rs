//! Potentiometer axis to turret position.

use crate::config::{AXIS_DIVISOR, SCREEN_WIDTH, SPRITE_WIDTH};

/// Blocking 10-bit analog conversion.
pub trait AxisSource {
    fn read_raw(&mut self) -> u16;
}

/// Maps a raw reading to a screen x.
///
/// Wraps rather than clamps, so readings near full scale come back around
/// toward the left edge.
pub fn to_screen_x(raw: u16) -> u8 {
    ((raw / AXIS_DIVISOR) % u16::from(SCREEN_WIDTH - SPRITE_WIDTH)) as u8
}

/// The turret is not drawn at the wrap boundary.
pub fn is_hidden(x: u8) -> bool {
    x == 0
}

pub struct AnalogAxis<S> {
    source: S,
}

impl<S: AxisSource> AnalogAxis<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Samples the axis and returns the turret x.
    pub fn sample(&mut self) -> u8 {
        to_screen_x(self.source.read_raw())
    }
}
