//! Compile-time configuration and the per-session difficulty.

/// Display width in pixels.
pub const SCREEN_WIDTH: u8 = 84;
/// Display height in 8-pixel banks.
pub const SCREEN_BANKS: u8 = 6;
/// Sprites are 8 columns of 8 rows.
pub const SPRITE_WIDTH: u8 = 8;

/// Number of enemy slots in a session.
pub const POOL_CAPACITY: usize = 50;
/// Kills needed to win. Kept equal to the pool capacity.
pub const WIN_SCORE: u8 = POOL_CAPACITY as u8;

/// An enemy lower than this has escaped.
pub const ESCAPE_Y: u16 = 40;
/// An enemy lower than this (and not escaped) drives the proximity output.
pub const PROXIMITY_Y: u16 = 10;

/// Raw axis units per screen pixel.
pub const AXIS_DIVISOR: u16 = 13;
/// Enemies spawn in `[0, SCREEN_WIDTH - SPAWN_MARGIN)`.
pub const SPAWN_MARGIN: u8 = 10;

/// Hit window when the player is right of the enemy.
pub const HIT_REACH_LEFT: u8 = 4;
/// Hit window when the player is at or left of the enemy.
pub const HIT_REACH_RIGHT: u8 = 5;

/// Game tick period (16-bit overflow at clk/256 on a 16 MHz part).
pub const GAME_TICK_US: u32 = 1_048_576;
/// Switch sampling period (8-bit overflow at clk/256 on a 16 MHz part).
pub const INPUT_SAMPLE_US: u32 = 4_096;

/// Number of bytes in a username.
pub const USERNAME_LEN: usize = 4;

/// Enemy cadence and speed, chosen once in the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Difficulty {
    Novice,
    Pro,
    Master,
}

impl Difficulty {
    /// Maps a console selector byte. Anything unrecognised is `Pro`.
    pub fn from_selector(byte: u8) -> Self {
        match byte {
            b'1' => Difficulty::Novice,
            b'3' => Difficulty::Master,
            _ => Difficulty::Pro,
        }
    }

    /// Ticks between spawns.
    pub const fn spawn_interval(self) -> u8 {
        match self {
            Difficulty::Novice => 10,
            Difficulty::Pro => 3,
            Difficulty::Master => 1,
        }
    }

    /// Pixels fallen per tick.
    pub const fn fall_speed(self) -> u8 {
        match self {
            Difficulty::Novice => 3,
            Difficulty::Pro => 4,
            Difficulty::Master => 5,
        }
    }

    /// Short label for the HUD.
    pub const fn label(self) -> &'static str {
        match self {
            Difficulty::Novice => "nov",
            Difficulty::Pro => "pro",
            Difficulty::Master => "mas",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_defaults_to_pro() {
        assert_eq!(Difficulty::from_selector(b'1'), Difficulty::Novice);
        assert_eq!(Difficulty::from_selector(b'2'), Difficulty::Pro);
        assert_eq!(Difficulty::from_selector(b'3'), Difficulty::Master);
        assert_eq!(Difficulty::from_selector(b'x'), Difficulty::Pro);
    }

    #[test]
    fn master_spawns_every_tick() {
        assert_eq!(Difficulty::Master.spawn_interval(), 1);
        assert_eq!(Difficulty::Master.fall_speed(), 5);
        assert_eq!(Difficulty::Novice.spawn_interval(), 10);
        assert_eq!(Difficulty::Novice.fall_speed(), 3);
    }
}
