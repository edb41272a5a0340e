//! Switch debouncing and the sampling-interrupt oscillator.

const WINDOW_MASK: u8 = 0b0000_1111;

/// One physical switch, sampled at a fixed period.
///
/// The debounced state flips only after four consecutive identical raw
/// samples.
#[derive(Clone, Copy, Debug, Default)]
pub struct DebounceChannel {
    window: u8,
    pressed: bool,
    reported: bool,
}

impl DebounceChannel {
    pub const fn new() -> Self {
        Self { window: 0, pressed: false, reported: false }
    }

    /// Shifts in one raw sample and returns the debounced state.
    pub fn sample(&mut self, raw: bool) -> bool {
        self.window = ((self.window << 1) & WINDOW_MASK) | raw as u8;
        if self.window == WINDOW_MASK {
            self.pressed = true;
        } else if self.window == 0 {
            self.pressed = false;
        }
        self.pressed
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// One-shot press event.
    ///
    /// True exactly once per released→pressed transition. Releases are
    /// consumed silently.
    pub fn poll_click(&mut self) -> bool {
        match (self.pressed, self.reported) {
            (true, false) => {
                self.reported = true;
                true
            }
            (false, true) => {
                self.reported = false;
                false
            }
            _ => false,
        }
    }
}

/// Counter stepped by every input sample, read back as a PWM duty.
///
/// The bounce logic adds a second unconditional increment each step, so in
/// practice it climbs in steps of two and wraps through zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct Oscillator {
    value: u8,
    rising: bool,
}

impl Oscillator {
    pub const fn new() -> Self {
        Self { value: 0, rising: true }
    }

    pub fn step(&mut self) {
        match self.value {
            0 => {
                self.value = 1;
                self.rising = true;
            }
            255 => {
                self.value = 254;
                self.rising = false;
            }
            _ if self.rising => self.value += 1,
            _ => self.value -= 1,
        }
        self.value = self.value.wrapping_add(1);
    }

    pub fn value(&self) -> u8 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(channel: &mut DebounceChannel, samples: &[u8]) {
        for &s in samples {
            channel.sample(s != 0);
        }
    }

    #[test]
    fn flips_on_fourth_consecutive_sample() {
        let mut ch = DebounceChannel::new();
        feed(&mut ch, &[0, 0, 0, 0, 1, 1, 1]);
        assert!(!ch.is_pressed());
        assert!(ch.sample(true));
    }

    #[test]
    fn short_runs_keep_previous_state() {
        let mut ch = DebounceChannel::new();
        feed(&mut ch, &[1, 1, 1, 0, 1, 1, 0, 1, 1, 1]);
        assert!(!ch.is_pressed());
        feed(&mut ch, &[1]);
        assert!(ch.is_pressed());
        feed(&mut ch, &[0, 0, 0, 1, 0, 0]);
        assert!(ch.is_pressed());
    }

    #[test]
    fn click_fires_once_per_press() {
        let mut ch = DebounceChannel::new();
        feed(&mut ch, &[0, 0, 0, 0]);
        assert!(!ch.poll_click());
        feed(&mut ch, &[1, 1, 1, 1]);
        assert!(ch.poll_click());
        assert!(!ch.poll_click());
        assert!(!ch.poll_click());
        feed(&mut ch, &[0, 0, 0, 0]);
        assert!(!ch.poll_click());
        feed(&mut ch, &[1, 1, 1, 1]);
        assert!(ch.poll_click());
    }

    #[test]
    fn bounce_shorter_than_window_is_not_a_second_click() {
        let mut ch = DebounceChannel::new();
        feed(&mut ch, &[1, 1, 1, 1]);
        assert!(ch.poll_click());
        feed(&mut ch, &[0, 0, 1, 0, 1]);
        assert!(!ch.poll_click());
    }

    #[test]
    fn oscillator_climbs_by_two_and_wraps() {
        let mut osc = Oscillator::new();
        osc.step();
        assert_eq!(osc.value(), 2);
        for _ in 1..127 {
            osc.step();
        }
        assert_eq!(osc.value(), 254);
        osc.step();
        assert_eq!(osc.value(), 0);
        osc.step();
        assert_eq!(osc.value(), 2);
    }
}
