//! Bank-addressed monochrome display.
//!
//! The panel is written in vertical 8-pixel columns; a "bank" is one such
//! row of columns. Sprites and text both go through [`BankDisplay`].

use core::convert::Infallible;

use embedded_graphics::{
    Pixel,
    mono_font::{MonoTextStyle, ascii::FONT_4X6},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use thiserror::Error;

use crate::config::{SCREEN_BANKS, SCREEN_WIDTH};
use crate::sprite::Sprite;

/// Column-at-a-time access to the panel.
pub trait BankDisplay {
    type Error: core::fmt::Debug;

    fn set_address(&mut self, x: u8, bank: u8) -> Result<(), Self::Error>;

    /// Writes one column and advances the address.
    fn write_column(&mut self, column: u8) -> Result<(), Self::Error>;

    fn draw_sprite(&mut self, sprite: &Sprite, x: u8, bank: u8) -> Result<(), Self::Error> {
        self.set_address(x, bank)?;
        for &column in sprite.columns() {
            self.write_column(column)?;
        }
        Ok(())
    }

    fn erase_sprite(&mut self, x: u8, bank: u8) -> Result<(), Self::Error> {
        self.set_address(x, bank)?;
        for _ in 0..8 {
            self.write_column(0)?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        for bank in 0..SCREEN_BANKS {
            self.set_address(0, bank)?;
            for _ in 0..SCREEN_WIDTH {
                self.write_column(0)?;
            }
        }
        Ok(())
    }
}

/// One full-width bank of text, rendered off-screen.
pub struct TextRow {
    columns: [u8; SCREEN_WIDTH as usize],
}

impl TextRow {
    pub const fn new() -> Self {
        Self { columns: [0; SCREEN_WIDTH as usize] }
    }

    /// Prints `text` with its left edge at `x`. Overflow is clipped.
    pub fn print(&mut self, x: u8, text: &str) -> &mut Self {
        let style = MonoTextStyle::new(&FONT_4X6, BinaryColor::On);
        let _ = Text::with_baseline(text, Point::new(i32::from(x), 1), style, Baseline::Top).draw(self);
        self
    }

    pub fn columns(&self) -> &[u8] {
        &self.columns
    }

    /// Replaces a whole bank with this row.
    pub fn write_to<D: BankDisplay>(&self, display: &mut D, bank: u8) -> Result<(), D::Error> {
        display.set_address(0, bank)?;
        for &column in &self.columns {
            display.write_column(column)?;
        }
        Ok(())
    }
}

impl Default for TextRow {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for TextRow {
    fn size(&self) -> Size {
        Size::new(u32::from(SCREEN_WIDTH), 8)
    }
}

impl DrawTarget for TextRow {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (usize::try_from(point.x), u8::try_from(point.y)) else {
                continue;
            };
            let Some(column) = self.columns.get_mut(x) else { continue };
            if y >= 8 {
                continue;
            }
            if color.is_on() {
                *column |= 1 << y;
            } else {
                *column &= !(1 << y);
            }
        }
        Ok(())
    }
}

// PCD8544 instruction set
const FUNCTION_SET: u8 = 0x20;
const EXTENDED: u8 = 0x01;
const SET_VOP: u8 = 0x80;
const TEMP_COEFF: u8 = 0x04;
const BIAS: u8 = 0x10;
const DISPLAY_NORMAL: u8 = 0x0C;
const SET_X: u8 = 0x80;
const SET_Y: u8 = 0x40;

pub const DEFAULT_CONTRAST: u8 = 0x3F;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LcdError {
    #[error("spi transfer to the lcd failed")]
    Spi,
    #[error("lcd control pin write failed")]
    Pin,
}

/// PCD8544 (Nokia 5110) panel on an SPI bus with data/command and chip
/// enable lines.
pub struct Pcd8544<SPI, DC, CE> {
    spi: SPI,
    dc: DC,
    ce: CE,
}

impl<SPI, DC, CE> Pcd8544<SPI, DC, CE>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
    CE: OutputPin,
{
    pub fn new(spi: SPI, dc: DC, ce: CE) -> Self {
        Self { spi, dc, ce }
    }

    /// Resets the controller and programs contrast, bias and normal mode.
    pub fn init<RST: OutputPin, D: DelayNs>(&mut self, rst: &mut RST, delay: &mut D, contrast: u8) -> Result<(), LcdError> {
        self.ce.set_high().map_err(|_| LcdError::Pin)?;
        rst.set_low().map_err(|_| LcdError::Pin)?;
        delay.delay_us(10);
        rst.set_high().map_err(|_| LcdError::Pin)?;

        self.command(&[
            FUNCTION_SET | EXTENDED,
            SET_VOP | (contrast & 0x7F),
            TEMP_COEFF,
            BIAS | 3,
            FUNCTION_SET,
            DISPLAY_NORMAL,
            SET_X,
            SET_Y,
        ])
    }

    pub fn release(self) -> (SPI, DC, CE) {
        (self.spi, self.dc, self.ce)
    }

    fn command(&mut self, bytes: &[u8]) -> Result<(), LcdError> {
        self.dc.set_low().map_err(|_| LcdError::Pin)?;
        self.transfer(bytes)
    }

    fn data(&mut self, bytes: &[u8]) -> Result<(), LcdError> {
        self.dc.set_high().map_err(|_| LcdError::Pin)?;
        self.transfer(bytes)
    }

    fn transfer(&mut self, bytes: &[u8]) -> Result<(), LcdError> {
        self.ce.set_low().map_err(|_| LcdError::Pin)?;
        let written = self.spi.write(bytes).and_then(|_| self.spi.flush());
        self.ce.set_high().map_err(|_| LcdError::Pin)?;
        written.map_err(|_| LcdError::Spi)
    }
}

impl<SPI, DC, CE> BankDisplay for Pcd8544<SPI, DC, CE>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
    CE: OutputPin,
{
    type Error = LcdError;

    fn set_address(&mut self, x: u8, bank: u8) -> Result<(), LcdError> {
        // horizontal addressing, so columns run left to right within a bank
        self.command(&[FUNCTION_SET, SET_X | (x % SCREEN_WIDTH), SET_Y | (bank % SCREEN_BANKS)])
    }

    fn write_column(&mut self, column: u8) -> Result<(), LcdError> {
        self.data(&[column])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    enum Wire {
        Command(u8),
        Data(u8),
    }

    #[derive(Default)]
    struct Bus {
        dc_high: bool,
        log: Vec<Wire>,
    }

    #[derive(Clone)]
    struct FakeSpi(Rc<RefCell<Bus>>);

    struct DcPin(Rc<RefCell<Bus>>);

    struct NullPin;

    impl embedded_hal::spi::ErrorType for FakeSpi {
        type Error = Infallible;
    }

    impl SpiBus<u8> for FakeSpi {
        fn read(&mut self, _words: &mut [u8]) -> Result<(), Infallible> {
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
            let mut bus = self.0.borrow_mut();
            let data = bus.dc_high;
            for &w in words {
                bus.log.push(if data { Wire::Data(w) } else { Wire::Command(w) });
            }
            Ok(())
        }

        fn transfer(&mut self, _read: &mut [u8], write: &[u8]) -> Result<(), Infallible> {
            self.write(write)
        }

        fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Infallible> {
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    impl embedded_hal::digital::ErrorType for DcPin {
        type Error = Infallible;
    }

    impl OutputPin for DcPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().dc_high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().dc_high = true;
            Ok(())
        }
    }

    impl embedded_hal::digital::ErrorType for NullPin {
        type Error = Infallible;
    }

    impl OutputPin for NullPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    fn panel() -> (Pcd8544<FakeSpi, DcPin, NullPin>, Rc<RefCell<Bus>>) {
        let bus = Rc::new(RefCell::new(Bus::default()));
        (Pcd8544::new(FakeSpi(bus.clone()), DcPin(bus.clone()), NullPin), bus)
    }

    #[test]
    fn sprite_is_addressed_then_streamed() {
        let (mut lcd, bus) = panel();
        lcd.draw_sprite(&crate::sprite::TURRET, 30, 3).unwrap();
        let log = &bus.borrow().log;
        assert_eq!(
            &log[..3],
            &[Wire::Command(0x20), Wire::Command(0x80 | 30), Wire::Command(0x40 | 3)]
        );
        let data: Vec<u8> = log[3..]
            .iter()
            .map(|w| match w {
                Wire::Data(d) => *d,
                Wire::Command(c) => panic!("unexpected command {c:#x}"),
            })
            .collect();
        assert_eq!(data.as_slice(), crate::sprite::TURRET.columns());
    }

    #[test]
    fn clear_writes_every_column() {
        let (mut lcd, bus) = panel();
        lcd.clear().unwrap();
        let zeros = bus.borrow().log.iter().filter(|w| **w == Wire::Data(0)).count();
        assert_eq!(zeros, SCREEN_WIDTH as usize * SCREEN_BANKS as usize);
    }

    #[test]
    fn text_lands_where_printed() {
        let mut row = TextRow::new();
        row.print(72, "7");
        let columns = row.columns();
        assert!(columns[..72].iter().all(|&c| c == 0));
        assert!(columns[72..76].iter().any(|&c| c != 0));
        assert!(columns.iter().all(|&c| c & 0x80 == 0));
    }

    #[test]
    fn text_past_the_edge_is_clipped() {
        let mut row = TextRow::new();
        row.print(80, "abcdef");
        assert!(row.columns()[..80].iter().all(|&c| c == 0));
    }
}
