//! Hardware Abstraction Module
//!
//! Brings up the RP2350 peripherals the game needs: clocks, the two timer
//! alarms, the switch and lamp GPIOs, the potentiometer ADC channel, the
//! PCD8544 on SPI0, the proximity PWM and the USB serial console.

use embedded_hal::digital::OutputPin;
use rp235x_hal as hal;
use hal::clocks::Clock;
use hal::fugit::{MicrosDurationU32, RateExtU32};
use hal::gpio::bank0::{Gpio14, Gpio15, Gpio16, Gpio17, Gpio18, Gpio19, Gpio20};
use hal::gpio::{FunctionSio, FunctionSpi, Pin, PullDown, SioInput, SioOutput};
use hal::pac;
use hal::timer::{Alarm, Alarm0, Alarm1, CopyableTimer0};

use turret_defense::axis::AxisSource;
use turret_defense::config::{GAME_TICK_US, INPUT_SAMPLE_US};
use turret_defense::lcd::{DEFAULT_CONTRAST, Pcd8544};

use crate::usb_module;

/// External crystal frequency used by the Raspberry Pi Pico 2.
const XTAL_FREQ_HZ: u32 = 12_000_000u32;

type OutputPinOf<I> = Pin<I, FunctionSio<SioOutput>, PullDown>;
type SwitchPin<I> = Pin<I, FunctionSio<SioInput>, PullDown>;

pub type Timer = hal::Timer<CopyableTimer0>;
pub type LcdSpi = hal::spi::Spi<
    hal::spi::Enabled,
    pac::SPI0,
    (Pin<Gpio19, FunctionSpi, PullDown>, Pin<Gpio18, FunctionSpi, PullDown>),
    8,
>;
pub type Lcd = Pcd8544<LcdSpi, OutputPinOf<Gpio20>, OutputPinOf<Gpio17>>;
pub type ProximityPwm = hal::pwm::Channel<hal::pwm::Slice<hal::pwm::Pwm1, hal::pwm::FreeRunning>, hal::pwm::A>;

/// Game-tick alarm, owned by `TIMER0_IRQ_0`.
pub struct GameAlarm {
    alarm: Alarm0<CopyableTimer0>,
}

impl GameAlarm {
    /// Acknowledges the interrupt and arms the next period.
    pub fn rearm(&mut self) {
        self.alarm.clear_interrupt();
        let _ = self.alarm.schedule(MicrosDurationU32::micros(GAME_TICK_US));
    }
}

/// Switch sampling alarm and the pins it reads, owned by `TIMER0_IRQ_1`.
pub struct Sampler {
    alarm: Alarm1<CopyableTimer0>,
    pub fire: SwitchPin<Gpio14>,
    pub kill: SwitchPin<Gpio15>,
    pub lamp: OutputPinOf<Gpio16>,
}

impl Sampler {
    pub fn rearm(&mut self) {
        self.alarm.clear_interrupt();
        let _ = self.alarm.schedule(MicrosDurationU32::micros(INPUT_SAMPLE_US));
    }
}

/// Potentiometer on GPIO26 (ADC channel 0), converted on demand.
pub struct PotAxis {
    _adc: hal::Adc,
    _pin: hal::adc::AdcPin<Pin<hal::gpio::bank0::Gpio26, hal::gpio::FunctionNull, PullDown>>,
}

impl AxisSource for PotAxis {
    fn read_raw(&mut self) -> u16 {
        unsafe {
            let adc_regs = &(*pac::ADC::ptr());
            adc_regs.cs().modify(|_, w| w.ainsel().bits(0).start_once().set_bit());
            while adc_regs.cs().read().ready().bit_is_clear() {}
            // 12-bit result, scaled to the 10-bit range the axis expects
            adc_regs.result().read().result().bits() >> 2
        }
    }
}

pub struct Hardware {
    pub timer: Timer,
    pub axis: PotAxis,
    pub lcd: Lcd,
    pub proximity: ProximityPwm,
    pub game_alarm: GameAlarm,
    pub sampler: Sampler,
}

/// Initializes the entire hardware stack.
///
/// Alarms are scheduled but their NVIC lines stay masked; call
/// [`enable_interrupts`] once the ISR-owned parts have been published.
pub fn init() -> Hardware {
    let mut pac = pac::Peripherals::take().unwrap();
    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);

    let clocks = hal::clocks::init_clocks_and_plls(
        XTAL_FREQ_HZ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .unwrap();

    let mut timer = hal::Timer::new_timer0(pac.TIMER0, &mut pac.RESETS, &clocks);

    let sio = hal::Sio::new(pac.SIO);
    let pins = hal::gpio::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    // Switches and lamp
    let fire = pins.gpio14.into_pull_down_input();
    let kill = pins.gpio15.into_pull_down_input();
    let mut lamp = pins.gpio16.into_push_pull_output();
    let _ = lamp.set_low();

    // Potentiometer: one-shot conversions, no FIFO, no interrupt
    let adc = hal::Adc::new(pac.ADC, &mut pac.RESETS);
    let adc_pin = hal::adc::AdcPin::new(pins.gpio26).unwrap();
    unsafe {
        let adc_regs = &(*pac::ADC::ptr());
        adc_regs.fcs().modify(|_, w| w.en().clear_bit());
        adc_regs.inte().modify(|_, w| w.fifo().clear_bit());
        adc_regs.cs().modify(|_, w| w.ainsel().bits(0).en().set_bit().start_many().clear_bit());
    }

    // LCD on SPI0
    let sclk = pins.gpio18.into_function::<FunctionSpi>();
    let mosi = pins.gpio19.into_function::<FunctionSpi>();
    let spi = hal::spi::Spi::<_, _, _, 8>::new(pac.SPI0, (mosi, sclk)).init(
        &mut pac.RESETS,
        clocks.peripheral_clock.freq(),
        4.MHz(),
        embedded_hal::spi::MODE_0,
    );
    let mut rst = pins.gpio21.into_push_pull_output();
    let mut lcd = Pcd8544::new(spi, pins.gpio20.into_push_pull_output(), pins.gpio17.into_push_pull_output());
    lcd.init(&mut rst, &mut timer, DEFAULT_CONTRAST).unwrap();

    // Proximity indicator on GPIO2
    let pwm_slices = hal::pwm::Slices::new(pac.PWM, &mut pac.RESETS);
    let mut pwm = pwm_slices.pwm1;
    pwm.set_ph_correct();
    pwm.enable();
    let mut proximity = pwm.channel_a;
    proximity.output_to(pins.gpio2);

    // Game tick and switch sampling
    let mut game_alarm = timer.alarm_0().unwrap();
    game_alarm.schedule(MicrosDurationU32::micros(GAME_TICK_US)).unwrap();
    game_alarm.enable_interrupt();

    let mut sample_alarm = timer.alarm_1().unwrap();
    sample_alarm.schedule(MicrosDurationU32::micros(INPUT_SAMPLE_US)).unwrap();
    sample_alarm.enable_interrupt();

    usb_module::init(
        pac.USB,
        pac.USB_DPRAM,
        clocks.usb_clock,
        &mut pac.RESETS,
    );

    Hardware {
        timer,
        axis: PotAxis { _adc: adc, _pin: adc_pin },
        lcd,
        proximity,
        game_alarm: GameAlarm { alarm: game_alarm },
        sampler: Sampler { alarm: sample_alarm, fire, kill, lamp },
    }
}

/// Unmasks both alarm interrupts.
pub fn enable_interrupts() {
    unsafe {
        cortex_m::peripheral::NVIC::unmask(pac::Interrupt::TIMER0_IRQ_0);
        cortex_m::peripheral::NVIC::unmask(pac::Interrupt::TIMER0_IRQ_1);
    }
}
