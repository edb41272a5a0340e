//! USB Module
//!
//! USB CDC serial used as the setup console. The `USBCTRL_IRQ` handler keeps
//! the device enumerated and queues every received byte for the menu.

use core::cell::RefCell;
use critical_section::Mutex;
use heapless::Deque;
use usb_device::prelude::*;
use usbd_serial::SerialPort;

use rp235x_hal as hal;
use hal::pac;

use rp235x_hal::pac::interrupt;

type UsbBusType = hal::usb::UsbBus;

const RX_QUEUE_LEN: usize = 32;

static USB_DEVICE: Mutex<RefCell<Option<UsbDevice<UsbBusType>>>> = Mutex::new(RefCell::new(None));
static USB_SERIAL: Mutex<RefCell<Option<SerialPort<UsbBusType>>>> = Mutex::new(RefCell::new(None));
static RX_QUEUE: Mutex<RefCell<Deque<u8, RX_QUEUE_LEN>>> = Mutex::new(RefCell::new(Deque::new()));

/// Initialize USB Serial and enable the USB interrupt.
pub fn init(
    usb_periph: pac::USB,
    usb_dpram: pac::USB_DPRAM,
    usb_clock: hal::clocks::UsbClock,
    resets: &mut pac::RESETS,
) {
    let usb_bus = hal::usb::UsbBus::new(
        usb_periph,
        usb_dpram,
        usb_clock,
        true,
        resets,
    );

    static mut USB_BUS: Option<usb_device::bus::UsbBusAllocator<hal::usb::UsbBus>> = None;

    // Safety: called once from init, before the USB interrupt is unmasked.
    let bus_allocator = unsafe {
        let bus_ptr = core::ptr::addr_of_mut!(USB_BUS);
        *bus_ptr = Some(usb_device::bus::UsbBusAllocator::new(usb_bus));
        (*bus_ptr).as_ref().unwrap()
    };

    let serial = SerialPort::new(bus_allocator);
    let usb_dev = UsbDeviceBuilder::new(bus_allocator, UsbVidPid(0x16c0, 0x27dd))
        .strings(&[StringDescriptors::default()
            .manufacturer("Raspberry Pi")
            .product("Turret Defense Console")
            .serial_number("TURRET01")])
        .unwrap()
        .device_class(usbd_serial::USB_CLASS_CDC)
        .build();

    critical_section::with(|cs| {
        USB_DEVICE.borrow_ref_mut(cs).replace(usb_dev);
        USB_SERIAL.borrow_ref_mut(cs).replace(serial);
    });

    unsafe {
        cortex_m::peripheral::NVIC::unmask(pac::Interrupt::USBCTRL_IRQ);
    }
}

/// Write data to the USB Serial port. Bytes the host is not ready for are
/// dropped.
pub fn write(data: &[u8]) {
    critical_section::with(|cs| {
        let mut serial = USB_SERIAL.borrow_ref_mut(cs);
        if let Some(serial) = serial.as_mut() {
            let _ = serial.write(data);
        }
    });
}

/// Oldest byte received from the host, if any.
pub fn read_byte() -> Option<u8> {
    critical_section::with(|cs| RX_QUEUE.borrow_ref_mut(cs).pop_front())
}

#[allow(non_snake_case)]
#[interrupt]
fn USBCTRL_IRQ() {
    critical_section::with(|cs| {
        let mut dev = USB_DEVICE.borrow_ref_mut(cs);
        let mut serial = USB_SERIAL.borrow_ref_mut(cs);

        if let (Some(dev), Some(serial)) = (dev.as_mut(), serial.as_mut()) {
            if dev.poll(&mut [serial]) {
                let mut buf = [0u8; 64];
                if let Ok(count) = serial.read(&mut buf) {
                    let mut queue = RX_QUEUE.borrow_ref_mut(cs);
                    for &byte in &buf[..count] {
                        // full queue: the menu only needs the first few bytes
                        if queue.push_back(byte).is_err() {
                            break;
                        }
                    }
                }
            }
        }
    });
}
