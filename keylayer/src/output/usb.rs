//! USB HID sink.
//!
//! Builds the boot-compatible keyboard report plus the consumer and system
//! control reports. Changed reports are parked until the USB task picks them
//! up with the `take_*` methods.

use usbd_hid::descriptor::{KeyboardReport, MediaKeyboardReport, SystemControlReport};

use super::report::KeyboardState;
use super::{Connections, HidSink};

pub struct UsbSink {
    configured: bool,
    keyboard: KeyboardState,
    last_keyboard: KeyboardState,
    pending_keyboard: Option<KeyboardReport>,
    consumer: u8,
    last_consumer: u8,
    pending_consumer: Option<MediaKeyboardReport>,
    system: u8,
    last_system: u8,
    pending_system: Option<SystemControlReport>,
}

impl Default for UsbSink {
    fn default() -> Self {
        Self::new()
    }
}

impl UsbSink {
    pub const fn new() -> Self {
        Self {
            configured: false,
            keyboard: KeyboardState::empty(),
            last_keyboard: KeyboardState::empty(),
            pending_keyboard: None,
            consumer: 0,
            last_consumer: 0,
            pending_consumer: None,
            system: 0,
            last_system: 0,
            pending_system: None,
        }
    }

    /// Called by the USB stack when the host sets or clears the
    /// configuration.
    pub fn set_configured(&mut self, configured: bool) {
        self.configured = configured;
        if !configured {
            self.keyboard.clear();
            self.last_keyboard.clear();
            self.consumer = 0;
            self.last_consumer = 0;
            self.system = 0;
            self.last_system = 0;
        }
    }

    pub fn take_keyboard_report(&mut self) -> Option<KeyboardReport> {
        self.pending_keyboard.take()
    }

    pub fn take_consumer_report(&mut self) -> Option<MediaKeyboardReport> {
        self.pending_consumer.take()
    }

    pub fn take_system_report(&mut self) -> Option<SystemControlReport> {
        self.pending_system.take()
    }
}

impl HidSink for UsbSink {
    fn connection(&self) -> Connections {
        Connections::USB
    }

    fn is_connected(&self) -> bool {
        self.configured
    }

    fn key_press(&mut self, key_code: u8) {
        self.keyboard.press(key_code);
    }

    fn key_release(&mut self, key_code: u8) {
        self.keyboard.release(key_code);
    }

    fn key_release_all(&mut self) {
        self.keyboard.clear();
    }

    fn key_send_report(&mut self) {
        if self.keyboard == self.last_keyboard {
            return;
        }
        self.pending_keyboard = Some(KeyboardReport {
            modifier: self.keyboard.modifiers,
            reserved: 0,
            leds: 0,
            keycodes: self.keyboard.keys,
        });
        self.last_keyboard = self.keyboard;
    }

    fn consumer_press(&mut self, usage: u8) {
        self.consumer = usage;
    }

    fn consumer_release(&mut self, usage: u8) {
        if self.consumer == usage {
            self.consumer = 0;
        }
    }

    fn consumer_release_all(&mut self) {
        self.consumer = 0;
    }

    fn consumer_send_report(&mut self) {
        if self.consumer == self.last_consumer {
            return;
        }
        self.pending_consumer = Some(MediaKeyboardReport {
            usage_id: u16::from(self.consumer),
        });
        self.last_consumer = self.consumer;
    }

    fn system_press(&mut self, usage: u8) {
        self.system = usage;
    }

    fn system_release(&mut self) {
        self.system = 0;
    }

    fn system_send_report(&mut self) {
        if self.system == self.last_system {
            return;
        }
        self.pending_system = Some(SystemControlReport {
            usage_id: self.system,
        });
        self.last_system = self.system;
    }

    fn is_modifier_active(&self, key_code: u8) -> bool {
        self.keyboard.is_modifier_active(key_code)
    }
}
