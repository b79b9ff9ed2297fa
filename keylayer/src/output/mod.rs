//! Output sinks for resolved keys.
//!
//! Each transport implements [`HidSink`] and announces the [`Connections`]
//! bit it serves. The [`Dispatcher`] owns one sink per transport and routes
//! every call to the sinks selected by a connection mask, so the concrete
//! sink types are known at compile time.

mod ble;
mod report;
mod usb;

use bitflags::bitflags;

use crate::key::Key;

pub use ble::{BleFrame, BleSink, BLE_QUEUE_DEPTH};
pub use report::KeyboardState;
pub use usb::UsbSink;

bitflags! {
    /// Transports a report should go out on.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Connections: u8 {
        const USB = 0x01;
        const BLE = 0x02;
    }
}

/// One HID transport.
///
/// Press and release calls only update the pending report; nothing goes out
/// until the matching `*_send_report`.
#[cfg_attr(test, mockall::automock)]
pub trait HidSink {
    /// The connection bit this sink serves.
    fn connection(&self) -> Connections;

    /// Whether the transport can currently deliver reports.
    fn is_connected(&self) -> bool;

    fn key_press(&mut self, key_code: u8);
    fn key_release(&mut self, key_code: u8);
    fn key_release_all(&mut self);
    fn key_send_report(&mut self);

    fn consumer_press(&mut self, usage: u8);
    fn consumer_release(&mut self, usage: u8);
    fn consumer_release_all(&mut self);
    fn consumer_send_report(&mut self);

    fn system_press(&mut self, usage: u8);
    fn system_release(&mut self);
    fn system_send_report(&mut self);

    fn is_modifier_active(&self, key_code: u8) -> bool;
}

fn routed<S: HidSink>(sink: &mut S, mask: Connections) -> Option<&mut S> {
    (mask.intersects(sink.connection()) && sink.is_connected()).then_some(sink)
}

macro_rules! dispatch {
    ($self:ident, $mask:expr, $method:ident($($arg:expr),*)) => {{
        if let Some(sink) = routed(&mut $self.usb, $mask) {
            sink.$method($($arg),*);
        }
        if let Some(sink) = routed(&mut $self.ble, $mask) {
            sink.$method($($arg),*);
        }
    }};
}

/// Routes resolved keys to the USB and BLE sinks.
pub struct Dispatcher<U, B> {
    usb: U,
    ble: B,
}

impl<U: HidSink, B: HidSink> Dispatcher<U, B> {
    pub fn new(usb: U, ble: B) -> Self {
        Self { usb, ble }
    }

    pub fn usb(&self) -> &U {
        &self.usb
    }

    pub fn usb_mut(&mut self) -> &mut U {
        &mut self.usb
    }

    pub fn ble(&self) -> &B {
        &self.ble
    }

    pub fn ble_mut(&mut self) -> &mut B {
        &mut self.ble
    }

    /// Bits of every sink that is currently connected.
    pub fn query_connections(&self) -> Connections {
        let mut connections = Connections::empty();
        if self.usb.is_connected() {
            connections |= self.usb.connection();
        }
        if self.ble.is_connected() {
            connections |= self.ble.connection();
        }
        connections
    }

    pub fn press(&mut self, mask: Connections, key: Key) {
        if key.is_consumer() {
            dispatch!(self, mask, consumer_press(key.key_code));
        } else if key.is_system_control() {
            dispatch!(self, mask, system_press(key.key_code));
        } else if key.is_keyboard() {
            for modifier in key.held_modifiers() {
                dispatch!(self, mask, key_press(modifier as u8));
            }
            if key.key_code != 0 {
                dispatch!(self, mask, key_press(key.key_code));
            }
        }
    }

    pub fn release(&mut self, mask: Connections, key: Key) {
        if key.is_consumer() {
            dispatch!(self, mask, consumer_release(key.key_code));
        } else if key.is_system_control() {
            dispatch!(self, mask, system_release());
        } else if key.is_keyboard() {
            for modifier in key.held_modifiers() {
                dispatch!(self, mask, key_release(modifier as u8));
            }
            if key.key_code != 0 {
                dispatch!(self, mask, key_release(key.key_code));
            }
        }
    }

    /// Clear every report. Keys still held are pressed again before the
    /// next send.
    pub fn release_all(&mut self, mask: Connections) {
        dispatch!(self, mask, key_release_all());
        dispatch!(self, mask, consumer_release_all());
        dispatch!(self, mask, system_release());
    }

    pub fn send_report(&mut self, mask: Connections) {
        dispatch!(self, mask, key_send_report());
        dispatch!(self, mask, consumer_send_report());
        dispatch!(self, mask, system_send_report());
    }

    /// Whether any selected, connected sink has the modifier held.
    pub fn is_modifier_active(&self, mask: Connections, key: Key) -> bool {
        modifier_held(&self.usb, mask, key.key_code) || modifier_held(&self.ble, mask, key.key_code)
    }
}

fn modifier_held<S: HidSink>(sink: &S, mask: Connections, key_code: u8) -> bool {
    mask.intersects(sink.connection()) && sink.is_connected() && sink.is_modifier_active(key_code)
}
