//! BLE HID sink.
//!
//! Reports are serialized into fixed-size frames, prefixed with their report
//! id, and queued for the radio task. When the radio falls behind the oldest
//! frame is dropped.

use heapless::Deque;
use tracing::warn;

use super::report::KeyboardState;
use super::{Connections, HidSink};

pub const BLE_QUEUE_DEPTH: usize = 16;

/// Report id followed by the report payload, zero padded.
pub type BleFrame = [u8; 9];

const KEYBOARD_REPORT_ID: u8 = 1;
const CONSUMER_REPORT_ID: u8 = 2;
const SYSTEM_REPORT_ID: u8 = 3;

pub struct BleSink {
    link_up: bool,
    keyboard: KeyboardState,
    last_keyboard: KeyboardState,
    consumer: u8,
    last_consumer: u8,
    system: u8,
    last_system: u8,
    frames: Deque<BleFrame, BLE_QUEUE_DEPTH>,
}

impl Default for BleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl BleSink {
    pub const fn new() -> Self {
        Self {
            link_up: false,
            keyboard: KeyboardState::empty(),
            last_keyboard: KeyboardState::empty(),
            consumer: 0,
            last_consumer: 0,
            system: 0,
            last_system: 0,
            frames: Deque::new(),
        }
    }

    /// Called by the radio task on connect and disconnect. Queued frames do
    /// not survive a disconnect.
    pub fn set_link_up(&mut self, up: bool) {
        self.link_up = up;
        if !up {
            self.frames.clear();
            self.keyboard.clear();
            self.last_keyboard.clear();
            self.consumer = 0;
            self.last_consumer = 0;
            self.system = 0;
            self.last_system = 0;
        }
    }

    pub fn pop_frame(&mut self) -> Option<BleFrame> {
        self.frames.pop_front()
    }

    pub fn queued(&self) -> usize {
        self.frames.len()
    }

    fn push(&mut self, frame: BleFrame) {
        if self.frames.is_full() {
            self.frames.pop_front();
            warn!("BLE queue full, dropped oldest frame");
        }
        // cannot fail: a slot was just freed if needed
        let _ = self.frames.push_back(frame);
    }
}

impl HidSink for BleSink {
    fn connection(&self) -> Connections {
        Connections::BLE
    }

    fn is_connected(&self) -> bool {
        self.link_up
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
        let mut frame = [0; 9];
        frame[0] = KEYBOARD_REPORT_ID;
        frame[1] = self.keyboard.modifiers;
        frame[3..].copy_from_slice(&self.keyboard.keys);
        self.push(frame);
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
        self.push([CONSUMER_REPORT_ID, self.consumer, 0, 0, 0, 0, 0, 0, 0]);
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
        self.push([SYSTEM_REPORT_ID, self.system, 0, 0, 0, 0, 0, 0, 0]);
        self.last_system = self.system;
    }

    fn is_modifier_active(&self, key_code: u8) -> bool {
        self.keyboard.is_modifier_active(key_code)
    }
}
