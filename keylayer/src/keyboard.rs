//! Scan-cycle driver.
//!
//! [`Keyboard`] turns one debounced matrix reading per cycle into keyswitch
//! events, lets the layer logic consume layer keys and forwards the rest to
//! the output sinks. The keyboard report is rebuilt from scratch every
//! cycle, so a key that stays down is pressed again each time.

use crate::key::Key;
use crate::keymap::KeymapSource;
use crate::keyswitch::KeyState;
use crate::layers::Layers;
use crate::output::{Connections, Dispatcher, HidSink};

pub struct Keyboard<K, U, B, const ROWS: usize, const COLS: usize> {
    layers: Layers<K, ROWS, COLS>,
    output: Dispatcher<U, B>,
    /// Debounced matrix from the previous cycle.
    previous: [[bool; COLS]; ROWS],
    preferred: Connections,
}

impl<K, U, B, const ROWS: usize, const COLS: usize> Keyboard<K, U, B, ROWS, COLS>
where
    K: KeymapSource,
    U: HidSink,
    B: HidSink,
{
    pub fn new(keymap: K, usb: U, ble: B) -> Self {
        Self {
            layers: Layers::new(keymap),
            output: Dispatcher::new(usb, ble),
            previous: [[false; COLS]; ROWS],
            preferred: Connections::all(),
        }
    }

    /// Only send on the given transports, even when others are connected.
    pub fn with_connections(mut self, preferred: Connections) -> Self {
        self.preferred = preferred;
        self
    }

    pub fn layers(&self) -> &Layers<K, ROWS, COLS> {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut Layers<K, ROWS, COLS> {
        &mut self.layers
    }

    pub fn output(&self) -> &Dispatcher<U, B> {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut Dispatcher<U, B> {
        &mut self.output
    }

    /// Transports reports go out on right now.
    pub fn connections(&self) -> Connections {
        self.output.query_connections() & self.preferred
    }

    /// Run one cycle over `matrix`, where `true` means pressed.
    pub fn scan_cycle(&mut self, matrix: &[[bool; COLS]; ROWS]) {
        let mask = self.connections();
        self.output.release_all(mask);

        for (row, pressed) in matrix.iter().enumerate() {
            for (col, &is_pressed) in pressed.iter().enumerate() {
                let state = KeyState::from_scan(self.previous[row][col], is_pressed);
                if !state.is_idle() {
                    self.process(mask, row, col, state);
                }
            }
        }

        self.output.send_report(mask);
        self.previous = *matrix;
    }

    /// Handle one keyswitch event outside of [`scan_cycle`](Self::scan_cycle),
    /// for callers that scan the matrix themselves. Reports are not sent.
    pub fn handle_keyswitch_event(&mut self, row: usize, col: usize, state: KeyState) {
        let mask = self.connections();
        self.process(mask, row, col, state);
    }

    fn process(&mut self, mask: Connections, row: usize, col: usize, state: KeyState) {
        let key = if state.toggled_on() || state.toggled_off() {
            self.layers.update_live_composite_keymap(row, col)
        } else {
            self.layers.live_key(row, col)
        };
        let Some(key) = key else {
            return;
        };

        let key = self.layers.handle_keyswitch_event(key, state);
        if key == Key::NO_KEY || key.is_transparent() {
            return;
        }

        if state.is_pressed() {
            self.output.press(mask, key);
        } else if state.toggled_off() {
            self.output.release(mask, key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{BleSink, UsbSink};
    use crate::Keycode;

    const A: Key = Key::keyboard(Keycode::A);
    const B: Key = Key::keyboard(Keycode::B);
    const MO1: Key = Key::shift_to_layer(1);
    const ___: Key = Key::TRANSPARENT;

    static MAP: [[[Key; 3]; 1]; 2] = [[[A, MO1, MO1]], [[B, ___, ___]]];

    type TestKeyboard = Keyboard<&'static [[[Key; 3]; 1]; 2], UsbSink, BleSink, 1, 3>;

    fn keyboard() -> TestKeyboard {
        let mut usb = UsbSink::new();
        usb.set_configured(true);
        Keyboard::new(&MAP, usb, BleSink::new())
    }

    fn sent_keys(keyboard: &mut TestKeyboard) -> Option<[u8; 6]> {
        keyboard
            .output_mut()
            .usb_mut()
            .take_keyboard_report()
            .map(|report| report.keycodes)
    }

    #[test]
    fn connections_follow_sinks_and_preference() {
        let keyboard = keyboard();
        assert_eq!(keyboard.connections(), Connections::USB);

        let keyboard = keyboard.with_connections(Connections::BLE);
        assert_eq!(keyboard.connections(), Connections::empty());
    }

    #[test]
    fn held_key_keeps_its_press_time_meaning() {
        let mut keyboard = keyboard();

        keyboard.scan_cycle(&[[true, false, false]]);
        assert_eq!(sent_keys(&mut keyboard), Some([Keycode::A as u8, 0, 0, 0, 0, 0]));

        // layer 1 comes on while A is still down
        keyboard.scan_cycle(&[[true, true, false]]);
        assert!(keyboard.layers().is_active(1));
        assert_eq!(sent_keys(&mut keyboard), None);

        keyboard.scan_cycle(&[[false, true, false]]);
        assert_eq!(sent_keys(&mut keyboard), Some([0; 6]));

        keyboard.scan_cycle(&[[true, true, false]]);
        assert_eq!(sent_keys(&mut keyboard), Some([Keycode::B as u8, 0, 0, 0, 0, 0]));
    }

    #[test]
    fn layer_keys_never_reach_the_report() {
        let mut keyboard = keyboard();
        keyboard.scan_cycle(&[[false, true, false]]);
        assert!(keyboard.layers().is_active(1));
        assert_eq!(sent_keys(&mut keyboard), None);
    }

    #[test]
    fn two_momentary_keys_share_a_layer() {
        let mut keyboard = keyboard();
        keyboard.scan_cycle(&[[false, true, true]]);
        assert!(keyboard.layers().is_active(1));

        // the second key's held event restores the layer in the same cycle
        keyboard.scan_cycle(&[[false, false, true]]);
        assert!(keyboard.layers().is_active(1));

        keyboard.scan_cycle(&[[false, false, false]]);
        assert!(!keyboard.layers().is_active(1));
    }

    #[test]
    fn explicit_events_bypass_the_scan() {
        let mut keyboard = keyboard();
        keyboard.handle_keyswitch_event(0, 1, KeyState::TOGGLED_ON);
        assert!(keyboard.layers().is_active(1));
        keyboard.handle_keyswitch_event(0, 1, KeyState::TOGGLED_OFF);
        assert!(!keyboard.layers().is_active(1));

        // positions off the grid are ignored
        keyboard.handle_keyswitch_event(4, 9, KeyState::TOGGLED_ON);
    }
}
