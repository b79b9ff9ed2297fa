//! 6KRO keyboard report state shared by the transports.

use tracing::trace;

use crate::hid;

/// Modifier byte plus up to 6 simultaneous keycodes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyboardState {
    pub modifiers: u8,
    pub keys: [u8; 6],
}

impl KeyboardState {
    pub const fn empty() -> Self {
        Self {
            modifiers: 0,
            keys: [0; 6],
        }
    }

    /// Modifiers go into the modifier byte; other codes take the first free
    /// slot. A seventh key is dropped.
    pub fn press(&mut self, key_code: u8) {
        if hid::is_modifier_code(key_code) {
            self.modifiers |= hid::modifier_bit(key_code);
            return;
        }
        if key_code == 0 || self.keys.contains(&key_code) {
            return;
        }
        match self.keys.iter_mut().find(|slot| **slot == 0) {
            Some(slot) => *slot = key_code,
            None => trace!(key_code, "report full, dropping key"),
        }
    }

    pub fn release(&mut self, key_code: u8) {
        if hid::is_modifier_code(key_code) {
            self.modifiers &= !hid::modifier_bit(key_code);
            return;
        }
        for slot in self.keys.iter_mut().filter(|slot| **slot == key_code) {
            *slot = 0;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::empty();
    }

    pub fn is_modifier_active(&self, key_code: u8) -> bool {
        self.modifiers & hid::modifier_bit(key_code) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Keycode;

    #[test]
    fn modifiers_use_the_modifier_byte() {
        let mut state = KeyboardState::empty();
        state.press(Keycode::LShift as u8);
        state.press(Keycode::RAlt as u8);
        assert_eq!(state.modifiers, 0x42);
        assert_eq!(state.keys, [0; 6]);
        assert!(state.is_modifier_active(Keycode::LShift as u8));

        state.release(Keycode::LShift as u8);
        assert_eq!(state.modifiers, 0x40);
    }

    #[test]
    fn seventh_key_is_dropped() {
        let mut state = KeyboardState::empty();
        for code in [Keycode::A, Keycode::B, Keycode::C, Keycode::D, Keycode::E, Keycode::F] {
            state.press(code as u8);
        }
        state.press(Keycode::G as u8);
        assert!(!state.keys.contains(&(Keycode::G as u8)));

        state.release(Keycode::C as u8);
        state.press(Keycode::G as u8);
        assert_eq!(state.keys[2], Keycode::G as u8);
    }

    #[test]
    fn duplicate_press_takes_one_slot() {
        let mut state = KeyboardState::empty();
        state.press(Keycode::A as u8);
        state.press(Keycode::A as u8);
        assert_eq!(state.keys, [Keycode::A as u8, 0, 0, 0, 0, 0]);
    }
}
