//! Per-key switch state for one scan cycle.

use bitflags::bitflags;

bitflags! {
    /// Current and previous pressed bits of one keyswitch.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct KeyState: u8 {
        const IS_PRESSED = 0x01;
        const WAS_PRESSED = 0x02;
    }
}

impl KeyState {
    pub const TOGGLED_ON: KeyState = KeyState::IS_PRESSED;
    pub const HELD: KeyState = KeyState::IS_PRESSED.union(KeyState::WAS_PRESSED);
    pub const TOGGLED_OFF: KeyState = KeyState::WAS_PRESSED;

    /// Build the state from the previous and the current debounced reading.
    pub const fn from_scan(was_pressed: bool, is_pressed: bool) -> Self {
        let mut bits = 0;
        if is_pressed {
            bits |= KeyState::IS_PRESSED.bits();
        }
        if was_pressed {
            bits |= KeyState::WAS_PRESSED.bits();
        }
        KeyState::from_bits_retain(bits)
    }

    /// Pressed this cycle, toggled on or held.
    pub const fn is_pressed(self) -> bool {
        self.contains(KeyState::IS_PRESSED)
    }

    pub const fn was_pressed(self) -> bool {
        self.contains(KeyState::WAS_PRESSED)
    }

    pub const fn toggled_on(self) -> bool {
        self.is_pressed() && !self.was_pressed()
    }

    pub const fn toggled_off(self) -> bool {
        self.was_pressed() && !self.is_pressed()
    }

    /// Released and already released last cycle.
    pub const fn is_idle(self) -> bool {
        self.is_empty()
    }
}
