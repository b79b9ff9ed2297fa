//! Key definitions as stored in a keymap.
//!
//! A [`Key`] is two bytes: a `flags` byte saying what kind of key it is and
//! a `key_code` byte whose meaning depends on the flags. Plain keyboard keys
//! carry a HID usage plus optional "modifier held" bits; synthetic keys
//! cover consumer (media) usages, system controls and layer switching.

use core::fmt;

use crate::hid::{self, Keycode};

/// Plain keyboard-page key.
pub const KEY_FLAGS: u8 = 0x00;
pub const CTRL_HELD: u8 = 0x01;
pub const LALT_HELD: u8 = 0x02;
pub const RALT_HELD: u8 = 0x04;
pub const SHIFT_HELD: u8 = 0x08;
pub const GUI_HELD: u8 = 0x10;
pub const SYNTHETIC: u8 = 0x40;
pub const RESERVED: u8 = 0x80;

// Synthetic sub-types, only meaningful together with SYNTHETIC.
pub const IS_CONSUMER: u8 = 0x02;
pub const IS_SYSCTL: u8 = 0x04;
pub const SWITCH_TO_KEYMAP: u8 = 0x08;

/// Flags carried by every layer-control key.
pub const LAYER_KEY_FLAGS: u8 = SYNTHETIC | SWITCH_TO_KEYMAP;

/// Layer key codes at or above this value are momentary shifts.
pub const LAYER_SHIFT_OFFSET: u8 = 42;
/// Momentary target meaning "one layer down from the top".
pub const KEYMAP_PREVIOUS: u8 = 33;
/// Momentary target meaning "one layer up from the top".
pub const KEYMAP_NEXT: u8 = 34;

/// Modifier usages implied by the `*_HELD` flags, in report bit order.
const HELD_MODIFIERS: [(u8, Keycode); 5] = [
    (CTRL_HELD, Keycode::LCtrl),
    (SHIFT_HELD, Keycode::LShift),
    (LALT_HELD, Keycode::LAlt),
    (GUI_HELD, Keycode::LGui),
    (RALT_HELD, Keycode::RAlt),
];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Key {
    pub flags: u8,
    pub key_code: u8,
}

/// What a layer-control key asks for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LayerAction {
    /// Toggle the layer on press; it stays on after release.
    Lock(u8),
    /// Keep the layer on while the key is held.
    Momentary(u8),
    /// Activate the layer above the top while held.
    Next,
    /// Deactivate the top layer while held.
    Previous,
}

impl Key {
    pub const NO_KEY: Key = Key::new(KEY_FLAGS, 0);
    /// Falls through to the next lower active layer.
    pub const TRANSPARENT: Key = Key::from_raw(0xFFFF);
    pub const NEXT_LAYER: Key = Key::new(LAYER_KEY_FLAGS, LAYER_SHIFT_OFFSET + KEYMAP_NEXT);
    pub const PREVIOUS_LAYER: Key =
        Key::new(LAYER_KEY_FLAGS, LAYER_SHIFT_OFFSET + KEYMAP_PREVIOUS);

    pub const fn new(flags: u8, key_code: u8) -> Self {
        Self { flags, key_code }
    }

    pub const fn from_raw(raw: u16) -> Self {
        Self::new((raw >> 8) as u8, raw as u8)
    }

    pub const fn raw(self) -> u16 {
        (self.flags as u16) << 8 | self.key_code as u16
    }

    pub const fn keyboard(code: Keycode) -> Self {
        Self::new(KEY_FLAGS, code as u8)
    }

    pub const fn consumer(usage: u8) -> Self {
        Self::new(SYNTHETIC | IS_CONSUMER, usage)
    }

    pub const fn system(usage: u8) -> Self {
        Self::new(SYNTHETIC | IS_SYSCTL, usage)
    }

    /// Toggle `layer` on press.
    pub const fn lock_layer(layer: u8) -> Self {
        Self::new(LAYER_KEY_FLAGS, layer)
    }

    /// Hold `layer` active while the key is held.
    pub const fn shift_to_layer(layer: u8) -> Self {
        Self::new(LAYER_KEY_FLAGS, layer.saturating_add(LAYER_SHIFT_OFFSET))
    }

    const fn with_held(self, flag: u8) -> Self {
        if self.is_keyboard() {
            Self::new(self.flags | flag, self.key_code)
        } else {
            self
        }
    }

    pub const fn with_ctrl(self) -> Self {
        self.with_held(CTRL_HELD)
    }

    pub const fn with_shift(self) -> Self {
        self.with_held(SHIFT_HELD)
    }

    pub const fn with_lalt(self) -> Self {
        self.with_held(LALT_HELD)
    }

    pub const fn with_ralt(self) -> Self {
        self.with_held(RALT_HELD)
    }

    pub const fn with_gui(self) -> Self {
        self.with_held(GUI_HELD)
    }

    pub const fn is_transparent(self) -> bool {
        self.raw() == Key::TRANSPARENT.raw()
    }

    pub const fn is_no_key(self) -> bool {
        self.raw() == Key::NO_KEY.raw()
    }

    /// Keyboard-page key, possibly with modifier flags.
    pub const fn is_keyboard(self) -> bool {
        self.flags & (SYNTHETIC | RESERVED) == 0
    }

    pub const fn is_consumer(self) -> bool {
        self.flags == SYNTHETIC | IS_CONSUMER
    }

    pub const fn is_system_control(self) -> bool {
        self.flags == SYNTHETIC | IS_SYSCTL
    }

    pub const fn is_layer_key(self) -> bool {
        self.flags == LAYER_KEY_FLAGS
    }

    /// A keyboard key whose usage is itself a modifier (LCtrl..RGui).
    pub const fn is_modifier(self) -> bool {
        self.is_keyboard() && hid::is_modifier_code(self.key_code)
    }

    /// Modifier usages implied by this key's `*_HELD` flags.
    pub fn held_modifiers(self) -> impl Iterator<Item = Keycode> {
        let flags = if self.is_keyboard() { self.flags } else { 0 };
        HELD_MODIFIERS
            .into_iter()
            .filter(move |(flag, _)| flags & flag != 0)
            .map(|(_, code)| code)
    }

    pub const fn layer_action(self) -> Option<LayerAction> {
        if !self.is_layer_key() {
            return None;
        }
        if self.key_code < LAYER_SHIFT_OFFSET {
            return Some(LayerAction::Lock(self.key_code));
        }
        Some(match self.key_code - LAYER_SHIFT_OFFSET {
            KEYMAP_NEXT => LayerAction::Next,
            KEYMAP_PREVIOUS => LayerAction::Previous,
            layer => LayerAction::Momentary(layer),
        })
    }
}

impl From<Keycode> for Key {
    fn from(code: Keycode) -> Self {
        Key::keyboard(code)
    }
}

impl fmt::Display for Key {
    /// Short label: empty for `NO_KEY`/`TRANSPARENT`, `S-A` for shifted A,
    /// `Mo1`/`Lk2`/`Ly+`/`Ly-` for layer keys.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_transparent() || self.is_no_key() {
            return Ok(());
        }
        if let Some(action) = self.layer_action() {
            return match action {
                LayerAction::Lock(layer) => write!(f, "Lk{layer}"),
                LayerAction::Momentary(layer) => write!(f, "Mo{layer}"),
                LayerAction::Next => f.write_str("Ly+"),
                LayerAction::Previous => f.write_str("Ly-"),
            };
        }
        if self.is_consumer() {
            return match hid::consumer::label(self.key_code) {
                Some(label) => f.write_str(label),
                None => write!(f, "C{:02X}", self.key_code),
            };
        }
        if self.is_system_control() {
            return match hid::system::label(self.key_code) {
                Some(label) => f.write_str(label),
                None => write!(f, "S{:02X}", self.key_code),
            };
        }
        if !self.is_keyboard() {
            return write!(f, "{:04X}", self.raw());
        }
        for (flag, prefix) in [
            (CTRL_HELD, "C-"),
            (SHIFT_HELD, "S-"),
            (LALT_HELD, "A-"),
            (RALT_HELD, "AG-"),
            (GUI_HELD, "G-"),
        ] {
            if self.flags & flag != 0 {
                f.write_str(prefix)?;
            }
        }
        match Keycode::from_u8(self.key_code) {
            Some(code) => f.write_str(code.label()),
            None => write!(f, "{:02X}", self.key_code),
        }
    }
}
