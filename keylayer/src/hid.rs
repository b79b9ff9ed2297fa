//! USB HID usage codes.
//!
//! See USB HID Usage Tables, Section 10 (Keyboard/Keypad Page 0x07),
//! Section 15 (Consumer Page 0x0C) and Section 4 (Generic Desktop system
//! controls).

macro_rules! keycodes {
    ($($(#[$meta:meta])* $name:ident = $code:literal => $label:literal,)*) => {
        /// Keyboard/Keypad page usages.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum Keycode {
            $($(#[$meta])* $name = $code,)*
        }

        impl Keycode {
            /// Look up the usage for a raw keyboard-page code.
            pub const fn from_u8(code: u8) -> Option<Keycode> {
                match code {
                    $($code => Some(Keycode::$name),)*
                    _ => None,
                }
            }

            /// Short label for layout visualizations.
            pub const fn label(self) -> &'static str {
                match self {
                    $(Keycode::$name => $label,)*
                }
            }
        }
    };
}

keycodes! {
    A = 0x04 => "A",
    B = 0x05 => "B",
    C = 0x06 => "C",
    D = 0x07 => "D",
    E = 0x08 => "E",
    F = 0x09 => "F",
    G = 0x0A => "G",
    H = 0x0B => "H",
    I = 0x0C => "I",
    J = 0x0D => "J",
    K = 0x0E => "K",
    L = 0x0F => "L",
    M = 0x10 => "M",
    N = 0x11 => "N",
    O = 0x12 => "O",
    P = 0x13 => "P",
    Q = 0x14 => "Q",
    R = 0x15 => "R",
    S = 0x16 => "S",
    T = 0x17 => "T",
    U = 0x18 => "U",
    V = 0x19 => "V",
    W = 0x1A => "W",
    X = 0x1B => "X",
    Y = 0x1C => "Y",
    Z = 0x1D => "Z",

    N1 = 0x1E => "1",
    N2 = 0x1F => "2",
    N3 = 0x20 => "3",
    N4 = 0x21 => "4",
    N5 = 0x22 => "5",
    N6 = 0x23 => "6",
    N7 = 0x24 => "7",
    N8 = 0x25 => "8",
    N9 = 0x26 => "9",
    N0 = 0x27 => "0",

    Enter = 0x28 => "Ent",
    Escape = 0x29 => "Esc",
    Backspace = 0x2A => "Bksp",
    Tab = 0x2B => "Tab",
    Space = 0x2C => "Spc",
    Minus = 0x2D => "-",
    Equal = 0x2E => "=",
    LBracket = 0x2F => "[",
    RBracket = 0x30 => "]",
    Backslash = 0x31 => "\\",
    Semicolon = 0x33 => ";",
    Quote = 0x34 => "'",
    Grave = 0x35 => "`",
    Comma = 0x36 => ",",
    Dot = 0x37 => ".",
    Slash = 0x38 => "/",
    CapsLock = 0x39 => "Caps",

    F1 = 0x3A => "F1",
    F2 = 0x3B => "F2",
    F3 = 0x3C => "F3",
    F4 = 0x3D => "F4",
    F5 = 0x3E => "F5",
    F6 = 0x3F => "F6",
    F7 = 0x40 => "F7",
    F8 = 0x41 => "F8",
    F9 = 0x42 => "F9",
    F10 = 0x43 => "F10",
    F11 = 0x44 => "F11",
    F12 = 0x45 => "F12",

    PrintScreen = 0x46 => "PScr",
    ScrollLock = 0x47 => "ScrL",
    Pause = 0x48 => "Paus",
    Insert = 0x49 => "Ins",
    Home = 0x4A => "Home",
    PageUp = 0x4B => "PgUp",
    Delete = 0x4C => "Del",
    End = 0x4D => "End",
    PageDown = 0x4E => "PgDn",
    Right = 0x4F => "\u{2192}",
    Left = 0x50 => "\u{2190}",
    Down = 0x51 => "\u{2193}",
    Up = 0x52 => "\u{2191}",

    NumLock = 0x53 => "NumL",
    KpSlash = 0x54 => "/",
    KpAsterisk = 0x55 => "*",
    KpMinus = 0x56 => "-",
    KpPlus = 0x57 => "+",
    KpEnter = 0x58 => "Ent",
    Kp1 = 0x59 => "1",
    Kp2 = 0x5A => "2",
    Kp3 = 0x5B => "3",
    Kp4 = 0x5C => "4",
    Kp5 = 0x5D => "5",
    Kp6 = 0x5E => "6",
    Kp7 = 0x5F => "7",
    Kp8 = 0x60 => "8",
    Kp9 = 0x61 => "9",
    Kp0 = 0x62 => "0",
    KpDot = 0x63 => ".",
    /// Non-US \ and | (ISO key left of Z)
    NonUsBackslash = 0x64 => "<>",
    Application = 0x65 => "Menu",

    // Modifiers live in the report's modifier byte, not the keycode array
    LCtrl = 0xE0 => "Ctrl",
    LShift = 0xE1 => "Shft",
    LAlt = 0xE2 => "Alt",
    LGui = 0xE3 => "Gui",
    RCtrl = 0xE4 => "RCtl",
    RShift = 0xE5 => "RSft",
    RAlt = 0xE6 => "RAlt",
    RGui = 0xE7 => "RGui",
}

impl Keycode {
    /// Check if this keycode is a modifier (LCtrl..RGui).
    pub const fn is_modifier(self) -> bool {
        is_modifier_code(self as u8)
    }
}

/// Check a raw keyboard-page code for the modifier range.
pub const fn is_modifier_code(code: u8) -> bool {
    code >= Keycode::LCtrl as u8 && code <= Keycode::RGui as u8
}

/// Modifier byte bit for a raw code (bit 0 = LCtrl, bit 7 = RGui), or 0.
pub const fn modifier_bit(code: u8) -> u8 {
    if is_modifier_code(code) {
        1 << (code - Keycode::LCtrl as u8)
    } else {
        0
    }
}

/// Consumer page usages that fit in a key's 8-bit code.
pub mod consumer {
    pub const NEXT_TRACK: u8 = 0xB5;
    pub const PREV_TRACK: u8 = 0xB6;
    pub const STOP: u8 = 0xB7;
    pub const PLAY_PAUSE: u8 = 0xCD;
    pub const MUTE: u8 = 0xE2;
    pub const VOLUME_UP: u8 = 0xE9;
    pub const VOLUME_DOWN: u8 = 0xEA;

    pub(crate) const fn label(usage: u8) -> Option<&'static str> {
        match usage {
            NEXT_TRACK => Some("Next"),
            PREV_TRACK => Some("Prev"),
            STOP => Some("Stop"),
            PLAY_PAUSE => Some("Play"),
            MUTE => Some("Mute"),
            VOLUME_UP => Some("Vol+"),
            VOLUME_DOWN => Some("Vol-"),
            _ => None,
        }
    }
}

/// Generic Desktop system control usages.
pub mod system {
    pub const POWER_DOWN: u8 = 0x81;
    pub const SLEEP: u8 = 0x82;
    pub const WAKE_UP: u8 = 0x83;

    pub(crate) const fn label(usage: u8) -> Option<&'static str> {
        match usage {
            POWER_DOWN => Some("Pwr"),
            SLEEP => Some("Slp"),
            WAKE_UP => Some("Wake"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_u8_finds_assigned_usages() {
        assert_eq!(Keycode::from_u8(0x04), Some(Keycode::A));
        assert_eq!(Keycode::from_u8(0xE5), Some(Keycode::RShift));
        assert_eq!(Keycode::from_u8(0x32), None);
        assert_eq!(Keycode::from_u8(0x00), None);
    }

    #[test]
    fn modifier_bits_follow_report_layout() {
        assert!(Keycode::LCtrl.is_modifier());
        assert!(!Keycode::Z.is_modifier());
        assert_eq!(modifier_bit(Keycode::LCtrl as u8), 0x01);
        assert_eq!(modifier_bit(Keycode::LShift as u8), 0x02);
        assert_eq!(modifier_bit(Keycode::RGui as u8), 0x80);
        assert_eq!(modifier_bit(Keycode::Space as u8), 0);
    }
}
