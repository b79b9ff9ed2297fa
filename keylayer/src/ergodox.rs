//! ErgoDox keymap.
//!
//! Layout follows the ErgoDox physical matrix: rows 0-5, columns 0-6 are the
//! left half and columns 7-13 the right half.
//!
//! - Layer 0: QWERTY
//! - Layer 1: Fn, held with either inner-column key on row 3. F-keys, arrows on
//!   the right home row, shifted symbols, media and layer stepping.
//! - Layer 2: numpad on the right half, toggled with the lock key at (4, 3).

use crate::hid::consumer;
use crate::hid::system;
use crate::hid::Keycode::{self, *};
use crate::key::Key;

pub const ROWS: usize = 6;
pub const COLS_PER_HALF: usize = 7;
pub const COLS: usize = COLS_PER_HALF * 2;
pub const NUM_LAYERS: usize = 3;

pub type Keymap = [[[Key; COLS]; ROWS]; NUM_LAYERS];

pub const LAYER_NAMES: [&str; NUM_LAYERS] = ["QWERTY", "Fn", "Numpad"];

const fn k(code: Keycode) -> Key {
    Key::keyboard(code)
}

/// Unused matrix position.
const XXX: Key = Key::NO_KEY;
const ___: Key = Key::TRANSPARENT;

const MO1: Key = Key::shift_to_layer(1);
const LK2: Key = Key::lock_layer(2);
const LYP: Key = Key::PREVIOUS_LAYER;
const LYN: Key = Key::NEXT_LAYER;

const PREV: Key = Key::consumer(consumer::PREV_TRACK);
const PLAY: Key = Key::consumer(consumer::PLAY_PAUSE);
const NEXT: Key = Key::consumer(consumer::NEXT_TRACK);
const MUTE: Key = Key::consumer(consumer::MUTE);
const VOLD: Key = Key::consumer(consumer::VOLUME_DOWN);
const VOLU: Key = Key::consumer(consumer::VOLUME_UP);
const SLEP: Key = Key::system(system::SLEEP);

const EXLM: Key = k(N1).with_shift();
const AT: Key = k(N2).with_shift();
const HASH: Key = k(N3).with_shift();
const DLR: Key = k(N4).with_shift();
const PERC: Key = k(N5).with_shift();

pub static KEYMAP: Keymap = [
    // Layer 0: QWERTY
    [
        [k(Grave), k(N1), k(N2), k(N3), k(N4), k(N5), k(Escape),
         k(Minus), k(N6), k(N7), k(N8), k(N9), k(N0), k(Equal)],
        [k(Tab), k(Q), k(W), k(E), k(R), k(T), k(PageUp),
         k(LBracket), k(Y), k(U), k(I), k(O), k(P), k(RBracket)],
        [k(LCtrl), k(A), k(S), k(D), k(F), k(G), XXX,
         XXX, k(H), k(J), k(K), k(L), k(Semicolon), k(Quote)],
        [k(LShift), k(Z), k(X), k(C), k(V), k(B), MO1,
         MO1, k(N), k(M), k(Comma), k(Dot), k(Slash), k(RShift)],
        [k(LGui), k(LAlt), k(Application), LK2, k(Backslash), XXX, XXX,
         XXX, XXX, k(Left), k(Down), k(Up), k(Right), k(RGui)],
        // thumb clusters
        [k(Home), k(End), k(Space), k(Enter), k(CapsLock), k(Delete), XXX,
         XXX, k(PageDown), k(Insert), k(Backspace), k(RAlt), k(RCtrl), k(Space)],
    ],
    // Layer 1: Fn
    [
        [___, k(F1), k(F2), k(F3), k(F4), k(F5), k(F11),
         k(F12), k(F6), k(F7), k(F8), k(F9), k(F10), ___],
        [___, ___, ___, ___, ___, ___, ___,
         k(ScrollLock), ___, ___, ___, ___, k(PrintScreen), k(Pause)],
        [___, EXLM, AT, HASH, DLR, PERC, ___,
         ___, k(Left), k(Down), k(Up), k(Right), ___, ___],
        [___, PREV, PLAY, NEXT, MUTE, VOLD, ___,
         ___, VOLU, ___, ___, ___, ___, ___],
        [LYP, ___, ___, ___, ___, ___, ___,
         ___, ___, ___, ___, ___, ___, LYN],
        [SLEP, ___, ___, ___, ___, ___, ___,
         ___, ___, ___, ___, ___, ___, ___],
    ],
    // Layer 2: numpad
    [
        [___, ___, ___, ___, ___, ___, ___,
         ___, ___, k(NumLock), k(KpSlash), k(KpAsterisk), k(KpMinus), ___],
        [___, ___, ___, ___, ___, ___, ___,
         ___, ___, k(Kp7), k(Kp8), k(Kp9), k(KpPlus), ___],
        [___, ___, ___, ___, ___, ___, ___,
         ___, ___, k(Kp4), k(Kp5), k(Kp6), k(KpPlus), ___],
        [___, ___, ___, ___, ___, ___, ___,
         ___, ___, k(Kp1), k(Kp2), k(Kp3), k(KpEnter), ___],
        [___, ___, ___, ___, ___, ___, ___,
         ___, ___, k(Kp0), k(KpDot), ___, k(KpEnter), ___],
        [___, ___, ___, ___, ___, ___, ___,
         ___, ___, ___, ___, ___, ___, ___],
    ],
];
