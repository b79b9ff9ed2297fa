//! Layer resolution and keyswitch handling for keyboard firmware.
//!
//! A keymap is a static `[layer][row][col]` table of [`Key`]s. [`Layers`]
//! tracks which layers are active, caches which layer supplies every matrix
//! position, and interprets the layer-control keys that switch layers.
//! [`Keyboard`] drives one scan cycle at a time and hands the resolved keys
//! to the per-transport [`HidSink`]s behind a [`Dispatcher`].
//!
//! This crate is `no_std` so the same code runs in firmware and in the host
//! CLI. All state lives in fixed-size arrays.

#![cfg_attr(not(test), no_std)]

pub mod ergodox;
mod event;
pub mod hid;
pub mod key;
pub mod keyboard;
pub mod keymap;
pub mod keyswitch;
pub mod layers;
pub mod output;
pub mod state;

pub use hid::Keycode;
pub use key::{Key, LayerAction};
pub use keyboard::Keyboard;
pub use keymap::{KeymapSource, Uncounted};
pub use keyswitch::KeyState;
pub use layers::Layers;
pub use output::{BleSink, Connections, Dispatcher, HidSink, UsbSink};
pub use state::{LayerState, MAX_LAYERS};
