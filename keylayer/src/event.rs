//! Interpretation of layer-control keys.

use tracing::trace;

use crate::key::{Key, LayerAction};
use crate::keymap::KeymapSource;
use crate::keyswitch::KeyState;
use crate::layers::Layers;

impl<K: KeymapSource, const ROWS: usize, const COLS: usize> Layers<K, ROWS, COLS> {
    /// Apply a layer-control key and consume it.
    ///
    /// Any other key is returned unchanged for the output path; layer keys
    /// return [`Key::NO_KEY`].
    ///
    /// Momentary keys re-activate their layer on every cycle they are held,
    /// not only when they toggle on. With two momentary keys for the same
    /// layer held, releasing one switches the layer off, and the other turns
    /// it back on as soon as its held event is processed.
    pub fn handle_keyswitch_event(&mut self, key: Key, state: KeyState) -> Key {
        let Some(action) = key.layer_action() else {
            return key;
        };
        trace!(?action, ?state, "layer key event");

        match action {
            LayerAction::Next => {
                if state.toggled_on() {
                    self.next();
                } else if state.toggled_off() {
                    self.previous();
                }
            }
            LayerAction::Previous => {
                if state.toggled_on() {
                    self.previous();
                } else if state.toggled_off() {
                    self.next();
                }
            }
            LayerAction::Momentary(layer) => {
                if state.is_pressed() {
                    if !self.is_active(layer) {
                        self.activate(layer);
                    }
                } else if state.toggled_off() {
                    self.deactivate(layer);
                }
            }
            LayerAction::Lock(layer) => {
                // a lock key for layer 0 only ever activates
                if state.toggled_on() {
                    if self.is_active(layer) && layer != 0 {
                        self.deactivate(layer);
                    } else {
                        self.activate(layer);
                    }
                }
            }
        }

        Key::NO_KEY
    }
}
