//! Layer activation and per-key layer resolution.
//!
//! [`Layers`] owns the [`LayerState`] together with two per-position caches:
//!
//! - `active_layers[row][col]` is the layer index supplying each position.
//!   It is recomputed in full whenever a layer is switched on or off.
//! - `live_composite_keymap[row][col]` is the key definition at each
//!   position. It is refreshed one position at a time, when that key toggles,
//!   so a key that is held across a layer change keeps the meaning it had
//!   when it was pressed.

use tracing::{debug, trace, warn};

use crate::key::Key;
use crate::keymap::KeymapSource;
use crate::state::{LayerState, MAX_LAYERS};

pub struct Layers<K, const ROWS: usize, const COLS: usize> {
    keymap: K,
    state: LayerState,
    active_layers: [[u8; COLS]; ROWS],
    live_composite_keymap: [[Key; COLS]; ROWS],
}

impl<K: KeymapSource, const ROWS: usize, const COLS: usize> Layers<K, ROWS, COLS> {
    pub fn new(keymap: K) -> Self {
        let mut layers = Self {
            keymap,
            state: LayerState::new(),
            active_layers: [[0; COLS]; ROWS],
            live_composite_keymap: [[Key::NO_KEY; COLS]; ROWS],
        };
        layers.reset();
        layers
    }

    /// Back to the power-on state: layer 0 active and default, every cache
    /// entry resolved.
    pub fn reset(&mut self) {
        self.set_default_layer(0);
        for row in 0..ROWS {
            for col in 0..COLS {
                self.update_live_composite_keymap(row, col);
            }
        }
    }

    pub fn state(&self) -> &LayerState {
        &self.state
    }

    /// Raw active-layer bits.
    pub fn layer_state(&self) -> u32 {
        self.state.bits()
    }

    pub fn top_active_layer(&self) -> u8 {
        self.state.top_active_layer()
    }

    pub fn default_layer(&self) -> u8 {
        self.state.default_layer()
    }

    pub fn is_active(&self, layer: u8) -> bool {
        self.state.is_active(layer)
    }

    /// Whether `layer` may be activated: below the bit-set width and, when
    /// the keymap knows its layer count, below that too.
    pub fn is_valid_layer(&self, layer: u8) -> bool {
        let count = self.keymap.layer_count();
        (layer as usize) < MAX_LAYERS && (count == 0 || (layer as usize) < count)
    }

    pub fn activate(&mut self, layer: u8) {
        if !self.is_valid_layer(layer) {
            trace!(layer, "ignoring activation of undefined layer");
            return;
        }
        if !self.state.set(layer) {
            return;
        }
        debug!(
            layer,
            top = self.state.top_active_layer(),
            bits = self.state.bits(),
            "layer activated"
        );
        self.update_active_layers();
    }

    pub fn deactivate(&mut self, layer: u8) {
        if !self.state.clear(layer) {
            return;
        }
        debug!(
            layer,
            top = self.state.top_active_layer(),
            bits = self.state.bits(),
            "layer deactivated"
        );
        self.update_active_layers();
    }

    /// Switch to `layer` alone, dropping every other active layer.
    pub fn move_to(&mut self, layer: u8) {
        self.state.clear_all();
        if self.is_valid_layer(layer) {
            self.state.set(layer);
        }
        debug!(layer, bits = self.state.bits(), "moved to layer");
        self.update_active_layers();
    }

    /// Make `layer` the default: the only active layer and the floor of
    /// every resolution scan. The new floor applies to the active-layer
    /// cache as soon as this returns.
    pub fn set_default_layer(&mut self, layer: u8) {
        if !self.is_valid_layer(layer) {
            warn!(layer, "ignoring undefined default layer");
            return;
        }
        self.state.set_default_layer(layer);
        self.move_to(layer);
    }

    pub fn next(&mut self) {
        self.activate(self.state.top_active_layer().saturating_add(1));
    }

    pub fn previous(&mut self) {
        self.deactivate(self.state.top_active_layer());
    }

    /// Layer currently supplying `(row, col)`.
    pub fn active_layer(&self, row: usize, col: usize) -> Option<u8> {
        self.active_layers.get(row)?.get(col).copied()
    }

    /// Key cached for `(row, col)` when it last toggled.
    pub fn live_key(&self, row: usize, col: usize) -> Option<Key> {
        self.live_composite_keymap.get(row)?.get(col).copied()
    }

    /// Key `(row, col)` would produce if it were pressed now.
    pub fn resolve(&self, row: usize, col: usize) -> Option<Key> {
        let layer = self.active_layer(row, col)?;
        Some(self.keymap.lookup(layer, row, col))
    }

    /// Refresh the cached key at `(row, col)` from its resolved layer.
    pub fn update_live_composite_keymap(&mut self, row: usize, col: usize) -> Option<Key> {
        let key = self.resolve(row, col)?;
        self.live_composite_keymap[row][col] = key;
        Some(key)
    }

    /// For every position, the highest active layer above the default that
    /// is not transparent there, else the default layer.
    fn update_active_layers(&mut self) {
        let Self {
            keymap,
            state,
            active_layers,
            ..
        } = self;
        let default_layer = state.default_layer();
        let top = state.top_active_layer();

        for (row, entries) in active_layers.iter_mut().enumerate() {
            for (col, entry) in entries.iter_mut().enumerate() {
                *entry = (default_layer.saturating_add(1)..=top)
                    .rev()
                    .find(|&layer| {
                        state.is_active(layer) && !keymap.lookup(layer, row, col).is_transparent()
                    })
                    .unwrap_or(default_layer);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::Uncounted;
    use crate::Keycode;

    const A: Key = Key::keyboard(Keycode::A);
    const B: Key = Key::keyboard(Keycode::B);
    const C: Key = Key::keyboard(Keycode::C);
    const D: Key = Key::keyboard(Keycode::D);
    const ___: Key = Key::TRANSPARENT;

    static MAP: [[[Key; 2]; 2]; 4] = [
        [[A, A], [A, A]],
        [[B, ___], [___, ___]],
        [[C, C], [___, ___]],
        [[___, ___], [D, ___]],
    ];

    fn layers() -> Layers<&'static [[[Key; 2]; 2]; 4], 2, 2> {
        Layers::new(&MAP)
    }

    #[test]
    fn starts_on_default_layer() {
        let layers = layers();
        assert_eq!(layers.layer_state(), 1);
        assert_eq!(layers.top_active_layer(), 0);
        assert_eq!(layers.live_key(1, 1), Some(A));
        assert_eq!(layers.active_layer(0, 0), Some(0));
    }

    #[test]
    fn higher_layers_shadow_only_where_defined() {
        let mut layers = layers();
        layers.activate(1);
        layers.activate(2);
        assert_eq!(layers.resolve(0, 0), Some(C));
        assert_eq!(layers.resolve(0, 1), Some(C));
        assert_eq!(layers.resolve(1, 0), Some(A));

        layers.deactivate(2);
        assert_eq!(layers.resolve(0, 0), Some(B));
        assert_eq!(layers.resolve(0, 1), Some(A));
    }

    #[test]
    fn inactive_layers_between_are_skipped() {
        let mut layers = layers();
        layers.activate(3);
        assert_eq!(layers.top_active_layer(), 3);
        assert_eq!(layers.resolve(1, 0), Some(D));
        assert_eq!(layers.resolve(0, 0), Some(A));
        assert_eq!(layers.active_layer(0, 0), Some(0));
    }

    #[test]
    fn undefined_layers_are_ignored() {
        let mut layers = layers();
        layers.activate(4);
        layers.activate(200);
        assert_eq!(layers.layer_state(), 1);
        layers.deactivate(200);
        assert_eq!(layers.layer_state(), 1);
    }

    #[test]
    fn uncounted_keymap_accepts_any_layer_below_width() {
        let mut layers: Layers<_, 2, 2> = Layers::new(Uncounted(&MAP));
        layers.activate(9);
        assert!(layers.is_active(9));
        assert_eq!(layers.top_active_layer(), 9);
        // layer 9 has no data, so it reads as transparent everywhere
        assert_eq!(layers.resolve(0, 0), Some(A));

        layers.activate(32);
        assert!(!layers.is_active(32));
    }

    #[test]
    fn move_to_drops_other_layers() {
        let mut layers = layers();
        layers.activate(1);
        layers.activate(3);
        layers.move_to(2);
        assert_eq!(layers.layer_state(), 1 << 2);
        assert_eq!(layers.top_active_layer(), 2);
        assert_eq!(layers.resolve(0, 0), Some(C));
        // layer 2 is transparent at (1, 0) and layer 0 is still the default
        assert_eq!(layers.resolve(1, 0), Some(A));
    }

    #[test]
    fn default_layer_is_the_resolution_floor() {
        let mut layers = layers();
        layers.set_default_layer(1);
        assert_eq!(layers.default_layer(), 1);
        assert_eq!(layers.layer_state(), 1 << 1);
        assert_eq!(layers.state().top_active_layer(), 1);
        // transparent on the default layer stays on the default layer
        assert_eq!(layers.active_layer(0, 1), Some(1));
        assert_eq!(layers.resolve(0, 1), Some(___));

        layers.activate(2);
        assert_eq!(layers.resolve(0, 0), Some(C));
        layers.deactivate(2);
        assert_eq!(layers.resolve(0, 0), Some(B));
    }

    #[test]
    fn next_and_previous_walk_the_top() {
        let mut layers = layers();
        layers.next();
        assert_eq!(layers.top_active_layer(), 1);
        layers.next();
        assert_eq!(layers.top_active_layer(), 2);
        layers.previous();
        assert_eq!(layers.top_active_layer(), 1);
        assert!(!layers.is_active(2));
    }

    #[test]
    fn live_keymap_refreshes_per_position() {
        let mut layers = layers();
        layers.activate(1);
        // cache untouched until the position is refreshed
        assert_eq!(layers.live_key(0, 0), Some(A));
        assert_eq!(layers.update_live_composite_keymap(0, 0), Some(B));
        assert_eq!(layers.live_key(0, 0), Some(B));
        assert_eq!(layers.update_live_composite_keymap(2, 0), None);
        assert_eq!(layers.live_key(0, 2), None);
    }
}
