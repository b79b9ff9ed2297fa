//! Read-only keymap tables.

use crate::key::Key;

/// A static `[layer][row][col]` table of key definitions.
///
/// Lookups outside the table return [`Key::TRANSPARENT`] so callers never
/// index past the end of the data.
pub trait KeymapSource {
    /// Number of defined layers, or 0 when unknown.
    fn layer_count(&self) -> usize;

    fn lookup(&self, layer: u8, row: usize, col: usize) -> Key;
}

impl<const LAYERS: usize, const ROWS: usize, const COLS: usize> KeymapSource
    for [[[Key; COLS]; ROWS]; LAYERS]
{
    fn layer_count(&self) -> usize {
        LAYERS
    }

    fn lookup(&self, layer: u8, row: usize, col: usize) -> Key {
        self.get(layer as usize)
            .and_then(|layer| layer.get(row))
            .and_then(|row| row.get(col))
            .copied()
            .unwrap_or(Key::TRANSPARENT)
    }
}

impl<T: KeymapSource + ?Sized> KeymapSource for &T {
    fn layer_count(&self) -> usize {
        (**self).layer_count()
    }

    fn lookup(&self, layer: u8, row: usize, col: usize) -> Key {
        (**self).lookup(layer, row, col)
    }
}

/// Keymap whose layer count is not configured.
///
/// Any layer index below [`crate::MAX_LAYERS`] may then be activated;
/// layers missing from the table read as transparent.
#[derive(Clone, Copy, Debug)]
pub struct Uncounted<K>(pub K);

impl<K: KeymapSource> KeymapSource for Uncounted<K> {
    fn layer_count(&self) -> usize {
        0
    }

    fn lookup(&self, layer: u8, row: usize, col: usize) -> Key {
        self.0.lookup(layer, row, col)
    }
}
