//! The active-layer bit set.

/// Width of the layer bit set.
pub const MAX_LAYERS: usize = 32;

/// Which layers are active, which one is the default, and which is on top.
///
/// Bit `i` of [`bits`](Self::bits) is set exactly when layer `i` is active.
/// The top active layer is the highest set bit, or the default layer when
/// no bit is set. Indices at or above [`MAX_LAYERS`] are never active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerState {
    bits: u32,
    default_layer: u8,
    top_active_layer: u8,
}

impl Default for LayerState {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerState {
    /// Layer 0 active and default.
    pub const fn new() -> Self {
        Self {
            bits: 1,
            default_layer: 0,
            top_active_layer: 0,
        }
    }

    pub const fn bits(&self) -> u32 {
        self.bits
    }

    pub const fn default_layer(&self) -> u8 {
        self.default_layer
    }

    pub const fn top_active_layer(&self) -> u8 {
        self.top_active_layer
    }

    pub const fn is_active(&self, layer: u8) -> bool {
        (layer as usize) < MAX_LAYERS && self.bits & (1 << layer) != 0
    }

    /// Set a layer's bit. Returns whether anything changed.
    pub(crate) fn set(&mut self, layer: u8) -> bool {
        if layer as usize >= MAX_LAYERS || self.is_active(layer) {
            return false;
        }
        let bit = 1 << layer;
        self.bits |= bit;
        if layer > self.top_active_layer || self.bits == bit {
            self.refresh_top();
        }
        true
    }

    /// Clear a layer's bit. Returns whether anything changed.
    pub(crate) fn clear(&mut self, layer: u8) -> bool {
        if !self.is_active(layer) {
            return false;
        }
        self.bits &= !(1 << layer);
        if layer == self.top_active_layer {
            self.refresh_top();
        }
        true
    }

    pub(crate) fn clear_all(&mut self) {
        self.bits = 0;
        self.refresh_top();
    }

    /// Only records the index; activation is up to the caller.
    pub(crate) fn set_default_layer(&mut self, layer: u8) {
        self.default_layer = layer;
        if self.bits == 0 {
            self.refresh_top();
        }
    }

    fn refresh_top(&mut self) {
        self.top_active_layer = match self.bits {
            0 => self.default_layer,
            bits => (u32::BITS - 1 - bits.leading_zeros()) as u8,
        };
    }
}
