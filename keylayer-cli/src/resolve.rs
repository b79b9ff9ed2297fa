//! Text rendering of the composite keymap for a set of active layers.

use std::fmt::{self, Write as _};

use anyhow::{bail, Result};
use keylayer::ergodox::{self, COLS, NUM_LAYERS, ROWS};
use keylayer::Layers;
use tracing::debug;

const CELL: usize = 6;

pub type ErgodoxLayers = Layers<&'static ergodox::Keymap, ROWS, COLS>;

/// Layers with `default_layer` as the floor and `active` switched on above it.
pub fn build(default_layer: u8, active: &[u8]) -> Result<ErgodoxLayers> {
    let mut layers = Layers::new(&ergodox::KEYMAP);
    for &layer in std::iter::once(&default_layer).chain(active) {
        if !layers.is_valid_layer(layer) {
            bail!("layer {layer} does not exist (keymap has {NUM_LAYERS} layers)");
        }
    }
    layers.set_default_layer(default_layer);
    for &layer in active {
        layers.activate(layer);
    }
    debug!(
        bits = layers.layer_state(),
        top = layers.top_active_layer(),
        "resolved layer set"
    );
    Ok(layers)
}

/// One line per row, each key label padded to a fixed cell, with a gap
/// between the halves. With `sources` set, a second grid shows which layer
/// supplies every position.
pub fn render(layers: &ErgodoxLayers, sources: bool) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "active: {:#0width$b}  top: {}  default: {}",
        layers.layer_state(),
        layers.top_active_layer(),
        layers.default_layer(),
        width = NUM_LAYERS + 2,
    )?;

    grid(&mut out, |row, col| {
        layers
            .resolve(row, col)
            .map(|key| key.to_string())
            .unwrap_or_default()
    })?;

    if sources {
        out.push('\n');
        grid(&mut out, |row, col| {
            layers
                .active_layer(row, col)
                .map(|layer| layer.to_string())
                .unwrap_or_default()
        })?;
    }
    Ok(out)
}

fn grid(out: &mut String, cell: impl Fn(usize, usize) -> String) -> fmt::Result {
    for row in 0..ROWS {
        let mut line = String::new();
        for col in 0..COLS {
            if col == ergodox::COLS_PER_HALF {
                line.push_str("  ");
            }
            let mut label = cell(row, col);
            if label.is_empty() {
                label.push('.');
            }
            write!(line, "{label:<CELL$}")?;
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    Ok(())
}
