//! HTML/SVG rendering of the ErgoDox keymap, one drawing per layer.
//!
//! Transparent keys are drawn dashed with the label of the key they fall
//! through to when every layer up to the drawn one is active.

use std::fmt::{self, Write as _};

use keylayer::ergodox::{self, COLS, LAYER_NAMES, NUM_LAYERS, ROWS};
use keylayer::{Key, Layers};

/// Key unit size in SVG pixels.
const UNIT: f64 = 54.0;
const GAP: f64 = 4.0;
const STEP: f64 = UNIT + GAP;
const RADIUS: f64 = 4.0;
const HALF_GAP: f64 = 60.0;
const MARGIN: f64 = 20.0;
/// Left half width in pixels; the thumb cluster ends at the same edge.
const HALF_WIDTH: f64 = 7.0 * STEP - GAP;

/// Vertical offset of each left-half column, outer to inner, in steps.
const STAGGER: [f64; 7] = [0.50, 0.25, 0.00, -0.15, 0.10, 0.40, 0.65];

/// One physical key, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cap {
    row: usize,
    col: usize,
    x: f64,
    y: f64,
    h: f64,
}

impl Cap {
    fn new(row: usize, col: usize, x_steps: f64, y_steps: f64, h_units: f64) -> Self {
        Self {
            row,
            col,
            x: x_steps * STEP,
            y: y_steps * STEP,
            h: h_units * UNIT + (h_units - 1.0) * GAP,
        }
    }

    /// The matching key on the right half.
    fn mirrored(self) -> Self {
        Self {
            col: COLS - 1 - self.col,
            x: HALF_WIDTH + HALF_GAP + (HALF_WIDTH - self.x - UNIT),
            ..self
        }
    }
}

/// Left half caps. The right half is its mirror image.
fn left_half() -> Vec<Cap> {
    let mut caps = Vec::new();

    for col in 0..6 {
        for row in 0..4 {
            caps.push(Cap::new(row, col, col as f64, row as f64 + STAGGER[col], 1.0));
        }
    }

    // inner column: no row 2, rows 1 and 3 are 1.5u tall
    let top = STAGGER[5];
    caps.push(Cap::new(0, 6, 6.0, top, 1.0));
    caps.push(Cap::new(1, 6, 6.0, top + 1.0, 1.5));
    caps.push(Cap::new(3, 6, 6.0, top + 2.5, 1.5));

    for col in 0..5 {
        caps.push(Cap::new(4, col, col as f64, 4.0 + STAGGER[col], 1.0));
    }

    // thumb cluster: (col, x, y, height) relative to its corner
    let (tx, ty) = (4.0, 5.5);
    for (col, x, y, h) in [
        (3, 0.0, 1.0, 2.0),
        (5, 1.0, 0.0, 1.0),
        (2, 1.0, 1.0, 2.0),
        (4, 2.0, 0.0, 1.0),
        (1, 2.0, 1.0, 1.0),
        (0, 2.0, 2.0, 1.0),
    ] {
        caps.push(Cap::new(5, col, tx + x, ty + y, h));
    }

    caps
}

fn caps() -> Vec<Cap> {
    let left = left_half();
    let right: Vec<Cap> = left.iter().map(|cap| cap.mirrored()).collect();
    left.into_iter().chain(right).collect()
}

fn css_class(key: Key, layer: usize) -> &'static str {
    if key.is_no_key() {
        "key unused"
    } else if key.is_transparent() && layer > 0 {
        "key transparent"
    } else if key.is_layer_key() {
        "key layer"
    } else if key.is_modifier() {
        "key modifier"
    } else if key.is_consumer() || key.is_system_control() {
        "key media"
    } else {
        "key"
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Keys shown for `layer`: its own definitions, with transparent positions
/// resolved against every layer below it.
fn shown_keys(layer: usize) -> [[Key; COLS]; ROWS] {
    let mut layers: Layers<_, ROWS, COLS> = Layers::new(&ergodox::KEYMAP);
    for below in 1..=layer {
        layers.activate(below as u8);
    }

    let mut shown = ergodox::KEYMAP[layer];
    for (row, keys) in shown.iter_mut().enumerate() {
        for (col, key) in keys.iter_mut().enumerate() {
            if key.is_transparent() {
                *key = layers.resolve(row, col).unwrap_or(Key::NO_KEY);
            }
        }
    }
    shown
}

fn render_layer(svg: &mut String, caps: &[Cap], layer: usize, y_offset: f64) -> fmt::Result {
    let shown = shown_keys(layer);

    write!(
        svg,
        r#"<g transform="translate({MARGIN}, {y_offset})"><text x="0" y="-10" class="layer-title">Layer {layer} ({})</text>"#,
        LAYER_NAMES[layer]
    )?;

    for cap in caps {
        let defined = ergodox::KEYMAP[layer][cap.row][cap.col];
        let label = shown[cap.row][cap.col].to_string();
        write!(
            svg,
            r#"<rect x="{}" y="{}" width="{UNIT}" height="{}" rx="{RADIUS}" class="{}"/>"#,
            cap.x,
            cap.y,
            cap.h,
            css_class(defined, layer),
        )?;
        if !label.is_empty() {
            let size = if label.chars().count() > 3 { " small" } else { "" };
            write!(
                svg,
                r#"<text x="{}" y="{}" class="label{size}">{}</text>"#,
                cap.x + UNIT / 2.0,
                cap.y + cap.h / 2.0 + 1.0,
                escape(&label),
            )?;
        }
    }

    svg.push_str("</g>\n");
    Ok(())
}

const STYLE: &str = r#"
  body { background: #1a1a2e; color: #eee; font-family: system-ui, sans-serif; display: flex; justify-content: center; padding: 2em; }
  .key { fill: #16213e; stroke: #0f3460; stroke-width: 1.5; }
  .key.unused { fill: #0d1117; stroke: #21262d; stroke-dasharray: 3 3; }
  .key.transparent { fill: #1a1a2e; stroke: #30365e; stroke-dasharray: 2 2; }
  .key.layer { fill: #2d1b4e; stroke: #e94560; stroke-width: 2; }
  .key.modifier { fill: #1b2e4e; stroke: #53a8b6; }
  .key.media { fill: #1e3a2e; stroke: #5fb67a; }
  .label { fill: #eee; font-family: monospace; font-size: 13px; text-anchor: middle; dominant-baseline: middle; pointer-events: none; }
  .label.small { font-size: 10px; }
  .layer-title { fill: #e94560; font-size: 16px; font-weight: bold; }
"#;

/// The complete HTML document.
pub fn generate_html() -> Result<String, fmt::Error> {
    let caps = caps();
    let width = caps.iter().map(|cap| cap.x + UNIT).fold(0.0, f64::max);
    let height = caps.iter().map(|cap| cap.y + cap.h).fold(0.0, f64::max);
    let layer_height = height + 60.0;
    let total_width = width + 2.0 * MARGIN;
    let total_height = NUM_LAYERS as f64 * layer_height + 2.0 * MARGIN;

    let mut html = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>ErgoDox Layout</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <svg width=\"{total_width}\" height=\"{total_height}\" xmlns=\"http://www.w3.org/2000/svg\">\n"
    );
    for layer in 0..NUM_LAYERS {
        let y_offset = MARGIN + layer as f64 * layer_height + 30.0;
        render_layer(&mut html, &caps, layer, y_offset)?;
    }
    html.push_str("</svg>\n</body>\n</html>\n");
    Ok(html)
}
