//! Scripted scan cycles through the ErgoDox keymap.
//!
//! A script is a list of lines:
//!
//! ```text
//! # hold Fn and tap the key under F1
//! press 3 6
//! tick
//! press 0 1
//! tick
//! release 0 1
//! release 3 6
//! tick 2
//! ```
//!
//! `press` and `release` change the simulated matrix; `tick [N]` runs N scan
//! cycles (one by default). Changes left over at the end get one last cycle.

use std::fmt;

use anyhow::{bail, Result};
use keylayer::ergodox::{self, COLS, NUM_LAYERS, ROWS};
use keylayer::output::BleFrame;
use keylayer::{BleSink, Keyboard, UsbSink};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SimulatorConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: expected `{usage}`")]
    Usage { line: usize, usage: &'static str },

    #[error("line {line}: `{value}` is not a valid number")]
    InvalidNumber { line: usize, value: String },

    #[error("line {line}: ({row}, {col}) is outside the key matrix")]
    OutOfRange { line: usize, row: usize, col: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Press { row: usize, col: usize },
    Release { row: usize, col: usize },
    Tick(u32),
}

fn number<T: std::str::FromStr>(line: usize, value: &str) -> Result<T, ScriptError> {
    value.parse().map_err(|_| ScriptError::InvalidNumber {
        line,
        value: value.to_string(),
    })
}

fn position(line: usize, args: &[&str], usage: &'static str) -> Result<(usize, usize), ScriptError> {
    let [row, col] = args else {
        return Err(ScriptError::Usage { line, usage });
    };
    let (row, col) = (number(line, row)?, number(line, col)?);
    if row >= ROWS || col >= COLS {
        return Err(ScriptError::OutOfRange { line, row, col });
    }
    Ok((row, col))
}

pub fn parse_script(text: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or_default();
        let mut words = content.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let args: Vec<&str> = words.collect();

        let step = match command {
            "press" => {
                let (row, col) = position(line, &args, "press ROW COL")?;
                Step::Press { row, col }
            }
            "release" => {
                let (row, col) = position(line, &args, "release ROW COL")?;
                Step::Release { row, col }
            }
            "tick" => match args.as_slice() {
                [] => Step::Tick(1),
                [count] => Step::Tick(number(line, count)?),
                _ => return Err(ScriptError::Usage { line, usage: "tick [N]" }),
            },
            other => {
                return Err(ScriptError::UnknownCommand {
                    line,
                    command: other.to_string(),
                })
            }
        };
        steps.push(step);
    }
    Ok(steps)
}

/// What one scan cycle produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub index: u64,
    pub layer_state: u32,
    pub top_active_layer: u8,
    /// Modifier byte and keycodes, when the keyboard report changed.
    pub keyboard: Option<(u8, [u8; 6])>,
    pub consumer: Option<u16>,
    pub system: Option<u8>,
    pub ble: Vec<BleFrame>,
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cycle {:>4}  layers {:#0width$b}  top {}",
            self.index,
            self.layer_state,
            self.top_active_layer,
            width = NUM_LAYERS + 2,
        )?;
        if let Some((modifier, keys)) = self.keyboard {
            write!(f, "  usb keyboard {modifier:02X} {keys:02X?}")?;
        }
        if let Some(usage) = self.consumer {
            write!(f, "  usb consumer {usage:04X}")?;
        }
        if let Some(usage) = self.system {
            write!(f, "  usb system {usage:02X}")?;
        }
        for frame in &self.ble {
            write!(f, "  ble {frame:02X?}")?;
        }
        Ok(())
    }
}

type ErgodoxKeyboard = Keyboard<&'static ergodox::Keymap, UsbSink, BleSink, ROWS, COLS>;

pub struct Simulation {
    keyboard: ErgodoxKeyboard,
    matrix: [[bool; COLS]; ROWS],
    dirty: bool,
    cycles: u64,
}

impl Simulation {
    pub fn new(config: &SimulatorConfig) -> Result<Self> {
        let mut usb = UsbSink::new();
        usb.set_configured(true);
        let mut ble = BleSink::new();
        ble.set_link_up(true);

        let mut keyboard = Keyboard::new(&ergodox::KEYMAP, usb, ble)
            .with_connections(config.connection_mask());
        if !keyboard.layers().is_valid_layer(config.default_layer) {
            bail!(
                "default layer {} does not exist (keymap has {NUM_LAYERS} layers)",
                config.default_layer
            );
        }
        keyboard.layers_mut().set_default_layer(config.default_layer);
        debug!(
            connections = ?keyboard.connections(),
            default_layer = config.default_layer,
            "simulation ready"
        );

        Ok(Self {
            keyboard,
            matrix: [[false; COLS]; ROWS],
            dirty: false,
            cycles: 0,
        })
    }

    pub fn run(&mut self, steps: &[Step]) -> Vec<Cycle> {
        let mut cycles = Vec::new();
        for step in steps {
            match *step {
                Step::Press { row, col } => self.set(row, col, true),
                Step::Release { row, col } => self.set(row, col, false),
                Step::Tick(count) => {
                    for _ in 0..count {
                        cycles.push(self.tick());
                    }
                }
            }
        }
        if self.dirty {
            cycles.push(self.tick());
        }
        info!(cycles = self.cycles, "simulation finished");
        cycles
    }

    fn set(&mut self, row: usize, col: usize, pressed: bool) {
        self.matrix[row][col] = pressed;
        self.dirty = true;
    }

    fn tick(&mut self) -> Cycle {
        self.keyboard.scan_cycle(&self.matrix);
        self.dirty = false;
        self.cycles += 1;

        let layers = self.keyboard.layers();
        let (layer_state, top_active_layer) = (layers.layer_state(), layers.top_active_layer());

        let output = self.keyboard.output_mut();
        let usb = output.usb_mut();
        let keyboard = usb
            .take_keyboard_report()
            .map(|report| (report.modifier, report.keycodes));
        let consumer = usb.take_consumer_report().map(|report| report.usage_id);
        let system = usb.take_system_report().map(|report| report.usage_id);
        let ble = std::iter::from_fn(|| output.ble_mut().pop_frame()).collect();

        Cycle {
            index: self.cycles,
            layer_state,
            top_active_layer,
            keyboard,
            consumer,
            system,
            ble,
        }
    }
}
