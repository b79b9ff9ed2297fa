//! End-to-end scan cycles over the ErgoDox keymap.
//!
//! A `Keyboard` with real USB and BLE sinks is fed matrix snapshots; the
//! assertions look at what the sinks queued for the host.

use keylayer::ergodox::{self, COLS, ROWS};
use keylayer::hid::{consumer, system};
use keylayer::{BleSink, Connections, Keyboard, Keycode, UsbSink};

type Ergodox = Keyboard<&'static ergodox::Keymap, UsbSink, BleSink, ROWS, COLS>;

const MO1_LEFT: (usize, usize) = (3, 6);
const MO1_RIGHT: (usize, usize) = (3, 7);
const LK2: (usize, usize) = (4, 3);
const SLEEP_KEY: (usize, usize) = (5, 0);

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn keyboard() -> Ergodox {
    let mut usb = UsbSink::new();
    usb.set_configured(true);
    let mut ble = BleSink::new();
    ble.set_link_up(true);
    Keyboard::new(&ergodox::KEYMAP, usb, ble)
}

fn matrix(pressed: &[(usize, usize)]) -> [[bool; COLS]; ROWS] {
    let mut matrix = [[false; COLS]; ROWS];
    for &(row, col) in pressed {
        matrix[row][col] = true;
    }
    matrix
}

fn usb_keys(keyboard: &mut Ergodox) -> Option<[u8; 6]> {
    keyboard
        .output_mut()
        .usb_mut()
        .take_keyboard_report()
        .map(|report| report.keycodes)
}

fn only(code: Keycode) -> [u8; 6] {
    [code as u8, 0, 0, 0, 0, 0]
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_fn_layer_while_held() {
    let mut keyboard = keyboard();

    keyboard.scan_cycle(&matrix(&[MO1_LEFT]));
    assert!(keyboard.layers().is_active(1));

    // Act: tap the key carrying F1 on the Fn layer
    keyboard.scan_cycle(&matrix(&[MO1_LEFT, (0, 1)]));

    // Assert
    assert_eq!(usb_keys(&mut keyboard), Some(only(Keycode::F1)));

    keyboard.scan_cycle(&matrix(&[]));
    assert!(!keyboard.layers().is_active(1));
    assert_eq!(usb_keys(&mut keyboard), Some([0; 6]));

    keyboard.scan_cycle(&matrix(&[(0, 1)]));
    assert_eq!(usb_keys(&mut keyboard), Some(only(Keycode::N1)));
}

#[test]
fn test_both_fn_keys_hold_the_layer_until_both_are_released() {
    let mut keyboard = keyboard();

    keyboard.scan_cycle(&matrix(&[MO1_LEFT, MO1_RIGHT]));
    keyboard.scan_cycle(&matrix(&[MO1_RIGHT]));
    assert!(keyboard.layers().is_active(1));

    keyboard.scan_cycle(&matrix(&[]));
    assert!(!keyboard.layers().is_active(1));
}

#[test]
fn test_shifted_symbol_presses_its_modifier() {
    let mut keyboard = keyboard();

    keyboard.scan_cycle(&matrix(&[MO1_LEFT]));
    keyboard.scan_cycle(&matrix(&[MO1_LEFT, (2, 1)]));

    let report = keyboard
        .output_mut()
        .usb_mut()
        .take_keyboard_report()
        .expect("report for the shifted key");
    assert_eq!(report.modifier, 0x02);
    assert_eq!(report.keycodes, only(Keycode::N1));
}

#[test]
fn test_numpad_lock_survives_release() {
    let mut keyboard = keyboard();

    keyboard.scan_cycle(&matrix(&[LK2]));
    keyboard.scan_cycle(&matrix(&[]));
    assert!(keyboard.layers().is_active(2));

    keyboard.scan_cycle(&matrix(&[(4, 9)]));
    assert_eq!(usb_keys(&mut keyboard), Some(only(Keycode::Kp0)));
    keyboard.scan_cycle(&matrix(&[]));

    // second tap unlocks
    keyboard.scan_cycle(&matrix(&[LK2]));
    keyboard.scan_cycle(&matrix(&[]));
    assert!(!keyboard.layers().is_active(2));

    keyboard.scan_cycle(&matrix(&[(4, 9)]));
    assert_eq!(usb_keys(&mut keyboard), Some(only(Keycode::Left)));
}

#[test]
fn test_media_key_reaches_both_transports() {
    let mut keyboard = keyboard();

    keyboard.scan_cycle(&matrix(&[MO1_LEFT]));
    keyboard.scan_cycle(&matrix(&[MO1_LEFT, (3, 2)]));

    let usb = keyboard
        .output_mut()
        .usb_mut()
        .take_consumer_report()
        .expect("consumer report on USB");
    assert_eq!({ usb.usage_id }, u16::from(consumer::PLAY_PAUSE));

    let frame = keyboard.output_mut().ble_mut().pop_frame().expect("BLE frame");
    assert_eq!(&frame[..2], &[2, consumer::PLAY_PAUSE]);
}

#[test]
fn test_system_key_released_after_its_layer_drops() {
    let mut keyboard = keyboard();

    keyboard.scan_cycle(&matrix(&[MO1_LEFT]));
    keyboard.scan_cycle(&matrix(&[MO1_LEFT, SLEEP_KEY]));
    let usage = |keyboard: &mut Ergodox| {
        keyboard
            .output_mut()
            .usb_mut()
            .take_system_report()
            .map(|report| report.usage_id)
    };
    assert_eq!(usage(&mut keyboard), Some(system::SLEEP));

    // Act: let go of Fn first, then of the system key
    keyboard.scan_cycle(&matrix(&[SLEEP_KEY]));
    assert!(!keyboard.layers().is_active(1));
    assert_eq!(usage(&mut keyboard), None, "still held, nothing new to send");

    keyboard.scan_cycle(&matrix(&[]));

    // Assert
    assert_eq!(usage(&mut keyboard), Some(0), "system control left pressed");
    assert_eq!(keyboard.output().ble().queued(), 2);
    let frames: Vec<_> = std::iter::from_fn(|| keyboard.output_mut().ble_mut().pop_frame())
        .map(|frame| (frame[0], frame[1]))
        .collect();
    assert_eq!(frames, vec![(3, system::SLEEP), (3, 0)]);
}

#[test]
fn test_preferred_connections_narrow_output() {
    let mut keyboard = keyboard().with_connections(Connections::BLE);

    keyboard.scan_cycle(&matrix(&[(1, 1)]));

    assert_eq!(usb_keys(&mut keyboard), None);
    let frame = keyboard.output_mut().ble_mut().pop_frame().expect("BLE frame");
    assert_eq!(frame[0], 1);
    assert_eq!(frame[3], Keycode::Q as u8);
}
