//! Integration tests for ctroller-core.
//!
//! These exercise the public API end-to-end: raw bytes are decoded into a
//! snapshot and translated into device frames, the way the daemon does it.

use ctroller_core::device::gamepad::GAMEPAD_FRAME_LEN;
use ctroller_core::keymap::codes::{
    ABS_HAT0X, ABS_HAT0Y, ABS_RX, ABS_RY, ABS_X, ABS_Y, BTN_EAST, BTN_SOUTH,
};
use ctroller_core::{
    decode_datagram, decode_packet, encode_packet, translator_for, DecodeError, DeviceKind,
    HidButton, HidSnapshot, KeyRemapTable, OutputEvent, PACKET_MAGIC, PACKET_SIZE,
};

/// Builds a packet with only `keys.held` set.
fn packet_with_held(held: u32) -> [u8; PACKET_SIZE] {
    let mut bytes = [0u8; PACKET_SIZE];
    bytes[..2].copy_from_slice(&PACKET_MAGIC.to_be_bytes());
    bytes[12..16].copy_from_slice(&held.to_be_bytes());
    bytes
}

#[test]
fn test_held_a_with_default_keymap_produces_expected_gamepad_frame() {
    // Arrange
    let bytes = packet_with_held(HidButton::A.mask());
    let gamepad = translator_for(DeviceKind::Gamepad, &KeyRemapTable::default());

    // Act
    let snapshot = decode_packet(&bytes).expect("valid packet");
    let events = gamepad.translate(&snapshot);

    // Assert
    assert_eq!(events.len(), GAMEPAD_FRAME_LEN);

    let buttons: Vec<_> = events
        .iter()
        .filter_map(|e| match *e {
            OutputEvent::Button { code, pressed } => Some((code, pressed)),
            _ => None,
        })
        .collect();
    assert_eq!(buttons.len(), 10);
    assert_eq!(buttons[0], (BTN_SOUTH, true));
    assert!(buttons[1..].iter().all(|&(_, pressed)| !pressed));

    assert_eq!(
        &events[10..],
        &[
            OutputEvent::axis(ABS_X, 0),
            OutputEvent::axis(ABS_Y, 0),
            OutputEvent::axis(ABS_RX, 0),
            OutputEvent::axis(ABS_RY, 0),
            OutputEvent::axis(ABS_HAT0X, 0),
            OutputEvent::axis(ABS_HAT0Y, 0),
            OutputEvent::Sync,
        ]
    );
}

#[test]
fn test_keymap_file_text_changes_gamepad_output() {
    let keymap = KeyRemapTable::parse("B\nA\nX\nY\nSTART\nSELECT\nL\nR\nZL\nZR\n").unwrap();
    let gamepad = translator_for(DeviceKind::Gamepad, &keymap);

    let snapshot = decode_packet(&packet_with_held(HidButton::A.mask())).unwrap();
    let events = gamepad.translate(&snapshot);

    assert_eq!(events[0], OutputEvent::button(BTN_EAST, true));
    assert!(gamepad.layout().buttons.contains(&BTN_SOUTH));
}

#[test]
fn test_every_buffer_with_magic_decodes_and_round_trips() {
    // A spread of byte patterns: every byte equal to `fill`, magic restored.
    for fill in [0x00u8, 0x01, 0x7F, 0x80, 0xAA, 0xFF] {
        let mut bytes = [fill; PACKET_SIZE];
        bytes[..2].copy_from_slice(&PACKET_MAGIC.to_be_bytes());

        let snapshot = decode_packet(&bytes).expect("any payload is legal");
        assert_eq!(encode_packet(&snapshot), bytes, "fill 0x{fill:02X}");
    }
}

#[test]
fn test_every_buffer_without_magic_is_rejected() {
    for first in [0x00u8, 0x3C, 0x3E, 0x5C, 0xFF] {
        let mut bytes = [0u8; PACKET_SIZE];
        bytes[0] = first;
        bytes[1] = 0x5C;
        let result = decode_datagram(&bytes);
        assert_eq!(
            result,
            Err(DecodeError::BadMagic(u16::from_be_bytes([first, 0x5C]))),
            "first byte 0x{first:02X}"
        );
    }
}

#[test]
fn test_neutral_snapshot_translates_to_rest_state_on_every_device() {
    let keymap = KeyRemapTable::default();
    for kind in DeviceKind::ALL {
        let events = translator_for(kind, &keymap).translate(&HidSnapshot::neutral());
        for e in &events {
            match *e {
                OutputEvent::Button { pressed, .. } => assert!(!pressed, "{kind}"),
                OutputEvent::Axis { value, .. } => assert_eq!(value, 0, "{kind}"),
                OutputEvent::Sync => {}
            }
        }
    }
}
