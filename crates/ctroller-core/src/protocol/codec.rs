//! Binary codec for the handheld HID packet.
//!
//! Wire format (see [`crate::protocol::packet`] for the full layout):
//! ```text
//! [magic:2][version:2][keys:12][touch:4][sticks:8][gyro:6][accel:6]
//! ```
//! Total size: 40 bytes. All multi-byte integers are big-endian.

use crate::domain::snapshot::{HidSnapshot, KeyState, MotionVector, StickPosition, TouchPoint};
use crate::protocol::cursor::{PacketReader, PacketWriter};
use crate::protocol::packet::{ProtocolVersion, PACKET_MAGIC, PACKET_SIZE};
use thiserror::Error;

/// Errors that can occur while decoding a packet.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The first two bytes are not [`PACKET_MAGIC`].
    #[error("invalid packet header: 0x{0:04X}")]
    BadMagic(u16),

    /// The datagram is not exactly one packet long.
    #[error("invalid packet length: expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    /// A field would run past the end of the buffer.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decodes one packet into a [`HidSnapshot`].
///
/// Only the magic number is validated.  The version field is recorded as-is
/// and every other bit pattern is legal.
///
/// # Errors
///
/// Returns [`DecodeError::BadMagic`] if the header does not match; no
/// snapshot is produced in that case.
///
/// # Examples
///
/// ```rust
/// use ctroller_core::protocol::{decode_packet, encode_packet};
/// use ctroller_core::HidSnapshot;
///
/// let mut snapshot = HidSnapshot::default();
/// snapshot.circlepad.dx = -42;
/// let bytes = encode_packet(&snapshot);
/// assert_eq!(decode_packet(&bytes).unwrap(), snapshot);
/// ```
pub fn decode_packet(bytes: &[u8; PACKET_SIZE]) -> Result<HidSnapshot, DecodeError> {
    let mut r = PacketReader::new(bytes);

    let magic = r.read_u16()?;
    if magic != PACKET_MAGIC {
        return Err(DecodeError::BadMagic(magic));
    }

    let version = ProtocolVersion(r.read_u16()?);

    let keys = KeyState {
        up: r.read_u32()?,
        down: r.read_u32()?,
        held: r.read_u32()?,
    };

    let touch = TouchPoint {
        x: r.read_u16()?,
        y: r.read_u16()?,
    };

    let circlepad = read_stick(&mut r)?;
    let cstick = read_stick(&mut r)?;
    let gyro = read_motion(&mut r)?;
    let accel = read_motion(&mut r)?;

    debug_assert_eq!(r.position(), PACKET_SIZE);

    Ok(HidSnapshot {
        version,
        keys,
        touch,
        circlepad,
        cstick,
        gyro,
        accel,
    })
}

/// Decodes a received datagram, checking its length first.
///
/// # Errors
///
/// Returns [`DecodeError::Length`] if `bytes` is not exactly
/// [`PACKET_SIZE`] long, otherwise whatever [`decode_packet`] returns.
pub fn decode_datagram(bytes: &[u8]) -> Result<HidSnapshot, DecodeError> {
    let packet: &[u8; PACKET_SIZE] = bytes.try_into().map_err(|_| DecodeError::Length {
        expected: PACKET_SIZE,
        actual: bytes.len(),
    })?;
    decode_packet(packet)
}

/// Encodes a snapshot into its wire form, the inverse of [`decode_packet`].
///
/// The header always carries [`PACKET_MAGIC`] and the snapshot's own version.
pub fn encode_packet(snapshot: &HidSnapshot) -> [u8; PACKET_SIZE] {
    let mut w = PacketWriter::<PACKET_SIZE>::new();

    w.write_u16(PACKET_MAGIC);
    w.write_u16(snapshot.version.0);

    w.write_u32(snapshot.keys.up);
    w.write_u32(snapshot.keys.down);
    w.write_u32(snapshot.keys.held);

    w.write_u16(snapshot.touch.x);
    w.write_u16(snapshot.touch.y);

    for stick in [snapshot.circlepad, snapshot.cstick] {
        w.write_i16(stick.dx);
        w.write_i16(stick.dy);
    }
    for motion in [snapshot.gyro, snapshot.accel] {
        w.write_i16(motion.x);
        w.write_i16(motion.y);
        w.write_i16(motion.z);
    }

    w.into_inner()
}

// ── Field group helpers ───────────────────────────────────────────────────────

fn read_stick(r: &mut PacketReader<'_>) -> Result<StickPosition, DecodeError> {
    Ok(StickPosition {
        dx: r.read_i16()?,
        dy: r.read_i16()?,
    })
}

fn read_motion(r: &mut PacketReader<'_>) -> Result<MotionVector, DecodeError> {
    Ok(MotionVector {
        x: r.read_i16()?,
        y: r.read_i16()?,
        z: r.read_i16()?,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::buttons::HidButton;
    use crate::protocol::packet::PROTOCOL_VERSION;

    /// Hand-assembled packet with a distinct value in every field.
    fn sample_bytes() -> [u8; PACKET_SIZE] {
        [
            0x3D, 0x5C, // magic
            0x01, 0x00, // version 1.0.0
            0x00, 0x00, 0x00, 0x02, // keys.up = B
            0x00, 0x00, 0x00, 0x01, // keys.down = A
            0x00, 0x00, 0x80, 0x20, // keys.held = ZR | DLEFT
            0x01, 0x3F, // touch.x = 319
            0x00, 0xEF, // touch.y = 239
            0x00, 0x9C, // circlepad.dx = 156
            0xFF, 0x64, // circlepad.dy = -156
            0x80, 0x00, // cstick.dx = i16::MIN
            0x7F, 0xFF, // cstick.dy = i16::MAX
            0x00, 0x01, 0x00, 0x02, 0x00, 0x03, // gyro
            0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFD, // accel
        ]
    }

    #[test]
    fn test_decode_reads_every_field_big_endian() {
        let s = decode_packet(&sample_bytes()).expect("valid packet");

        assert_eq!(s.version, ProtocolVersion(PROTOCOL_VERSION));
        assert_eq!(s.keys.up, HidButton::B.mask());
        assert_eq!(s.keys.down, HidButton::A.mask());
        assert_eq!(s.keys.held, HidButton::Zr.mask() | HidButton::DLeft.mask());
        assert_eq!(s.touch, TouchPoint { x: 319, y: 239 });
        assert_eq!(s.circlepad, StickPosition { dx: 156, dy: -156 });
        assert_eq!(
            s.cstick,
            StickPosition {
                dx: i16::MIN,
                dy: i16::MAX
            }
        );
        assert_eq!(s.gyro, MotionVector { x: 1, y: 2, z: 3 });
        assert_eq!(
            s.accel,
            MotionVector {
                x: -1,
                y: -2,
                z: -3
            }
        );
    }

    #[test]
    fn test_reencoding_decoded_packet_reproduces_bytes() {
        let bytes = sample_bytes();
        let s = decode_packet(&bytes).unwrap();
        assert_eq!(encode_packet(&s), bytes);
    }

    #[test]
    fn test_bad_magic_is_rejected_regardless_of_payload() {
        let mut bytes = sample_bytes();
        bytes[0] = 0x00;
        bytes[1] = 0x00;
        assert_eq!(decode_packet(&bytes), Err(DecodeError::BadMagic(0x0000)));

        let mut bytes = [0xFFu8; PACKET_SIZE];
        bytes[1] = 0x5C;
        assert_eq!(decode_packet(&bytes), Err(DecodeError::BadMagic(0xFF5C)));
    }

    #[test]
    fn test_byte_swapped_magic_is_rejected() {
        let mut bytes = sample_bytes();
        bytes.swap(0, 1);
        assert_eq!(decode_packet(&bytes), Err(DecodeError::BadMagic(0x5C3D)));
    }

    #[test]
    fn test_unknown_version_is_accepted() {
        let mut bytes = sample_bytes();
        bytes[2] = 0xAB;
        bytes[3] = 0xCD;
        let s = decode_packet(&bytes).expect("version is informational only");
        assert_eq!(s.version, ProtocolVersion(0xABCD));
    }

    #[test]
    fn test_decode_datagram_rejects_wrong_length() {
        let bytes = sample_bytes();
        assert_eq!(
            decode_datagram(&bytes[..PACKET_SIZE - 1]),
            Err(DecodeError::Length {
                expected: PACKET_SIZE,
                actual: PACKET_SIZE - 1
            })
        );

        let mut long = bytes.to_vec();
        long.push(0);
        assert_eq!(
            decode_datagram(&long),
            Err(DecodeError::Length {
                expected: PACKET_SIZE,
                actual: PACKET_SIZE + 1
            })
        );
    }

    #[test]
    fn test_decode_datagram_accepts_exact_length() {
        let bytes = sample_bytes();
        assert_eq!(decode_datagram(&bytes), decode_packet(&bytes));
    }

    #[test]
    fn test_encode_default_snapshot_is_magic_then_zeros() {
        let bytes = encode_packet(&HidSnapshot::default());
        assert_eq!(&bytes[..2], &PACKET_MAGIC.to_be_bytes());
        assert!(bytes[2..].iter().all(|&b| b == 0));
    }
}
