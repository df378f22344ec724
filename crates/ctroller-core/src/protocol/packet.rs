//! Wire-level constants of the handheld → host HID packet.
//!
//! Every datagram is exactly [`PACKET_SIZE`] bytes:
//!
//! ```text
//! [magic:2][version:2][keys.up:4][keys.down:4][keys.held:4]
//! [touch.x:2][touch.y:2]
//! [circlepad.dx:2][circlepad.dy:2][cstick.dx:2][cstick.dy:2]
//! [gyro.x:2][gyro.y:2][gyro.z:2][accel.x:2][accel.y:2][accel.z:2]
//! ```
//!
//! All multi-byte integers are big-endian.  Touch coordinates are unsigned,
//! every stick and motion value is a two's-complement `i16`.

use std::fmt;

// ── Protocol constants ────────────────────────────────────────────────────────

/// First two bytes of every valid packet.
pub const PACKET_MAGIC: u16 = 0x3D5C;

/// Protocol version spoken by this host, nibble-packed as `0x0MmP`.
pub const PROTOCOL_VERSION: u16 = 0x0100;

/// Total size of one HID packet in bytes.
pub const PACKET_SIZE: usize = 2 // magic
    + 2 // version
    + 3 * 4 // keys: up, down, held
    + 2 * 2 // touch
    + 4 * 2 // circlepad + cstick
    + 6 * 2; // gyro + accel

/// A protocol version as carried in the packet header.
///
/// The handheld packs `major.minor.patch` into the low three nibbles of the
/// 16-bit field; the top nibble is unused.  Versions are compared only to
/// warn about mismatches, never to reject a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ProtocolVersion(pub u16);

impl ProtocolVersion {
    /// The version this host was built against.
    pub const LOCAL: ProtocolVersion = ProtocolVersion(PROTOCOL_VERSION);

    pub fn major(self) -> u8 {
        ((self.0 & 0x0F00) >> 8) as u8
    }

    pub fn minor(self) -> u8 {
        ((self.0 & 0x00F0) >> 4) as u8
    }

    pub fn patch(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    /// Returns `true` if `self` differs from the locally-known version.
    pub fn differs_from_local(self) -> bool {
        self != Self::LOCAL
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major(), self.minor(), self.patch())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_size_is_forty_bytes() {
        assert_eq!(PACKET_SIZE, 40);
    }

    #[test]
    fn test_protocol_version_displays_nibbles() {
        assert_eq!(ProtocolVersion(0x0123).to_string(), "1.2.3");
        assert_eq!(ProtocolVersion::LOCAL.to_string(), "1.0.0");
    }

    #[test]
    fn test_protocol_version_ignores_top_nibble() {
        let v = ProtocolVersion(0xF0A1);
        assert_eq!((v.major(), v.minor(), v.patch()), (0, 10, 1));
    }

    #[test]
    fn test_differs_from_local() {
        assert!(!ProtocolVersion(PROTOCOL_VERSION).differs_from_local());
        assert!(ProtocolVersion(0x0011).differs_from_local());
    }
}
