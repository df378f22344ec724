//! The decoded HID snapshot: one frame of handheld input state.
//!
//! A snapshot only ever comes out of a successful decode (or is the
//! all-zero neutral frame from [`HidSnapshot::default`]).  Translators receive
//! it by shared reference and never mutate it.

use crate::domain::buttons::HidButton;
use crate::protocol::packet::ProtocolVersion;

/// Edge and level state of every logical button for one frame.
///
/// - `down` – pressed this frame (rising edge)
/// - `held` – pressed and still held
/// - `up`   – released this frame (falling edge)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyState {
    pub up: u32,
    pub down: u32,
    pub held: u32,
}

impl KeyState {
    /// Buttons that count as pressed for output: held, or pressed this frame.
    ///
    /// A rising edge is already active in the frame it occurs in.
    pub const fn active(&self) -> u32 {
        self.held | self.down
    }

    /// Returns `true` if `button` is held or went down this frame.
    pub const fn is_active(&self, button: HidButton) -> bool {
        button.is_set_in(self.active())
    }
}

/// Touchscreen contact point in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TouchPoint {
    pub x: u16,
    pub y: u16,
}

/// Analog stick displacement, centred at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StickPosition {
    pub dx: i16,
    pub dy: i16,
}

/// Raw three-axis motion sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionVector {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

/// One validated frame of handheld input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HidSnapshot {
    /// Protocol version reported by the handheld.
    pub version: ProtocolVersion,
    pub keys: KeyState,
    pub touch: TouchPoint,
    pub circlepad: StickPosition,
    pub cstick: StickPosition,
    pub gyro: MotionVector,
    pub accel: MotionVector,
}

impl HidSnapshot {
    /// The neutral frame: nothing pressed, sticks centred, sensors at zero.
    pub fn neutral() -> Self {
        Self::default()
    }
}
