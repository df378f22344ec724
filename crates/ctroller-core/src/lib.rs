//! # ctroller-core
//!
//! Shared library for ctroller containing the UDP wire codec, the HID
//! snapshot model, the gamepad keymap tables and the per-device translators.
//!
//! It has zero dependencies on OS APIs or network sockets; the `ctroller`
//! crate wires it to a UDP listener and to the platform's virtual input
//! device layer.
//!
//! # Architecture overview
//!
//! A handheld console streams its button, touch and motion sensor state to the
//! host as fixed-size UDP datagrams.  The host turns each datagram into input
//! events on a set of virtual devices (gamepad, touchscreen, gyroscope,
//! accelerometer).
//!
//! - **`protocol`** – How bytes travel over the network.  Every datagram is a
//!   40-byte big-endian record starting with a magic number; the codec turns
//!   it into a typed [`HidSnapshot`] and back.
//!
//! - **`domain`** – The snapshot itself and the handheld's logical button
//!   bits.
//!
//! - **`keymap`** – Linux input event codes and the remappable table that
//!   decides which host button each handheld button presses.
//!
//! - **`device`** – Device kinds, the output event model and one translator
//!   per device kind that converts a snapshot into an ordered event frame.

pub mod device;
pub mod domain;
pub mod keymap;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `ctroller_core::HidSnapshot` instead of `ctroller_core::domain::snapshot::HidSnapshot`.
pub use device::{
    translator_for, translators_for, DeviceKind, DeviceLayout, DeviceMask, DeviceTranslator, OutputEvent,
};
pub use domain::buttons::HidButton;
pub use domain::snapshot::HidSnapshot;
pub use keymap::remap::{KeyRemapTable, KeymapError};
pub use protocol::codec::{decode_datagram, decode_packet, encode_packet, DecodeError};
pub use protocol::packet::{ProtocolVersion, PACKET_MAGIC, PACKET_SIZE, PROTOCOL_VERSION};
