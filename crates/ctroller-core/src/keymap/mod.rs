//! Output code tables and the gamepad key remapping.
//!
//! The canonical output representation is the Linux input event code space
//! (`EV_KEY` / `EV_ABS` codes from `linux/input-event-codes.h`).  Backends on
//! other platforms would translate from these codes at their own boundary.

pub mod codes;
pub mod remap;

pub use remap::{GamepadButton, KeyRemapTable, KeymapError};
