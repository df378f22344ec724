//! Virtual device kinds, the output event model and per-kind translators.
//!
//! # How a snapshot becomes input (overview)
//!
//! Each [`DeviceKind`] has a [`DeviceTranslator`] that knows two things:
//!
//! - its [`DeviceLayout`]: which buttons and axes the host-side virtual
//!   device must advertise when it is created, and
//! - how to turn a [`HidSnapshot`] into one ordered frame of
//!   [`OutputEvent`]s, always terminated by exactly one [`OutputEvent::Sync`].
//!
//! The set of kinds is closed; [`translator_for`] picks the implementation
//! for a kind when the device registry is built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::snapshot::HidSnapshot;
use crate::keymap::remap::KeyRemapTable;

pub mod event;
pub mod gamepad;
pub mod layout;
pub mod motion;
pub mod touchscreen;

pub use event::OutputEvent;
pub use gamepad::GamepadTranslator;
pub use layout::{AxisSetup, DeviceId, DeviceLayout};
pub use motion::{MotionSensor, MotionTranslator};
pub use touchscreen::TouchscreenTranslator;

// ── Device kinds ──────────────────────────────────────────────────────────────

/// One of the fixed virtual device kinds, in registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Gamepad,
    Touchscreen,
    Gyroscope,
    Accelerometer,
}

impl DeviceKind {
    /// Every kind in stable registry order.
    pub const ALL: [DeviceKind; 4] = [
        DeviceKind::Gamepad,
        DeviceKind::Touchscreen,
        DeviceKind::Gyroscope,
        DeviceKind::Accelerometer,
    ];

    /// Position of this kind in [`DeviceKind::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// This kind's bit in a [`DeviceMask`].
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Lower-case name used in configuration files and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            DeviceKind::Gamepad => "gamepad",
            DeviceKind::Touchscreen => "touchscreen",
            DeviceKind::Gyroscope => "gyroscope",
            DeviceKind::Accelerometer => "accelerometer",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a device name is not one of the known kinds.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown device kind: {0:?} (expected gamepad, touchscreen, gyroscope or accelerometer)")]
pub struct UnknownDeviceKind(pub String);

impl FromStr for DeviceKind {
    type Err = UnknownDeviceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeviceKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDeviceKind(s.to_string()))
    }
}

// ── Device mask ───────────────────────────────────────────────────────────────

/// Bitset of enabled device kinds, one bit per [`DeviceKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DeviceMask(pub u8);

impl DeviceMask {
    pub const NONE: DeviceMask = DeviceMask(0);
    pub const ALL: DeviceMask = DeviceMask(0b1111);

    pub const fn contains(self, kind: DeviceKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn insert(&mut self, kind: DeviceKind) {
        self.0 |= kind.bit();
    }

    /// Enabled kinds in registry order.
    pub fn kinds(self) -> impl Iterator<Item = DeviceKind> {
        DeviceKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }

    pub const fn is_empty(self) -> bool {
        self.0 & Self::ALL.0 == 0
    }
}

impl FromIterator<DeviceKind> for DeviceMask {
    fn from_iter<I: IntoIterator<Item = DeviceKind>>(iter: I) -> Self {
        let mut mask = DeviceMask::NONE;
        for kind in iter {
            mask.insert(kind);
        }
        mask
    }
}

// ── Translator contract ───────────────────────────────────────────────────────

/// Converts snapshots into output frames for one device kind.
///
/// Translation is infallible: the snapshot was validated by the decoder.
pub trait DeviceTranslator: Send + Sync {
    /// The kind of device this translator drives.
    fn kind(&self) -> DeviceKind;

    /// Capabilities the virtual device must advertise.
    fn layout(&self) -> DeviceLayout;

    /// Builds one frame of events for `snapshot`, ending with [`OutputEvent::Sync`].
    fn translate(&self, snapshot: &HidSnapshot) -> Vec<OutputEvent>;
}

/// Returns the translator for `kind`.
///
/// Only the gamepad uses `keymap`; the other kinds have fixed outputs.
pub fn translator_for(kind: DeviceKind, keymap: &KeyRemapTable) -> Box<dyn DeviceTranslator> {
    match kind {
        DeviceKind::Gamepad => Box::new(GamepadTranslator::new(*keymap)),
        DeviceKind::Touchscreen => Box::new(TouchscreenTranslator),
        DeviceKind::Gyroscope => Box::new(MotionTranslator::new(MotionSensor::Gyroscope)),
        DeviceKind::Accelerometer => Box::new(MotionTranslator::new(MotionSensor::Accelerometer)),
    }
}

/// Returns one translator per kind, in registry order.
pub fn translators_for(keymap: &KeyRemapTable) -> Vec<Box<dyn DeviceTranslator>> {
    DeviceKind::ALL
        .into_iter()
        .map(|kind| translator_for(kind, keymap))
        .collect()
}
