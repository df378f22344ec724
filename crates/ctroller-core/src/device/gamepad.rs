//! Gamepad translator: buttons, two analog sticks and a hat-switch D-pad.
//!
//! Frame layout (17 events):
//!
//! ```text
//! 10 × Button   A, B, X, Y, Start, Select, L, R, ZL, ZR  (codes from the remap table)
//!  4 × Axis     ABS_X, ABS_Y (circle pad), ABS_RX, ABS_RY (C-stick)
//!  2 × Axis     ABS_HAT0X, ABS_HAT0Y (D-pad)
//!  1 × Sync
//! ```
//!
//! # Why is the D-pad a hat and not four buttons?
//!
//! Some host input stacks (Android in particular) mis-handle `BTN_DPAD_*`
//! codes but understand hat axes, so the D-pad bits are folded into
//! `ABS_HAT0X`/`ABS_HAT0Y` with values −1, 0, +1.  Hats are derived directly
//! from the key mask and are not affected by the remap table.
//!
//! # Axis orientation
//!
//! The handheld reports stick Y as positive-up; the host convention is
//! positive-down, so both Y axes are negated.

use crate::device::event::OutputEvent;
use crate::device::layout::{AxisSetup, DeviceId, DeviceLayout};
use crate::device::{DeviceKind, DeviceTranslator};
use crate::domain::buttons::HidButton;
use crate::domain::snapshot::{HidSnapshot, KeyState};
use crate::keymap::codes::{ABS_HAT0X, ABS_HAT0Y, ABS_RX, ABS_RY, ABS_X, ABS_Y};
use crate::keymap::remap::{GamepadButton, KeyRemapTable, GAMEPAD_KEY_COUNT};

/// Reported device name.
pub const GAMEPAD_NAME: &str = "Nintendo 3DS";

/// Product id of the gamepad device.
pub const GAMEPAD_PRODUCT_ID: u16 = 0x0401;

/// Circle pad / C-stick deflection limit in either direction.
pub const STICK_RANGE: i32 = 0x9C;

const STICK_FUZZ: i32 = 3;
const STICK_FLAT: i32 = 10;

/// Number of events in every gamepad frame.
pub const GAMEPAD_FRAME_LEN: usize = GAMEPAD_KEY_COUNT + 4 + 2 + 1;

/// Translates snapshots into gamepad frames using a fixed remap table.
#[derive(Debug, Clone, Default)]
pub struct GamepadTranslator {
    keymap: KeyRemapTable,
}

impl GamepadTranslator {
    pub fn new(keymap: KeyRemapTable) -> Self {
        Self { keymap }
    }

    pub fn keymap(&self) -> &KeyRemapTable {
        &self.keymap
    }
}

impl DeviceTranslator for GamepadTranslator {
    fn kind(&self) -> DeviceKind {
        DeviceKind::Gamepad
    }

    fn layout(&self) -> DeviceLayout {
        let stick = |code| {
            AxisSetup::new(code, -STICK_RANGE, STICK_RANGE).with_filtering(STICK_FUZZ, STICK_FLAT)
        };
        DeviceLayout {
            name: GAMEPAD_NAME.to_string(),
            id: DeviceId::handheld(GAMEPAD_PRODUCT_ID),
            buttons: self.keymap.codes().to_vec(),
            axes: vec![
                stick(ABS_X),
                stick(ABS_Y),
                stick(ABS_RX),
                stick(ABS_RY),
                AxisSetup::new(ABS_HAT0X, -1, 1),
                AxisSetup::new(ABS_HAT0Y, -1, 1),
            ],
        }
    }

    fn translate(&self, snapshot: &HidSnapshot) -> Vec<OutputEvent> {
        let keys = &snapshot.keys;
        let mut events = Vec::with_capacity(GAMEPAD_FRAME_LEN);

        for button in GamepadButton::ALL {
            events.push(OutputEvent::button(
                self.keymap.code_for(button),
                keys.is_active(button.hid_button()),
            ));
        }

        // Negate in i32: -(i16::MIN) does not fit in i16.
        events.push(OutputEvent::axis(ABS_X, i32::from(snapshot.circlepad.dx)));
        events.push(OutputEvent::axis(ABS_Y, -i32::from(snapshot.circlepad.dy)));
        events.push(OutputEvent::axis(ABS_RX, i32::from(snapshot.cstick.dx)));
        events.push(OutputEvent::axis(ABS_RY, -i32::from(snapshot.cstick.dy)));

        events.push(OutputEvent::axis(
            ABS_HAT0X,
            hat_value(keys, HidButton::DLeft, HidButton::DRight),
        ));
        events.push(OutputEvent::axis(
            ABS_HAT0Y,
            hat_value(keys, HidButton::DUp, HidButton::DDown),
        ));

        events.push(OutputEvent::Sync);
        events
    }
}

/// Folds two opposing D-pad bits into a hat value.
///
/// `negative` is checked first, so holding both directions yields −1.
pub fn hat_value(keys: &KeyState, negative: HidButton, positive: HidButton) -> i32 {
    if keys.is_active(negative) {
        -1
    } else if keys.is_active(positive) {
        1
    } else {
        0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
