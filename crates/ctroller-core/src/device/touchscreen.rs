//! Touchscreen translator: absolute X/Y of the touch point.

use crate::device::event::OutputEvent;
use crate::device::layout::{AxisSetup, DeviceId, DeviceLayout};
use crate::device::{DeviceKind, DeviceTranslator};
use crate::domain::snapshot::HidSnapshot;
use crate::keymap::codes::{ABS_X, ABS_Y};

pub const TOUCHSCREEN_NAME: &str = "Nintendo 3DS Touchscreen";
pub const TOUCHSCREEN_PRODUCT_ID: u16 = 0x0402;

/// Bottom screen resolution in pixels.
pub const TOUCH_WIDTH: i32 = 320;
pub const TOUCH_HEIGHT: i32 = 240;

#[derive(Debug, Clone, Copy, Default)]
pub struct TouchscreenTranslator;

impl DeviceTranslator for TouchscreenTranslator {
    fn kind(&self) -> DeviceKind {
        DeviceKind::Touchscreen
    }

    fn layout(&self) -> DeviceLayout {
        DeviceLayout {
            name: TOUCHSCREEN_NAME.to_string(),
            id: DeviceId::handheld(TOUCHSCREEN_PRODUCT_ID),
            buttons: Vec::new(),
            axes: vec![
                AxisSetup::new(ABS_X, 0, TOUCH_WIDTH - 1),
                AxisSetup::new(ABS_Y, 0, TOUCH_HEIGHT - 1),
            ],
        }
    }

    fn translate(&self, snapshot: &HidSnapshot) -> Vec<OutputEvent> {
        vec![
            OutputEvent::axis(ABS_X, i32::from(snapshot.touch.x)),
            OutputEvent::axis(ABS_Y, i32::from(snapshot.touch.y)),
            OutputEvent::Sync,
        ]
    }
}
