//! Output events written to a virtual device.

use crate::keymap::codes::{EV_ABS, EV_KEY, EV_SYN, SYN_REPORT};

/// One discrete event in a device update frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEvent {
    /// A button changed to, or stays at, `pressed`.
    Button { code: u16, pressed: bool },
    /// An absolute axis position.
    Axis { code: u16, value: i32 },
    /// End of frame; the consumer applies everything before it atomically.
    Sync,
}

impl OutputEvent {
    pub const fn button(code: u16, pressed: bool) -> Self {
        OutputEvent::Button { code, pressed }
    }

    pub const fn axis(code: u16, value: i32) -> Self {
        OutputEvent::Axis { code, value }
    }

    pub const fn is_sync(&self) -> bool {
        matches!(self, OutputEvent::Sync)
    }

    /// The `(type, code, value)` triple of the Linux `input_event` this maps to.
    pub const fn to_raw(self) -> (u16, u16, i32) {
        match self {
            OutputEvent::Button { code, pressed } => (EV_KEY, code, pressed as i32),
            OutputEvent::Axis { code, value } => (EV_ABS, code, value),
            OutputEvent::Sync => (EV_SYN, SYN_REPORT, 0),
        }
    }
}
