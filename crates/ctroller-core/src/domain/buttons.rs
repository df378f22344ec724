//! Logical button bits of the handheld.
//!
//! The packet carries three 32-bit key masks (`up`, `down`, `held`).  Each
//! bit position is one logical button on the handheld; the numbering below is
//! the console's native HID layout, so it must not be renumbered.
//!
//! | Bit    | Button                     |
//! |--------|----------------------------|
//! | 0–3    | A, B, Select, Start        |
//! | 4–7    | D-pad right, left, up, down|
//! | 8–11   | R, L, X, Y                 |
//! | 14–15  | ZL, ZR                     |
//! | 20     | Touch                      |
//! | 24–27  | C-stick right, left, up, down (digital) |
//! | 28–31  | Circle pad right, left, up, down (digital) |

use serde::{Deserialize, Serialize};

/// One logical button of the handheld, valued by its bit index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum HidButton {
    A = 0,
    B = 1,
    Select = 2,
    Start = 3,
    DRight = 4,
    DLeft = 5,
    DUp = 6,
    DDown = 7,
    R = 8,
    L = 9,
    X = 10,
    Y = 11,
    Zl = 14,
    Zr = 15,
    Touch = 20,
    CStickRight = 24,
    CStickLeft = 25,
    CStickUp = 26,
    CStickDown = 27,
    CPadRight = 28,
    CPadLeft = 29,
    CPadUp = 30,
    CPadDown = 31,
}

impl HidButton {
    /// The single-bit mask of this button inside a key mask.
    pub const fn mask(self) -> u32 {
        1u32 << (self as u8)
    }

    /// Returns `true` if this button's bit is set in `keys`.
    pub const fn is_set_in(self, keys: u32) -> bool {
        keys & self.mask() != 0
    }
}
