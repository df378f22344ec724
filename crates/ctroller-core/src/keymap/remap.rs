//! Remappable gamepad button table.
//!
//! The gamepad exposes ten logical buttons in a fixed order (A, B, X, Y,
//! Start, Select, L, R, ZL, ZR).  A [`KeyRemapTable`] holds one output button
//! code per position, so position `i` of the table decides which host button
//! logical button `i` presses.
//!
//! # Keymap files
//!
//! A keymap file lists one symbolic button name per line, in the logical
//! order above.  The name on line `i` selects the output code that button
//! would have by default; a file that swaps A and B therefore reads:
//!
//! ```text
//! B
//! A
//! X
//! Y
//! START
//! SELECT
//! L
//! R
//! ZL
//! ZR
//! ```
//!
//! A file with the wrong number of lines, or any unrecognised name, is
//! rejected as a whole.  The table it was applied to is left untouched.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::buttons::HidButton;
use crate::keymap::codes::{
    BTN_EAST, BTN_NORTH, BTN_SELECT, BTN_SOUTH, BTN_START, BTN_TL, BTN_TL2, BTN_TR, BTN_TR2,
    BTN_WEST,
};

/// Number of remappable gamepad buttons.
pub const GAMEPAD_KEY_COUNT: usize = 10;

/// Errors that can occur while loading a keymap.
#[derive(Debug, Error)]
pub enum KeymapError {
    /// The keymap file could not be read.
    #[error("I/O error reading keymap {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The keymap does not list exactly one name per gamepad button.
    #[error("keymap has {actual} lines, expected {expected}")]
    LineCount { expected: usize, actual: usize },

    /// A line does not name a known gamepad button.
    #[error("unknown button name {name:?} on line {line}")]
    UnknownButton { line: usize, name: String },
}

// ── Logical gamepad buttons ───────────────────────────────────────────────────

/// The gamepad's remappable buttons, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadButton {
    A,
    B,
    X,
    Y,
    Start,
    Select,
    L,
    R,
    Zl,
    Zr,
}

impl GamepadButton {
    /// Every button in table order.
    pub const ALL: [GamepadButton; GAMEPAD_KEY_COUNT] = [
        GamepadButton::A,
        GamepadButton::B,
        GamepadButton::X,
        GamepadButton::Y,
        GamepadButton::Start,
        GamepadButton::Select,
        GamepadButton::L,
        GamepadButton::R,
        GamepadButton::Zl,
        GamepadButton::Zr,
    ];

    /// The handheld key bit this button reads.
    pub const fn hid_button(self) -> HidButton {
        match self {
            GamepadButton::A => HidButton::A,
            GamepadButton::B => HidButton::B,
            GamepadButton::X => HidButton::X,
            GamepadButton::Y => HidButton::Y,
            GamepadButton::Start => HidButton::Start,
            GamepadButton::Select => HidButton::Select,
            GamepadButton::L => HidButton::L,
            GamepadButton::R => HidButton::R,
            GamepadButton::Zl => HidButton::Zl,
            GamepadButton::Zr => HidButton::Zr,
        }
    }

    /// The output code this button produces with the built-in keymap.
    pub const fn default_code(self) -> u16 {
        match self {
            GamepadButton::A => BTN_SOUTH,
            GamepadButton::B => BTN_EAST,
            GamepadButton::X => BTN_NORTH,
            GamepadButton::Y => BTN_WEST,
            GamepadButton::Start => BTN_START,
            GamepadButton::Select => BTN_SELECT,
            GamepadButton::L => BTN_TL,
            GamepadButton::R => BTN_TR,
            GamepadButton::Zl => BTN_TL2,
            GamepadButton::Zr => BTN_TR2,
        }
    }

    /// Parses the symbolic name used in keymap files (`"A"`, `"START"`, `"ZL"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let button = match name {
            "A" => GamepadButton::A,
            "B" => GamepadButton::B,
            "X" => GamepadButton::X,
            "Y" => GamepadButton::Y,
            "START" => GamepadButton::Start,
            "SELECT" => GamepadButton::Select,
            "L" => GamepadButton::L,
            "R" => GamepadButton::R,
            "ZL" => GamepadButton::Zl,
            "ZR" => GamepadButton::Zr,
            _ => return None,
        };
        Some(button)
    }

    /// Position of this button in a [`KeyRemapTable`].
    pub fn index(self) -> usize {
        self as usize
    }
}

// ── Remap table ───────────────────────────────────────────────────────────────

/// Output button code for each logical gamepad button.
///
/// The fixed-size array makes a table of the wrong length unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRemapTable {
    codes: [u16; GAMEPAD_KEY_COUNT],
}

impl Default for KeyRemapTable {
    fn default() -> Self {
        Self {
            codes: GamepadButton::ALL.map(GamepadButton::default_code),
        }
    }
}

impl KeyRemapTable {
    /// Builds a table directly from output codes in table order.
    pub const fn from_codes(codes: [u16; GAMEPAD_KEY_COUNT]) -> Self {
        Self { codes }
    }

    /// Output codes in table order.
    pub fn codes(&self) -> &[u16; GAMEPAD_KEY_COUNT] {
        &self.codes
    }

    /// Output code currently assigned to `button`.
    pub fn code_for(&self, button: GamepadButton) -> u16 {
        self.codes[button.index()]
    }

    /// Parses keymap text into a new table.
    ///
    /// Surrounding whitespace on each line is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`KeymapError::LineCount`] unless there are exactly
    /// [`GAMEPAD_KEY_COUNT`] lines, and [`KeymapError::UnknownButton`] for the
    /// first line that does not name a gamepad button.
    pub fn parse(text: &str) -> Result<Self, KeymapError> {
        let lines: Vec<&str> = text.lines().collect();
        if lines.len() != GAMEPAD_KEY_COUNT {
            return Err(KeymapError::LineCount {
                expected: GAMEPAD_KEY_COUNT,
                actual: lines.len(),
            });
        }

        let mut codes = [0u16; GAMEPAD_KEY_COUNT];
        for (i, (slot, line)) in codes.iter_mut().zip(&lines).enumerate() {
            let name = line.trim();
            let button = GamepadButton::from_name(name).ok_or_else(|| KeymapError::UnknownButton {
                line: i + 1,
                name: name.to_string(),
            })?;
            *slot = button.default_code();
        }
        Ok(Self { codes })
    }

    /// Reads and parses a keymap file.
    ///
    /// # Errors
    ///
    /// Returns [`KeymapError::Io`] if the file cannot be read, otherwise
    /// whatever [`KeyRemapTable::parse`] returns.
    pub fn load(path: &Path) -> Result<Self, KeymapError> {
        let text = std::fs::read_to_string(path).map_err(|source| KeymapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Replaces this table with the one described by `text`.
    ///
    /// All-or-nothing: on error `self` keeps every code it had before.
    ///
    /// # Errors
    ///
    /// See [`KeyRemapTable::parse`].
    pub fn apply_source(&mut self, text: &str) -> Result<(), KeymapError> {
        *self = Self::parse(text)?;
        Ok(())
    }

    /// Loads `path` if given, falling back to the built-in table on any error.
    ///
    /// Errors are logged, never returned: a bad keymap must not stop the
    /// gamepad from working.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path) {
            Ok(table) => {
                debug!("loaded keymap from {}: {:?}", path.display(), table.codes);
                table
            }
            Err(e) => {
                warn!("{e}; reverting to default keymap");
                Self::default()
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
