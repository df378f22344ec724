//! Platform virtual device implementations.
//!
//! The uinput backend is selected at compile time via `#[cfg(target_os = "linux")]`.

pub mod mock;

#[cfg(target_os = "linux")]
pub mod linux;
