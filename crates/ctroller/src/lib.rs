//! ctroller library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does ctroller do?
//!
//! A handheld console on the local network runs a small streaming app that
//! sends its complete input state (buttons, touch point, both sticks, gyro
//! and accelerometer) to this host roughly once per frame.  The daemon:
//!
//! 1. Creates one virtual input device per enabled kind (gamepad,
//!    touchscreen, gyroscope, accelerometer) through the platform's virtual
//!    device layer (`uinput` on Linux).
//! 2. Listens on a UDP port and decodes every datagram into a `HidSnapshot`.
//! 3. Translates the snapshot into an ordered event frame per device and
//!    writes each frame to its device.
//! 4. Returns every device to rest when the handheld goes silent, and
//!    destroys the devices on shutdown.

/// Application layer: device registry and the forward-input use case.
pub mod application;

/// Infrastructure layer: platform device backends, UDP listener and config storage.
pub mod infrastructure;
