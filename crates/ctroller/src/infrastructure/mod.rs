//! Infrastructure layer for the daemon.
//!
//! Contains OS-facing adapters: virtual device backends, UDP network I/O and
//! configuration storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `ctroller_core`, but MUST NOT be imported by the `application` layer
//! outside of tests.
//!
//! # Sub-modules
//!
//! - **`input_emulation`** – Implementations of `InputPlatform`.  The uinput
//!   backend is compiled on Linux only; a recording `MockPlatform` is always
//!   available for tests and `--dry-run`.
//!
//! - **`network`** – The UDP listener that receives handheld datagrams with a
//!   receive timeout.
//!
//! - **`storage`** – TOML configuration file loading.

pub mod input_emulation;
pub mod network;
pub mod storage;
