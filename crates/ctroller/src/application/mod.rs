//! Application layer use cases for the daemon.
//!
//! - **`registry`** – Owns the set of virtual devices.  It creates one device
//!   per enabled kind through an injected `InputPlatform`, fans every
//!   snapshot out to them, and destroys them on shutdown.
//!
//! - **`forward_input`** – Turns raw datagrams and receive timeouts into
//!   registry dispatches, tracking whether a handheld is currently streaming.

pub mod forward_input;
pub mod registry;
