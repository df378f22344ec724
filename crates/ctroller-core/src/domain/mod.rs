//! Domain entities for ctroller.
//!
//! Pure data with no infrastructure dependencies: the decoded HID snapshot
//! and the handheld's logical button bits.  Code in outer layers (codec,
//! translators, the daemon) depends on these types, never the other way round.

/// The handheld's logical button bits as they appear in the key masks.
pub mod buttons;

/// One decoded sensor frame.
///
/// See [`snapshot::HidSnapshot`] for the main type.
pub mod snapshot;
