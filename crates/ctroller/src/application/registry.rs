//! DeviceRegistry: owns the virtual devices and fans snapshots out to them.
//!
//! The registry sits at the application layer and delegates device creation
//! to an [`InputPlatform`] trait object.  The platform-specific
//! implementations are in the infrastructure layer.
//!
//! Lifecycle: `initialize` (all-or-nothing) → any number of `dispatch` calls
//! → `shutdown`.  Dropping a registry that was not shut down performs the
//! shutdown.

use ctroller_core::{
    translator_for, DeviceKind, DeviceLayout, DeviceMask, DeviceTranslator, HidSnapshot,
    KeyRemapTable, OutputEvent,
};
use thiserror::Error;
use tracing::{debug, error, info};

/// Error type for platform device operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("platform error: {0}")]
    Platform(String),
    #[error("device I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A device could not be created; every device created before it was destroyed.
#[derive(Debug, Error)]
#[error("failed to create {kind} device: {source}")]
pub struct InitError {
    pub kind: DeviceKind,
    #[source]
    pub source: DeviceError,
}

/// A frame could not be written to one device.
#[derive(Debug, Error)]
#[error("failed to write events to {kind} device: {source}")]
pub struct WriteError {
    pub kind: DeviceKind,
    #[source]
    pub source: DeviceError,
}

/// Creates virtual input devices.
///
/// Each supported OS provides an implementation in the infrastructure layer.
#[cfg_attr(test, mockall::automock)]
pub trait InputPlatform {
    /// Creates a device advertising exactly the capabilities in `layout`.
    fn create_device(&self, layout: &DeviceLayout) -> Result<Box<dyn VirtualDevice>, DeviceError>;
}

/// A live virtual device handle.
pub trait VirtualDevice: Send {
    /// Writes one frame, in order, to the device.
    fn write_events(&mut self, events: &[OutputEvent]) -> Result<(), DeviceError>;

    /// Removes the device from the system.
    fn destroy(self: Box<Self>);
}

/// One registry entry: the translator for a kind plus its live handle.
struct DeviceSlot {
    kind: DeviceKind,
    translator: Box<dyn DeviceTranslator>,
    handle: Option<Box<dyn VirtualDevice>>,
}

impl DeviceSlot {
    fn destroy(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.destroy();
            info!(device = %self.kind, "destroyed virtual device");
        }
    }
}

/// The set of live virtual devices, one per enabled kind.
pub struct DeviceRegistry {
    slots: Vec<DeviceSlot>,
}

impl DeviceRegistry {
    /// Creates one device per kind in `mask`, in [`DeviceKind::ALL`] order.
    ///
    /// Every slot gets the kind's own translator; only the gamepad reads
    /// `keymap`.  If any creation fails, the devices created so far are
    /// destroyed in reverse order before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`InitError`] naming the kind whose creation failed.
    pub fn initialize(
        mask: DeviceMask,
        keymap: &KeyRemapTable,
        platform: &dyn InputPlatform,
    ) -> Result<Self, InitError> {
        let mut slots: Vec<DeviceSlot> = Vec::with_capacity(DeviceKind::ALL.len());
        for kind in mask.kinds() {
            let translator = translator_for(kind, keymap);
            let layout = translator.layout();
            match platform.create_device(&layout) {
                Ok(handle) => {
                    info!(device = %kind, name = %layout.name, "created virtual device");
                    slots.push(DeviceSlot {
                        kind,
                        translator,
                        handle: Some(handle),
                    });
                }
                Err(source) => {
                    error!(device = %kind, "device creation failed: {source}");
                    for slot in slots.iter_mut().rev() {
                        slot.destroy();
                    }
                    return Err(InitError { kind, source });
                }
            }
        }

        Ok(Self { slots })
    }

    /// Translates `snapshot` for every live device and writes each frame.
    ///
    /// A failing device does not stop the others; its error is logged and
    /// collected in the returned list.
    pub fn dispatch(&mut self, snapshot: &HidSnapshot) -> Vec<WriteError> {
        let mut failures = Vec::new();
        for slot in &mut self.slots {
            let Some(handle) = slot.handle.as_mut() else {
                continue;
            };
            let events = slot.translator.translate(snapshot);
            if let Err(source) = handle.write_events(&events) {
                error!(device = %slot.kind, "failed to write events: {source}");
                failures.push(WriteError {
                    kind: slot.kind,
                    source,
                });
            }
        }
        failures
    }

    /// Destroys every live device exactly once.  Calling it again is a no-op.
    pub fn shutdown(&mut self) {
        let live = self.slots.iter().filter(|s| s.handle.is_some()).count();
        if live == 0 {
            debug!("device registry already shut down");
            return;
        }
        for slot in self.slots.iter_mut().rev() {
            slot.destroy();
        }
        info!("destroyed {live} virtual device(s)");
    }

    /// Kinds that currently have a live device, in dispatch order.
    pub fn active_kinds(&self) -> Vec<DeviceKind> {
        self.slots
            .iter()
            .filter(|s| s.handle.is_some())
            .map(|s| s.kind)
            .collect()
    }

    pub fn is_shut_down(&self) -> bool {
        self.slots.iter().all(|s| s.handle.is_none())
    }
}

impl Drop for DeviceRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
