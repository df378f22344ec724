//! Mock input platform that records device activity instead of touching the OS.
//!
//! Creating real virtual devices needs `/dev/uinput` access and changes the
//! host's input device list, so tests (and `--dry-run`) use `MockPlatform`
//! instead.  Every created layout, written frame and destroyed device is
//! pushed into an `Arc<Mutex<Vec<...>>>` shared between the platform and the
//! devices it hands out, so assertions can inspect exactly what was written
//! and in what order even after the devices moved into a registry.
//!
//! # Usage in tests
//!
//! ```ignore
//! let platform = MockPlatform::new();
//! let mut registry = DeviceRegistry::initialize(mask, translators, &platform)?;
//!
//! registry.dispatch(&snapshot);
//!
//! let frames = platform.frames_for("Nintendo 3DS");
//! assert_eq!(frames.len(), 1);
//! ```
//!
//! # Failure injection
//!
//! Set `fail_create` or `fail_write` to a device name to make creation or
//! every write of that device fail with `DeviceError::Platform`.

use std::sync::{Arc, Mutex};

use ctroller_core::{DeviceLayout, OutputEvent};
use tracing::debug;

use crate::application::registry::{DeviceError, InputPlatform, VirtualDevice};

/// A platform that records all calls without creating OS devices.
///
/// Cloning shares the records.
#[derive(Clone)]
pub struct MockPlatform {
    /// Every layout passed to `create_device` that succeeded.
    pub created: Arc<Mutex<Vec<DeviceLayout>>>,
    /// (device name, frame) for each `write_events` call, in call order.
    pub frames: Arc<Mutex<Vec<(String, Vec<OutputEvent>)>>>,
    /// Names of destroyed devices, in destruction order.
    pub destroyed: Arc<Mutex<Vec<String>>>,
    /// Device name whose creation fails.
    pub fail_create: Option<String>,
    /// Device name whose writes fail.
    pub fail_write: Option<String>,
    /// When `false`, frames are only logged, never stored.
    pub record_frames: bool,
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self {
            created: Arc::default(),
            frames: Arc::default(),
            destroyed: Arc::default(),
            fail_create: None,
            fail_write: None,
            record_frames: true,
        }
    }
}

impl MockPlatform {
    /// Creates a `MockPlatform` with empty records and no failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// A platform for dry runs: frames are logged at debug level and dropped.
    pub fn logging_only() -> Self {
        Self {
            record_frames: false,
            ..Self::default()
        }
    }

    /// All frames written to the device called `name`, oldest first.
    pub fn frames_for(&self, name: &str) -> Vec<Vec<OutputEvent>> {
        self.frames
            .lock()
            .unwrap()
            .iter()
            .filter(|(device, _)| device == name)
            .map(|(_, frame)| frame.clone())
            .collect()
    }
}

impl InputPlatform for MockPlatform {
    fn create_device(&self, layout: &DeviceLayout) -> Result<Box<dyn VirtualDevice>, DeviceError> {
        if self.fail_create.as_deref() == Some(layout.name.as_str()) {
            return Err(DeviceError::Platform("mock failure".into()));
        }
        self.created.lock().unwrap().push(layout.clone());
        Ok(Box::new(MockDevice {
            name: layout.name.clone(),
            frames: Arc::clone(&self.frames),
            destroyed: Arc::clone(&self.destroyed),
            fail_writes: self.fail_write.as_deref() == Some(layout.name.as_str()),
            record_frames: self.record_frames,
        }))
    }
}

struct MockDevice {
    name: String,
    frames: Arc<Mutex<Vec<(String, Vec<OutputEvent>)>>>,
    destroyed: Arc<Mutex<Vec<String>>>,
    fail_writes: bool,
    record_frames: bool,
}

impl VirtualDevice for MockDevice {
    fn write_events(&mut self, events: &[OutputEvent]) -> Result<(), DeviceError> {
        if self.fail_writes {
            return Err(DeviceError::Platform("mock failure".into()));
        }
        debug!(device = %self.name, "frame: {events:?}");
        if self.record_frames {
            self.frames
                .lock()
                .unwrap()
                .push((self.name.clone(), events.to_vec()));
        }
        Ok(())
    }

    fn destroy(self: Box<Self>) {
        self.destroyed.lock().unwrap().push(self.name);
    }
}
