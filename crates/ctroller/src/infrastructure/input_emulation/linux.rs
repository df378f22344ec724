//! Linux virtual devices via uinput.
//!
//! Each [`DeviceLayout`] becomes one `/dev/uinput` device advertising exactly
//! the layout's `EV_KEY` codes and `EV_ABS` axes.  Frames are written with
//! `VirtualDevice::emit`, which appends its own `SYN_REPORT`; the frame's
//! trailing [`OutputEvent::Sync`] is therefore not forwarded, so the kernel
//! sees exactly one report per frame.
//!
//! # Permissions
//!
//! Opening `/dev/uinput` normally requires root or membership of a group
//! granted access by a udev rule.  Without it, creation fails with an
//! `Io(PermissionDenied)` error and the daemon exits at startup.
//!
//! The node is always the default `/dev/uinput` opened by evdev; no
//! alternative path can be configured.

use evdev::uinput::{VirtualDevice as UinputDevice, VirtualDeviceBuilder};
use evdev::{
    AbsInfo, AbsoluteAxisType, AttributeSet, BusType, EventType, InputEvent, InputId, Key,
    UinputAbsSetup,
};
use tracing::debug;

use ctroller_core::{DeviceLayout, OutputEvent};

use crate::application::registry::{DeviceError, InputPlatform, VirtualDevice};

/// Creates uinput-backed virtual devices.
#[derive(Debug, Default, Clone, Copy)]
pub struct UinputPlatform;

impl UinputPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl InputPlatform for UinputPlatform {
    fn create_device(&self, layout: &DeviceLayout) -> Result<Box<dyn VirtualDevice>, DeviceError> {
        let id = InputId::new(
            BusType(layout.id.bustype),
            layout.id.vendor,
            layout.id.product,
            layout.id.version,
        );
        let mut builder = VirtualDeviceBuilder::new()?.name(&layout.name).input_id(id);

        if !layout.buttons.is_empty() {
            let mut keys = AttributeSet::<Key>::new();
            for &code in &layout.buttons {
                keys.insert(Key::new(code));
            }
            builder = builder.with_keys(&keys)?;
        }

        for axis in &layout.axes {
            let info = AbsInfo::new(0, axis.min, axis.max, axis.fuzz, axis.flat, 0);
            let setup = UinputAbsSetup::new(AbsoluteAxisType(axis.code), info);
            builder = builder.with_absolute_axis(&setup)?;
        }

        let device = builder.build()?;
        debug!(
            name = %layout.name,
            buttons = layout.buttons.len(),
            axes = layout.axes.len(),
            "uinput device registered"
        );
        Ok(Box::new(UinputHandle {
            name: layout.name.clone(),
            device,
        }))
    }
}

/// A live uinput device.  Dropping it closes the uinput file, which removes
/// the device from the system.
struct UinputHandle {
    name: String,
    device: UinputDevice,
}

impl VirtualDevice for UinputHandle {
    fn write_events(&mut self, events: &[OutputEvent]) -> Result<(), DeviceError> {
        let raw: Vec<InputEvent> = events
            .iter()
            .filter(|event| !event.is_sync())
            .map(|event| to_input_event(*event))
            .collect();
        self.device.emit(&raw)?;
        Ok(())
    }

    fn destroy(self: Box<Self>) {
        debug!(name = %self.name, "closing uinput device");
        drop(self);
    }
}

fn to_input_event(event: OutputEvent) -> InputEvent {
    let (kind, code, value) = event.to_raw();
    InputEvent::new(EventType(kind), code, value)
}
