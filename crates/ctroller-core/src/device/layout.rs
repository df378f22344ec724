//! Static description of a virtual device's capabilities.
//!
//! A platform backend creates the host device from a [`DeviceLayout`]; it
//! never needs to know which device kind it is building.

/// Bus type reported for virtual devices (`BUS_VIRTUAL`).
pub const BUS_VIRTUAL: u16 = 0x06;

/// USB vendor id of the handheld's manufacturer.
pub const HANDHELD_VENDOR_ID: u16 = 0x057E;

/// Identity the virtual device reports to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceId {
    pub bustype: u16,
    pub vendor: u16,
    pub product: u16,
    pub version: u16,
}

impl DeviceId {
    /// A virtual-bus identity under the handheld's vendor id.
    pub const fn handheld(product: u16) -> Self {
        Self {
            bustype: BUS_VIRTUAL,
            vendor: HANDHELD_VENDOR_ID,
            product,
            version: 1,
        }
    }
}

/// Range and noise filtering for one absolute axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSetup {
    pub code: u16,
    pub min: i32,
    pub max: i32,
    /// Values within `fuzz` of the previous one are dropped by the kernel.
    pub fuzz: i32,
    /// Values within `flat` of centre are reported as centre.
    pub flat: i32,
}

impl AxisSetup {
    pub const fn new(code: u16, min: i32, max: i32) -> Self {
        Self {
            code,
            min,
            max,
            fuzz: 0,
            flat: 0,
        }
    }

    pub const fn with_filtering(mut self, fuzz: i32, flat: i32) -> Self {
        self.fuzz = fuzz;
        self.flat = flat;
        self
    }
}

/// Everything needed to create one virtual device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceLayout {
    pub name: String,
    pub id: DeviceId,
    /// `EV_KEY` codes the device can emit.
    pub buttons: Vec<u16>,
    /// `EV_ABS` axes the device can emit.
    pub axes: Vec<AxisSetup>,
}
