//! Gyroscope and accelerometer translators.
//!
//! Both sensors are three raw `i16` axes and share one translator; the
//! [`MotionSensor`] picks which half of the snapshot it reads.

use crate::device::event::OutputEvent;
use crate::device::layout::{AxisSetup, DeviceId, DeviceLayout};
use crate::device::{DeviceKind, DeviceTranslator};
use crate::domain::snapshot::{HidSnapshot, MotionVector};
use crate::keymap::codes::{ABS_X, ABS_Y, ABS_Z};

/// Which motion sensor a [`MotionTranslator`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionSensor {
    Gyroscope,
    Accelerometer,
}

impl MotionSensor {
    fn read(self, snapshot: &HidSnapshot) -> MotionVector {
        match self {
            MotionSensor::Gyroscope => snapshot.gyro,
            MotionSensor::Accelerometer => snapshot.accel,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MotionTranslator {
    sensor: MotionSensor,
}

impl MotionTranslator {
    pub fn new(sensor: MotionSensor) -> Self {
        Self { sensor }
    }
}

impl DeviceTranslator for MotionTranslator {
    fn kind(&self) -> DeviceKind {
        match self.sensor {
            MotionSensor::Gyroscope => DeviceKind::Gyroscope,
            MotionSensor::Accelerometer => DeviceKind::Accelerometer,
        }
    }

    fn layout(&self) -> DeviceLayout {
        let (name, product) = match self.sensor {
            MotionSensor::Gyroscope => ("Nintendo 3DS Gyroscope", 0x0403),
            MotionSensor::Accelerometer => ("Nintendo 3DS Accelerometer", 0x0404),
        };
        let full = |code| AxisSetup::new(code, i32::from(i16::MIN), i32::from(i16::MAX));
        DeviceLayout {
            name: name.to_string(),
            id: DeviceId::handheld(product),
            buttons: Vec::new(),
            axes: vec![full(ABS_X), full(ABS_Y), full(ABS_Z)],
        }
    }

    fn translate(&self, snapshot: &HidSnapshot) -> Vec<OutputEvent> {
        let v = self.sensor.read(snapshot);
        vec![
            OutputEvent::axis(ABS_X, i32::from(v.x)),
            OutputEvent::axis(ABS_Y, i32::from(v.y)),
            OutputEvent::axis(ABS_Z, i32::from(v.z)),
            OutputEvent::Sync,
        ]
    }
}
