//! Sensor platforms for Quasar devices.
//!
//! Both platforms follow the same flow: at setup they filter the device
//! directory by name and type, fetch each accepted device once, and build one
//! entity per property matching a known [`SensorKey`]. Each entity then
//! refreshes its own cache from a fresh snapshot on every update.

pub mod binary_sensor;
pub mod description;
pub mod discovery;
pub mod sensor;

pub use binary_sensor::{MotionState, QuasarBinarySensor};
pub use description::{SensorDescription, SensorKey};
pub use discovery::{Discovered, discover, filter_devices};
pub use sensor::{QuasarSensor, SensorReadings};

use crate::quasar::Device;

/// Stable entity id: device id without hyphens plus the description name.
pub fn entity_unique_id(device: &Device, description: &SensorDescription) -> String {
    format!("{}: {}", device.id.replace('-', ""), description.name)
}

/// Display name: device name plus the property name reported by the cloud.
pub fn entity_name(device: &Device, sensor_name: &str) -> String {
    format!("{}: {}", device.name, sensor_name)
}
