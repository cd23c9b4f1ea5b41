//! Sensor descriptions and the device types each platform accepts.

use crate::platform::{DeviceClass, StateClass};
use strum::{AsRefStr, Display, EnumIter, EnumString};

pub const TEMP_CELSIUS: &str = "°C";
pub const PERCENTAGE: &str = "%";
pub const PRESSURE_MMHG: &str = "mmHg";
pub const LIGHT_LUX: &str = "lx";

/// Device types the multi-value sensor platform exposes.
pub const SENSOR_DEVICES: &[&str] = &["devices.types.humidifier", "devices.types.sensor"];

/// Device types the binary sensor platform exposes.
pub const BINARY_SENSOR_DEVICES: &[&str] = &["devices.types.sensor"];

/// Property instances this integration knows how to read.
///
/// Parses from and displays as the wire instance name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum SensorKey {
    Temperature,
    Humidity,
    Pressure,
    Illumination,
    Motion,
}

/// Fixed per-entity metadata chosen at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorDescription {
    pub key: SensorKey,
    /// Display name, also part of the entity unique id.
    pub name: &'static str,
    pub unit: Option<&'static str>,
    pub device_class: Option<DeviceClass>,
    pub state_class: Option<StateClass>,
}

impl SensorDescription {
    /// Whether a property instance name selects this description.
    pub fn matches(&self, instance: &str) -> bool {
        self.key.as_ref() == instance
    }
}

pub const SENSOR_TYPES: &[SensorDescription] = &[
    SensorDescription {
        key: SensorKey::Temperature,
        name: "Temperature",
        unit: Some(TEMP_CELSIUS),
        device_class: None,
        state_class: Some(StateClass::Measurement),
    },
    SensorDescription {
        key: SensorKey::Humidity,
        name: "Humidity",
        unit: Some(PERCENTAGE),
        device_class: None,
        state_class: Some(StateClass::Measurement),
    },
    SensorDescription {
        key: SensorKey::Pressure,
        name: "Pressure",
        unit: Some(PRESSURE_MMHG),
        device_class: None,
        state_class: Some(StateClass::Measurement),
    },
    SensorDescription {
        key: SensorKey::Illumination,
        name: "Illumination",
        unit: Some(LIGHT_LUX),
        device_class: None,
        state_class: Some(StateClass::Measurement),
    },
    SensorDescription {
        key: SensorKey::Motion,
        name: "Motion",
        unit: None,
        device_class: None,
        state_class: Some(StateClass::Measurement),
    },
];

pub const BINARY_SENSOR_TYPES: &[SensorDescription] = &[SensorDescription {
    key: SensorKey::Motion,
    name: "Motion",
    unit: None,
    device_class: Some(DeviceClass::Motion),
    state_class: None,
}];
