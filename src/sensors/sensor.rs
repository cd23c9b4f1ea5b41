//! Multi-value sensor: temperature, humidity, pressure, illumination, motion.

use super::description::{SENSOR_DEVICES, SENSOR_TYPES, SensorDescription, SensorKey};
use super::discovery::{Discovered, discover};
use super::{entity_name, entity_unique_id};
use crate::config::DOMAIN;
use crate::error::{QuasarError, Result};
use crate::platform::{ConfigEntry, Entity, EntityPlatform, HostData, NativeValue, StateClass};
use crate::quasar::{Device, DeviceDirectory};
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

/// Motion value reported when a snapshot carries no motion event.
pub const MOTION_CLEARED: &str = "cleared";

/// Last known value of every field a multi-value sensor tracks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorReadings {
    pub temperature: Option<NativeValue>,
    pub humidity: Option<NativeValue>,
    pub pressure: Option<NativeValue>,
    pub illumination: Option<NativeValue>,
    pub motion: Option<NativeValue>,
}

impl SensorReadings {
    pub fn get(&self, key: SensorKey) -> Option<&NativeValue> {
        match key {
            SensorKey::Temperature => self.temperature.as_ref(),
            SensorKey::Humidity => self.humidity.as_ref(),
            SensorKey::Pressure => self.pressure.as_ref(),
            SensorKey::Illumination => self.illumination.as_ref(),
            SensorKey::Motion => self.motion.as_ref(),
        }
    }

    fn slot_mut(&mut self, key: SensorKey) -> &mut Option<NativeValue> {
        match key {
            SensorKey::Temperature => &mut self.temperature,
            SensorKey::Humidity => &mut self.humidity,
            SensorKey::Pressure => &mut self.pressure,
            SensorKey::Illumination => &mut self.illumination,
            SensorKey::Motion => &mut self.motion,
        }
    }
}

pub struct QuasarSensor {
    directory: Arc<dyn DeviceDirectory>,
    device: Arc<Device>,
    sensor_name: String,
    description: &'static SensorDescription,
    readings: SensorReadings,
}

impl QuasarSensor {
    pub fn new(directory: Arc<dyn DeviceDirectory>, discovered: Discovered) -> Self {
        Self {
            directory,
            device: discovered.device,
            sensor_name: discovered.sensor_name,
            description: discovered.description,
            readings: SensorReadings::default(),
        }
    }

    pub fn readings(&self) -> &SensorReadings {
        &self.readings
    }

    pub fn description(&self) -> &'static SensorDescription {
        self.description
    }
}

#[async_trait]
impl Entity for QuasarSensor {
    fn unique_id(&self) -> String {
        entity_unique_id(&self.device, self.description)
    }

    fn name(&self) -> String {
        entity_name(&self.device, &self.sensor_name)
    }

    fn native_value(&self) -> Option<NativeValue> {
        self.readings.get(self.description.key).cloned()
    }

    fn unit_of_measurement(&self) -> Option<&'static str> {
        self.description.unit
    }

    fn state_class(&self) -> Option<StateClass> {
        self.description.state_class
    }

    /// Overwrite every field whose instance is present in a fresh snapshot.
    ///
    /// Absent fields keep their cached value, except motion, which falls back
    /// to [`MOTION_CLEARED`]. Nothing changes if any matched property is
    /// malformed.
    async fn update(&mut self) -> Result<()> {
        let snapshot = self.directory.get_device(&self.device.id).await?;
        let mut staged = self.readings.clone();
        let mut motion_seen = false;

        for prop in &snapshot.properties {
            let Ok(key) = prop.instance().parse::<SensorKey>() else {
                continue;
            };
            let raw = prop.value().ok_or_else(|| {
                QuasarError::malformed(&self.device.id, prop.instance(), "missing state.value")
            })?;
            let value = NativeValue::from_state(raw).map_err(|reason| {
                QuasarError::malformed(&self.device.id, prop.instance(), reason)
            })?;

            *staged.slot_mut(key) = value;
            if key == SensorKey::Motion {
                motion_seen = true;
            }
        }

        if !motion_seen {
            staged.motion = Some(NativeValue::from(MOTION_CLEARED));
        }

        if staged != self.readings {
            debug!("{} readings changed: {:?}", self.device.name, staged);
        }
        self.readings = staged;
        Ok(())
    }
}

/// Create multi-value sensors for every included device of a config entry
/// and register them with `platform`.
pub async fn setup_entry(
    host: &HostData,
    entry: &ConfigEntry,
    platform: &mut EntityPlatform,
) -> Result<usize> {
    let include = host.include(DOMAIN)?;
    let directory = host.directory(DOMAIN, &entry.unique_id)?;

    let found = discover(directory.as_ref(), &include, SENSOR_DEVICES, SENSOR_TYPES).await?;

    let entities: Vec<Box<dyn Entity>> = found
        .into_iter()
        .map(|d| Box::new(QuasarSensor::new(directory.clone(), d)) as Box<dyn Entity>)
        .collect();

    Ok(platform.add_entities(entities, true).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quasar::{MemoryDirectory, Property};
    use serde_json::{Value, json};
    use tokio_test::{assert_err, assert_ok};

    const DEVICE_ID: &str = "5e7a-01";

    fn prop(instance: &str, value: Value) -> Property {
        serde_json::from_value(json!({
            "parameters": {"instance": instance, "name": format!("{instance} name")},
            "state": {"value": value},
            "last_updated": 1700000000
        }))
        .unwrap()
    }

    fn directory_with(properties: Vec<Property>) -> Arc<MemoryDirectory> {
        let directory = Arc::new(MemoryDirectory::new());
        directory.insert(
            Device::new(DEVICE_ID, "Bedroom", "devices.types.sensor"),
            properties,
        );
        directory
    }

    fn sensor(directory: &Arc<MemoryDirectory>, key: SensorKey) -> QuasarSensor {
        let description = SENSOR_TYPES.iter().find(|d| d.key == key).unwrap();
        QuasarSensor::new(
            directory.clone(),
            Discovered {
                device: Arc::new(Device::new(DEVICE_ID, "Bedroom", "devices.types.sensor")),
                sensor_name: format!("{key} name"),
                description,
            },
        )
    }

    #[tokio::test]
    async fn test_update_sets_present_fields() {
        let directory = directory_with(vec![
            prop("temperature", json!(21.5)),
            prop("humidity", json!(40)),
            prop("pressure", json!(745)),
            prop("illumination", json!(120)),
            prop("motion", json!("detected")),
        ]);
        let mut sensor = sensor(&directory, SensorKey::Humidity);

        sensor.update().await.unwrap();
        let readings = sensor.readings();
        assert_eq!(readings.temperature, NativeValue::from_f64(21.5));
        assert_eq!(readings.pressure, Some(NativeValue::from(745)));
        assert_eq!(readings.illumination, Some(NativeValue::from(120)));
        assert_eq!(readings.motion, Some(NativeValue::from("detected")));
        assert_eq!(sensor.native_value(), Some(NativeValue::from(40)));
    }

    #[tokio::test]
    async fn test_missing_motion_becomes_cleared() {
        let directory = directory_with(vec![prop("temperature", json!(21.5))]);
        let mut sensor = sensor(&directory, SensorKey::Motion);

        sensor.update().await.unwrap();
        assert_eq!(sensor.native_value(), Some(NativeValue::from("cleared")));
        assert_eq!(sensor.readings().motion.as_ref().and_then(|m| m.as_str()), Some("cleared"));
    }

    #[tokio::test]
    async fn test_motion_cleared_after_event() {
        let directory = directory_with(vec![prop("motion", json!("detected"))]);
        let mut sensor = sensor(&directory, SensorKey::Motion);
        sensor.update().await.unwrap();
        assert_eq!(sensor.native_value(), Some(NativeValue::from("detected")));

        directory.set_properties(DEVICE_ID, vec![]);
        assert_ok!(sensor.update().await);
        assert_eq!(sensor.native_value(), Some(NativeValue::from("cleared")));
    }

    #[tokio::test]
    async fn test_absent_temperature_keeps_cached_value() {
        let directory = directory_with(vec![prop("temperature", json!(21.5))]);
        let mut sensor = sensor(&directory, SensorKey::Temperature);
        sensor.update().await.unwrap();
        assert_eq!(sensor.native_value(), NativeValue::from_f64(21.5));

        directory.set_properties(DEVICE_ID, vec![prop("humidity", json!(55))]);
        assert_ok!(sensor.update().await);
        assert_eq!(sensor.native_value(), NativeValue::from_f64(21.5));
        assert_eq!(sensor.readings().humidity, Some(NativeValue::from(55)));
    }

    #[tokio::test]
    async fn test_null_value_unsets_field() {
        let directory = directory_with(vec![prop("pressure", json!(745))]);
        let mut sensor = sensor(&directory, SensorKey::Pressure);
        sensor.update().await.unwrap();

        directory.set_properties(DEVICE_ID, vec![prop("pressure", Value::Null)]);
        sensor.update().await.unwrap();
        assert_eq!(sensor.native_value(), None);
    }

    #[tokio::test]
    async fn test_unknown_instances_ignored() {
        let directory = directory_with(vec![
            prop("battery_level", json!(90)),
            prop("temperature", json!(19)),
        ]);
        let mut sensor = sensor(&directory, SensorKey::Temperature);
        sensor.update().await.unwrap();
        assert_eq!(sensor.native_value(), Some(NativeValue::from(19)));
    }

    #[tokio::test]
    async fn test_malformed_property_leaves_readings_untouched() {
        let directory = directory_with(vec![prop("temperature", json!(21.5))]);
        let mut sensor = sensor(&directory, SensorKey::Temperature);
        sensor.update().await.unwrap();
        let before = sensor.readings().clone();

        let stateless: Property = serde_json::from_value(json!({
            "parameters": {"instance": "humidity", "name": "h"}
        }))
        .unwrap();
        directory.set_properties(
            DEVICE_ID,
            vec![prop("temperature", json!(30)), stateless],
        );

        let err = sensor.update().await.unwrap_err();
        assert!(matches!(
            err,
            QuasarError::MalformedProperty { ref instance, .. } if instance == "humidity"
        ));
        assert_eq!(sensor.readings(), &before);

        directory.set_properties(DEVICE_ID, vec![prop("temperature", json!({"v": 1}))]);
        assert_err!(sensor.update().await);
        assert_eq!(sensor.readings(), &before);
    }

    #[tokio::test]
    async fn test_state_without_value_is_malformed() {
        let directory = directory_with(vec![prop("temperature", json!(21.5))]);
        let mut sensor = sensor(&directory, SensorKey::Temperature);
        sensor.update().await.unwrap();

        let valueless: Property = serde_json::from_value(json!({
            "parameters": {"instance": "temperature", "name": "t"},
            "state": {}
        }))
        .unwrap();
        directory.set_properties(DEVICE_ID, vec![valueless]);

        let err = sensor.update().await.unwrap_err();
        assert!(matches!(
            err,
            QuasarError::MalformedProperty { ref instance, .. } if instance == "temperature"
        ));
        assert_eq!(sensor.native_value(), NativeValue::from_f64(21.5));
    }

    #[tokio::test]
    async fn test_native_value_only_reads_own_key() {
        let directory = directory_with(vec![
            prop("temperature", json!(21.5)),
            prop("humidity", json!(40)),
        ]);
        let mut temperature = sensor(&directory, SensorKey::Temperature);
        let mut humidity = sensor(&directory, SensorKey::Humidity);
        temperature.update().await.unwrap();
        humidity.update().await.unwrap();

        assert_eq!(temperature.native_value(), NativeValue::from_f64(21.5));
        assert_eq!(humidity.native_value(), Some(NativeValue::from(40)));
        // Each entity fetches on its own.
        assert_eq!(directory.fetch_count(), 2);
    }

    #[test]
    fn test_fields_start_unset() {
        let directory = directory_with(vec![]);
        let sensor = sensor(&directory, SensorKey::Illumination);
        assert_eq!(sensor.readings(), &SensorReadings::default());
        assert_eq!(sensor.native_value(), None);
    }

    #[test]
    fn test_metadata() {
        let directory = directory_with(vec![]);
        let sensor = sensor(&directory, SensorKey::Temperature);
        assert_eq!(sensor.unique_id(), "5e7a01: Temperature");
        assert_eq!(sensor.name(), "Bedroom: temperature name");
        assert_eq!(sensor.unit_of_measurement(), Some("°C"));
        assert_eq!(sensor.state_class(), Some(StateClass::Measurement));
        assert_eq!(sensor.device_class(), None);
        assert_eq!(sensor.description().key, SensorKey::Temperature);
    }
}
