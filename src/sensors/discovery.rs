//! Setup-time entity discovery.

use super::description::SensorDescription;
use crate::error::{QuasarError, Result};
use crate::quasar::{Device, DeviceDirectory};
use log::debug;
use std::sync::Arc;

/// One matched (device, property) pair an entity is built from.
#[derive(Debug, Clone)]
pub struct Discovered {
    pub device: Arc<Device>,
    /// Property name as reported by the cloud, copied at setup.
    pub sensor_name: String,
    pub description: &'static SensorDescription,
}

/// Keep devices whose name is in `include` and whose type is accepted.
pub fn filter_devices(
    devices: Vec<Device>,
    include: &[String],
    accepted_types: &[&str],
) -> Vec<Device> {
    devices
        .into_iter()
        .filter(|d| include.iter().any(|name| *name == d.name))
        .filter(|d| accepted_types.iter().any(|t| *t == d.device_type))
        .collect()
}

/// Fetch each accepted device once and emit one descriptor per property
/// matching a known description.
///
/// Devices with no matching properties contribute nothing. A failed fetch or
/// a matched property without a name aborts discovery.
pub async fn discover(
    directory: &dyn DeviceDirectory,
    include: &[String],
    accepted_types: &[&str],
    descriptions: &'static [SensorDescription],
) -> Result<Vec<Discovered>> {
    let mut found = Vec::new();

    for device in filter_devices(directory.devices(), include, accepted_types) {
        let snapshot = directory.get_device(&device.id).await?;
        let device = Arc::new(device);

        for prop in &snapshot.properties {
            for description in descriptions.iter().filter(|d| d.matches(prop.instance())) {
                let sensor_name = prop.name().ok_or_else(|| {
                    QuasarError::malformed(&device.id, prop.instance(), "missing parameters.name")
                })?;
                debug!(
                    "Discovered {} on {} ({})",
                    description.key, device.name, device.id
                );
                found.push(Discovered {
                    device: device.clone(),
                    sensor_name: sensor_name.to_string(),
                    description,
                });
            }
        }
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quasar::{MemoryDirectory, Property};
    use crate::sensors::description::{
        BINARY_SENSOR_DEVICES, BINARY_SENSOR_TYPES, SENSOR_DEVICES, SENSOR_TYPES, SensorKey,
    };
    use serde_json::json;

    fn prop(instance: &str, name: &str) -> Property {
        serde_json::from_value(json!({
            "parameters": {"instance": instance, "name": name},
            "state": {"value": 1},
            "last_updated": 1700000000
        }))
        .unwrap()
    }

    fn include(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_requires_name_and_type() {
        let devices = vec![
            Device::new("1", "Hall", "devices.types.sensor"),
            Device::new("2", "Hall Lamp", "devices.types.light"),
            Device::new("3", "Kitchen", "devices.types.sensor"),
            Device::new("4", "Bedroom", "devices.types.humidifier"),
        ];

        let kept = filter_devices(
            devices.clone(),
            &include(&["Hall", "Hall Lamp", "Bedroom"]),
            SENSOR_DEVICES,
        );
        let ids: Vec<_> = kept.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);

        let kept = filter_devices(devices, &include(&["Hall", "Bedroom"]), BINARY_SENSOR_DEVICES);
        let ids: Vec<_> = kept.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);
    }

    #[tokio::test]
    async fn test_one_descriptor_per_matching_property() {
        let directory = MemoryDirectory::new();
        directory.insert(
            Device::new("ab-cd", "Hall", "devices.types.sensor"),
            vec![
                prop("temperature", "температура"),
                prop("humidity", "влажность"),
                prop("battery_level", "заряд"),
                prop("motion", "движение"),
            ],
        );

        let found = discover(&directory, &include(&["Hall"]), SENSOR_DEVICES, SENSOR_TYPES)
            .await
            .unwrap();
        let keys: Vec<_> = found.iter().map(|d| d.description.key).collect();
        assert_eq!(
            keys,
            vec![SensorKey::Temperature, SensorKey::Humidity, SensorKey::Motion]
        );
        assert_eq!(found[0].sensor_name, "температура");
        assert!(Arc::ptr_eq(&found[0].device, &found[2].device));

        let found = discover(
            &directory,
            &include(&["Hall"]),
            BINARY_SENSOR_DEVICES,
            BINARY_SENSOR_TYPES,
        )
        .await
        .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].sensor_name, "движение");
    }

    #[tokio::test]
    async fn test_excluded_devices_are_not_fetched() {
        let directory = MemoryDirectory::new();
        directory.insert(
            Device::new("1", "Hall", "devices.types.sensor"),
            vec![prop("temperature", "t")],
        );
        directory.insert(
            Device::new("2", "Lamp", "devices.types.light"),
            vec![prop("temperature", "t")],
        );

        let found = discover(&directory, &include(&["Lamp"]), SENSOR_DEVICES, SENSOR_TYPES)
            .await
            .unwrap();
        assert!(found.is_empty());
        assert_eq!(directory.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_device_without_matches_contributes_nothing() {
        let directory = MemoryDirectory::new();
        directory.insert(
            Device::new("1", "Hall", "devices.types.sensor"),
            vec![prop("battery_level", "заряд")],
        );

        let found = discover(&directory, &include(&["Hall"]), SENSOR_DEVICES, SENSOR_TYPES)
            .await
            .unwrap();
        assert!(found.is_empty());
        assert_eq!(directory.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_matched_property_without_name_is_malformed() {
        let directory = MemoryDirectory::new();
        let unnamed: Property = serde_json::from_value(json!({
            "parameters": {"instance": "humidity"},
            "state": {"value": 40}
        }))
        .unwrap();
        let unnamed_battery: Property = serde_json::from_value(json!({
            "parameters": {"instance": "battery_level"},
            "state": {"value": 90}
        }))
        .unwrap();
        directory.insert(
            Device::new("1", "Hall", "devices.types.sensor"),
            vec![prop("temperature", "t"), unnamed_battery, unnamed],
        );

        let err = discover(&directory, &include(&["Hall"]), SENSOR_DEVICES, SENSOR_TYPES)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            QuasarError::MalformedProperty { ref instance, .. } if instance == "humidity"
        ));
    }

    struct Unreachable;

    #[async_trait::async_trait]
    impl DeviceDirectory for Unreachable {
        fn devices(&self) -> Vec<Device> {
            vec![Device::new("1", "Hall", "devices.types.sensor")]
        }

        async fn get_device(&self, _id: &str) -> Result<crate::quasar::DeviceSnapshot> {
            Err(QuasarError::Fetch("timed out".into()))
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts() {
        let result =
            discover(&Unreachable, &include(&["Hall"]), SENSOR_DEVICES, SENSOR_TYPES).await;
        assert!(matches!(result, Err(QuasarError::Fetch(_))));
    }
}
