//! Motion binary sensor driven by how long ago motion was last reported.
//!
//! The state is derived, not read: each update looks at the `motion`
//! property's `last_updated` timestamp and compares the elapsed time with
//! [`TIMEOUT_SEC`]. The sensor reports `On` once the quiet period has been
//! exceeded and `Off` while motion is recent.

use super::description::{BINARY_SENSOR_DEVICES, BINARY_SENSOR_TYPES, SensorDescription, SensorKey};
use super::discovery::{Discovered, discover};
use super::{entity_name, entity_unique_id};
use crate::config::DOMAIN;
use crate::error::{QuasarError, Result};
use crate::platform::{ConfigEntry, DeviceClass, Entity, EntityPlatform, HostData, NativeValue};
use crate::quasar::{Device, DeviceDirectory};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use std::sync::Arc;
use strum::{AsRefStr, Display};

/// Quiet period after the last motion report, in seconds.
pub const TIMEOUT_SEC: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum MotionState {
    On,
    Off,
}

impl MotionState {
    /// `On` when more than [`TIMEOUT_SEC`] have passed, `Off` otherwise.
    pub fn from_elapsed(elapsed_secs: f64) -> Self {
        if elapsed_secs > TIMEOUT_SEC {
            MotionState::On
        } else {
            MotionState::Off
        }
    }
}

pub struct QuasarBinarySensor {
    directory: Arc<dyn DeviceDirectory>,
    device: Arc<Device>,
    sensor_name: String,
    description: &'static SensorDescription,
    motion: Option<MotionState>,
}

impl QuasarBinarySensor {
    pub fn new(directory: Arc<dyn DeviceDirectory>, discovered: Discovered) -> Self {
        Self {
            directory,
            device: discovered.device,
            sensor_name: discovered.sensor_name,
            description: discovered.description,
            motion: None,
        }
    }

    pub fn motion(&self) -> Option<MotionState> {
        self.motion
    }

    pub fn is_on(&self) -> Option<bool> {
        self.motion.map(|m| m == MotionState::On)
    }

    /// Refresh against an explicit current time.
    ///
    /// A snapshot without a `motion` entry leaves the cached state untouched.
    /// When several entries exist the last one wins.
    pub async fn update_at(&mut self, now: DateTime<Utc>) -> Result<()> {
        let snapshot = self.directory.get_device(&self.device.id).await?;
        let now_secs = now.timestamp_millis() as f64 / 1000.0;

        let mut state = None;
        for prop in snapshot.instances(SensorKey::Motion.as_ref()) {
            let last_updated = prop.last_updated.ok_or_else(|| {
                QuasarError::malformed(&self.device.id, prop.instance(), "missing last_updated")
            })?;
            state = Some(MotionState::from_elapsed((now_secs - last_updated).abs()));
        }

        if let Some(state) = state {
            if self.motion != Some(state) {
                debug!("{} motion is now {}", self.device.name, state);
            }
            self.motion = Some(state);
        }
        Ok(())
    }
}

#[async_trait]
impl Entity for QuasarBinarySensor {
    fn unique_id(&self) -> String {
        entity_unique_id(&self.device, self.description)
    }

    fn name(&self) -> String {
        entity_name(&self.device, &self.sensor_name)
    }

    fn native_value(&self) -> Option<NativeValue> {
        self.motion.map(|m| NativeValue::from(m.as_ref()))
    }

    fn device_class(&self) -> Option<DeviceClass> {
        self.description.device_class
    }

    async fn update(&mut self) -> Result<()> {
        self.update_at(Utc::now()).await
    }
}

/// Create binary sensors for every included motion-capable device of a
/// config entry and register them with `platform`.
pub async fn setup_entry(
    host: &HostData,
    entry: &ConfigEntry,
    platform: &mut EntityPlatform,
) -> Result<usize> {
    let include = host.include(DOMAIN)?;
    let directory = host.directory(DOMAIN, &entry.unique_id)?;

    let found = discover(
        directory.as_ref(),
        &include,
        BINARY_SENSOR_DEVICES,
        BINARY_SENSOR_TYPES,
    )
    .await?;

    let entities: Vec<Box<dyn Entity>> = found
        .into_iter()
        .map(|d| Box::new(QuasarBinarySensor::new(directory.clone(), d)) as Box<dyn Entity>)
        .collect();

    Ok(platform.add_entities(entities, true).await)
}
