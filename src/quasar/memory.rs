//! In-memory device directory.
//!
//! Stands in for the cloud client in tests and in the CLI, which loads it from
//! a JSON fixture.

use super::{Device, DeviceDirectory, DeviceSnapshot, Property};
use crate::error::{QuasarError, Result};
use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fixture file layout: every device with its current properties inline.
#[derive(Debug, Deserialize)]
struct Fixture {
    devices: Vec<FixtureDevice>,
}

#[derive(Debug, Deserialize)]
struct FixtureDevice {
    #[serde(flatten)]
    device: Device,
    #[serde(default)]
    properties: Vec<Property>,
}

/// Thread-safe directory backed by a device list and a snapshot map.
///
/// Snapshots can be replaced at any time to simulate the cloud reporting new
/// readings between update cycles.
#[derive(Default)]
pub struct MemoryDirectory {
    devices: RwLock<Vec<Device>>,
    snapshots: RwLock<HashMap<String, DeviceSnapshot>>,
    fetches: AtomicUsize,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a directory from fixture JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let fixture: Fixture = serde_json::from_str(json)?;
        let directory = Self::new();
        for entry in fixture.devices {
            directory.insert(entry.device, entry.properties);
        }
        Ok(directory)
    }

    /// Load a directory from a fixture file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Add a device (or replace one with the same id) with its properties.
    pub fn insert(&self, device: Device, properties: Vec<Property>) {
        let id = device.id.clone();
        {
            let mut devices = self.devices.write();
            match devices.iter_mut().find(|d| d.id == id) {
                Some(existing) => *existing = device,
                None => devices.push(device),
            }
        }
        self.set_properties(&id, properties);
    }

    /// Replace the properties reported for a device.
    pub fn set_properties(&self, id: &str, properties: Vec<Property>) {
        self.snapshots.write().insert(
            id.to_string(),
            DeviceSnapshot {
                id: id.to_string(),
                properties,
            },
        );
    }

    /// Number of snapshot fetches served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceDirectory for MemoryDirectory {
    fn devices(&self) -> Vec<Device> {
        self.devices.read().clone()
    }

    async fn get_device(&self, id: &str) -> Result<DeviceSnapshot> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        debug!("Fetching snapshot for device {}", id);
        self.snapshots
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| QuasarError::DeviceNotFound(id.to_string()))
    }
}
