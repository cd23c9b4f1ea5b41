//! Quasar device directory boundary.
//!
//! The cloud client that talks to the Quasar API lives outside this crate.
//! Adapters only see it through [`DeviceDirectory`]: a list of known devices
//! and an on-demand snapshot fetch per device.

mod memory;
mod model;

pub use memory::MemoryDirectory;
pub use model::{Device, DeviceSnapshot, Property, PropertyParameters, PropertyState};

use crate::error::Result;
use async_trait::async_trait;

/// Source of devices and their property snapshots.
///
/// Implementations own transport, authentication, timeouts and retries.
/// Every call to [`get_device`](DeviceDirectory::get_device) is an independent
/// round trip; callers do not deduplicate fetches.
#[async_trait]
pub trait DeviceDirectory: Send + Sync {
    /// All devices currently known to the account.
    fn devices(&self) -> Vec<Device>;

    /// Fetch a fresh property snapshot for one device.
    async fn get_device(&self, id: &str) -> Result<DeviceSnapshot>;
}
