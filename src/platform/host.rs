//! Namespaced integration data held by the host.

use crate::config::IntegrationConfig;
use crate::error::{QuasarError, Result};
use crate::quasar::DeviceDirectory;
use log::info;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// A loaded config entry, identified by its unique id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub unique_id: String,
}

impl ConfigEntry {
    pub fn new(unique_id: impl Into<String>) -> Self {
        Self {
            unique_id: unique_id.into(),
        }
    }
}

/// Data stored under one integration namespace.
struct DomainData {
    config: IntegrationConfig,
    directories: HashMap<String, Arc<dyn DeviceDirectory>>,
}

/// Process-wide store keyed by integration namespace.
#[derive(Default)]
pub struct HostData {
    domains: RwLock<HashMap<String, DomainData>>,
}

impl HostData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the integration config for a namespace, replacing any previous one.
    /// Attached directories survive a config replacement.
    pub fn register_domain(&self, domain: &str, config: IntegrationConfig) {
        let mut domains = self.domains.write();
        match domains.get_mut(domain) {
            Some(data) => data.config = config,
            None => {
                domains.insert(
                    domain.to_string(),
                    DomainData {
                        config,
                        directories: HashMap::new(),
                    },
                );
            }
        }
    }

    /// Attach the directory serving a config entry.
    pub fn attach_directory(
        &self,
        domain: &str,
        entry_id: &str,
        directory: Arc<dyn DeviceDirectory>,
    ) -> Result<()> {
        let mut domains = self.domains.write();
        let data = domains
            .get_mut(domain)
            .ok_or_else(|| QuasarError::NotLoaded(domain.to_string()))?;
        data.directories.insert(entry_id.to_string(), directory);
        info!("Attached device directory for entry {} in {}", entry_id, domain);
        Ok(())
    }

    /// The device-name inclusion list for a namespace.
    pub fn include(&self, domain: &str) -> Result<Vec<String>> {
        self.domains
            .read()
            .get(domain)
            .map(|data| data.config.include.clone())
            .ok_or_else(|| QuasarError::NotLoaded(domain.to_string()))
    }

    /// The directory attached to a config entry.
    pub fn directory(&self, domain: &str, entry_id: &str) -> Result<Arc<dyn DeviceDirectory>> {
        let domains = self.domains.read();
        let data = domains
            .get(domain)
            .ok_or_else(|| QuasarError::NotLoaded(domain.to_string()))?;
        data.directories
            .get(entry_id)
            .cloned()
            .ok_or_else(|| QuasarError::EntryNotFound(entry_id.to_string()))
    }

    /// Detach a config entry's directory. Returns whether it was attached.
    pub fn unload_entry(&self, domain: &str, entry_id: &str) -> bool {
        let removed = self
            .domains
            .write()
            .get_mut(domain)
            .and_then(|data| data.directories.remove(entry_id))
            .is_some();
        if removed {
            info!("Unloaded entry {} from {}", entry_id, domain);
        }
        removed
    }
}
