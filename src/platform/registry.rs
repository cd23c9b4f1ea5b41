//! Entity registry for one platform (sensor or binary sensor).

use super::Entity;
use log::{debug, info, warn};

/// Outcome of one supervised update pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub updated: usize,
    pub failed: usize,
}

/// Collects the entities a platform setup produced and supervises their
/// updates.
///
/// Update failures are isolated per entity: they are logged and counted,
/// never propagated to the caller or to sibling entities.
pub struct EntityPlatform {
    name: &'static str,
    entities: Vec<Box<dyn Entity>>,
}

impl EntityPlatform {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entities: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register entities, optionally updating each one first.
    ///
    /// An entity whose first update fails is still registered with an empty
    /// state. An entity whose unique id is already taken is dropped.
    /// Returns the number of entities registered.
    pub async fn add_entities(
        &mut self,
        entities: Vec<Box<dyn Entity>>,
        update_before_add: bool,
    ) -> usize {
        let mut added = 0;
        for mut entity in entities {
            let unique_id = entity.unique_id();
            if self.get(&unique_id).is_some() {
                warn!(
                    "[{}] Entity id {} already exists, skipping {}",
                    self.name,
                    unique_id,
                    entity.name()
                );
                continue;
            }

            if update_before_add && let Err(e) = entity.update().await {
                warn!(
                    "[{}] Initial update of {} failed: {}",
                    self.name, unique_id, e
                );
            }

            debug!("[{}] Registered {}", self.name, unique_id);
            self.entities.push(entity);
            added += 1;
        }

        info!("[{}] {} entities registered", self.name, added);
        added
    }

    /// Run one update on every entity, in registration order.
    pub async fn update_all(&mut self) -> UpdateReport {
        let mut report = UpdateReport::default();
        for entity in self.entities.iter_mut() {
            match entity.update().await {
                Ok(()) => report.updated += 1,
                Err(e) => {
                    warn!(
                        "[{}] Update of {} failed: {}",
                        self.name,
                        entity.unique_id(),
                        e
                    );
                    report.failed += 1;
                }
            }
        }
        report
    }

    pub fn entities(&self) -> impl Iterator<Item = &dyn Entity> {
        self.entities.iter().map(|e| e.as_ref())
    }

    pub fn get(&self, unique_id: &str) -> Option<&dyn Entity> {
        self.entities().find(|e| e.unique_id() == unique_id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drop every registered entity (config entry teardown).
    pub fn unload(&mut self) {
        info!("[{}] Unloading {} entities", self.name, self.entities.len());
        self.entities.clear();
    }
}
