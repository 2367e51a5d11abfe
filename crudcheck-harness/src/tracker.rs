//! Per-test registry of created entities awaiting cleanup

use crudcheck_api_types::EntityId;
use std::fmt;
use std::future::Future;
use tracing::{debug, info, warn};

/// An entity created during a test, with the item template that deletes it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackedEntity {
    pub id: EntityId,
    /// Item path template, e.g. `/api/authors/{id}`
    pub endpoint: String,
}

impl fmt::Display for TrackedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.endpoint)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Empty,
    Tracking,
    Draining,
}

/// What a cleanup sweep did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub deleted: Vec<TrackedEntity>,
    pub failed: Vec<(TrackedEntity, String)>,
}

impl CleanupReport {
    pub fn attempted(&self) -> usize {
        self.deleted.len() + self.failed.len()
    }

    /// True when no entity was attempted
    pub fn is_noop(&self) -> bool {
        self.attempted() == 0
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Tracks entities created in one test scope
///
/// An entity is identified by its id together with its endpoint, so ids
/// from different collections never collide. Insertion order is kept and
/// cleanup deletes in that order.
#[derive(Debug)]
pub struct EntityTracker {
    entities: Vec<TrackedEntity>,
    state: TrackerState,
}

impl Default for EntityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityTracker {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            state: TrackerState::Empty,
        }
    }

    /// Register an entity; returns false if it was already tracked
    pub fn track(&mut self, id: impl Into<EntityId>, endpoint: impl Into<String>) -> bool {
        let entity = TrackedEntity {
            id: id.into(),
            endpoint: endpoint.into(),
        };

        if self.entities.contains(&entity) {
            debug!("Entity {} already tracked", entity);
            return false;
        }

        debug!("Tracking entity {}", entity);
        self.entities.push(entity);
        self.state = TrackerState::Tracking;
        true
    }

    /// Stop tracking an entity the test deleted itself
    pub fn untrack(&mut self, id: &EntityId, endpoint: &str) -> bool {
        let before = self.entities.len();
        self.entities
            .retain(|entity| !(entity.id == *id && entity.endpoint == endpoint));
        if self.entities.is_empty() {
            self.state = TrackerState::Empty;
        }
        self.entities.len() != before
    }

    pub fn is_tracked(&self, id: &EntityId, endpoint: &str) -> bool {
        self.entities
            .iter()
            .any(|entity| entity.id == *id && entity.endpoint == endpoint)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// Tracked entities in insertion order
    pub fn tracked(&self) -> &[TrackedEntity] {
        &self.entities
    }

    /// Attempt to delete every tracked entity, then forget all of them
    ///
    /// A failing delete is logged and recorded in the report; the sweep
    /// always continues with the next entity. The tracked set is empty
    /// afterwards regardless of outcome, so a second call does nothing.
    pub async fn cleanup<F, Fut, E>(&mut self, mut delete: F) -> CleanupReport
    where
        F: FnMut(TrackedEntity) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: fmt::Display,
    {
        let mut report = CleanupReport::default();
        if self.entities.is_empty() {
            self.state = TrackerState::Empty;
            return report;
        }

        self.state = TrackerState::Draining;
        let entities = std::mem::take(&mut self.entities);
        info!("Cleaning up {} tracked entities", entities.len());

        for entity in entities {
            match delete(entity.clone()).await {
                Ok(()) => report.deleted.push(entity),
                Err(e) => {
                    warn!("Failed to clean up entity {}: {}", entity, e);
                    report.failed.push((entity, e.to_string()));
                }
            }
        }

        self.state = TrackerState::Empty;
        report
    }
}
