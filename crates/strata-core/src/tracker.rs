//! Per-id bookkeeping of the latest status, in first-seen order.

use std::collections::HashMap;

use crate::message::StatusEvent;

/// Latest known status for one sub-operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEntity {
    /// Position of this id's first appearance in the session.
    pub index: usize,
    /// The most recent event seen for this id.
    pub event: StatusEvent,
}

impl TrackedEntity {
    /// Sub-operation id.
    pub fn id(&self) -> &str {
        &self.event.id
    }
}

/// Ordered association of id to [`TrackedEntity`].
///
/// Rows live in a `Vec` in insertion order; the map only points into it, so
/// iteration order never depends on hashing.
#[derive(Debug, Default)]
pub struct Tracker {
    entities: Vec<TrackedEntity>,
    positions: HashMap<String, usize>,
}

impl Tracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event and report whether its status text changed.
    ///
    /// A new id is appended and always counts as changed. A known id is
    /// overwritten in place; it counts as changed only if the status differs.
    pub fn update(&mut self, event: StatusEvent) -> (&TrackedEntity, bool) {
        if let Some(&idx) = self.positions.get(&event.id) {
            let entity = &mut self.entities[idx];
            let changed = entity.event.status != event.status;
            entity.event = event;
            return (&*entity, changed);
        }

        let index = self.entities.len();
        self.positions.insert(event.id.clone(), index);
        self.entities.push(TrackedEntity { index, event });
        (&self.entities[index], true)
    }

    /// Look up an entity by id.
    pub fn get(&self, id: &str) -> Option<&TrackedEntity> {
        self.positions.get(id).map(|&idx| &self.entities[idx])
    }

    /// Look up an entity by its first-seen index.
    pub fn at(&self, index: usize) -> Option<&TrackedEntity> {
        self.entities.get(index)
    }

    /// Entities in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &TrackedEntity> {
        self.entities.iter()
    }

    /// Number of distinct ids seen.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no event has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Sum of `current` bytes over every tracked entity.
    pub fn total_current(&self) -> i64 {
        self.entities
            .iter()
            .fold(0i64, |acc, e| acc.saturating_add(e.event.current()))
    }
}
