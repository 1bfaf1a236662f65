//! The repository-owned view of the remote item collection.

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::items::{Item, ItemId};

/// Where the items in a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotSource {
    Empty,
    Cache,
    Remote,
}

/// Full ordered collection of items as last applied by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    items: Vec<Item>,
    generation: u64,
    source: SnapshotSource,
    refreshed_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            generation: 0,
            source: SnapshotSource::Empty,
            refreshed_at: None,
        }
    }

    /// Builds the successor of `previous` from a full item list.
    ///
    /// Order is kept as given. Repeated ids keep their first occurrence.
    pub(crate) fn successor(
        previous: &Snapshot,
        items: Vec<Item>,
        source: SnapshotSource,
        refreshed_at: Option<DateTime<Utc>>,
    ) -> Self {
        let mut seen = HashSet::with_capacity(items.len());
        let mut unique = Vec::with_capacity(items.len());
        for item in items {
            if seen.insert(item.id) {
                unique.push(item);
            } else {
                warn!("Dropping duplicate item id {} from snapshot", item.id);
            }
        }

        Self {
            items: unique,
            generation: previous.generation + 1,
            source,
            refreshed_at: refreshed_at.or(previous.refreshed_at),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn purchased_count(&self) -> usize {
        self.items.iter().filter(|item| item.purchased).count()
    }

    /// Increases by one each time the repository replaces its snapshot.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn source(&self) -> SnapshotSource {
        self.source
    }

    /// When the last successful remote refresh completed.
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}
