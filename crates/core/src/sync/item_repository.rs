//! Reconciles user intent against the remote store by always re-fetching.
//!
//! Every mutation, successful or not, ends with a full refresh. The snapshot is
//! only ever replaced as a whole, by whichever refresh completes last.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

use super::{
    MutationKind, NoOpRepositoryEventSink, RemoteFailure, RepositoryEvent, RepositoryEventSink,
    Snapshot, SnapshotSource,
};
use crate::errors::{Error, Result};
use crate::items::{
    validate_new_item, validate_note, Item, ItemId, LocalItemStore, NoOpLocalItemStore,
    RemoteItemStore,
};

/// Coarse activity of the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Idle,
    Mutating,
    Refreshing,
}

/// Result of one mutation and the refresh that followed it.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    pub kind: MutationKind,
    pub item_id: Option<ItemId>,
    /// The remote write. `Ok(None)` when the call returns no item (delete).
    pub write: std::result::Result<Option<Item>, RemoteFailure>,
    /// The refresh issued after the write.
    pub refresh: std::result::Result<Arc<Snapshot>, RemoteFailure>,
}

impl MutationOutcome {
    pub fn is_success(&self) -> bool {
        self.write.is_ok() && self.refresh.is_ok()
    }

    /// The write failure if there was one, else the refresh failure.
    pub fn failure(&self) -> Option<&RemoteFailure> {
        self.write.as_ref().err().or(self.refresh.as_ref().err())
    }

    /// Snapshot installed by the trailing refresh.
    pub fn snapshot(&self) -> Option<&Arc<Snapshot>> {
        self.refresh.as_ref().ok()
    }
}

struct PhaseGuard<'a>(&'a AtomicUsize);

impl<'a> PhaseGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Owns the item snapshot and routes every mutation through the remote store.
pub struct ItemRepository {
    remote: Arc<dyn RemoteItemStore>,
    local_store: Arc<dyn LocalItemStore>,
    event_sink: Arc<dyn RepositoryEventSink>,
    snapshot_tx: watch::Sender<Arc<Snapshot>>,
    cache_lock: Mutex<()>,
    refreshing: AtomicUsize,
    mutating: AtomicUsize,
}

impl ItemRepository {
    pub fn new(remote: Arc<dyn RemoteItemStore>) -> Self {
        let (snapshot_tx, _) = watch::channel(Arc::new(Snapshot::empty()));
        Self {
            remote,
            local_store: Arc::new(NoOpLocalItemStore),
            event_sink: Arc::new(NoOpRepositoryEventSink),
            snapshot_tx,
            cache_lock: Mutex::new(()),
            refreshing: AtomicUsize::new(0),
            mutating: AtomicUsize::new(0),
        }
    }

    /// Sets the on-device cache that mirrors each refreshed snapshot.
    pub fn with_local_store(mut self, local_store: Arc<dyn LocalItemStore>) -> Self {
        self.local_store = local_store;
        self
    }

    /// Sets the sink receiving snapshot and failure notifications.
    pub fn with_event_sink(mut self, event_sink: Arc<dyn RepositoryEventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot_tx.borrow().clone()
    }

    /// Receiver that always holds the most recently applied snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.snapshot_tx.subscribe()
    }

    pub fn phase(&self) -> SyncPhase {
        if self.refreshing.load(Ordering::SeqCst) > 0 {
            SyncPhase::Refreshing
        } else if self.mutating.load(Ordering::SeqCst) > 0 {
            SyncPhase::Mutating
        } else {
            SyncPhase::Idle
        }
    }

    /// Seeds the snapshot from the local store until a remote refresh lands.
    ///
    /// Returns `None` when the cache is empty or a remote snapshot is already
    /// installed.
    pub fn restore_from_cache(&self) -> Result<Option<Arc<Snapshot>>> {
        let items = self.local_store.load_items()?;
        if items.is_empty() {
            return Ok(None);
        }

        let mut restored = None;
        self.snapshot_tx.send_if_modified(|current| {
            if current.refreshed_at().is_some() {
                return false;
            }
            let next = Arc::new(Snapshot::successor(
                current,
                items,
                SnapshotSource::Cache,
                None,
            ));
            restored = Some(next.clone());
            *current = next;
            true
        });

        if let Some(snapshot) = &restored {
            info!("Restored {} cached items", snapshot.len());
            self.event_sink
                .emit(RepositoryEvent::SnapshotReplaced(snapshot.clone()));
        }
        Ok(restored)
    }

    /// Fetches the full item list and replaces the snapshot with it.
    ///
    /// On failure the current snapshot stays in place and a `RefreshFailed`
    /// event is emitted.
    pub async fn refresh(&self) -> std::result::Result<Arc<Snapshot>, RemoteFailure> {
        let _phase = PhaseGuard::enter(&self.refreshing);
        debug!("Refreshing item snapshot");

        match self.remote.list().await {
            Ok(items) => {
                let items = items.into_iter().map(Item::normalized).collect();
                let snapshot = self.install(items, SnapshotSource::Remote, Some(Utc::now()));
                debug!(
                    "Installed snapshot generation {} with {} items",
                    snapshot.generation(),
                    snapshot.len()
                );
                self.mirror_to_local_store(&snapshot);
                self.event_sink
                    .emit(RepositoryEvent::SnapshotReplaced(snapshot.clone()));
                Ok(snapshot)
            }
            Err(failure) => {
                warn!("Refresh failed: {}", failure);
                self.event_sink
                    .emit(RepositoryEvent::RefreshFailed(failure.clone()));
                Err(failure)
            }
        }
    }

    /// Creates an item. Invalid input is rejected without any network call.
    pub async fn add(&self, name: &str, note: Option<&str>) -> Result<MutationOutcome> {
        let draft = validate_new_item(name, note)?;
        let write = {
            let _phase = PhaseGuard::enter(&self.mutating);
            self.remote.create(draft).await.map(Some)
        };
        Ok(self.finish_mutation(MutationKind::Add, None, write).await)
    }

    /// Flips the purchased flag of an item in the current snapshot.
    pub async fn toggle(&self, id: ItemId) -> Result<MutationOutcome> {
        let current = self.current_item(id)?;
        let update = current.to_update().with_purchased(!current.purchased);
        let write = {
            let _phase = PhaseGuard::enter(&self.mutating);
            self.remote.update(id, update).await.map(Some)
        };
        Ok(self
            .finish_mutation(MutationKind::Toggle, Some(id), write)
            .await)
    }

    /// Replaces the note of an item; blank input clears it.
    pub async fn edit_note(&self, id: ItemId, note: &str) -> Result<MutationOutcome> {
        let note = validate_note(Some(note))?;
        let update = self.current_item(id)?.to_update().with_note(note);
        let write = {
            let _phase = PhaseGuard::enter(&self.mutating);
            self.remote.update(id, update).await.map(Some)
        };
        Ok(self
            .finish_mutation(MutationKind::EditNote, Some(id), write)
            .await)
    }

    pub async fn delete(&self, id: ItemId) -> Result<MutationOutcome> {
        let write = {
            let _phase = PhaseGuard::enter(&self.mutating);
            self.remote.delete(id).await.map(|()| None)
        };
        Ok(self
            .finish_mutation(MutationKind::Delete, Some(id), write)
            .await)
    }

    fn current_item(&self, id: ItemId) -> Result<Item> {
        self.snapshot()
            .get(id)
            .cloned()
            .ok_or(Error::ItemNotFound(id))
    }

    async fn finish_mutation(
        &self,
        kind: MutationKind,
        item_id: Option<ItemId>,
        write: std::result::Result<Option<Item>, RemoteFailure>,
    ) -> MutationOutcome {
        match &write {
            Ok(item) => {
                let item_id = item.as_ref().map(|i| i.id).or(item_id);
                debug!("Remote {} succeeded (item {:?})", kind.as_str(), item_id);
                self.event_sink.emit(RepositoryEvent::MutationApplied {
                    kind,
                    item_id,
                    name: item.as_ref().map(|i| i.name.clone()),
                });
            }
            Err(failure) => {
                warn!(
                    "Remote {} failed (item {:?}): {}; re-synchronizing",
                    kind.as_str(),
                    item_id,
                    failure
                );
                self.event_sink.emit(RepositoryEvent::MutationFailed {
                    kind,
                    item_id,
                    failure: failure.clone(),
                });
            }
        }

        let refresh = self.refresh().await;
        MutationOutcome {
            kind,
            item_id: write
                .as_ref()
                .ok()
                .and_then(|item| item.as_ref().map(|i| i.id))
                .or(item_id),
            write,
            refresh,
        }
    }

    fn install(
        &self,
        items: Vec<Item>,
        source: SnapshotSource,
        refreshed_at: Option<DateTime<Utc>>,
    ) -> Arc<Snapshot> {
        let mut installed = None;
        self.snapshot_tx.send_modify(|current| {
            let next = Arc::new(Snapshot::successor(current, items, source, refreshed_at));
            installed = Some(next.clone());
            *current = next;
        });
        installed.unwrap_or_else(|| self.snapshot())
    }

    fn mirror_to_local_store(&self, snapshot: &Snapshot) {
        let _lock = self
            .cache_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // A newer snapshot has landed meanwhile and will be mirrored by its own refresh.
        if self.snapshot().generation() != snapshot.generation() {
            debug!(
                "Skipping cache mirror for superseded generation {}",
                snapshot.generation()
            );
            return;
        }

        if let Err(err) = self.local_store.replace_all(snapshot.items()) {
            warn!("Failed to mirror snapshot into local store: {}", err);
        }
    }
}
