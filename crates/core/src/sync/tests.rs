use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

use super::*;
use crate::errors::{Error, Result};
use crate::items::{Item, ItemId, LocalItemStore, ValidationError};
use crate::test_support::{groceries, item, FakeRemote, Op};

#[derive(Default)]
struct MemoryLocalStore {
    rows: Mutex<HashMap<ItemId, Item>>,
    writes: AtomicUsize,
}

impl LocalItemStore for MemoryLocalStore {
    fn load_items(&self) -> Result<Vec<Item>> {
        let mut items: Vec<Item> = self.rows.lock().unwrap().values().cloned().collect();
        items.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(items)
    }

    fn get_item(&self, id: ItemId) -> Result<Option<Item>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    fn insert_item(&self, item: &Item) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().insert(item.id, item.clone());
        Ok(())
    }

    fn update_item(&self, item: &Item) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().insert(item.id, item.clone());
        Ok(())
    }

    fn delete_item(&self, id: ItemId) -> Result<usize> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.lock().unwrap().remove(&id).map_or(0, |_| 1))
    }
}

struct BrokenLocalStore;

impl LocalItemStore for BrokenLocalStore {
    fn load_items(&self) -> Result<Vec<Item>> {
        Err(Error::storage("disk full"))
    }

    fn get_item(&self, _id: ItemId) -> Result<Option<Item>> {
        Err(Error::storage("disk full"))
    }

    fn insert_item(&self, _item: &Item) -> Result<()> {
        Err(Error::storage("disk full"))
    }

    fn update_item(&self, _item: &Item) -> Result<()> {
        Err(Error::storage("disk full"))
    }

    fn delete_item(&self, _id: ItemId) -> Result<usize> {
        Err(Error::storage("disk full"))
    }
}

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<RepositoryEvent>>,
}

impl RecordingSink {
    fn refresh_failures(&self) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, RepositoryEvent::RefreshFailed(_)))
            .count()
    }

    fn mutation_failures(&self) -> Vec<MutationKind> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                RepositoryEvent::MutationFailed { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect()
    }
}

impl RepositoryEventSink for RecordingSink {
    fn emit(&self, event: RepositoryEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn names(snapshot: &Snapshot) -> Vec<&str> {
    snapshot.items().iter().map(|i| i.name.as_str()).collect()
}

#[tokio::test]
async fn refresh_twice_yields_identical_items() {
    let repo = ItemRepository::new(groceries());

    let first = repo.refresh().await.expect("first refresh");
    let second = repo.refresh().await.expect("second refresh");

    assert_eq!(first.items(), second.items());
    assert_eq!(names(&second), vec!["Eggs", "Bread", "Milk"]);
    assert_eq!(second.generation(), first.generation() + 1);
    assert_eq!(second.source(), SnapshotSource::Remote);
    assert_eq!(repo.phase(), SyncPhase::Idle);
}

#[tokio::test]
async fn add_then_refresh_contains_server_assigned_item() {
    let remote = groceries();
    let repo = ItemRepository::new(remote.clone());
    let before = repo.refresh().await.expect("refresh");

    let outcome = repo.add("Milk", Some("")).await.expect("valid input");

    assert!(outcome.is_success());
    let created = outcome.write.clone().expect("create ok").expect("created item");
    assert_eq!(created.id, 4);
    let after = outcome.snapshot().expect("refreshed").clone();
    assert_eq!(after.len(), before.len() + 1);
    let milks: Vec<&Item> = after.items().iter().filter(|i| i.name == "Milk").collect();
    assert_eq!(milks.len(), before.items().iter().filter(|i| i.name == "Milk").count() + 1);
    let added = after.get(created.id).expect("added item present");
    assert!(!added.purchased);
    assert_eq!(added.note, None);
    assert_eq!(added.updated_at.as_deref(), Some("2024-05-01 09:00:00"));
    assert_eq!(remote.calls(Op::List), 2);
}

#[tokio::test]
async fn delete_then_refresh_drops_the_id() {
    let repo = ItemRepository::new(groceries());
    repo.refresh().await.expect("refresh");

    let outcome = repo.delete(2).await.expect("delete");

    assert!(outcome.is_success());
    let snapshot = repo.snapshot();
    assert!(!snapshot.contains(2));
    assert_eq!(names(&snapshot), vec!["Eggs", "Milk"]);
}

#[tokio::test]
async fn toggle_marks_unpurchased_item_purchased() {
    let repo = ItemRepository::new(groceries());
    repo.refresh().await.expect("refresh");

    repo.toggle(1).await.expect("toggle");
    assert!(repo.snapshot().get(1).expect("milk").purchased);

    repo.toggle(1).await.expect("toggle back");
    assert!(!repo.snapshot().get(1).expect("milk").purchased);
}

#[tokio::test]
async fn edit_note_sends_full_state_and_keeps_purchased_flag() {
    let repo = ItemRepository::new(groceries());
    repo.refresh().await.expect("refresh");

    repo.edit_note(2, "  rye, sliced ").await.expect("edit note");

    let bread = repo.snapshot().get(2).cloned().expect("bread");
    assert_eq!(bread.note.as_deref(), Some("rye, sliced"));
    assert!(bread.purchased);
    assert_eq!(bread.name, "Bread");
}

#[tokio::test]
async fn empty_name_is_rejected_without_network_call() {
    let remote = groceries();
    let repo = ItemRepository::new(remote.clone());

    let err = repo.add("", None).await.expect_err("validation failure");

    assert!(matches!(err, Error::Validation(ValidationError::EmptyName)));
    assert!(err.is_local());
    assert_eq!(remote.calls(Op::Create), 0);
    assert_eq!(remote.calls(Op::List), 0);
}

#[tokio::test]
async fn unknown_id_is_rejected_without_network_call() {
    let remote = groceries();
    let repo = ItemRepository::new(remote.clone());
    repo.refresh().await.expect("refresh");

    let err = repo.toggle(42).await.expect_err("unknown id");

    assert!(matches!(err, Error::ItemNotFound(42)));
    assert_eq!(remote.calls(Op::Update), 0);
}

#[tokio::test]
async fn unreachable_update_still_refreshes_to_server_state() {
    let remote = groceries();
    let sink = Arc::new(RecordingSink::default());
    let repo = ItemRepository::new(remote.clone()).with_event_sink(sink.clone());
    let before = repo.refresh().await.expect("refresh");

    remote.fail_next(
        Op::Update,
        RemoteFailure::unreachable("connection refused"),
        false,
    );
    let outcome = repo.toggle(1).await.expect("gesture accepted");

    assert!(matches!(outcome.write, Err(RemoteFailure::Unreachable(_))));
    let after = outcome.snapshot().expect("refresh after failure").clone();
    assert_eq!(after.items(), before.items());
    assert!(!after.get(1).expect("milk").purchased);
    assert_eq!(remote.calls(Op::List), 2);
    assert_eq!(sink.mutation_failures(), vec![MutationKind::Toggle]);
}

#[tokio::test]
async fn write_applied_before_failure_shows_up_after_refresh() {
    let remote = groceries();
    let repo = ItemRepository::new(remote.clone());
    repo.refresh().await.expect("refresh");

    remote.fail_next(
        Op::Create,
        RemoteFailure::unreachable("response lost"),
        true,
    );
    let outcome = repo.add("Coffee", None).await.expect("gesture accepted");

    assert!(outcome.write.is_err());
    assert!(!outcome.is_success());
    let snapshot = repo.snapshot();
    assert!(snapshot.items().iter().any(|i| i.name == "Coffee"));
}

#[tokio::test]
async fn failed_refresh_keeps_previous_snapshot() {
    let remote = groceries();
    let sink = Arc::new(RecordingSink::default());
    let repo = ItemRepository::new(remote.clone()).with_event_sink(sink.clone());
    let before = repo.refresh().await.expect("refresh");

    remote.fail_next(
        Op::List,
        RemoteFailure::unsuccessful(500, r#"{"success":false,"error":"db locked"}"#),
        false,
    );
    let failure = repo.refresh().await.expect_err("refresh fails");

    assert_eq!(failure.status_code(), Some(500));
    assert_eq!(repo.snapshot(), before);
    assert_eq!(sink.refresh_failures(), 1);
}

#[tokio::test]
async fn rejected_delete_reports_both_write_and_refresh() {
    let remote = groceries();
    let repo = ItemRepository::new(remote.clone());
    repo.refresh().await.expect("refresh");

    remote.fail_next(
        Op::Delete,
        RemoteFailure::unsuccessful(404, r#"{"success":false}"#),
        false,
    );
    remote.fail_next(Op::List, RemoteFailure::unreachable("timeout"), false);
    let outcome = repo.delete(3).await.expect("gesture accepted");

    assert_eq!(outcome.failure().and_then(RemoteFailure::status_code), Some(404));
    assert!(outcome.refresh.is_err());
    assert!(repo.snapshot().contains(3));
}

#[tokio::test]
async fn last_completed_refresh_wins() {
    let remote = FakeRemote::with_items(vec![item(1, "Milk", false)]);
    let repo = Arc::new(ItemRepository::new(remote.clone()));

    let (release_slow, gate) = oneshot::channel();
    remote.gate_next_list(gate);
    let slow = tokio::spawn({
        let repo = repo.clone();
        async move { repo.refresh().await }
    });
    while remote.calls(Op::List) < 1 {
        tokio::task::yield_now().await;
    }
    assert_eq!(repo.phase(), SyncPhase::Refreshing);

    remote.insert_directly("Bread");
    let fast = repo.refresh().await.expect("fast refresh");
    assert_eq!(names(&fast), vec!["Bread", "Milk"]);

    release_slow.send(()).expect("release slow refresh");
    let slow = slow.await.expect("join").expect("slow refresh");

    assert_eq!(names(&slow), vec!["Milk"]);
    let current = repo.snapshot();
    assert_eq!(current.generation(), 2);
    assert_eq!(names(&current), vec!["Milk"]);
    assert_eq!(repo.phase(), SyncPhase::Idle);
}

#[tokio::test]
async fn subscribers_observe_latest_snapshot() {
    let repo = ItemRepository::new(groceries());
    let mut rx = repo.subscribe();
    assert!(rx.borrow().is_empty());

    repo.refresh().await.expect("refresh");

    assert!(rx.has_changed().expect("sender alive"));
    assert_eq!(rx.borrow_and_update().len(), 3);
}

#[tokio::test]
async fn refresh_mirrors_snapshot_into_local_store() {
    let remote = groceries();
    let cache = Arc::new(MemoryLocalStore::default());
    let repo = ItemRepository::new(remote.clone()).with_local_store(cache.clone());

    repo.refresh().await.expect("refresh");
    assert_eq!(cache.load_items().unwrap().len(), 3);
    let writes_after_first = cache.writes.load(Ordering::SeqCst);

    repo.refresh().await.expect("unchanged refresh");
    assert_eq!(cache.writes.load(Ordering::SeqCst), writes_after_first);

    repo.delete(1).await.expect("delete");
    repo.toggle(3).await.expect("toggle");
    assert_eq!(cache.get_item(1).unwrap(), None);
    assert!(cache.get_item(3).unwrap().expect("eggs cached").purchased);
}

#[tokio::test]
async fn restore_from_cache_only_before_first_remote_snapshot() {
    let cache = Arc::new(MemoryLocalStore::default());
    cache.insert_item(&item(7, "Tea", false)).unwrap();
    let repo = ItemRepository::new(groceries()).with_local_store(cache.clone());

    let restored = repo
        .restore_from_cache()
        .expect("cache readable")
        .expect("cache restored");
    assert_eq!(restored.source(), SnapshotSource::Cache);
    assert_eq!(names(&restored), vec!["Tea"]);

    let refreshed = repo.refresh().await.expect("refresh");
    assert_eq!(refreshed.source(), SnapshotSource::Remote);
    assert!(!refreshed.contains(7));
    assert!(cache.get_item(7).unwrap().is_none());

    assert!(repo.restore_from_cache().expect("cache readable").is_none());
}

#[tokio::test]
async fn broken_local_store_never_fails_refresh() {
    let repo = ItemRepository::new(groceries()).with_local_store(Arc::new(BrokenLocalStore));

    let snapshot = repo.refresh().await.expect("refresh despite cache");

    assert_eq!(snapshot.len(), 3);
    assert!(matches!(repo.restore_from_cache(), Err(Error::Storage(_))));
}
