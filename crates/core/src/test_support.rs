//! In-memory doubles shared by the unit tests.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

use crate::items::{Item, ItemId, ItemUpdate, NewItem, RemoteItemStore};
use crate::sync::RemoteFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Op {
    List,
    Create,
    Update,
    Delete,
}

pub(crate) struct ScriptedFailure {
    failure: RemoteFailure,
    /// Whether the server applied the write before the failure surfaced.
    applied: bool,
}

/// In-memory stand-in for the REST service.
#[derive(Default)]
pub(crate) struct FakeRemote {
    items: Mutex<Vec<Item>>,
    next_id: Mutex<ItemId>,
    failures: Mutex<HashMap<Op, VecDeque<ScriptedFailure>>>,
    list_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    calls: Mutex<HashMap<Op, usize>>,
}

impl FakeRemote {
    pub(crate) fn with_items(items: Vec<Item>) -> Arc<Self> {
        let next_id = items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        Arc::new(Self {
            items: Mutex::new(items),
            next_id: Mutex::new(next_id),
            ..Default::default()
        })
    }

    pub(crate) fn fail_next(&self, op: Op, failure: RemoteFailure, applied: bool) {
        self.failures
            .lock()
            .unwrap()
            .entry(op)
            .or_default()
            .push_back(ScriptedFailure { failure, applied });
    }

    pub(crate) fn gate_next_list(&self, gate: oneshot::Receiver<()>) {
        self.list_gates.lock().unwrap().push_back(gate);
    }

    pub(crate) fn calls(&self, op: Op) -> usize {
        self.calls.lock().unwrap().get(&op).copied().unwrap_or(0)
    }

    pub(crate) fn insert_directly(&self, name: &str) -> ItemId {
        let mut next_id = self.next_id.lock().unwrap();
        let id = *next_id;
        *next_id += 1;
        self.items.lock().unwrap().push(item(id, name, false));
        id
    }

    fn begin(&self, op: Op) -> Option<ScriptedFailure> {
        *self.calls.lock().unwrap().entry(op).or_default() += 1;
        self.failures
            .lock()
            .unwrap()
            .get_mut(&op)
            .and_then(VecDeque::pop_front)
    }

    fn sorted_items(&self) -> Vec<Item> {
        let mut items = self.items.lock().unwrap().clone();
        items.sort_by(|a, b| b.id.cmp(&a.id));
        items
    }
}

#[async_trait]
impl RemoteItemStore for FakeRemote {
    async fn list(&self) -> std::result::Result<Vec<Item>, RemoteFailure> {
        let scripted = self.begin(Op::List);
        let items = self.sorted_items();
        let gate = self.list_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        match scripted {
            Some(s) => Err(s.failure),
            None => Ok(items),
        }
    }

    async fn create(&self, draft: NewItem) -> std::result::Result<Item, RemoteFailure> {
        let scripted = self.begin(Op::Create);
        if let Some(s) = &scripted {
            if !s.applied {
                return Err(s.failure.clone());
            }
        }
        let mut next_id = self.next_id.lock().unwrap();
        let created = Item {
            id: *next_id,
            name: draft.name,
            note: draft.note,
            purchased: draft.purchased,
            created_at: Some("2024-05-01 09:00:00".to_string()),
            updated_at: None,
        };
        *next_id += 1;
        self.items.lock().unwrap().push(created.clone());
        match scripted {
            Some(s) => Err(s.failure),
            None => Ok(created),
        }
    }

    async fn update(
        &self,
        id: ItemId,
        update: ItemUpdate,
    ) -> std::result::Result<Item, RemoteFailure> {
        let scripted = self.begin(Op::Update);
        if let Some(s) = &scripted {
            if !s.applied {
                return Err(s.failure.clone());
            }
        }
        let mut items = self.items.lock().unwrap();
        let Some(existing) = items.iter_mut().find(|i| i.id == id) else {
            return Err(RemoteFailure::unsuccessful(404, r#"{"success":false}"#));
        };
        existing.name = update.name;
        existing.note = update.note;
        existing.purchased = update.purchased;
        existing.updated_at = Some("2024-05-02 10:00:00".to_string());
        let updated = existing.clone();
        match scripted {
            Some(s) => Err(s.failure),
            None => Ok(updated),
        }
    }

    async fn delete(&self, id: ItemId) -> std::result::Result<(), RemoteFailure> {
        if let Some(s) = self.begin(Op::Delete) {
            return Err(s.failure);
        }
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|i| i.id != id);
        if items.len() == before {
            return Err(RemoteFailure::unsuccessful(404, r#"{"success":false}"#));
        }
        Ok(())
    }
}

pub(crate) fn item(id: ItemId, name: &str, purchased: bool) -> Item {
    Item {
        id,
        name: name.to_string(),
        note: None,
        purchased,
        created_at: Some("2024-04-30 18:00:00".to_string()),
        updated_at: None,
    }
}

pub(crate) fn groceries() -> Arc<FakeRemote> {
    FakeRemote::with_items(vec![
        item(1, "Milk", false),
        item(2, "Bread", true),
        item(3, "Eggs", false),
    ])
}
