//! Notifications emitted by the item repository.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{RemoteFailure, Snapshot};
use crate::items::ItemId;

/// The mutation a user gesture turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    Add,
    Toggle,
    EditNote,
    Delete,
}

impl MutationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Toggle => "toggle",
            Self::EditNote => "edit_note",
            Self::Delete => "delete",
        }
    }
}

/// Events observers receive from the repository.
#[derive(Debug, Clone)]
pub enum RepositoryEvent {
    /// A refresh completed and fully replaced the snapshot.
    SnapshotReplaced(Arc<Snapshot>),
    /// A refresh failed; the previous snapshot is still current.
    RefreshFailed(RemoteFailure),
    /// The remote store acknowledged a mutation.
    MutationApplied {
        kind: MutationKind,
        item_id: Option<ItemId>,
        name: Option<String>,
    },
    /// The remote store rejected a mutation or could not be reached.
    MutationFailed {
        kind: MutationKind,
        item_id: Option<ItemId>,
        failure: RemoteFailure,
    },
}

/// Receives repository events. Implementations must not block.
pub trait RepositoryEventSink: Send + Sync {
    fn emit(&self, event: RepositoryEvent);
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpRepositoryEventSink;

impl RepositoryEventSink for NoOpRepositoryEventSink {
    fn emit(&self, _event: RepositoryEvent) {}
}

/// Forwards each event to several sinks in order.
#[derive(Default, Clone)]
pub struct FanOutEventSink {
    sinks: Vec<Arc<dyn RepositoryEventSink>>,
}

impl FanOutEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn RepositoryEventSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl RepositoryEventSink for FanOutEventSink {
    fn emit(&self, event: RepositoryEvent) {
        for sink in &self.sinks {
            sink.emit(event.clone());
        }
    }
}
