//! Display models derived from a snapshot. Rebuilt from scratch on every render.

use serde::{Deserialize, Serialize};

use crate::items::{Item, ItemId, ValidationError};
use crate::sync::{MutationKind, RemoteFailure, Snapshot, SnapshotSource, SyncRetryClass};
use crate::utils::timestamp::format_display;

/// One rendered list row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRow {
    pub id: ItemId,
    pub name: String,
    /// Present only when the note has visible text.
    pub note: Option<String>,
    /// Present only when the item carries a creation timestamp.
    pub date_label: Option<String>,
    pub purchased: bool,
    /// Purchased rows are drawn faded. Purely cosmetic.
    pub dimmed: bool,
}

impl From<&Item> for ItemRow {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            note: item.visible_note().map(str::to_string),
            date_label: item
                .created_at
                .as_deref()
                .filter(|ts| !ts.is_empty())
                .map(format_display),
            purchased: item.purchased,
            dimmed: item.purchased,
        }
    }
}

/// Everything a surface needs to draw the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    pub rows: Vec<ItemRow>,
    pub total: usize,
    pub purchased: usize,
    pub source: SnapshotSource,
}

impl ListView {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            rows: snapshot.items().iter().map(ItemRow::from).collect(),
            total: snapshot.len(),
            purchased: snapshot.purchased_count(),
            source: snapshot.source(),
        }
    }
}

/// Model for the modal note editor opened by tapping a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEditor {
    pub item_id: ItemId,
    pub title: String,
    pub initial_note: String,
}

impl NoteEditor {
    pub fn for_item(item: &Item) -> Self {
        Self {
            item_id: item.id,
            title: format!("Edit note for: {}", item.name),
            initial_note: item.note.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Info,
    Validation,
    Rejected,
    Offline,
}

/// A transient, dismissible message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn validation(error: &ValidationError) -> Self {
        let message = match error {
            ValidationError::EmptyName => "Enter an item name".to_string(),
            other => format!("Check the item: {}", other),
        };
        Self {
            kind: NoticeKind::Validation,
            message,
        }
    }

    pub fn refresh_failed(failure: &RemoteFailure) -> Self {
        Self::from_failure("Could not load the list", failure)
    }

    pub fn mutation_failed(kind: MutationKind, failure: &RemoteFailure) -> Self {
        let action = match kind {
            MutationKind::Add => "Could not add the item",
            MutationKind::Toggle => "Could not update the item",
            MutationKind::EditNote => "Could not save the note",
            MutationKind::Delete => "Could not delete the item",
        };
        Self::from_failure(action, failure)
    }

    fn from_failure(action: &str, failure: &RemoteFailure) -> Self {
        let (kind, detail) = match failure {
            RemoteFailure::Unreachable(_) => (
                NoticeKind::Offline,
                "no connection to the server".to_string(),
            ),
            RemoteFailure::Unsuccessful { status, .. } => {
                (NoticeKind::Rejected, format!("server answered {}", status))
            }
        };
        let hint = match failure.retry_class() {
            SyncRetryClass::Retryable => " Try again.",
            SyncRetryClass::Permanent => "",
        };
        Self {
            kind,
            message: format!("{}: {}.{}", action, detail, hint),
        }
    }
}
