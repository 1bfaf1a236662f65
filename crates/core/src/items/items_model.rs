//! Domain models for shopping-list items.

use serde::{Deserialize, Serialize};

use crate::utils::timestamp::parse_timestamp;

/// Server-assigned item identifier.
pub type ItemId = i64;

/// A shopping-list entry as the remote service knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub note: Option<String>,
    pub purchased: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Item {
    /// Applies the client-side normalization rules to an item received from the
    /// remote store.
    ///
    /// Blank notes become `None`, a missing `updated_at` falls back to
    /// `created_at`, and an `updated_at` that parses earlier than `created_at`
    /// is raised to it.
    pub fn normalized(mut self) -> Self {
        self.note = self.note.filter(|note| !note.trim().is_empty());
        self.created_at = self.created_at.filter(|ts| !ts.trim().is_empty());
        self.updated_at = self.updated_at.filter(|ts| !ts.trim().is_empty());

        match (&self.created_at, &self.updated_at) {
            (Some(created), None) => {
                self.updated_at = Some(created.clone());
            }
            (Some(created), Some(updated)) => {
                if let (Some(c), Some(u)) = (parse_timestamp(created), parse_timestamp(updated)) {
                    if u < c {
                        self.updated_at = Some(created.clone());
                    }
                }
            }
            _ => {}
        }
        self
    }

    /// The full replacement state of this item, for use with an update.
    pub fn to_update(&self) -> ItemUpdate {
        ItemUpdate {
            name: self.name.clone(),
            note: self.note.clone(),
            purchased: self.purchased,
        }
    }

    /// Returns the note only when it carries visible text.
    pub fn visible_note(&self) -> Option<&str> {
        self.note.as_deref().filter(|note| !note.trim().is_empty())
    }
}

/// Draft for creating a new item. The server assigns the id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    pub note: Option<String>,
    pub purchased: bool,
}

impl NewItem {
    pub fn new(name: impl Into<String>, note: Option<String>) -> Self {
        Self {
            name: name.into(),
            note,
            purchased: false,
        }
    }
}

/// Complete desired state of an existing item.
///
/// Updates replace the whole record: callers always send every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    pub name: String,
    pub note: Option<String>,
    pub purchased: bool,
}

impl ItemUpdate {
    pub fn with_purchased(mut self, purchased: bool) -> Self {
        self.purchased = purchased;
        self
    }

    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }

    /// Builds the item the server is expected to hold after this update.
    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            name: self.name,
            note: self.note,
            purchased: self.purchased,
            created_at: None,
            updated_at: None,
        }
    }
}
