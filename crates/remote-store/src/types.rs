//! Wire types for the `/api/products` endpoints.

use serde::{Deserialize, Serialize};
use shoplist_core::items::{Item, ItemId, ItemUpdate, NewItem};

/// A product as the service serializes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDto {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub purchased: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl From<ProductDto> for Item {
    fn from(dto: ProductDto) -> Self {
        Item {
            id: dto.id,
            name: dto.name,
            note: dto.notes,
            purchased: dto.purchased,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        }
    }
}

/// Request body for create and update.
///
/// `notes` is always sent as a string; the service trims it unconditionally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    pub name: String,
    pub purchased: bool,
    pub notes: String,
}

impl From<NewItem> for ProductPayload {
    fn from(draft: NewItem) -> Self {
        Self {
            id: None,
            name: draft.name,
            purchased: draft.purchased,
            notes: draft.note.unwrap_or_default(),
        }
    }
}

impl ProductPayload {
    pub fn for_update(id: ItemId, update: ItemUpdate) -> Self {
        Self {
            id: Some(id),
            name: update.name,
            purchased: update.purchased,
            notes: update.note.unwrap_or_default(),
        }
    }
}

/// Wrapper the service puts around most payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
    pub count: Option<usize>,
    pub timestamp: Option<String>,
}

impl<T> Envelope<T> {
    /// Human-readable reason for a rejected envelope.
    pub fn rejection_reason(&self) -> Option<String> {
        if let Some(error) = &self.error {
            return Some(error.clone());
        }
        if !self.errors.is_empty() {
            return Some(self.errors.join("; "));
        }
        self.message.clone()
    }
}

/// Either an envelope or the bare payload. The envelope is tried first.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ResponseShape<T> {
    Envelope(Envelope<T>),
    Bare(T),
}
