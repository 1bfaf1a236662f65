use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use super::{Item, ItemId, ItemUpdate, NewItem};
use crate::errors::Result;
use crate::sync::RemoteFailure;

/// Request/response access to the authoritative remote store.
///
/// Each call is a single attempt. Implementations may run concurrently with
/// themselves.
#[async_trait]
pub trait RemoteItemStore: Send + Sync {
    async fn list(&self) -> std::result::Result<Vec<Item>, RemoteFailure>;

    async fn create(&self, draft: NewItem) -> std::result::Result<Item, RemoteFailure>;

    /// Full replace: `update` carries the complete desired state.
    async fn update(
        &self,
        id: ItemId,
        update: ItemUpdate,
    ) -> std::result::Result<Item, RemoteFailure>;

    async fn delete(&self, id: ItemId) -> std::result::Result<(), RemoteFailure>;
}

/// Key-indexed on-device cache of items.
pub trait LocalItemStore: Send + Sync {
    /// All cached items, newest id first.
    fn load_items(&self) -> Result<Vec<Item>>;

    fn get_item(&self, id: ItemId) -> Result<Option<Item>>;

    fn insert_item(&self, item: &Item) -> Result<()>;

    fn update_item(&self, item: &Item) -> Result<()>;

    /// Returns the number of rows removed.
    fn delete_item(&self, id: ItemId) -> Result<usize>;

    /// Makes the cache hold exactly `items`: rows missing from `items` are
    /// deleted, changed rows updated, new rows inserted.
    ///
    /// Stores that can should apply this atomically; the default applies the
    /// changes one row at a time.
    fn replace_all(&self, items: &[Item]) -> Result<()> {
        let cached = self.load_items()?;
        let cached_by_id: HashMap<ItemId, &Item> = cached.iter().map(|i| (i.id, i)).collect();
        let wanted: HashSet<ItemId> = items.iter().map(|i| i.id).collect();

        for stale in cached.iter().filter(|i| !wanted.contains(&i.id)) {
            self.delete_item(stale.id)?;
        }
        for item in items {
            match cached_by_id.get(&item.id) {
                Some(existing) if *existing == item => {}
                Some(_) => self.update_item(item)?,
                None => self.insert_item(item)?,
            }
        }
        Ok(())
    }
}

/// Local store that keeps nothing. Used when no cache is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpLocalItemStore;

impl LocalItemStore for NoOpLocalItemStore {
    fn load_items(&self) -> Result<Vec<Item>> {
        Ok(Vec::new())
    }

    fn get_item(&self, _id: ItemId) -> Result<Option<Item>> {
        Ok(None)
    }

    fn insert_item(&self, _item: &Item) -> Result<()> {
        Ok(())
    }

    fn update_item(&self, _item: &Item) -> Result<()> {
        Ok(())
    }

    fn delete_item(&self, _id: ItemId) -> Result<usize> {
        Ok(0)
    }

    fn replace_all(&self, _items: &[Item]) -> Result<()> {
        Ok(())
    }
}
