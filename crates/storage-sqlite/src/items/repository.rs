use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use diesel::prelude::*;
use log::debug;

use shoplist_core::items::{Item, ItemId, LocalItemStore};
use shoplist_core::{Error, Result};

use super::model::ShoppingItemDB;
use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::shopping_items;
use crate::schema::shopping_items::dsl::*;

pub struct SqliteItemStore {
    pool: Arc<DbPool>,
}

impl SqliteItemStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        SqliteItemStore { pool }
    }
}

impl LocalItemStore for SqliteItemStore {
    fn load_items(&self) -> Result<Vec<Item>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = shopping_items
            .order(id.desc())
            .select(ShoppingItemDB::as_select())
            .load::<ShoppingItemDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    fn get_item(&self, item_id: ItemId) -> Result<Option<Item>> {
        let mut conn = get_connection(&self.pool)?;
        let row = shopping_items
            .find(item_id)
            .select(ShoppingItemDB::as_select())
            .first::<ShoppingItemDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Item::from))
    }

    fn insert_item(&self, item: &Item) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        diesel::insert_into(shopping_items::table)
            .values(ShoppingItemDB::from(item))
            .execute(&mut conn)
            .map_err(StorageError::from)?;
        debug!("Cached item {}", item.id);
        Ok(())
    }

    fn update_item(&self, item: &Item) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        let affected = diesel::update(shopping_items.find(item.id))
            .set(&ShoppingItemDB::from(item))
            .execute(&mut conn)
            .map_err(StorageError::from)?;
        if affected == 0 {
            return Err(Error::ItemNotFound(item.id));
        }
        Ok(())
    }

    fn delete_item(&self, item_id: ItemId) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        let affected = diesel::delete(shopping_items.find(item_id))
            .execute(&mut conn)
            .map_err(StorageError::from)?;
        Ok(affected)
    }

    fn replace_all(&self, items: &[Item]) -> Result<()> {
        let rows: Vec<ShoppingItemDB> = items.iter().map(ShoppingItemDB::from).collect();
        let mut conn = get_connection(&self.pool)?;
        let (removed, written) = conn.immediate_transaction::<_, StorageError, _>(|tx| {
            let cached = shopping_items
                .select(ShoppingItemDB::as_select())
                .load::<ShoppingItemDB>(tx)?;
            let wanted: HashSet<ItemId> = rows.iter().map(|row| row.id).collect();
            let stale: Vec<ItemId> = cached
                .iter()
                .map(|row| row.id)
                .filter(|row_id| !wanted.contains(row_id))
                .collect();
            let removed = stale.len();
            if !stale.is_empty() {
                diesel::delete(shopping_items.filter(id.eq_any(stale))).execute(tx)?;
            }

            let cached_by_id: HashMap<ItemId, ShoppingItemDB> =
                cached.into_iter().map(|row| (row.id, row)).collect();
            let mut written = 0;
            for row in &rows {
                match cached_by_id.get(&row.id) {
                    Some(existing) if existing == row => continue,
                    Some(_) => {
                        diesel::update(shopping_items.find(row.id))
                            .set(row)
                            .execute(tx)?;
                    }
                    None => {
                        diesel::insert_into(shopping_items::table)
                            .values(row)
                            .execute(tx)?;
                    }
                }
                written += 1;
            }
            Ok((removed, written))
        })?;
        debug!(
            "Mirrored {} items into cache ({} removed, {} written)",
            rows.len(),
            removed,
            written
        );
        Ok(())
    }
}
