//! Database model for cached shopping items.

use diesel::prelude::*;
use shoplist_core::items::Item;

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::shopping_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct ShoppingItemDB {
    pub id: i64,
    pub name: String,
    pub note: Option<String>,
    pub is_bought: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<ShoppingItemDB> for Item {
    fn from(db: ShoppingItemDB) -> Self {
        Item {
            id: db.id,
            name: db.name,
            note: db.note,
            purchased: db.is_bought,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<&Item> for ShoppingItemDB {
    fn from(item: &Item) -> Self {
        ShoppingItemDB {
            id: item.id,
            name: item.name.clone(),
            note: item.note.clone(),
            is_bought: item.purchased,
            created_at: item.created_at.clone(),
            updated_at: item.updated_at.clone(),
        }
    }
}
