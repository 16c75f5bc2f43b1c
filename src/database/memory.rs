//! In-process backend implementing all three repositories.
//!
//! Mirrors the PostgreSQL schema rules that matter to the use-cases:
//! sequential ids, `(store_id, name)` uniqueness on items and cascading
//! deletes from account to store to item.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{Account, Item, NewAccount, NewItem, NewStore, Store};
use crate::database::repository::{AccountRepository, ItemRepository, StoreRepository};

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<i64, Account>,
    stores: BTreeMap<i64, Store>,
    items: BTreeMap<i64, Item>,
    next_account_id: i64,
    next_store_id: i64,
    next_item_id: i64,
}

impl Tables {
    fn remove_store_cascade(&mut self, store_id: i64) {
        self.stores.remove(&store_id);
        self.items.retain(|_, item| item.store_id != store_id);
    }
}

#[derive(Default)]
pub struct MemoryDatabase {
    tables: RwLock<Tables>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[async_trait]
impl AccountRepository for MemoryDatabase {
    async fn create(&self, account: NewAccount) -> Result<Account, DatabaseError> {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.next_account_id);
        let row = Account {
            id,
            name: account.name,
            password_hash: account.password_hash,
            email: account.email,
            address: account.address,
            created_at: account.created_at,
            updated_at: None,
        };
        tables.accounts.insert(id, row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Account, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .accounts
            .get(&id)
            .cloned()
            .ok_or(DatabaseError::NotFound("account"))
    }

    async fn find_by_email(&self, email: &str) -> Result<Account, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .accounts
            .values()
            .find(|account| account.email == email)
            .cloned()
            .ok_or(DatabaseError::NotFound("account"))
    }

    async fn update(&self, account: &Account) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .accounts
            .get_mut(&account.id)
            .ok_or(DatabaseError::NotFound("account"))?;

        row.name = account.name.clone();
        row.password_hash = account.password_hash.clone();
        row.email = account.email.clone();
        row.address = account.address.clone();
        row.updated_at = account.updated_at;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.accounts.remove(&id).is_none() {
            return Err(DatabaseError::NotFound("account"));
        }

        let owned: Vec<i64> = tables
            .stores
            .values()
            .filter(|store| store.owner_id == id)
            .map(|store| store.id)
            .collect();
        for store_id in owned {
            tables.remove_store_cascade(store_id);
        }
        Ok(())
    }
}

#[async_trait]
impl StoreRepository for MemoryDatabase {
    async fn create(&self, store: NewStore) -> Result<Store, DatabaseError> {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.next_store_id);
        let row = Store {
            id,
            owner_id: store.owner_id,
            name: store.name,
            description: store.description,
            created_at: store.created_at,
            updated_at: None,
        };
        tables.stores.insert(id, row.clone());
        Ok(row)
    }

    async fn find_by_name(&self, name: &str) -> Result<Store, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .stores
            .values()
            .find(|store| store.name == name)
            .cloned()
            .ok_or(DatabaseError::NotFound("store"))
    }

    async fn find_owned(&self, id: i64, owner_id: i64) -> Result<Store, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .stores
            .get(&id)
            .filter(|store| store.owner_id == owner_id)
            .cloned()
            .ok_or(DatabaseError::NotFound("store"))
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Store>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .stores
            .values()
            .filter(|store| store.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update(&self, store: &Store) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .stores
            .get_mut(&store.id)
            .filter(|row| row.owner_id == store.owner_id)
            .ok_or(DatabaseError::NotFound("store"))?;

        row.name = store.name.clone();
        row.description = store.description.clone();
        row.updated_at = store.updated_at;
        Ok(())
    }

    async fn delete(&self, id: i64, owner_id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        match tables.stores.get(&id) {
            Some(store) if store.owner_id == owner_id => {
                tables.remove_store_cascade(id);
                Ok(())
            }
            _ => Err(DatabaseError::NotFound("store")),
        }
    }
}

#[async_trait]
impl ItemRepository for MemoryDatabase {
    async fn create(&self, item: NewItem) -> Result<Item, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.stores.contains_key(&item.store_id) {
            return Err(DatabaseError::NotFound("store"));
        }

        let duplicate = tables
            .items
            .values()
            .any(|row| row.store_id == item.store_id && row.name == item.name);
        if duplicate {
            return Err(DatabaseError::Conflict("item"));
        }

        let id = next_id(&mut tables.next_item_id);
        let row = Item {
            id,
            store_id: item.store_id,
            name: item.name,
            description: item.description,
            quantity: item.quantity,
            created_at: item.created_at,
            updated_at: None,
        };
        tables.items.insert(id, row.clone());
        Ok(row)
    }

    async fn find_by_name(&self, store_id: i64, name: &str) -> Result<Item, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .items
            .values()
            .find(|item| item.store_id == store_id && item.name == name)
            .cloned()
            .ok_or(DatabaseError::NotFound("item"))
    }

    async fn find_owned(&self, id: i64, store_id: i64) -> Result<Item, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .items
            .get(&id)
            .filter(|item| item.store_id == store_id)
            .cloned()
            .ok_or(DatabaseError::NotFound("item"))
    }

    async fn list_by_store(&self, store_id: i64) -> Result<Vec<Item>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .items
            .values()
            .filter(|item| item.store_id == store_id)
            .cloned()
            .collect())
    }

    async fn update(&self, item: &Item) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let renamed_onto_other = tables.items.values().any(|row| {
            row.id != item.id && row.store_id == item.store_id && row.name == item.name
        });
        if renamed_onto_other {
            return Err(DatabaseError::Conflict("item"));
        }

        let row = tables
            .items
            .get_mut(&item.id)
            .filter(|row| row.store_id == item.store_id)
            .ok_or(DatabaseError::NotFound("item"))?;

        row.name = item.name.clone();
        row.description = item.description.clone();
        row.quantity = item.quantity;
        row.updated_at = item.updated_at;
        Ok(())
    }

    async fn add_quantity(
        &self,
        id: i64,
        store_id: i64,
        delta: i64,
        at: DateTime<Utc>,
    ) -> Result<Item, DatabaseError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .items
            .get_mut(&id)
            .filter(|row| row.store_id == store_id)
            .ok_or(DatabaseError::NotFound("item"))?;

        row.quantity = row
            .quantity
            .checked_add(delta)
            .ok_or(DatabaseError::OutOfRange("item"))?;
        row.updated_at = Some(at);
        Ok(row.clone())
    }

    async fn delete(&self, id: i64, store_id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        match tables.items.get(&id) {
            Some(item) if item.store_id == store_id => {
                tables.items.remove(&id);
                Ok(())
            }
            _ => Err(DatabaseError::NotFound("item")),
        }
    }
}
