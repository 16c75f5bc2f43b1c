use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::database::models::{Item, ItemInput, NewItem};
use crate::database::{ItemRepository, StoreRepository};

use super::{optional, ServiceError};

/// Outcome of `add_item`: a new row, or a restock of an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemAdded {
    Created(Item),
    Restocked(Item),
}

impl ItemAdded {
    pub fn item(&self) -> &Item {
        match self {
            ItemAdded::Created(item) | ItemAdded::Restocked(item) => item,
        }
    }
}

pub struct ItemService {
    repo: Arc<dyn ItemRepository>,
    stores: Arc<dyn StoreRepository>,
}

impl ItemService {
    pub fn new(repo: Arc<dyn ItemRepository>, stores: Arc<dyn StoreRepository>) -> Self {
        Self { repo, stores }
    }

    /// Add stock to a store. A same-named item in the store is restocked
    /// with an atomic increment instead of being duplicated.
    ///
    /// The store must still exist and belong to `owner_id`; a store token
    /// outlives the store it names.
    pub async fn add_item(
        &self,
        store_id: i64,
        owner_id: i64,
        input: ItemInput,
    ) -> Result<ItemAdded, ServiceError> {
        self.stores.find_owned(store_id, owner_id).await?;
        let quantity = input.quantity();

        if let Some(existing) = optional(self.repo.find_by_name(store_id, &input.name).await)? {
            let item = self
                .repo
                .add_quantity(existing.id, store_id, quantity, Utc::now())
                .await?;
            info!("Restocked item {} in store {} to {}", item.id, store_id, item.quantity);
            return Ok(ItemAdded::Restocked(item));
        }

        let item = self
            .repo
            .create(NewItem {
                store_id,
                name: input.name,
                description: input.description,
                quantity,
                created_at: Utc::now(),
            })
            .await?;

        info!("Created item {} in store {}", item.id, store_id);
        Ok(ItemAdded::Created(item))
    }

    pub async fn get_all_items(&self, store_id: i64) -> Result<Vec<Item>, ServiceError> {
        let items = self.repo.list_by_store(store_id).await?;
        if items.is_empty() {
            return Err(ServiceError::NotFound);
        }
        Ok(items)
    }

    pub async fn get_one_item(&self, id: i64, store_id: i64) -> Result<Item, ServiceError> {
        Ok(self.repo.find_owned(id, store_id).await?)
    }

    pub async fn update_item(
        &self,
        id: i64,
        store_id: i64,
        input: ItemInput,
    ) -> Result<Item, ServiceError> {
        let mut item = self.repo.find_owned(id, store_id).await?;

        item.quantity = input.quantity();
        item.name = input.name;
        item.description = input.description;
        item.updated_at = Some(Utc::now());

        self.repo.update(&item).await?;

        info!("Updated item {} in store {}", id, store_id);
        Ok(item)
    }

    pub async fn delete_item(&self, id: i64, store_id: i64) -> Result<&'static str, ServiceError> {
        let item = self.repo.find_owned(id, store_id).await?;
        self.repo.delete(item.id, store_id).await?;

        info!("Deleted item {} from store {}", id, store_id);
        Ok("Success Delete Item")
    }
}

#[cfg(test)]
mod tests {
    use super::ItemAdded;
    use crate::database::models::{ItemInput, StoreInput};
    use crate::services::fixtures::{services, Services};
    use crate::services::ServiceError;

    const OWNER: i64 = 1;

    fn input(name: &str, quantity: i64) -> ItemInput {
        ItemInput {
            name: name.to_string(),
            description: "thing".to_string(),
            quantity: Some(quantity),
        }
    }

    async fn open_store(s: &Services, name: &str) -> i64 {
        let store = StoreInput {
            name: name.to_string(),
            description: "desc".to_string(),
        };
        s.stores.create_store(OWNER, store).await.unwrap().id
    }

    #[tokio::test]
    async fn add_twice_restocks_single_row() {
        let s = services();
        let store = open_store(&s, "S1").await;

        let first = s.items.add_item(store, OWNER, input("Widget", 3)).await.unwrap();
        assert!(matches!(first, ItemAdded::Created(ref item) if item.quantity == 3));

        let second = s.items.add_item(store, OWNER, input("Widget", 2)).await.unwrap();
        match second {
            ItemAdded::Restocked(item) => {
                assert_eq!(item.id, first.item().id);
                assert_eq!(item.quantity, 5);
            }
            other => panic!("expected restock, got {other:?}"),
        }

        assert_eq!(s.items.get_all_items(store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn same_name_in_other_store_is_separate() {
        let s = services();
        let (one, two) = (open_store(&s, "S1").await, open_store(&s, "S2").await);
        let a = s.items.add_item(one, OWNER, input("Widget", 3)).await.unwrap();
        let b = s.items.add_item(two, OWNER, input("Widget", 4)).await.unwrap();

        assert!(matches!(b, ItemAdded::Created(_)));
        assert_ne!(a.item().id, b.item().id);
        assert_eq!(s.items.get_one_item(a.item().id, one).await.unwrap().quantity, 3);
    }

    #[tokio::test]
    async fn concurrent_restocks_do_not_lose_updates() {
        let s = services();
        let store = open_store(&s, "S1").await;
        s.items.add_item(store, OWNER, input("Widget", 1)).await.unwrap();

        let items = std::sync::Arc::new(s.items);
        let mut handles = Vec::new();
        for _ in 0..10 {
            let items = items.clone();
            handles.push(tokio::spawn(async move {
                items.add_item(store, OWNER, input("Widget", 1)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let all = items.get_all_items(store).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].quantity, 11);
    }

    #[tokio::test]
    async fn restock_past_i64_max_is_out_of_range() {
        let s = services();
        let store = open_store(&s, "S1").await;
        let first = s.items.add_item(store, OWNER, input("Widget", i64::MAX)).await.unwrap();

        let err = s.items.add_item(store, OWNER, input("Widget", i64::MAX)).await.unwrap_err();
        assert_eq!(err, ServiceError::OutOfRange);

        let kept = s.items.get_one_item(first.item().id, store).await.unwrap();
        assert_eq!(kept.quantity, i64::MAX);
    }

    #[tokio::test]
    async fn add_to_deleted_store_is_not_found() {
        let s = services();
        let store = open_store(&s, "S1").await;
        s.stores.delete_store(store, OWNER).await.unwrap();

        let err = s.items.add_item(store, OWNER, input("Widget", 1)).await.unwrap_err();
        assert_eq!(err, ServiceError::NotFound);
        assert_eq!(s.items.get_all_items(store).await.unwrap_err(), ServiceError::NotFound);
    }

    #[tokio::test]
    async fn add_to_store_of_other_owner_is_not_found() {
        let s = services();
        let store = open_store(&s, "S1").await;

        let err = s.items.add_item(store, OWNER + 1, input("Widget", 1)).await.unwrap_err();
        assert_eq!(err, ServiceError::NotFound);
    }

    #[tokio::test]
    async fn get_one_from_other_store_is_not_found() {
        let s = services();
        let (one, two) = (open_store(&s, "S1").await, open_store(&s, "S2").await);
        let added = s.items.add_item(one, OWNER, input("Widget", 3)).await.unwrap();

        let err = s.items.get_one_item(added.item().id, two).await.unwrap_err();
        assert_eq!(err, ServiceError::NotFound);
    }

    #[tokio::test]
    async fn get_all_on_empty_store_is_not_found() {
        let s = services();
        let store = open_store(&s, "S1").await;
        assert_eq!(s.items.get_all_items(store).await.unwrap_err(), ServiceError::NotFound);
    }

    #[tokio::test]
    async fn update_overwrites_fields() {
        let s = services();
        let store = open_store(&s, "S1").await;
        let added = s.items.add_item(store, OWNER, input("Widget", 3)).await.unwrap();

        let updated = s
            .items
            .update_item(added.item().id, store, input("Gadget", 0))
            .await
            .unwrap();
        assert_eq!(updated.name, "Gadget");
        assert_eq!(updated.quantity, 0);
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn rename_onto_existing_name_conflicts() {
        let s = services();
        let store = open_store(&s, "S1").await;
        let widget = s.items.add_item(store, OWNER, input("Widget", 3)).await.unwrap();
        s.items.add_item(store, OWNER, input("Gadget", 1)).await.unwrap();

        let err = s
            .items
            .update_item(widget.item().id, store, input("Gadget", 7))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::Conflict);

        let kept = s.items.get_one_item(widget.item().id, store).await.unwrap();
        assert_eq!((kept.name.as_str(), kept.quantity), ("Widget", 3));
        assert_eq!(s.items.get_all_items(store).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_and_delete_check_store_ownership() {
        let s = services();
        let (one, two) = (open_store(&s, "S1").await, open_store(&s, "S2").await);
        let added = s.items.add_item(one, OWNER, input("Widget", 3)).await.unwrap();
        let id = added.item().id;

        assert_eq!(
            s.items.update_item(id, two, input("Gadget", 1)).await.unwrap_err(),
            ServiceError::NotFound
        );
        assert_eq!(s.items.delete_item(id, two).await.unwrap_err(), ServiceError::NotFound);
        assert_eq!(s.items.delete_item(id, one).await.unwrap(), "Success Delete Item");
        assert_eq!(s.items.delete_item(id, one).await.unwrap_err(), ServiceError::NotFound);
    }
}
