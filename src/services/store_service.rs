use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::auth::{Claims, TokenService};
use crate::database::models::{NewStore, Store, StoreInput};
use crate::database::StoreRepository;

use super::{optional, ServiceError};

pub struct StoreService {
    repo: Arc<dyn StoreRepository>,
    tokens: TokenService,
}

impl StoreService {
    pub fn new(repo: Arc<dyn StoreRepository>, tokens: TokenService) -> Self {
        Self { repo, tokens }
    }

    /// Store names are unique across all owners.
    pub async fn create_store(&self, owner_id: i64, input: StoreInput) -> Result<Store, ServiceError> {
        if optional(self.repo.find_by_name(&input.name).await)?.is_some() {
            debug!("Store creation rejected, name already in use");
            return Err(ServiceError::Conflict);
        }

        let store = self
            .repo
            .create(NewStore {
                owner_id,
                name: input.name,
                description: input.description,
                created_at: Utc::now(),
            })
            .await?;

        info!("Account {} created store {}", owner_id, store.id);
        Ok(store)
    }

    /// Resolve the caller's stores and issue a store token.
    ///
    /// The token is scoped to `selected` when given (it must be one of the
    /// caller's stores), otherwise to the first store.
    pub async fn read(
        &self,
        owner: &Claims,
        selected: Option<i64>,
    ) -> Result<(Vec<Store>, String), ServiceError> {
        let owner_id = owner.user_id.unwrap_or(owner.sub);
        let stores = self.list_for_owner(owner_id).await?;

        let scoped = match selected {
            Some(id) => stores.iter().find(|store| store.id == id),
            None => stores.first(),
        }
        .ok_or(ServiceError::NotFound)?;

        let token = self
            .tokens
            .issue(Claims::for_store(scoped, owner), self.tokens.ttl())?;

        info!("Issued store token for store {} to account {}", scoped.id, owner_id);
        Ok((stores, token))
    }

    /// All stores of an owner; `NotFound` when there are none.
    pub async fn list_for_owner(&self, owner_id: i64) -> Result<Vec<Store>, ServiceError> {
        let stores = self.repo.list_by_owner(owner_id).await?;
        if stores.is_empty() {
            return Err(ServiceError::NotFound);
        }
        Ok(stores)
    }

    pub async fn update_store(
        &self,
        id: i64,
        owner_id: i64,
        input: StoreInput,
    ) -> Result<Store, ServiceError> {
        let mut store = self.repo.find_owned(id, owner_id).await?;

        if input.name != store.name && optional(self.repo.find_by_name(&input.name).await)?.is_some() {
            return Err(ServiceError::Conflict);
        }

        store.name = input.name;
        store.description = input.description;
        store.updated_at = Some(Utc::now());

        self.repo.update(&store).await?;

        info!("Updated store {}", id);
        Ok(store)
    }

    pub async fn delete_store(&self, id: i64, owner_id: i64) -> Result<&'static str, ServiceError> {
        let store = self.repo.find_owned(id, owner_id).await?;
        self.repo.delete(store.id, owner_id).await?;

        info!("Deleted store {}", id);
        Ok("Success Delete Store")
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::auth::{Claims, TokenScope};
    use crate::database::models::{Account, StoreInput};
    use crate::services::fixtures::services;
    use crate::services::ServiceError;

    fn owner(id: i64) -> Claims {
        Claims::for_account(&Account {
            id,
            name: format!("owner-{id}"),
            password_hash: String::new(),
            email: format!("{id}@x.com"),
            address: "addr".to_string(),
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    fn input(name: &str) -> StoreInput {
        StoreInput {
            name: name.to_string(),
            description: "desc".to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_read_round_trips() {
        let s = services();
        let created = s.stores.create_store(1, input("S1")).await.unwrap();
        assert_eq!(created.owner_id, 1);
        assert_eq!(created.name, "S1");
        assert_eq!(created.description, "desc");

        let (stores, _) = s.stores.read(&owner(1), None).await.unwrap();
        assert_eq!(stores, vec![created]);
    }

    #[tokio::test]
    async fn duplicate_name_conflicts_across_owners() {
        let s = services();
        s.stores.create_store(1, input("S1")).await.unwrap();

        let err = s.stores.create_store(2, input("S1")).await.unwrap_err();
        assert_eq!(err, ServiceError::Conflict);
    }

    #[tokio::test]
    async fn read_scopes_token_to_first_store() {
        let s = services();
        let first = s.stores.create_store(1, input("S1")).await.unwrap();
        s.stores.create_store(1, input("S2")).await.unwrap();

        let (stores, token) = s.stores.read(&owner(1), None).await.unwrap();
        assert_eq!(stores.len(), 2);

        let claims = s.tokens.verify(&token).unwrap();
        assert_eq!(claims.scope(), TokenScope::Store { store_id: first.id, owner_id: 1 });
        assert_eq!(claims.email, "1@x.com");
    }

    #[tokio::test]
    async fn read_can_select_an_owned_store() {
        let s = services();
        s.stores.create_store(1, input("S1")).await.unwrap();
        let second = s.stores.create_store(1, input("S2")).await.unwrap();
        let foreign = s.stores.create_store(2, input("S3")).await.unwrap();

        let (_, token) = s.stores.read(&owner(1), Some(second.id)).await.unwrap();
        assert_eq!(s.tokens.verify(&token).unwrap().store_id, Some(second.id));

        let err = s.stores.read(&owner(1), Some(foreign.id)).await.unwrap_err();
        assert_eq!(err, ServiceError::NotFound);
    }

    #[tokio::test]
    async fn read_without_stores_is_not_found() {
        let s = services();
        assert_eq!(s.stores.read(&owner(1), None).await.unwrap_err(), ServiceError::NotFound);
    }

    #[tokio::test]
    async fn update_overwrites_and_stamps() {
        let s = services();
        let store = s.stores.create_store(1, input("S1")).await.unwrap();

        let updated = s
            .stores
            .update_store(store.id, 1, StoreInput { name: "S1b".into(), description: "new".into() })
            .await
            .unwrap();
        assert_eq!(updated.name, "S1b");
        assert_eq!(updated.description, "new");
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn update_and_delete_check_ownership() {
        let s = services();
        let store = s.stores.create_store(1, input("S1")).await.unwrap();

        assert_eq!(
            s.stores.update_store(store.id, 2, input("S9")).await.unwrap_err(),
            ServiceError::NotFound
        );
        assert_eq!(s.stores.delete_store(store.id, 2).await.unwrap_err(), ServiceError::NotFound);
        assert_eq!(s.stores.delete_store(store.id, 1).await.unwrap(), "Success Delete Store");
    }

    #[tokio::test]
    async fn rename_onto_existing_name_conflicts() {
        let s = services();
        let store = s.stores.create_store(1, input("S1")).await.unwrap();
        s.stores.create_store(2, input("S2")).await.unwrap();

        let err = s.stores.update_store(store.id, 1, input("S2")).await.unwrap_err();
        assert_eq!(err, ServiceError::Conflict);
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let s = services();
        assert_eq!(s.stores.delete_store(99, 1).await.unwrap_err(), ServiceError::NotFound);
    }
}
