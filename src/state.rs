//! Shared application state handed to every handler and auth layer.

use std::sync::Arc;

use chrono::Duration;
use sqlx::PgPool;

use crate::auth::{PasswordHasher, TokenService};
use crate::config::{AppConfig, ConfigError};
use crate::database::{
    AccountRepository, ItemRepository, MemoryDatabase, PgAccountRepository, PgItemRepository,
    PgStoreRepository, StoreRepository,
};
use crate::services::{AccountService, ItemService, StoreService};

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub stores: Arc<StoreService>,
    pub items: Arc<ItemService>,
    pub tokens: TokenService,
    pub cookie_secure: bool,
    /// `None` when running on the in-memory backend.
    pub pool: Option<PgPool>,
}

impl AppState {
    /// State backed by PostgreSQL repositories sharing one pool.
    pub fn postgres(config: &AppConfig, pool: PgPool) -> Result<Self, ConfigError> {
        Self::build(
            config,
            Arc::new(PgAccountRepository::new(pool.clone())),
            Arc::new(PgStoreRepository::new(pool.clone())),
            Arc::new(PgItemRepository::new(pool.clone())),
            Some(pool),
        )
    }

    /// State backed by a fresh in-process database.
    pub fn in_memory(config: &AppConfig) -> Result<Self, ConfigError> {
        let db = Arc::new(MemoryDatabase::new());
        Self::build(config, db.clone(), db.clone(), db, None)
    }

    fn build(
        config: &AppConfig,
        accounts: Arc<dyn AccountRepository>,
        stores: Arc<dyn StoreRepository>,
        items: Arc<dyn ItemRepository>,
        pool: Option<PgPool>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let security = &config.security;
        let tokens = TokenService::new(&security.jwt_secret, Duration::hours(security.token_ttl_hours))
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        let hasher = PasswordHasher::new(security.hash_cost)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(Self {
            accounts: Arc::new(AccountService::new(accounts, hasher, tokens.clone())),
            stores: Arc::new(StoreService::new(stores.clone(), tokens.clone())),
            items: Arc::new(ItemService::new(items, stores)),
            tokens,
            cookie_secure: security.cookie_secure,
            pool,
        })
    }
}
