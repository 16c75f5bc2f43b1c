pub mod password;

use std::fmt;
use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::database::models::{Account, Store};

pub use password::{PasswordError, PasswordHasher};

/// Cookie carrying the account-level token.
pub const ACCOUNT_COOKIE: &str = "token";
/// Cookie carrying the store-scoped token.
pub const STORE_COOKIE: &str = "store_token";

/// Signed payload identifying a caller and optionally a store context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id for account claims, store id for store claims.
    pub sub: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<i64>,
    pub email: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

/// What a verified token authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenScope {
    Account { account_id: i64 },
    Store { store_id: i64, owner_id: i64 },
}

impl Claims {
    /// Claims identifying a logged-in account. Timestamps are stamped on issue.
    pub fn for_account(account: &Account) -> Self {
        Self {
            sub: account.id,
            user_id: Some(account.id),
            store_id: None,
            email: account.email.clone(),
            name: account.name.clone(),
            iat: 0,
            exp: 0,
        }
    }

    /// Claims for a store context, derived from the owner's account claims.
    pub fn for_store(store: &Store, owner: &Claims) -> Self {
        Self {
            sub: store.id,
            user_id: Some(store.owner_id),
            store_id: Some(store.id),
            email: owner.email.clone(),
            name: store.name.clone(),
            iat: 0,
            exp: 0,
        }
    }

    pub fn scope(&self) -> TokenScope {
        match self.store_id {
            Some(store_id) => TokenScope::Store {
                store_id,
                owner_id: self.user_id.unwrap_or_default(),
            },
            None => TokenScope::Account {
                account_id: self.user_id.unwrap_or(self.sub),
            },
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token signing key is empty")]
    EmptySecret,

    #[error("Token generation error: {0}")]
    Encode(String),

    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies HS256 claim tokens with a fixed, injected secret.
#[derive(Clone)]
pub struct TokenService {
    keys: Arc<Keys>,
    ttl: Duration,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        Ok(Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }),
            ttl,
        })
    }

    /// Default lifetime for tokens issued by the use-cases.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Stamp `iat`/`exp` onto the claims and sign them.
    pub fn issue(&self, mut claims: Claims, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        claims.iat = now.timestamp();
        claims.exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Encode("token expiry out of range".to_string()))?
            .timestamp();

        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    /// Check signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.keys.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            }
        })?;

        // jsonwebtoken accepts exp == now; a token is only valid strictly before expiry
        if data.claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}
