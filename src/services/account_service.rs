use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::auth::{Claims, PasswordHasher, TokenService};
use crate::database::models::{Account, AccountInput, LoginInput, NewAccount};
use crate::database::AccountRepository;

use super::{optional, ServiceError};

pub struct AccountService {
    repo: Arc<dyn AccountRepository>,
    hasher: PasswordHasher,
    tokens: TokenService,
}

impl AccountService {
    pub fn new(repo: Arc<dyn AccountRepository>, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self { repo, hasher, tokens }
    }

    /// Create an account. Email must not be registered yet.
    pub async fn register(&self, input: AccountInput) -> Result<Account, ServiceError> {
        if optional(self.repo.find_by_email(&input.email).await)?.is_some() {
            debug!("Registration rejected, email already in use");
            return Err(ServiceError::Conflict);
        }

        let password_hash = self.hasher.hash(&input.password)?;

        let account = self
            .repo
            .create(NewAccount {
                name: input.name,
                password_hash,
                email: input.email,
                address: input.address,
                created_at: Utc::now(),
            })
            .await?;

        info!("Registered account {}", account.id);
        Ok(account)
    }

    /// Check credentials and issue an account token.
    pub async fn login(&self, input: LoginInput) -> Result<(Account, String), ServiceError> {
        let account = self.repo.find_by_email(&input.email).await?;

        match self.hasher.verify(&input.password, &account.password_hash) {
            Ok(true) => {}
            Ok(false) => {
                warn!("Login failed for account {}: wrong password", account.id);
                return Err(ServiceError::Unauthorized);
            }
            Err(e) => {
                // Same response as a wrong password, but an operator needs to know
                warn!("Login failed for account {}: {}", account.id, e);
                return Err(ServiceError::Unauthorized);
            }
        }

        let token = self
            .tokens
            .issue(Claims::for_account(&account), self.tokens.ttl())?;

        info!("Account {} logged in", account.id);
        Ok((account, token))
    }

    pub async fn read_one(&self, id: i64) -> Result<Account, ServiceError> {
        Ok(self.repo.find_by_id(id).await?)
    }

    /// Full overwrite of the account. The password is always re-hashed.
    pub async fn update(&self, id: i64, input: AccountInput) -> Result<Account, ServiceError> {
        let mut account = self.repo.find_by_id(id).await?;

        if input.email != account.email {
            if let Some(other) = optional(self.repo.find_by_email(&input.email).await)? {
                if other.id != id {
                    return Err(ServiceError::Conflict);
                }
            }
        }

        account.password_hash = self.hasher.hash(&input.password)?;
        account.name = input.name;
        account.email = input.email;
        account.address = input.address;
        account.updated_at = Some(Utc::now());

        self.repo.update(&account).await?;

        info!("Updated account {}", id);
        Ok(account)
    }

    pub async fn delete(&self, id: i64) -> Result<&'static str, ServiceError> {
        let account = self.repo.find_by_id(id).await?;
        self.repo.delete(account.id).await?;

        info!("Deleted account {}", id);
        Ok("Success Delete Account")
    }
}
