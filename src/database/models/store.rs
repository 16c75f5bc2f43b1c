use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::{FieldErrors, Validate, Validator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Store {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /account/store` and `PATCH /account/store/:id`.
/// The owner always comes from the caller's token.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Validate for StoreInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new().required("name", &self.name).finish()
    }
}

#[derive(Debug, Clone)]
pub struct NewStore {
    pub owner_id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
