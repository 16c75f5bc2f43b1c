use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::{FieldErrors, Validate, Validator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Item {
    pub id: i64,
    pub store_id: i64,
    pub name: String,
    pub description: String,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /store/items` and `PATCH /store/items/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: Option<i64>,
}

impl ItemInput {
    /// Only meaningful after `validate()` succeeded.
    pub fn quantity(&self) -> i64 {
        self.quantity.unwrap_or_default()
    }
}

impl Validate for ItemInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .required("name", &self.name)
            .quantity("quantity", self.quantity)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct NewItem {
    pub store_id: i64,
    pub name: String,
    pub description: String,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}
