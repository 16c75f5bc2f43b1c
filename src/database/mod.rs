pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryDatabase;
pub use postgres::{PgAccountRepository, PgItemRepository, PgStoreRepository};
pub use repository::{AccountRepository, ItemRepository, StoreRepository};
