mod account;
mod item;
mod store;

pub use account::PgAccountRepository;
pub use item::PgItemRepository;
pub use store::PgStoreRepository;
