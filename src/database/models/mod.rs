pub mod account;
pub mod item;
pub mod store;

pub use account::{Account, AccountInput, LoginInput, NewAccount};
pub use item::{Item, ItemInput, NewItem};
pub use store::{NewStore, Store, StoreInput};
