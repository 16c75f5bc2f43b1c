pub mod auth;
pub mod cookie;
pub mod payload;
pub mod response;

pub use auth::{require_account, require_store, AuthAccount, AuthStore};
pub use cookie::{read_cookie, SessionCookie};
pub use payload::Payload;
pub use response::{error_with_cookies, ApiResponse, ApiResult};
