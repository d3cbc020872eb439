//! Authentication module
//!
//! Control-plane calls are authenticated with a session token obtained by
//! logging in with the operator's email and password. The `Authenticator`
//! caches the token and logs in again once it goes stale.

mod authenticator;
mod types;

pub use authenticator::{extract_jsonpath, Authenticator};
pub use types::{AuthConfig, CachedToken, TokenPlacement, SESSION_TOKEN_LIFETIME_SECONDS};
