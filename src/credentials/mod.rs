//! Credential resolution
//!
//! Obtains the operator's control-plane identity from, in order:
//! environment variables, a JSON credentials file, an interactive prompt.

mod resolver;
mod types;

pub use resolver::{CredentialResolver, EMAIL_ENV, PASSWORD_ENV};
pub use types::{CredentialSource, Credentials};

#[cfg(test)]
mod tests;
