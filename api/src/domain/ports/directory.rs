//! User directory port trait
//!
//! Resolves mention tokens to users known to the platform.

use async_trait::async_trait;

use crate::domain::entities::User;
use crate::error::DirectoryError;

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve a username or email to a user
    ///
    /// Returns `Ok(None)` when no such user exists.
    async fn resolve_user(&self, identifier: &str) -> Result<Option<User>, DirectoryError>;
}
