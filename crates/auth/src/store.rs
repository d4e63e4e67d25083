use async_trait::async_trait;
use core_types::User;
use database::{DbError, DbRepository};

/// Where the verifier looks users up. Implemented by `DbRepository`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns the user with exactly this email, or `None`.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DbError>;
}

#[async_trait]
impl UserStore for DbRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        self.fetch_user_by_email(email).await
    }
}
