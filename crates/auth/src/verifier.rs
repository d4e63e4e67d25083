use crate::credentials::Credentials;
use crate::error::AuthError;
use crate::password::verify_password;
use crate::store::UserStore;
use core_types::User;
use serde_json::Value;

/// The credentials sign-in callback.
///
/// Validates the input shape, looks the user up by email and checks the
/// password against the stored bcrypt hash. Any failed step is a rejection
/// (`Ok(None)`); only store or hashing failures are errors.
///
/// The returned `User` still carries `password_hash`. Session issuance must
/// not copy it into the session; `User`'s `Serialize` impl already skips it.
pub struct CredentialVerifier<S> {
    store: S,
}

impl<S: UserStore> CredentialVerifier<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Authorizes untyped form input, e.g. `{"email": "...", "password": "..."}`.
    pub async fn authorize(&self, input: &Value) -> Result<Option<User>, AuthError> {
        match Credentials::parse(input) {
            Ok(credentials) => self.authorize_checked(&credentials).await,
            Err(AuthError::Validation(reason)) => {
                tracing::debug!(%reason, "Rejected malformed sign-in input.");
                tracing::info!("Invalid credentials");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Authorizes typed credentials, running the same shape checks first.
    pub async fn authorize_credentials(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<User>, AuthError> {
        if let Err(AuthError::Validation(reason)) = credentials.check() {
            tracing::debug!(%reason, "Rejected malformed sign-in input.");
            tracing::info!("Invalid credentials");
            return Ok(None);
        }
        self.authorize_checked(credentials).await
    }

    async fn authorize_checked(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<User>, AuthError> {
        let Some(user) = self.store.find_user_by_email(&credentials.email).await? else {
            tracing::info!("Invalid credentials");
            return Ok(None);
        };

        if verify_password(&credentials.password, &user.password_hash).await? {
            tracing::debug!(user_id = %user.id, "Credentials verified.");
            Ok(Some(user))
        } else {
            tracing::info!("Invalid credentials");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::hash_password;
    use async_trait::async_trait;
    use database::DbError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    /// An in-memory user table that counts lookups.
    struct MemoryStore {
        users: Vec<User>,
        lookups: AtomicUsize,
        fail: bool,
    }

    impl MemoryStore {
        fn with_user(email: &str, password: &str) -> Self {
            Self {
                users: vec![User {
                    id: Uuid::new_v4(),
                    name: "User".to_string(),
                    email: email.to_string(),
                    password_hash: hash_password(password, 4).unwrap(),
                }],
                lookups: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UserStore for MemoryStore {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DbError::ConnectionConfigError("store offline".to_string()));
            }
            Ok(self.users.iter().find(|u| u.email == email).cloned())
        }
    }

    #[async_trait]
    impl UserStore for &MemoryStore {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
            (**self).find_user_by_email(email).await
        }
    }

    #[tokio::test]
    async fn short_password_is_rejected_without_lookup() {
        let store = MemoryStore::with_user("a@b.com", "123456");
        let verifier = CredentialVerifier::new(&store);

        let result = verifier
            .authorize(&json!({ "email": "a@b.com", "password": "short" }))
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(store.lookups(), 0);
    }

    #[tokio::test]
    async fn malformed_input_is_rejected_without_lookup() {
        let store = MemoryStore::with_user("a@b.com", "123456");
        let verifier = CredentialVerifier::new(&store);

        for input in [
            json!(null),
            json!("a@b.com"),
            json!(["a@b.com", "123456"]),
            json!({ "email": "a@b.com" }),
            json!({ "email": "nope", "password": "123456" }),
        ] {
            assert!(verifier.authorize(&input).await.unwrap().is_none());
        }
        let typed = Credentials::new("a@b.com", "12345");
        assert!(verifier.authorize_credentials(&typed).await.unwrap().is_none());

        assert_eq!(store.lookups(), 0);
    }

    #[tokio::test]
    async fn unknown_email_is_rejected() {
        let store = MemoryStore::with_user("user@nextmail.com", "123456");
        let verifier = CredentialVerifier::new(&store);

        let result = verifier
            .authorize(&json!({ "email": "other@nextmail.com", "password": "123456" }))
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(store.lookups(), 1);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let store = MemoryStore::with_user("user@nextmail.com", "123456");
        let verifier = CredentialVerifier::new(&store);

        let result = verifier
            .authorize(&json!({ "email": "user@nextmail.com", "password": "654321" }))
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn correct_credentials_return_the_user() {
        let store = MemoryStore::with_user("user@nextmail.com", "123456");
        let verifier = CredentialVerifier::new(&store);

        let user = verifier
            .authorize(&json!({ "email": "user@nextmail.com", "password": "123456" }))
            .await
            .unwrap()
            .expect("user should be authorized");

        assert_eq!(user, store.users[0]);

        let typed = Credentials::new("user@nextmail.com", "123456");
        assert!(verifier.authorize_credentials(&typed).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn store_failure_is_an_error() {
        let mut store = MemoryStore::with_user("user@nextmail.com", "123456");
        store.fail = true;
        let verifier = CredentialVerifier::new(&store);

        let err = verifier
            .authorize(&json!({ "email": "user@nextmail.com", "password": "123456" }))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Store(_)));
    }
}
