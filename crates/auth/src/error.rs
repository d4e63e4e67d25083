use database::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The sign-in input did not have the expected shape.
    /// `CredentialVerifier::authorize` turns this into a silent rejection.
    #[error("Malformed credentials: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] DbError),

    #[error("Password hashing failed.")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Password verification task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
