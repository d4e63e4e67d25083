//! bcrypt hashing and verification.

use crate::error::AuthError;

/// Hashes a plaintext password with a fresh random salt.
///
/// Used to prepare rows for the users table; sign-in only ever verifies.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Checks `password` against a stored bcrypt hash.
///
/// Runs on the blocking thread pool so the async executor is not stalled by
/// the key schedule. A hash that cannot be parsed is an error, not a mismatch.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let password = password.to_owned();
    let hash = hash.to_owned();

    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(matches)
}
