//! # Auth Crate
//!
//! Credential verification for the dashboard's sign-in form: shape checks,
//! a lookup by email and a bcrypt comparison. Session issuance is the
//! caller's job.

pub mod credentials;
pub mod error;
pub mod password;
pub mod store;
pub mod verifier;

pub use credentials::Credentials;
pub use error::AuthError;
pub use password::{hash_password, verify_password};
pub use store::UserStore;
pub use verifier::CredentialVerifier;
