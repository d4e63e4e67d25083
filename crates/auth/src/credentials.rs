use crate::error::AuthError;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use validator::Validate;

/// Email and password as submitted by the sign-in form.
#[derive(Clone, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Parses untyped form input into validated credentials.
    ///
    /// Fails if the input is not an object, either field is missing or not a
    /// string, the email is malformed, or the password is too short.
    pub fn parse(input: &Value) -> Result<Self, AuthError> {
        // Derived struct deserialization also accepts sequences; only objects are valid here.
        if !input.is_object() {
            return Err(AuthError::Validation(
                "credentials must be an object".to_string(),
            ));
        }
        let credentials = Credentials::deserialize(input)
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        credentials.check()?;
        Ok(credentials)
    }

    /// Runs the field rules on already-typed credentials.
    pub fn check(&self) -> Result<(), AuthError> {
        self.validate()
            .map_err(|e| AuthError::Validation(e.to_string()))
    }
}
