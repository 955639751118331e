//! Account credentials.

/// Email/password pair for a portfolio service account.
///
/// Supplied once at connector construction and immutable for the
/// connector's lifetime. Per-service account identifiers (the numeric
/// portfolio id, the OAuth client id) are passed to the connector
/// constructors separately since they are not shared between services.
#[derive(Clone, Debug)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// Create credentials from an email/password pair.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// The account email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The account password.
    pub fn password(&self) -> &str {
        &self.password
    }
}
