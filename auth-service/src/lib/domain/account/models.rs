use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use crate::account::errors::EmailError;
use crate::account::errors::LoginError;

/// Registered user as persisted by the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub login: Login,
    pub username: String,
    pub email: Option<EmailAddress>,
    pub password_hash: String,
    pub is_activated: bool,
    pub created_at: DateTime<Utc>,
}

/// Store-assigned numeric user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Login value type
///
/// Non-empty, ASCII letters, digits and underscore only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Login(String);

impl Login {
    /// Create a new valid login.
    ///
    /// # Errors
    /// * `InvalidCharacters` - Empty, or contains anything outside `[A-Za-z0-9_]`
    pub fn new(login: String) -> Result<Self, LoginError> {
        let valid = !login.is_empty()
            && login
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');

        if valid {
            Ok(Self(login))
        } else {
            Err(LoginError::InvalidCharacters(login))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Parse an optional email, treating an empty or blank string as absent.
    pub fn optional(email: Option<String>) -> Result<Option<Self>, EmailError> {
        match email {
            Some(email) if !email.trim().is_empty() => Self::new(email).map(Some),
            _ => Ok(None),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// User record ready for insertion. The store assigns the ID and creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub login: Login,
    pub username: String,
    pub email: Option<EmailAddress>,
    pub password_hash: String,
    pub is_activated: bool,
}

/// Command to register a new user.
///
/// The login is kept raw: its character set is checked by the service
/// before any store access.
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub login: String,
    pub email: Option<EmailAddress>,
    pub password: String,
}

impl RegisterCommand {
    pub fn new(login: String, email: Option<EmailAddress>, password: String) -> Self {
        Self {
            login,
            email,
            password,
        }
    }
}

/// Outcome of a successful registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub user_id: UserId,
    pub token: String,
}

/// Outcome of a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authentication {
    pub user: User,
    pub token: String,
}
