use std::time::Duration;

use async_trait::async_trait;

use crate::account::errors::AuthError;
use crate::account::models::Authentication;
use crate::account::models::EmailAddress;
use crate::account::models::Login;
use crate::account::models::NewUser;
use crate::account::models::RegisterCommand;
use crate::account::models::Registration;
use crate::account::models::User;
use crate::account::models::UserId;

/// Port for the credential and token lifecycle.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user and issue their first token.
    ///
    /// # Errors
    /// * `InvalidLoginChars` - Login outside `[A-Za-z0-9_]`, rejected before any store access
    /// * `UserExists` - Login or email already registered
    /// * `DuplicateCredential` - Lost a concurrent registration race at the store
    /// * `HashingFailed`, `TokenGenerationFailed`, `StoreUnavailable` - Internal faults
    async fn register(&self, command: RegisterCommand) -> Result<Registration, AuthError>;

    /// Verify credentials and issue a fresh token.
    ///
    /// # Arguments
    /// * `identifier` - Login or email
    /// * `password` - Plaintext password
    ///
    /// # Errors
    /// * `NotFound` - No user matches the identifier
    /// * `InvalidCredentials` - Password mismatch
    /// * `PasswordCompareFailed` - Stored hash unusable
    /// * `TokenGenerationFailed`, `StoreUnavailable` - Internal faults
    async fn authenticate(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<Authentication, AuthError>;

    /// Revoke a token until its natural expiry.
    ///
    /// Unparseable or already-expired tokens are accepted without effect.
    ///
    /// # Errors
    /// * `RevocationFailed` - Ledger write failed
    async fn logout(&self, token: &str) -> Result<(), AuthError>;

    /// Whether the exact token string has been revoked.
    ///
    /// # Errors
    /// * `LedgerUnavailable` - Ledger could not be consulted; callers must deny
    async fn is_revoked(&self, token: &str) -> Result<bool, AuthError>;

    /// Verify a token cryptographically and return its claims.
    ///
    /// Does not consult the revocation ledger.
    ///
    /// # Errors
    /// * `UnexpectedSigningMethod` - Non-HMAC algorithm
    /// * `InvalidToken` - Malformed, badly signed, expired, or missing expiry
    fn parse_claims(&self, token: &str) -> Result<auth::Claims, AuthError>;
}

/// Durable storage of user records.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Whether a user matches `login`, or `login` or `email` when an email is given.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Storage fault
    async fn exists(&self, login: &Login, email: Option<EmailAddress>) -> Result<bool, AuthError>;

    /// Insert a new user.
    ///
    /// # Returns
    /// Store-assigned user ID
    ///
    /// # Errors
    /// * `DuplicateCredential` - Unique constraint on login or email violated
    /// * `StoreUnavailable` - Storage fault
    async fn create(&self, user: NewUser) -> Result<UserId, AuthError>;

    /// Find the user whose login or email equals `identifier`.
    ///
    /// # Errors
    /// * `NotFound` - No match
    /// * `StoreUnavailable` - Storage fault
    async fn find_by_login_or_email(&self, identifier: &str) -> Result<User, AuthError>;
}

/// Expiring record of revoked token strings.
#[async_trait]
pub trait RevocationLedger: Send + Sync + 'static {
    /// Mark `token` revoked for `ttl`. A zero TTL writes nothing.
    ///
    /// # Errors
    /// * `LedgerUnavailable` - Ledger fault
    async fn revoke(&self, token: &str, user_id: UserId, ttl: Duration)
        -> Result<(), AuthError>;

    /// Whether an unexpired entry exists for `token`.
    ///
    /// # Errors
    /// * `LedgerUnavailable` - Ledger fault, distinct from "absent"
    async fn is_revoked(&self, token: &str) -> Result<bool, AuthError>;
}
