use thiserror::Error;

/// Error for Login validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("Login '{0}' must contain only latin letters, digits and underscore")]
    InvalidCharacters(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Coarse classification used by inbound adapters to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    Unauthorized,
    Internal,
}

/// Top-level error for every credential and token operation.
///
/// One variant per failure kind. Infrastructure variants carry the
/// underlying cause as text for logging; it is never shown to clients.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    // Validation
    #[error("Invalid login: {0}")]
    InvalidLoginChars(#[from] LoginError),

    // Conflicts
    #[error("User with this login or email already exists")]
    UserExists,

    #[error("Login or email already taken: {0}")]
    DuplicateCredential(String),

    // Credential and token invalidity
    #[error("User not found")]
    NotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unexpected signing method: {0}")]
    UnexpectedSigningMethod(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    // Internal faults
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password comparison failed: {0}")]
    PasswordCompareFailed(String),

    #[error("Token generation failed: {0}")]
    TokenGenerationFailed(String),

    #[error("Token revocation failed: {0}")]
    RevocationFailed(String),

    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Revocation ledger unavailable: {0}")]
    LedgerUnavailable(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidLoginChars(_) => ErrorKind::Validation,
            AuthError::UserExists | AuthError::DuplicateCredential(_) => ErrorKind::Conflict,
            AuthError::NotFound
            | AuthError::InvalidCredentials
            | AuthError::UnexpectedSigningMethod(_)
            | AuthError::InvalidToken(_) => ErrorKind::Unauthorized,
            AuthError::HashingFailed(_)
            | AuthError::PasswordCompareFailed(_)
            | AuthError::TokenGenerationFailed(_)
            | AuthError::RevocationFailed(_)
            | AuthError::StoreUnavailable(_)
            | AuthError::LedgerUnavailable(_) => ErrorKind::Internal,
        }
    }
}

impl From<auth::JwtError> for AuthError {
    fn from(err: auth::JwtError) -> Self {
        match err {
            auth::JwtError::EncodingFailed(msg) | auth::JwtError::InvalidConfig(msg) => {
                AuthError::TokenGenerationFailed(msg)
            }
            auth::JwtError::UnexpectedSigningMethod(alg) => AuthError::UnexpectedSigningMethod(alg),
            other @ (auth::JwtError::TokenExpired
            | auth::JwtError::MissingClaim(_)
            | auth::JwtError::InvalidToken(_)) => AuthError::InvalidToken(other.to_string()),
        }
    }
}
