use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// The stored hash could not be used. A mismatch is not an error.
    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}
