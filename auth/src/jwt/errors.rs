use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Unexpected signing method: {0}")]
    UnexpectedSigningMethod(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Missing required claim: {0}")]
    MissingClaim(String),

    #[error("Token is invalid: {0}")]
    InvalidToken(String),

    #[error("Invalid token configuration: {0}")]
    InvalidConfig(String),
}
