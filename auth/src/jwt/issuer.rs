use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use super::claims::Claims;
use super::claims::Role;
use super::errors::JwtError;
use super::handler::JwtHandler;

/// Immutable token settings, built once at startup.
#[derive(Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenConfig {
    /// # Errors
    /// * `InvalidConfig` - Empty secret or non-positive TTL
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Result<Self, JwtError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(JwtError::InvalidConfig("signing secret is empty".to_string()));
        }
        if ttl <= Duration::zero() {
            return Err(JwtError::InvalidConfig(format!(
                "token TTL must be positive, got {}s",
                ttl.num_seconds()
            )));
        }
        Ok(Self { secret, ttl })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Mints and verifies access tokens.
///
/// Verification is purely cryptographic: signature, algorithm and expiry.
/// Revocation is checked separately by the caller.
pub struct TokenIssuer {
    handler: JwtHandler,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: TokenConfig) -> Self {
        Self {
            handler: JwtHandler::new(&config.secret),
            ttl: config.ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user_id` valid from now for the configured TTL.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn issue(&self, user_id: i64, role: Role) -> Result<String, JwtError> {
        self.issue_at(user_id, role, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        user_id: i64,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        self.handler.encode(&Claims::new(user_id, role, now, self.ttl))
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    /// * `UnexpectedSigningMethod` - Header names a non-HMAC algorithm
    /// * `TokenExpired` - Token is past its expiry
    /// * `MissingClaim` - Token has no expiry
    /// * `InvalidToken` - Malformed token or bad signature
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        self.handler.decode(token)
    }
}
