use std::fmt;
use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Role carried by an issued token.
///
/// Encoded on the wire as a small integer. Only `Member` exists today; new
/// roles take new discriminants without changing the claims layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum Role {
    #[default]
    Member = 1,
}

impl Role {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl From<Role> for i32 {
    fn from(role: Role) -> Self {
        role.as_i32()
    }
}

impl TryFrom<i32> for Role {
    type Error = UnknownRole;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Role::Member),
            other => Err(UnknownRole(other)),
        }
    }
}

/// Integer that does not name a known role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownRole(pub i32);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role {}", self.0)
    }
}

/// Claims carried inside an access token.
///
/// `exp` is always `iat` plus the issuer's configured TTL. Tokens lacking
/// `exp` are rejected at decode time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Numeric ID of the user the token was issued to
    pub user_id: i64,

    pub role: Role,

    /// Issued at (Unix timestamp, seconds)
    pub iat: i64,

    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
}

impl Claims {
    /// Build claims issued at `now` and expiring `ttl` later.
    ///
    /// # Arguments
    /// * `user_id` - User the token identifies
    /// * `role` - Role granted to the bearer
    /// * `now` - Issuance instant
    /// * `ttl` - Token lifetime
    pub fn new(user_id: i64, role: Role, now: DateTime<Utc>, ttl: chrono::Duration) -> Self {
        let iat = now.timestamp();
        Self {
            user_id,
            role,
            iat,
            exp: iat + ttl.num_seconds(),
        }
    }

    /// Expiration as a UTC instant.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Time left until expiry, measured from `now`.
    ///
    /// # Returns
    /// `None` once the token is expired (remaining lifetime is zero or negative)
    pub fn remaining_lifetime(&self, now: DateTime<Utc>) -> Option<Duration> {
        let remaining = self.expires_at()? - now;
        remaining.to_std().ok().filter(|d| !d.is_zero())
    }
}
