use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::Client;

use super::blacklist_key;
use crate::account::errors::AuthError;
use crate::account::models::UserId;
use crate::account::ports::RevocationLedger;

/// Revocation ledger backed by Redis.
///
/// Each revoked token is a `blacklist:<token>` key holding the user ID,
/// written with `SET .. PX` so Redis drops it when the token would have
/// expired anyway.
#[derive(Clone)]
pub struct RedisRevocationLedger {
    manager: ConnectionManager,
}

impl RedisRevocationLedger {
    /// Open a managed connection (reconnects automatically).
    ///
    /// # Errors
    /// * `LedgerUnavailable` - Invalid URL or server unreachable
    pub async fn connect(url: &str) -> Result<Self, AuthError> {
        let client = Client::open(url).map_err(|e| AuthError::LedgerUnavailable(e.to_string()))?;

        let manager = client.get_connection_manager().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to get Redis connection manager");
            AuthError::LedgerUnavailable(format!("failed to connect to Redis: {}", e))
        })?;

        Ok(Self { manager })
    }

    /// # Errors
    /// * `LedgerUnavailable` - Redis did not answer `PING`
    pub async fn ping(&self) -> Result<(), AuthError> {
        let mut conn = self.manager.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| AuthError::LedgerUnavailable(format!("Redis ping failed: {}", e)))
    }
}

#[async_trait]
impl RevocationLedger for RedisRevocationLedger {
    async fn revoke(&self, token: &str, user_id: UserId, ttl: Duration) -> Result<(), AuthError> {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        if ttl_ms == 0 {
            return Ok(());
        }

        let mut conn = self.manager.clone();
        redis::cmd("SET")
            .arg(blacklist_key(token))
            .arg(user_id.0)
            .arg("PX")
            .arg(ttl_ms)
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| AuthError::LedgerUnavailable(format!("failed to blacklist token: {}", e)))
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, AuthError> {
        let mut conn = self.manager.clone();
        redis::cmd("EXISTS")
            .arg(blacklist_key(token))
            .query_async::<_, bool>(&mut conn)
            .await
            .map_err(|e| AuthError::LedgerUnavailable(format!("failed to check blacklist: {}", e)))
    }
}
