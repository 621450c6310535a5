use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use async_trait::async_trait;

use super::blacklist_key;
use crate::account::errors::AuthError;
use crate::account::models::UserId;
use crate::account::ports::RevocationLedger;

/// A write accepted by [`InMemoryRevocationLedger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationWrite {
    pub key: String,
    pub user_id: UserId,
    pub ttl: Duration,
}

#[derive(Default)]
struct LedgerState {
    entries: HashMap<String, (UserId, Instant)>,
    writes: Vec<RevocationWrite>,
}

/// Revocation ledger kept in process memory.
///
/// An entry past its deadline reads as absent. Expired entries are pruned on
/// every `revoke`, so the map stays bounded by the live revocations. The
/// write log grows without bound and exists for test assertions only.
#[derive(Default)]
pub struct InMemoryRevocationLedger {
    state: Mutex<LedgerState>,
}

impl InMemoryRevocationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write performed so far, in order.
    pub fn writes(&self) -> Vec<RevocationWrite> {
        self.state
            .lock()
            .map(|state| state.writes.clone())
            .unwrap_or_default()
    }

    /// Number of unexpired entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.state
            .lock()
            .map(|state| {
                state
                    .entries
                    .values()
                    .filter(|(_, deadline)| *deadline > now)
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned(e: impl std::fmt::Display) -> AuthError {
    AuthError::LedgerUnavailable(format!("revocation ledger poisoned: {}", e))
}

#[async_trait]
impl RevocationLedger for InMemoryRevocationLedger {
    async fn revoke(&self, token: &str, user_id: UserId, ttl: Duration) -> Result<(), AuthError> {
        if ttl.is_zero() {
            return Ok(());
        }

        let key = blacklist_key(token);
        let now = Instant::now();
        let mut state = self.state.lock().map_err(poisoned)?;
        state.entries.retain(|_, (_, deadline)| *deadline > now);
        state.entries.insert(key.clone(), (user_id, now + ttl));
        state.writes.push(RevocationWrite { key, user_id, ttl });
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, AuthError> {
        let key = blacklist_key(token);
        let mut state = self.state.lock().map_err(poisoned)?;

        match state.entries.get(&key) {
            Some((_, deadline)) if *deadline > Instant::now() => Ok(true),
            Some(_) => {
                state.entries.remove(&key);
                Ok(false)
            }
            None => Ok(false),
        }
    }
}
