pub mod memory;
pub mod redis;

pub use self::memory::InMemoryRevocationLedger;
pub use self::memory::RevocationWrite;
pub use self::redis::RedisRevocationLedger;

/// Ledger key under which a revoked token string is stored.
pub fn blacklist_key(token: &str) -> String {
    format!("blacklist:{}", token)
}
