//! Credential and token primitives
//!
//! Provides the stateless half of authentication:
//! - Password hashing (Argon2id)
//! - Access token issuance and verification (HMAC-signed JWT)
//!
//! Storage, revocation and orchestration live in the service that uses this crate.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{Role, TokenConfig, TokenIssuer};
//!
//! let config = TokenConfig::new("secret_key_at_least_32_bytes_long!", chrono::Duration::hours(24)).unwrap();
//! let issuer = TokenIssuer::new(config);
//! let token = issuer.issue(1, Role::Member).unwrap();
//! let claims = issuer.verify(&token).unwrap();
//! assert_eq!(claims.user_id, 1);
//! assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
//! ```

pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::Role;
pub use jwt::TokenConfig;
pub use jwt::TokenIssuer;
pub use password::PasswordError;
pub use password::PasswordHasher;
