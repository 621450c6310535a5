use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::JwtError;

/// Algorithms accepted on decode: the HMAC family only.
const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// JWT token handler for encoding and decoding tokens.
///
/// Generic over the claims type. Signs with HS256 and only accepts tokens
/// whose header names an HMAC algorithm, so a token cannot switch the
/// verifier to an asymmetric scheme keyed with the shared secret.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Encode claims into a JWT token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a JWT token.
    ///
    /// Checks, in order: header algorithm family, signature, presence of
    /// `exp`, and expiry (no leeway).
    ///
    /// # Errors
    /// * `UnexpectedSigningMethod` - Header names a non-HMAC algorithm
    /// * `TokenExpired` - `exp` is in the past
    /// * `MissingClaim` - `exp` is absent
    /// * `InvalidToken` - Malformed token or signature mismatch
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, JwtError> {
        let header = decode_header(token).map_err(|e| JwtError::InvalidToken(e.to_string()))?;
        if !HMAC_ALGORITHMS.contains(&header.alg) {
            return Err(JwtError::UnexpectedSigningMethod(format!("{:?}", header.alg)));
        }

        let mut validation = Validation::new(self.algorithm);
        validation.algorithms = HMAC_ALGORITHMS.to_vec();
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        decode::<T>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                ErrorKind::InvalidAlgorithm => JwtError::UnexpectedSigningMethod(e.to_string()),
                ErrorKind::MissingRequiredClaim(claim) => JwtError::MissingClaim(claim.clone()),
                _ => JwtError::InvalidToken(e.to_string()),
            })
    }
}
