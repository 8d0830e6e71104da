use std::fmt;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default token lifetime handed out by `/login`.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(5 * 60);

/// Token claims. Expiry is the only claim; tokens carry no identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub exp: i64,
}

impl Claims {
    pub fn expiring_in(ttl: Duration) -> Self {
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            exp: Utc::now().timestamp().saturating_add(ttl),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    /// Malformed, wrongly signed, wrong algorithm, or expired. Callers never
    /// learn which.
    #[error("invalid token")]
    Invalid,

    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issues and validates HMAC-signed bearer tokens with a shared secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: impl AsRef<[u8]>, ttl: Duration) -> Self {
        let secret = secret.as_ref();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Signs a fresh token expiring `ttl` from now.
    pub fn issue(&self) -> Result<String, TokenError> {
        self.sign(&Claims::expiring_in(self.ttl))
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to sign token: {}", e);
            TokenError::Signing(e)
        })
    }

    /// Checks algorithm family, signature and expiry.
    pub fn validate(&self, token: &str) -> Result<(), TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|_| ())
            .map_err(|e| {
                tracing::debug!("Rejected bearer token: {}", e);
                TokenError::Invalid
            })
    }
}
