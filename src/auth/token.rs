// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token codec.
//!
//! Tokens are compact HS256 JWTs over [`IdentityClaims`]. The signing secret
//! is handed over once at startup and never changes for the life of the
//! process, so a codec is immutable and shared behind an `Arc`.
//!
//! There is no server-side session record: a token is valid exactly when
//! its signature checks out and `exp` has not passed. Revoking a token
//! before it expires is therefore not possible.

use std::fmt;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{AuthError, AuthFailure, IdentityClaims, IdentitySeed};

/// Session lifetime: 7 days.
pub const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// A freshly issued token together with the claims it encodes.
#[derive(Clone)]
pub struct SessionToken {
    pub token: String,
    pub claims: IdentityClaims,
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("token", &"<redacted>")
            .field("claims", &self.claims)
            .finish()
    }
}

/// Encodes and verifies session tokens with a process-wide secret.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Create a codec for the given HMAC secret.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No skew: accepted while `now <= exp`, rejected from `exp + 1`.
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_secs: SESSION_TTL_SECS,
        }
    }

    /// Issue a token for `seed`, valid from now for the session lifetime.
    pub fn issue(&self, seed: &IdentitySeed) -> Result<SessionToken, AuthError> {
        self.issue_at(seed, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `issued_at` (Unix seconds).
    pub fn issue_at(&self, seed: &IdentitySeed, issued_at: i64) -> Result<SessionToken, AuthError> {
        let claims = IdentityClaims {
            id: seed.id,
            name: seed.name.clone(),
            iat: issued_at,
            exp: issued_at + self.ttl_secs,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(SessionToken { token, claims })
    }

    /// Verify a token and return its claims.
    ///
    /// Bad signature, malformed input and expiry all collapse into
    /// [`AuthFailure::InvalidOrExpiredToken`].
    pub fn decode(&self, token: &str) -> Result<IdentityClaims, AuthFailure> {
        let data = decode::<IdentityClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(kind = ?e.kind(), "Session token rejected");
                AuthFailure::InvalidOrExpiredToken
            })?;

        let claims = data.claims;
        if claims.exp <= claims.iat {
            return Err(AuthFailure::InvalidOrExpiredToken);
        }
        Ok(claims)
    }
}
