// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token claims and the authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// The part of an identity that goes into a freshly issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySeed {
    pub id: Uuid,
    /// Display name (the user's nickname)
    pub name: String,
}

/// Claims carried by a session token.
///
/// Wire format: `{"id": "...", "name": "...", "iat": 1700000000, "exp": 1700604800}`.
/// At issuance `exp` is exactly `iat` plus the session lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityClaims {
    /// User ID
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
}

impl IdentityClaims {
    pub fn seed(&self) -> IdentitySeed {
        IdentitySeed {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Authenticated user information.
///
/// This is the primary type used throughout the application to represent
/// the identity making a request. Password sign-in produces it without a
/// token window; bearer authentication fills `issued_at` / `expires_at` from
/// the verified token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Canonical user ID
    pub user_id: Uuid,

    /// Display name
    pub name: String,

    /// Token issue time (Unix seconds), when authenticated by token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<i64>,

    /// Token expiration (Unix seconds), when authenticated by token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl AuthenticatedUser {
    /// Identity verified by password, no session yet.
    pub fn from_seed(seed: IdentitySeed) -> Self {
        Self {
            user_id: seed.id,
            name: seed.name,
            issued_at: None,
            expires_at: None,
        }
    }

    /// Identity reconstructed from verified token claims.
    pub fn from_claims(claims: IdentityClaims) -> Self {
        Self {
            user_id: claims.id,
            name: claims.name,
            issued_at: Some(claims.iat),
            expires_at: Some(claims.exp),
        }
    }

    /// The seed to issue a new token for this identity.
    pub fn seed(&self) -> IdentitySeed {
        IdentitySeed {
            id: self.user_id,
            name: self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims() -> IdentityClaims {
        IdentityClaims {
            id: Uuid::new_v4(),
            name: "A".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_604_800,
        }
    }

    #[test]
    fn from_claims_keeps_identity_and_window() {
        let claims = sample_claims();
        let user = AuthenticatedUser::from_claims(claims.clone());
        assert_eq!(user.user_id, claims.id);
        assert_eq!(user.name, "A");
        assert_eq!(user.issued_at, Some(claims.iat));
        assert_eq!(user.expires_at, Some(claims.exp));
    }

    #[test]
    fn from_seed_has_no_window() {
        let seed = sample_claims().seed();
        let user = AuthenticatedUser::from_seed(seed.clone());
        assert_eq!(user.seed(), seed);
        assert!(user.issued_at.is_none());
        assert!(user.expires_at.is_none());
    }

    #[test]
    fn claims_use_short_wire_names() {
        let claims = sample_claims();
        let json = serde_json::to_value(&claims).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 4);
        for key in ["id", "name", "iat", "exp"] {
            assert!(keys.contains(&key), "missing {key}");
        }
    }
}
