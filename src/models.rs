// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. All types derive `ToSchema`
//! for the OpenAPI document.
//!
//! ## Model Categories
//!
//! - **Users**: sign-in, sign-up, profile update and the public profile
//! - **Channel Groups**: server-scoped groups of channels
//!
//! Request types that carry a password implement `Debug` by hand so the
//! secret never ends up in a log line.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// =============================================================================
// User Models
// =============================================================================

/// Email and password presented at sign-in.
#[derive(Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SignInRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration payload.
#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    /// Display name, also carried in the session token as `name`.
    pub nickname: String,
}

impl fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("nickname", &self.nickname)
            .finish()
    }
}

/// Profile update payload for `PATCH /me`.
///
/// Every field is optional; absent fields are left unchanged. There is no
/// `id` field: the target is always the identity from the session token,
/// and an `id` sent in the body is ignored.
#[derive(Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

impl fmt::Debug for UpdateUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateUserRequest")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("nickname", &self.nickname)
            .finish()
    }
}

/// Public view of a user. Never contains the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Channel Group Models
// =============================================================================

/// A named group of channels inside a server.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ChannelGroup {
    pub id: Uuid,
    /// Server this group belongs to.
    pub server_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a channel group.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateChannelGroupRequest {
    pub name: String,
}

/// Request to rename a channel group.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateChannelGroupRequest {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_passwords() {
        let sign_in = SignInRequest {
            email: "a@x.com".into(),
            password: "hunter2".into(),
        };
        let sign_up = SignUpRequest {
            email: "a@x.com".into(),
            password: "hunter2".into(),
            nickname: "A".into(),
        };
        let update = UpdateUserRequest {
            password: Some("hunter2".into()),
            ..Default::default()
        };

        for rendered in [
            format!("{sign_in:?}"),
            format!("{sign_up:?}"),
            format!("{update:?}"),
        ] {
            assert!(!rendered.contains("hunter2"), "{rendered}");
            assert!(rendered.contains("<redacted>"), "{rendered}");
        }
    }

    #[test]
    fn update_request_ignores_payload_id() {
        let body = r#"{"id":"00000000-0000-0000-0000-000000000001","nickname":"B"}"#;
        let request: UpdateUserRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.nickname.as_deref(), Some("B"));
        assert!(request.email.is_none());
        assert!(request.password.is_none());
    }
}
