// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Session-token authentication for the Huddle API.
//!
//! ## Auth Flow
//!
//! 1. `POST /sign-in` runs the **local** strategy: email + password against
//!    the user store. On success a session token is issued and set as the
//!    `accessToken` cookie.
//! 2. Later requests present that token, either as the cookie or as
//!    `Authorization: Bearer <token>`.
//! 3. The **bearer** strategy verifies the token's HS256 signature and
//!    expiry. The identity comes from the token alone:
//!      - `id` → canonical `user_id`
//!      - `name` → display name
//!
//! ## Security
//!
//! - Tokens live 7 days, with no clock skew tolerance
//! - Failures answer `400` with a fixed message that never says whether the
//!   email exists
//! - Passwords are stored as Argon2id PHC strings
//! - There is no server-side revocation before expiry

pub mod claims;
pub mod error;
pub mod extractor;
pub mod orchestrator;
pub mod password;
pub mod session;
pub mod strategy;
pub mod token;

pub use claims::{AuthenticatedUser, IdentityClaims, IdentitySeed};
pub use error::{AuthError, AuthFailure};
pub use extractor::Auth;
pub use orchestrator::{Authenticator, Credentials};
pub use session::{
    clear_session_cookie, extract_session_token, issue_session_cookie, session_cookie,
    ACCESS_TOKEN_COOKIE,
};
pub use strategy::{normalize_email, AuthOutcome, AuthStrategy, StrategyKind};
pub use token::{SessionToken, TokenCodec, SESSION_TTL_SECS};
