// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication orchestrator.
//!
//! [`Authenticator`] owns one instance of each strategy, picks the one that
//! matches the presented [`Credentials`], and turns the outcome into exactly
//! one terminal action:
//!
//! - failure: a `400` response carrying the failure reason, nothing else runs;
//! - success: the caller's continuation runs with the resolved identity and
//!   decides the final response.
//!
//! Sign-in uses the continuation to issue a session cookie; profile updates
//! use it to perform the write on behalf of the token's identity.
//!
//! ```rust,ignore
//! state
//!     .authenticator
//!     .authenticate(Credentials::bearer_from_headers(&headers), |user| async move {
//!         update_profile(user.user_id, request).await
//!     })
//!     .await
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::{
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use super::session::extract_session_token;
use super::strategy::{AuthOutcome, AuthStrategy, BearerStrategy, LocalStrategy, StrategyKind};
use super::{AuthenticatedUser, AuthFailure, TokenCodec};
use crate::models::SignInRequest;
use crate::storage::JsonStorage;

/// Credentials presented by a request, one variant per strategy.
#[derive(Clone)]
pub enum Credentials {
    /// Email + password for the local strategy
    Local(SignInRequest),
    /// Session token for the bearer strategy (`None` if the request had none)
    Bearer(Option<String>),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Local(request) => f.debug_tuple("Local").field(request).finish(),
            Credentials::Bearer(token) => f
                .debug_tuple("Bearer")
                .field(&token.as_ref().map(|_| "<redacted>"))
                .finish(),
        }
    }
}

impl Credentials {
    /// Bearer credentials from the `Authorization` header or session cookie.
    pub fn bearer_from_headers(headers: &HeaderMap) -> Self {
        Credentials::Bearer(extract_session_token(headers))
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Credentials::Local(_) => StrategyKind::Local,
            Credentials::Bearer(_) => StrategyKind::Bearer,
        }
    }
}

/// Dispatches credentials to strategies and drives continuations.
pub struct Authenticator {
    local: LocalStrategy,
    bearer: BearerStrategy,
    tokens: Arc<TokenCodec>,
}

impl Authenticator {
    pub fn new(storage: Arc<JsonStorage>, tokens: Arc<TokenCodec>) -> Self {
        Self {
            local: LocalStrategy::new(storage),
            bearer: BearerStrategy::new(Arc::clone(&tokens)),
            tokens,
        }
    }

    /// Codec used to issue session tokens after a successful sign-in.
    pub fn tokens(&self) -> &TokenCodec {
        &self.tokens
    }

    /// Run the matching strategy and return its outcome.
    pub async fn verify(&self, credentials: Credentials) -> AuthOutcome {
        let kind = credentials.kind();
        debug!(strategy = %kind, "Authentication start");

        let outcome = match credentials {
            Credentials::Local(request) => self.local.verify(request).await,
            Credentials::Bearer(token) => self.bearer.verify(token).await,
        };

        match &outcome {
            AuthOutcome::Success(user) => {
                debug!(strategy = %kind, user_id = %user.user_id, "Authentication success");
            }
            AuthOutcome::Failure(reason) => {
                warn!(strategy = %kind, reason = reason.error_code(), "Authentication failed");
            }
        }
        outcome
    }

    /// Authenticate and resolve the request identity, or fail.
    pub async fn resolve(&self, credentials: Credentials) -> Result<AuthenticatedUser, AuthFailure> {
        self.verify(credentials).await.into_result()
    }

    /// Authenticate, then either answer with the failure or hand the
    /// identity to `on_success`, whose result becomes the response.
    ///
    /// `on_success` is invoked at most once, and never on failure.
    pub async fn authenticate<F, Fut, R>(&self, credentials: Credentials, on_success: F) -> Response
    where
        F: FnOnce(AuthenticatedUser) -> Fut,
        Fut: Future<Output = R>,
        R: IntoResponse,
    {
        match self.verify(credentials).await {
            AuthOutcome::Success(user) => on_success(user).await.into_response(),
            AuthOutcome::Failure(reason) => reason.into_response(),
        }
    }
}
