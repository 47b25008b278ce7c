// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential verification strategies.
//!
//! A strategy maps one kind of presented credential to an [`AuthOutcome`].
//! There are two:
//!
//! - [`LocalStrategy`]: email + password, checked against the user store.
//! - [`BearerStrategy`]: a session token, checked by signature and expiry
//!   alone. No store lookup happens on this path.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use unicode_normalization::UnicodeNormalization;

use super::{password, AuthFailure, AuthenticatedUser, IdentitySeed, TokenCodec};
use crate::models::SignInRequest;
use crate::storage::{JsonStorage, UserRepository};

/// Result of running a strategy. Consumed exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Success(AuthenticatedUser),
    Failure(AuthFailure),
}

impl AuthOutcome {
    pub fn into_result(self) -> Result<AuthenticatedUser, AuthFailure> {
        match self {
            AuthOutcome::Success(user) => Ok(user),
            AuthOutcome::Failure(reason) => Err(reason),
        }
    }
}

/// Which strategy handled a request, logged as `local` or `jwt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Local,
    Bearer,
}

impl StrategyKind {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Local => "local",
            StrategyKind::Bearer => "jwt",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Common contract of all verification strategies.
pub trait AuthStrategy: Send + Sync {
    /// Credential shape this strategy accepts.
    type Input: Send;

    /// Verify `input`. Never panics and never returns an infrastructure
    /// error: anything that prevents a positive answer is a failure.
    fn verify(&self, input: Self::Input) -> impl Future<Output = AuthOutcome> + Send;
}

/// Canonical form of an email address for lookup and storage.
pub fn normalize_email(email: &str) -> String {
    email.trim().nfkc().collect::<String>().to_lowercase()
}

/// Email + password against the credential store.
#[derive(Clone)]
pub struct LocalStrategy {
    storage: Arc<JsonStorage>,
}

impl LocalStrategy {
    pub fn new(storage: Arc<JsonStorage>) -> Self {
        Self { storage }
    }
}

impl AuthStrategy for LocalStrategy {
    type Input = SignInRequest;

    async fn verify(&self, input: SignInRequest) -> AuthOutcome {
        let email = normalize_email(&input.email);
        if email.is_empty() || input.password.is_empty() {
            return AuthOutcome::Failure(AuthFailure::InvalidCredentials);
        }

        let record = match UserRepository::new(&self.storage).find_by_email(&email) {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(error = %e, "Credential lookup failed");
                None
            }
        };

        let Some(user) = record else {
            password::verify_against_dummy(input.password).await;
            return AuthOutcome::Failure(AuthFailure::InvalidCredentials);
        };

        if !password::verify_password_blocking(input.password, user.password_hash.clone()).await {
            return AuthOutcome::Failure(AuthFailure::InvalidCredentials);
        }

        AuthOutcome::Success(AuthenticatedUser::from_seed(IdentitySeed {
            id: user.id,
            name: user.nickname,
        }))
    }
}

/// Session token by signature and expiry.
#[derive(Clone)]
pub struct BearerStrategy {
    tokens: Arc<TokenCodec>,
}

impl BearerStrategy {
    pub fn new(tokens: Arc<TokenCodec>) -> Self {
        Self { tokens }
    }
}

impl AuthStrategy for BearerStrategy {
    /// `None` when the request carried no token at all.
    type Input = Option<String>;

    async fn verify(&self, input: Option<String>) -> AuthOutcome {
        let Some(token) = input else {
            return AuthOutcome::Failure(AuthFailure::MissingToken);
        };

        match self.tokens.decode(&token) {
            Ok(claims) => AuthOutcome::Success(AuthenticatedUser::from_claims(claims)),
            Err(reason) => AuthOutcome::Failure(reason),
        }
    }
}
