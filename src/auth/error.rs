// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! [`AuthFailure`] is the outcome of a strategy rejecting the presented
//! credentials. It is always answered with `400 Bad Request` and a fixed,
//! non-enumerating message. [`AuthError`] covers infrastructure problems
//! (token signing, password hashing) that are not the caller's fault.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Why a strategy rejected the presented credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    /// Unknown email or wrong password; the two are indistinguishable
    #[error("Invalid email or password")]
    InvalidCredentials,
    /// Bad signature, malformed token, or token past its expiry
    #[error("Session token is invalid or expired")]
    InvalidOrExpiredToken,
    /// No token in the Authorization header or the session cookie
    #[error("Session token is required")]
    MissingToken,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthFailure {
    /// Get the error code for this failure.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthFailure::InvalidCredentials => "invalid_credentials",
            AuthFailure::InvalidOrExpiredToken => "invalid_or_expired_token",
            AuthFailure::MissingToken => "missing_token",
        }
    }

    /// Get the HTTP status code for this failure.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl IntoResponse for AuthFailure {
    fn into_response(self) -> Response {
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (self.status_code(), body).into_response()
    }
}

/// Authentication infrastructure error.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Token could not be signed
    #[error("Failed to sign session token: {0}")]
    TokenSigning(#[from] jsonwebtoken::errors::Error),
    /// Session cookie could not be encoded as a header value
    #[error("Failed to build session cookie: {0}")]
    Cookie(#[from] axum::http::header::InvalidHeaderValue),
}
