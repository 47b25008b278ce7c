// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require a valid session token:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthFailure, AuthenticatedUser, Credentials};
use crate::state::AppState;

/// Extractor for authenticated users.
///
/// Runs the bearer strategy over the `Authorization` header or the
/// `accessToken` cookie. A rejection is the strategy's [`AuthFailure`],
/// answered with `400`.
///
/// # Example
///
/// ```rust,ignore
/// async fn get_me(
///     Auth(user): Auth,
///     State(state): State<AppState>,
/// ) -> Result<Json<UserProfile>, ApiError> {
///     // user.user_id is the identity from the verified token
/// }
/// ```
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthFailure;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Already resolved earlier in this request
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let user = state
            .authenticator
            .resolve(Credentials::bearer_from_headers(&parts.headers))
            .await?;

        parts.extensions.insert(user.clone());
        Ok(Auth(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{IdentitySeed, TokenCodec};
    use crate::storage::{JsonStorage, StoragePaths};
    use axum::http::Request;
    use std::sync::Arc;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn create_test_state() -> (AppState, Arc<TokenCodec>, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut storage = JsonStorage::new(StoragePaths::new(temp_dir.path()));
        storage.initialize().expect("Failed to initialize storage");

        let tokens = Arc::new(TokenCodec::new(b"extractor-test-secret-extractor-test"));
        let state = AppState::new(storage, Arc::clone(&tokens));
        (state, tokens, temp_dir)
    }

    fn seed() -> IdentitySeed {
        IdentitySeed {
            id: Uuid::new_v4(),
            name: "A".to_string(),
        }
    }

    #[tokio::test]
    async fn auth_extractor_requires_token() {
        let (state, _tokens, _temp_dir) = create_test_state();
        let mut parts = Request::builder()
            .uri("/me")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthFailure::MissingToken)));
    }

    #[tokio::test]
    async fn auth_extractor_accepts_bearer_header() {
        let (state, tokens, _temp_dir) = create_test_state();
        let seed = seed();
        let issued = tokens.issue(&seed).unwrap();
        let mut parts = Request::builder()
            .uri("/me")
            .header("Authorization", format!("Bearer {}", issued.token))
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let Auth(user) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.seed(), seed);
        assert!(parts.extensions.get::<AuthenticatedUser>().is_some());
    }

    #[tokio::test]
    async fn auth_extractor_accepts_session_cookie() {
        let (state, tokens, _temp_dir) = create_test_state();
        let seed = seed();
        let issued = tokens.issue(&seed).unwrap();
        let mut parts = Request::builder()
            .uri("/me")
            .header("Cookie", format!("accessToken={}", issued.token))
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let Auth(user) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.user_id, seed.id);
    }

    #[tokio::test]
    async fn auth_extractor_rejects_foreign_token() {
        let (state, _tokens, _temp_dir) = create_test_state();
        let foreign = TokenCodec::new(b"some-other-secret-some-other-secret")
            .issue(&seed())
            .unwrap();
        let mut parts = Request::builder()
            .uri("/me")
            .header("Authorization", format!("Bearer {}", foreign.token))
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthFailure::InvalidOrExpiredToken)));
    }

    #[tokio::test]
    async fn auth_extractor_prefers_extensions() {
        let (state, _tokens, _temp_dir) = create_test_state();
        let mut parts = Request::builder()
            .uri("/me")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let user = AuthenticatedUser::from_seed(seed());
        parts.extensions.insert(user.clone());

        let Auth(resolved) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(resolved, user);
    }
}
