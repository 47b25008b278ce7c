// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints: sign-in, sign-up, sign-out and the caller's own profile.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::{
    auth::{clear_session_cookie, issue_session_cookie, Auth, Credentials, IdentitySeed},
    error::ApiError,
    models::{SignInRequest, SignUpRequest, UpdateUserRequest, UserProfile},
    service::UserService,
    state::AppState,
};

type SetCookie = [(HeaderName, HeaderValue); 1];

/// Sign in with email and password.
///
/// On success the session token is set as the `accessToken` cookie. A body
/// that is not a JSON object with both fields is a failed sign-in.
#[utoipa::path(
    post,
    path = "/sign-in",
    request_body = SignInRequest,
    tag = "Users",
    responses(
        (status = 204, description = "Signed in, session cookie set"),
        (status = 400, description = "Invalid email or password"),
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    body: Result<Json<SignInRequest>, JsonRejection>,
) -> Response {
    debug!("Sign-in start");
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(error = %rejection, "Sign-in body rejected");
            SignInRequest::default()
        }
    };
    let authenticator = &state.authenticator;
    let secure = state.cookie_secure;

    authenticator
        .authenticate(Credentials::Local(request), |user| async move {
            let cookie = issue_session_cookie(authenticator.tokens(), &user.seed(), secure)?;
            debug!(user_id = %user.user_id, "Sign-in success");
            Ok::<_, ApiError>((StatusCode::NO_CONTENT, [(SET_COOKIE, cookie)]))
        })
        .await
}

/// Register a new account and sign it in.
#[utoipa::path(
    post,
    path = "/sign-up",
    request_body = SignUpRequest,
    tag = "Users",
    responses(
        (status = 201, description = "Account created, session cookie set", body = UserProfile),
        (status = 409, description = "Email address already registered"),
        (status = 422, description = "Invalid input"),
    )
)]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, SetCookie, Json<UserProfile>), ApiError> {
    debug!("Sign-up start");
    let profile = UserService::new(state.storage()).create(request).await?;

    let seed = IdentitySeed {
        id: profile.id,
        name: profile.nickname.clone(),
    };
    let cookie = issue_session_cookie(state.authenticator.tokens(), &seed, state.cookie_secure)?;

    debug!(user_id = %profile.id, "Sign-up success");
    Ok((StatusCode::CREATED, [(SET_COOKIE, cookie)], Json(profile)))
}

/// Update the caller's own profile.
///
/// The target is always the identity in the session token; an `id` in the
/// body is ignored. The body is only read once the token has been verified.
#[utoipa::path(
    patch,
    path = "/me",
    request_body = UpdateUserRequest,
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Missing, invalid or expired session token"),
        (status = 409, description = "Email address already registered, or profile changed concurrently"),
        (status = 422, description = "Invalid input"),
    )
)]
pub async fn update_me(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Response {
    let storage = state.storage();

    state
        .authenticator
        .authenticate(Credentials::bearer_from_headers(&headers), |user| async move {
            let Json(request) = match body {
                Ok(body) => body,
                Err(rejection) => return rejection.into_response(),
            };
            UserService::new(storage)
                .update(&user.user_id, request)
                .await
                .map(Json)
                .map_err(ApiError::from)
                .into_response()
        })
        .await
}

/// Get the caller's own profile.
#[utoipa::path(
    get,
    path = "/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current profile", body = UserProfile),
        (status = 400, description = "Missing, invalid or expired session token"),
        (status = 404, description = "Account no longer exists"),
    )
)]
pub async fn get_me(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = UserService::new(state.storage()).get(&user.user_id)?;
    Ok(Json(profile))
}

/// Sign out by expiring the session cookie.
///
/// Tokens are stateless: a copy of the token kept elsewhere stays valid
/// until it expires.
#[utoipa::path(
    post,
    path = "/sign-out",
    tag = "Users",
    responses((status = 204, description = "Session cookie cleared"))
)]
pub async fn sign_out(State(state): State<AppState>) -> Result<(StatusCode, SetCookie), ApiError> {
    let cookie = clear_session_cookie(state.cookie_secure).map_err(|e| {
        tracing::error!(error = %e, "Failed to build clearing cookie");
        ApiError::internal()
    })?;
    Ok((StatusCode::NO_CONTENT, [(SET_COOKIE, cookie)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthenticatedUser, TokenCodec};
    use crate::storage::{JsonStorage, StoragePaths};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut storage = JsonStorage::new(StoragePaths::new(temp_dir.path()));
        storage.initialize().expect("Failed to initialize storage");
        let tokens = Arc::new(TokenCodec::new(b"users-handler-secret-users-handler"));
        (AppState::new(storage, tokens), temp_dir)
    }

    fn sign_up_request(email: &str) -> SignUpRequest {
        SignUpRequest {
            email: email.to_string(),
            password: "p".to_string(),
            nickname: "A".to_string(),
        }
    }

    #[tokio::test]
    async fn sign_up_returns_profile_and_cookie() {
        let (state, _dir) = test_state();

        let (status, [(name, cookie)], Json(profile)) =
            sign_up(State(state.clone()), Json(sign_up_request("a@x.com")))
                .await
                .expect("sign-up succeeds");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(name, SET_COOKIE);
        assert!(cookie.to_str().unwrap().starts_with("accessToken="));
        assert_eq!(profile.email, "a@x.com");
    }

    #[tokio::test]
    async fn sign_in_failure_sets_no_cookie() {
        let (state, _dir) = test_state();
        sign_up(State(state.clone()), Json(sign_up_request("a@x.com")))
            .await
            .unwrap();

        let response = sign_in(
            State(state),
            Ok(Json(SignInRequest {
                email: "a@x.com".to_string(),
                password: "wrong".to_string(),
            })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn get_me_returns_own_profile() {
        let (state, _dir) = test_state();
        let (_, _, Json(profile)) = sign_up(State(state.clone()), Json(sign_up_request("a@x.com")))
            .await
            .unwrap();
        let user = AuthenticatedUser::from_seed(IdentitySeed {
            id: profile.id,
            name: profile.nickname.clone(),
        });

        let Json(me) = get_me(Auth(user), State(state)).await.unwrap();
        assert_eq!(me, profile);
    }

    #[tokio::test]
    async fn get_me_for_deleted_account_is_not_found() {
        let (state, _dir) = test_state();
        let user = AuthenticatedUser::from_seed(IdentitySeed {
            id: uuid::Uuid::new_v4(),
            name: "Ghost".to_string(),
        });

        let err = get_me(Auth(user), State(state)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn sign_out_expires_cookie() {
        let (state, _dir) = test_state();
        let response = sign_out(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.contains("Max-Age=0"));
    }
}
