// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::AuthenticatedUser,
    models::{
        ChannelGroup, CreateChannelGroupRequest, SignInRequest, SignUpRequest,
        UpdateChannelGroupRequest, UpdateUserRequest, UserProfile,
    },
    state::AppState,
};

pub mod channel_groups;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/sign-in", post(users::sign_in))
        .route("/sign-up", post(users::sign_up))
        .route("/sign-out", post(users::sign_out))
        .route("/me", get(users::get_me).patch(users::update_me))
        .route(
            "/servers/{server_id}/channel-groups",
            get(channel_groups::list_channel_groups).post(channel_groups::create_channel_group),
        )
        .route(
            "/servers/{server_id}/channel-groups/{group_id}",
            patch(channel_groups::update_channel_group)
                .delete(channel_groups::delete_channel_group),
        )
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Registers the `bearer` scheme referenced by authenticated endpoints.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        users::sign_in,
        users::sign_up,
        users::sign_out,
        users::get_me,
        users::update_me,
        channel_groups::list_channel_groups,
        channel_groups::create_channel_group,
        channel_groups::update_channel_group,
        channel_groups::delete_channel_group
    ),
    components(
        schemas(
            AuthenticatedUser,
            SignInRequest,
            SignUpRequest,
            UpdateUserRequest,
            UserProfile,
            ChannelGroup,
            CreateChannelGroupRequest,
            UpdateChannelGroupRequest,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Users", description = "Sign-in, registration and the caller's profile"),
        (name = "Channel Groups", description = "Channel group management per server")
    )
)]
struct ApiDoc;
