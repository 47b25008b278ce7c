// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{ChannelGroup, CreateChannelGroupRequest, UpdateChannelGroupRequest},
    service::ChannelGroupService,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/servers/{server_id}/channel-groups",
    params(
        ("server_id" = Uuid, Path, description = "Server that owns the channel groups")
    ),
    tag = "Channel Groups",
    responses((status = 200, body = [ChannelGroup]))
)]
pub async fn list_channel_groups(
    Path(server_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ChannelGroup>>, ApiError> {
    info!(server_id = %server_id, "Channel group list start");
    let groups = ChannelGroupService::new(state.storage()).list(&server_id)?;
    Ok(Json(groups))
}

#[utoipa::path(
    post,
    path = "/servers/{server_id}/channel-groups",
    params(
        ("server_id" = Uuid, Path, description = "Server to create the channel group in")
    ),
    request_body = CreateChannelGroupRequest,
    tag = "Channel Groups",
    responses(
        (status = 201, body = ChannelGroup),
        (status = 422, description = "Invalid name")
    )
)]
pub async fn create_channel_group(
    Path(server_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<CreateChannelGroupRequest>,
) -> Result<(StatusCode, Json<ChannelGroup>), ApiError> {
    info!(server_id = %server_id, "Channel group create start");
    let group = ChannelGroupService::new(state.storage()).create(server_id, request)?;
    Ok((StatusCode::CREATED, Json(group)))
}

#[utoipa::path(
    patch,
    path = "/servers/{server_id}/channel-groups/{group_id}",
    params(
        ("server_id" = Uuid, Path, description = "Server that owns the channel group"),
        ("group_id" = Uuid, Path, description = "Channel group to rename")
    ),
    request_body = UpdateChannelGroupRequest,
    tag = "Channel Groups",
    responses(
        (status = 200, body = ChannelGroup),
        (status = 404, description = "Channel group not found"),
        (status = 422, description = "Invalid name")
    )
)]
pub async fn update_channel_group(
    Path((server_id, group_id)): Path<(Uuid, Uuid)>,
    State(state): State<AppState>,
    Json(request): Json<UpdateChannelGroupRequest>,
) -> Result<Json<ChannelGroup>, ApiError> {
    info!(server_id = %server_id, group_id = %group_id, "Channel group update start");
    let group = ChannelGroupService::new(state.storage()).update(&server_id, &group_id, request)?;
    Ok(Json(group))
}

#[utoipa::path(
    delete,
    path = "/servers/{server_id}/channel-groups/{group_id}",
    params(
        ("server_id" = Uuid, Path, description = "Server that owns the channel group"),
        ("group_id" = Uuid, Path, description = "Channel group to delete")
    ),
    tag = "Channel Groups",
    responses(
        (status = 204),
        (status = 404, description = "Channel group not found")
    )
)]
pub async fn delete_channel_group(
    Path((server_id, group_id)): Path<(Uuid, Uuid)>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    info!(server_id = %server_id, group_id = %group_id, "Channel group delete start");
    ChannelGroupService::new(state.storage()).delete(&server_id, &group_id)?;
    Ok(StatusCode::NO_CONTENT)
}
