// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Channel group management within a server.

use chrono::Utc;
use uuid::Uuid;

use super::{not_found_as, ServiceError, ServiceResult};
use crate::models::{ChannelGroup, CreateChannelGroupRequest, UpdateChannelGroupRequest};
use crate::storage::{ChannelGroupRepository, JsonStorage};

/// Maximum channel group name length in characters, after trimming.
pub const MAX_GROUP_NAME_CHARS: usize = 100;

const GROUP_NOT_FOUND: &str = "Channel group not found";

pub struct ChannelGroupService<'a> {
    storage: &'a JsonStorage,
}

impl<'a> ChannelGroupService<'a> {
    pub fn new(storage: &'a JsonStorage) -> Self {
        Self { storage }
    }

    pub fn list(&self, server_id: &Uuid) -> ServiceResult<Vec<ChannelGroup>> {
        Ok(ChannelGroupRepository::new(self.storage).list_by_server(server_id)?)
    }

    pub fn create(
        &self,
        server_id: Uuid,
        request: CreateChannelGroupRequest,
    ) -> ServiceResult<ChannelGroup> {
        let name = validate_name(&request.name)?;
        let now = Utc::now();
        let group = ChannelGroup {
            id: Uuid::new_v4(),
            server_id,
            name,
            created_at: now,
            updated_at: now,
        };

        ChannelGroupRepository::new(self.storage).create(&group)?;
        tracing::debug!(server_id = %server_id, group_id = %group.id, "Channel group created");
        Ok(group)
    }

    /// Rename a channel group.
    pub fn update(
        &self,
        server_id: &Uuid,
        group_id: &Uuid,
        request: UpdateChannelGroupRequest,
    ) -> ServiceResult<ChannelGroup> {
        let name = validate_name(&request.name)?;
        let repo = ChannelGroupRepository::new(self.storage);

        let mut group = repo
            .get(server_id, group_id)
            .map_err(not_found_as(GROUP_NOT_FOUND))?;
        group.name = name;
        group.updated_at = Utc::now();

        repo.update(&group).map_err(not_found_as(GROUP_NOT_FOUND))?;
        Ok(group)
    }

    pub fn delete(&self, server_id: &Uuid, group_id: &Uuid) -> ServiceResult<()> {
        ChannelGroupRepository::new(self.storage)
            .delete(server_id, group_id)
            .map_err(not_found_as(GROUP_NOT_FOUND))?;
        tracing::debug!(server_id = %server_id, group_id = %group_id, "Channel group deleted");
        Ok(())
    }
}

/// Returns the trimmed name.
fn validate_name(name: &str) -> ServiceResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::Validation("Name is required".to_string()));
    }
    if name.chars().count() > MAX_GROUP_NAME_CHARS {
        return Err(ServiceError::Validation(format!(
            "Name must be at most {MAX_GROUP_NAME_CHARS} characters"
        )));
    }
    Ok(name.to_string())
}
