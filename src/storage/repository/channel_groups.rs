// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Channel group repository.
//!
//! Channel groups live under `servers/{server_id}/channel_groups/`, one JSON
//! file per group.

use uuid::Uuid;

use super::super::{JsonStorage, StorageError, StorageResult};
use crate::models::ChannelGroup;

/// Repository for channel group operations.
pub struct ChannelGroupRepository<'a> {
    storage: &'a JsonStorage,
}

impl<'a> ChannelGroupRepository<'a> {
    pub fn new(storage: &'a JsonStorage) -> Self {
        Self { storage }
    }

    /// Check if a channel group exists.
    pub fn exists(&self, server_id: &Uuid, group_id: &Uuid) -> bool {
        self.storage
            .exists(self.storage.paths().channel_group(server_id, group_id))
    }

    /// Get a channel group by ID.
    pub fn get(&self, server_id: &Uuid, group_id: &Uuid) -> StorageResult<ChannelGroup> {
        if !self.exists(server_id, group_id) {
            return Err(StorageError::NotFound(format!("Channel group {group_id}")));
        }
        self.storage
            .read_json(self.storage.paths().channel_group(server_id, group_id))
    }

    /// Create a new channel group.
    pub fn create(&self, group: &ChannelGroup) -> StorageResult<()> {
        self.storage.create_json(
            self.storage.paths().channel_group(&group.server_id, &group.id),
            group,
        )
    }

    /// Update an existing channel group.
    ///
    /// Never recreates a group deleted concurrently.
    pub fn update(&self, group: &ChannelGroup) -> StorageResult<()> {
        let _guard = self.storage.write_lock();
        if !self.exists(&group.server_id, &group.id) {
            return Err(StorageError::NotFound(format!("Channel group {}", group.id)));
        }
        self.storage.write_json(
            self.storage.paths().channel_group(&group.server_id, &group.id),
            group,
        )
    }

    /// Delete a channel group.
    pub fn delete(&self, server_id: &Uuid, group_id: &Uuid) -> StorageResult<()> {
        let _guard = self.storage.write_lock();
        if !self.exists(server_id, group_id) {
            return Err(StorageError::NotFound(format!("Channel group {group_id}")));
        }
        self.storage
            .delete(self.storage.paths().channel_group(server_id, group_id))
    }

    /// List all channel groups of a server, oldest first.
    pub fn list_by_server(&self, server_id: &Uuid) -> StorageResult<Vec<ChannelGroup>> {
        let ids = self
            .storage
            .list_files(self.storage.paths().channel_groups_dir(server_id), "json")?;

        let mut groups = Vec::new();
        for id in ids.iter().filter_map(|id| Uuid::parse_str(id).ok()) {
            if let Ok(group) = self.get(server_id, &id) {
                groups.push(group);
            }
        }

        groups.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(groups)
    }
}
