// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path layout for the JSON document store.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Default storage root when `DATA_DIR` is not set.
pub const DATA_ROOT: &str = "./data";

/// Storage path utilities.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all stored data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== User Paths ==========

    /// Directory containing all user records.
    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    /// Path to a specific user record.
    pub fn user(&self, user_id: &Uuid) -> PathBuf {
        self.users_dir().join(format!("{user_id}.json"))
    }

    /// Directory containing the email uniqueness index.
    pub fn user_emails_dir(&self) -> PathBuf {
        self.root.join("user_emails")
    }

    /// Index entry for a normalized email address.
    ///
    /// The file name is a v5 UUID of the address so arbitrary email
    /// characters never reach the filesystem.
    pub fn user_email(&self, normalized_email: &str) -> PathBuf {
        let key = Uuid::new_v5(&Uuid::NAMESPACE_URL, normalized_email.as_bytes());
        self.user_emails_dir().join(format!("{key}.json"))
    }

    // ========== Channel Group Paths ==========

    /// Directory containing all servers.
    pub fn servers_dir(&self) -> PathBuf {
        self.root.join("servers")
    }

    /// Directory holding the channel groups of one server.
    pub fn channel_groups_dir(&self, server_id: &Uuid) -> PathBuf {
        self.servers_dir()
            .join(server_id.to_string())
            .join("channel_groups")
    }

    /// Path to a specific channel group file.
    pub fn channel_group(&self, server_id: &Uuid, group_id: &Uuid) -> PathBuf {
        self.channel_groups_dir(server_id)
            .join(format!("{group_id}.json"))
    }
}
