// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage as plain JSON documents on the local filesystem,
//! rooted at `DATA_DIR`.
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/
//!   users/{user_id}.json          # Credential record (email, password hash, nickname)
//!   user_emails/{email_key}.json  # Email uniqueness index -> user_id
//!   servers/{server_id}/
//!     channel_groups/{group_id}.json
//! ```

pub mod json_fs;
pub mod paths;
pub mod repository;

pub use json_fs::{JsonStorage, StorageError, StorageResult};
pub use paths::StoragePaths;
pub use repository::{ChannelGroupRepository, StoredUser, UserRepository};
