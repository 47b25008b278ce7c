// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the JSON store.
//!
//! Each repository provides CRUD operations for a specific entity type,
//! using `JsonStorage` for all file operations.

pub mod channel_groups;
pub mod users;

pub use channel_groups::ChannelGroupRepository;
pub use users::{StoredUser, UserRepository};
