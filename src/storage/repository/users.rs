// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User credential repository.
//!
//! Each user is a JSON file under `users/`. Email uniqueness is enforced by a
//! second file under `user_emails/` that is created with create-new
//! semantics before the user record is written, so two registrations racing
//! on the same address cannot both succeed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::{JsonStorage, StorageError, StorageResult};
use crate::models::UserProfile;

/// User record as stored on disk, password hash included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Unique user identifier
    pub id: Uuid,
    /// Normalized email address (unique)
    pub email: String,
    /// Argon2id PHC string
    pub password_hash: String,
    /// Display name
    pub nickname: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&StoredUser> for UserProfile {
    fn from(user: &StoredUser) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            nickname: user.nickname.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Email index entry pointing at the owning user.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EmailIndexEntry {
    email: String,
    user_id: Uuid,
}

/// Repository for user records.
pub struct UserRepository<'a> {
    storage: &'a JsonStorage,
}

impl<'a> UserRepository<'a> {
    pub fn new(storage: &'a JsonStorage) -> Self {
        Self { storage }
    }

    /// Get a user by ID.
    pub fn get(&self, user_id: &Uuid) -> StorageResult<StoredUser> {
        let path = self.storage.paths().user(user_id);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("User {user_id}")));
        }
        self.storage.read_json(path)
    }

    /// Look up a user by normalized email.
    ///
    /// A dangling index entry (user file missing) reads as "no such user".
    pub fn find_by_email(&self, email: &str) -> StorageResult<Option<StoredUser>> {
        let index_path = self.storage.paths().user_email(email);
        if !self.storage.exists(&index_path) {
            return Ok(None);
        }

        let entry: EmailIndexEntry = self.storage.read_json(index_path)?;
        match self.get(&entry.user_id) {
            Ok(user) if user.email == email => Ok(Some(user)),
            Ok(_) | Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create a new user, reserving its email first.
    ///
    /// Returns `StorageError::AlreadyExists` if the email is taken.
    pub fn create(&self, user: &StoredUser) -> StorageResult<()> {
        let _guard = self.storage.write_lock();
        self.reserve_email(&user.email, &user.id)?;

        if let Err(e) = self.storage.create_json(self.storage.paths().user(&user.id), user) {
            self.release_email(&user.email);
            return Err(e);
        }
        Ok(())
    }

    /// Overwrite an existing user whose email is unchanged.
    pub fn update(&self, user: &StoredUser) -> StorageResult<()> {
        let _guard = self.storage.write_lock();
        let current = self.get(&user.id)?;
        if current.email != user.email {
            return Err(StorageError::Conflict(format!("User {}", user.id)));
        }
        self.storage.write_json(self.storage.paths().user(&user.id), user)
    }

    /// Overwrite an existing user and move its email index from `previous_email`.
    ///
    /// The new address is reserved before anything else changes; if it is
    /// taken the stored record is left untouched. If the stored email is no
    /// longer `previous_email` the record changed since it was read and
    /// `StorageError::Conflict` is returned before anything is reserved.
    pub fn update_with_email_change(
        &self,
        user: &StoredUser,
        previous_email: &str,
    ) -> StorageResult<()> {
        let _guard = self.storage.write_lock();
        let current = self.get(&user.id)?;
        if current.email != previous_email {
            return Err(StorageError::Conflict(format!("User {}", user.id)));
        }

        self.reserve_email(&user.email, &user.id)?;

        if let Err(e) = self.storage.write_json(self.storage.paths().user(&user.id), user) {
            self.release_email(&user.email);
            return Err(e);
        }

        self.release_email(previous_email);
        Ok(())
    }

    /// Create the index entry for `email`. Callers hold the write lock.
    ///
    /// An entry whose owner no longer holds the address is reclaimed.
    fn reserve_email(&self, email: &str, user_id: &Uuid) -> StorageResult<()> {
        let entry = EmailIndexEntry {
            email: email.to_string(),
            user_id: *user_id,
        };
        let path = self.storage.paths().user_email(email);

        let reserved = match self.storage.create_json(&path, &entry) {
            Err(StorageError::AlreadyExists(_)) if self.find_by_email(email)?.is_none() => {
                tracing::warn!("Reclaiming stale email index entry");
                self.storage.delete(&path)?;
                self.storage.create_json(&path, &entry)
            }
            other => other,
        };
        reserved.map_err(|e| match e {
            StorageError::AlreadyExists(_) => {
                StorageError::AlreadyExists("Email address".to_string())
            }
            other => other,
        })
    }

    fn release_email(&self, email: &str) {
        if let Err(e) = self.storage.delete(self.storage.paths().user_email(email)) {
            tracing::warn!(error = %e, "Failed to release email index entry");
        }
    }
}
