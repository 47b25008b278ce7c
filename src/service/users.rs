// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User registration, profile reads and profile updates.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::{not_found_as, ServiceError, ServiceResult};
use crate::auth::{normalize_email, password};
use crate::models::{SignUpRequest, UpdateUserRequest, UserProfile};
use crate::storage::{JsonStorage, StorageError, StoredUser, UserRepository};

/// Maximum password length in characters.
pub const MAX_PASSWORD_CHARS: usize = 128;

/// Maximum nickname length in characters, after trimming.
pub const MAX_NICKNAME_CHARS: usize = 32;

const USER_NOT_FOUND: &str = "User not found";
const USER_CHANGED: &str = "Profile was changed by another request, retry";

pub struct UserService<'a> {
    storage: &'a JsonStorage,
}

impl<'a> UserService<'a> {
    pub fn new(storage: &'a JsonStorage) -> Self {
        Self { storage }
    }

    /// Register a new user.
    ///
    /// Fails with [`ServiceError::EmailTaken`] when the normalized email is
    /// already registered.
    pub async fn create(&self, request: SignUpRequest) -> ServiceResult<UserProfile> {
        let email = normalize_email(&request.email);
        validate_email(&email)?;
        validate_password(&request.password)?;
        let nickname = validate_nickname(&request.nickname)?;

        let password_hash = password::hash_password_blocking(request.password).await?;

        let now = Utc::now();
        let user = StoredUser {
            id: Uuid::new_v4(),
            email,
            password_hash,
            nickname,
            created_at: now,
            updated_at: now,
        };

        UserRepository::new(self.storage)
            .create(&user)
            .map_err(write_error)?;

        debug!(user_id = %user.id, "User registered");
        Ok(UserProfile::from(&user))
    }

    /// Get the profile of `user_id`.
    pub fn get(&self, user_id: &Uuid) -> ServiceResult<UserProfile> {
        let user = UserRepository::new(self.storage)
            .get(user_id)
            .map_err(not_found_as(USER_NOT_FOUND))?;
        Ok(UserProfile::from(&user))
    }

    /// Apply `request` to the user `user_id`.
    ///
    /// `user_id` always comes from the verified session, never from the
    /// payload. Absent fields are left unchanged; nothing is written if any
    /// field fails validation.
    pub async fn update(&self, user_id: &Uuid, request: UpdateUserRequest) -> ServiceResult<UserProfile> {
        let repo = UserRepository::new(self.storage);
        let mut user = repo.get(user_id).map_err(not_found_as(USER_NOT_FOUND))?;
        let previous_email = user.email.clone();

        if let Some(email) = request.email {
            let email = normalize_email(&email);
            validate_email(&email)?;
            user.email = email;
        }
        if let Some(nickname) = request.nickname {
            user.nickname = validate_nickname(&nickname)?;
        }
        if let Some(new_password) = request.password {
            validate_password(&new_password)?;
            user.password_hash = password::hash_password_blocking(new_password).await?;
        }
        user.updated_at = Utc::now();

        if user.email == previous_email {
            repo.update(&user).map_err(write_error)?;
        } else {
            repo.update_with_email_change(&user, &previous_email)
                .map_err(write_error)?;
        }

        debug!(user_id = %user.id, "User updated");
        Ok(UserProfile::from(&user))
    }
}

fn write_error(e: StorageError) -> ServiceError {
    match e {
        StorageError::AlreadyExists(_) => ServiceError::EmailTaken,
        StorageError::NotFound(_) => ServiceError::NotFound(USER_NOT_FOUND.to_string()),
        StorageError::Conflict(_) => ServiceError::Conflict(USER_CHANGED.to_string()),
        other => ServiceError::Storage(other),
    }
}

/// Check an already normalized email address.
fn validate_email(email: &str) -> ServiceResult<()> {
    let invalid = || ServiceError::Validation("Email address is invalid".to_string());

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    Ok(())
}

fn validate_password(password: &str) -> ServiceResult<()> {
    if password.is_empty() {
        return Err(ServiceError::Validation("Password is required".to_string()));
    }
    if password.chars().count() > MAX_PASSWORD_CHARS {
        return Err(ServiceError::Validation(format!(
            "Password must be at most {MAX_PASSWORD_CHARS} characters"
        )));
    }
    Ok(())
}

/// Returns the trimmed nickname.
fn validate_nickname(nickname: &str) -> ServiceResult<String> {
    let nickname = nickname.trim();
    if nickname.is_empty() {
        return Err(ServiceError::Validation("Nickname is required".to_string()));
    }
    if nickname.chars().count() > MAX_NICKNAME_CHARS {
        return Err(ServiceError::Validation(format!(
            "Nickname must be at most {MAX_NICKNAME_CHARS} characters"
        )));
    }
    Ok(nickname.to_string())
}
