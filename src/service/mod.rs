// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Service Layer
//!
//! Business rules between the HTTP handlers and the repositories:
//! input validation, normalization, password hashing and the mapping of
//! storage outcomes to domain errors.
//!
//! Services borrow the storage for the duration of one operation, the same
//! way repositories do.

pub mod channel_groups;
pub mod users;

pub use channel_groups::ChannelGroupService;
pub use users::UserService;

use crate::auth::password::PasswordError;
use crate::storage::StorageError;

/// Error type for service operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input rejected by validation; the message is safe to show
    #[error("{0}")]
    Validation(String),
    /// Another account already uses this email address
    #[error("Email address is already registered")]
    EmailTaken,
    /// Target entity does not exist
    #[error("{0}")]
    NotFound(String),
    /// Target entity changed while the request was being applied
    #[error("{0}")]
    Conflict(String),
    /// Storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    /// Any other downstream failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PasswordError> for ServiceError {
    fn from(e: PasswordError) -> Self {
        ServiceError::Internal(e.to_string())
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Map a storage `NotFound` to a domain `NotFound` with `message`.
fn not_found_as(message: &str) -> impl FnOnce(StorageError) -> ServiceError + '_ {
    move |e| match e {
        StorageError::NotFound(_) => ServiceError::NotFound(message.to_string()),
        other => ServiceError::Storage(other),
    }
}
