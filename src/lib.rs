// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Huddle Server - Chat backend API
//!
//! This crate provides the HTTP backend of a chat application: account
//! registration, session-token authentication and server-scoped channel
//! groups.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Authentication strategies, orchestrator and session tokens
//! - `service` - Validation and business rules
//! - `storage` - JSON document storage on the local filesystem

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod state;
pub mod storage;
