// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{Authenticator, TokenCodec};
use crate::storage::JsonStorage;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<JsonStorage>,
    pub authenticator: Arc<Authenticator>,
    /// Add `Secure` to the session cookie
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(storage: JsonStorage, tokens: Arc<TokenCodec>) -> Self {
        let storage = Arc::new(storage);
        Self {
            authenticator: Arc::new(Authenticator::new(Arc::clone(&storage), tokens)),
            storage,
            cookie_secure: false,
        }
    }

    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    pub fn storage(&self) -> &JsonStorage {
        &self.storage
    }
}
