// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::store::InMemoryStore;

#[derive(Clone)]
pub struct AppState {
    /// Guard-then-mutate sequences hold the write half for their whole span.
    pub store: Arc<RwLock<InMemoryStore>>,
    pub tokens: Arc<TokenService>,
    pub page_limit_max: u64,
}

impl AppState {
    pub fn new(store: InMemoryStore, tokens: TokenService, page_limit_max: u64) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            tokens: Arc::new(tokens),
            page_limit_max,
        }
    }

    pub fn from_config(store: InMemoryStore, config: &AppConfig) -> Self {
        Self::new(
            store,
            TokenService::new(&config.jwt_secret, config.token_ttl_secs),
            config.page_limit_max,
        )
    }
}

#[cfg(test)]
impl Default for AppState {
    fn default() -> Self {
        Self::new(
            InMemoryStore::new(),
            TokenService::new("test-secret", 3600),
            100,
        )
    }
}
