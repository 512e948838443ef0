// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Test servers bound to ephemeral ports.
//!
//! Each server runs on its own thread with a current-thread tokio runtime so
//! that tests can drive it with the blocking client.

#![allow(dead_code)]

use axum::Router;
use hal_credit::server::store::Store;
use hal_credit::server::{AppState, ServerConfig, create_router};
use std::sync::Arc;

/// Serves the router built by `make_router` and returns its base URL.
///
/// The listener is bound before this returns, so requests made right away
/// queue in the backlog instead of being refused.
pub fn spawn_router<F>(make_router: F) -> String
where
    F: FnOnce(&str) -> Router,
{
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let router = make_router(&base_url);

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, router).await.unwrap();
        });
    });

    base_url
}

/// The resource server over a given store.
pub struct TestServer {
    pub base_url: String,
}

impl TestServer {
    pub fn seeded(config: ServerConfig) -> Self {
        Self::with_store(Store::seeded(), config)
    }

    pub fn with_store(store: Store, config: ServerConfig) -> Self {
        let store = Arc::new(store);
        let base_url = spawn_router(|base| {
            create_router(AppState::new(store, config, base.to_string()))
        });
        TestServer { base_url }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// A URL on a port nothing listens on.
pub fn refused_url(path: &str) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}{path}")
}
