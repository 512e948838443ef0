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

//! Blocking retrieval of HAL documents.
//!
//! [`Fetch`] is the single seam between resolution logic and the network.
//! [`HttpFetcher`] is the production implementation; tests substitute
//! [`MockFetcher`](crate::mock::MockFetcher).

use crate::error::FetchError;
use crate::hal;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches one JSON document per call.
///
/// Implementations must not cache: every call is a fresh request.
pub trait Fetch {
    fn get_json(&self, uri: &str) -> Result<Value, FetchError>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn get_json(&self, uri: &str) -> Result<Value, FetchError> {
        (**self).get_json(uri)
    }
}

/// [`Fetch`] over a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport {
                uri: String::new(),
                source: Box::new(e),
            })?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn get_json(&self, uri: &str) -> Result<Value, FetchError> {
        debug!(uri, "GET");

        let response = self
            .client
            .get(uri)
            .header(ACCEPT, format!("{}, application/json", hal::MEDIA_TYPE))
            .send()
            .map_err(|e| {
                warn!(uri, error = %e, "request failed");
                FetchError::Transport {
                    uri: uri.to_string(),
                    source: Box::new(e),
                }
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            warn!(uri, "resource not found");
            return Err(FetchError::NotFound {
                uri: uri.to_string(),
            });
        }
        if !status.is_success() {
            warn!(uri, status = status.as_u16(), "unexpected status");
            return Err(FetchError::Status {
                uri: uri.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|e| FetchError::Transport {
            uri: uri.to_string(),
            source: Box::new(e),
        })?;

        serde_json::from_str(&body).map_err(|e| {
            warn!(uri, error = %e, "response is not JSON");
            FetchError::decode(uri, "<body>", e.to_string())
        })
    }
}
