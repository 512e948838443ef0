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

//! # In-memory fetcher for tests
//!
//! [`MockFetcher`] implements [`Fetch`] from a table of canned documents and
//! records every URI it was asked for, so tests can assert exactly which
//! requests a resolution made:
//!
//! ```
//! use hal_credit::mock::MockFetcher;
//! use hal_credit::Fetch;
//! use serde_json::json;
//!
//! let fetcher = MockFetcher::new()
//!     .with_document("http://h/accountTypes/1", json!({ "name": "Aardvantage" }));
//!
//! let doc = fetcher.get_json("http://h/accountTypes/1").unwrap();
//! assert_eq!(doc["name"], "Aardvantage");
//! assert_eq!(fetcher.calls(), vec!["http://h/accountTypes/1".to_string()]);
//!
//! // Unknown URIs behave like a 404.
//! assert!(fetcher.get_json("http://h/accountTypes/2").is_err());
//! ```

use crate::error::FetchError;
use crate::fetch::Fetch;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Canned {
    Document(Value),
    Status(u16),
    Transport(String),
    Malformed(String),
}

/// Single-threaded [`Fetch`] double with call recording.
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: HashMap<String, Canned>,
    calls: RefCell<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `doc` for `uri`.
    pub fn with_document(mut self, uri: impl Into<String>, doc: Value) -> Self {
        self.responses.insert(uri.into(), Canned::Document(doc));
        self
    }

    /// Answers `uri` with an HTTP status (404 maps to `NotFound`).
    pub fn with_status(mut self, uri: impl Into<String>, status: u16) -> Self {
        self.responses.insert(uri.into(), Canned::Status(status));
        self
    }

    /// Fails `uri` as if the connection could not be made.
    pub fn with_transport_error(mut self, uri: impl Into<String>, message: &str) -> Self {
        self.responses
            .insert(uri.into(), Canned::Transport(message.to_string()));
        self
    }

    /// Serves a body that is not valid JSON.
    pub fn with_malformed_body(mut self, uri: impl Into<String>, body: &str) -> Self {
        self.responses
            .insert(uri.into(), Canned::Malformed(body.to_string()));
        self
    }

    /// Every URI requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Number of requests made for `uri`.
    pub fn calls_to(&self, uri: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == uri).count()
    }
}

impl Fetch for MockFetcher {
    fn get_json(&self, uri: &str) -> Result<Value, FetchError> {
        self.calls.borrow_mut().push(uri.to_string());

        match self.responses.get(uri) {
            Some(Canned::Document(doc)) => Ok(doc.clone()),
            Some(Canned::Status(404)) | None => Err(FetchError::NotFound {
                uri: uri.to_string(),
            }),
            Some(Canned::Status(status)) => Err(FetchError::Status {
                uri: uri.to_string(),
                status: *status,
            }),
            Some(Canned::Transport(message)) => Err(FetchError::Transport {
                uri: uri.to_string(),
                source: message.clone().into(),
            }),
            Some(Canned::Malformed(body)) => serde_json::from_str(body)
                .map_err(|e| FetchError::decode(uri, "<body>", e.to_string())),
        }
    }
}
