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

//! HTTP-level tests of the resource server.

mod common;

use common::TestServer;
use hal_credit::server::{AccountsRepresentation, ServerConfig, TypeRepresentation};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

fn get(url: &str) -> (StatusCode, Option<String>, Value) {
    let response = Client::new().get(url).send().unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    (status, content_type, response.json().unwrap())
}

#[test]
fn customer_is_served_as_hal() {
    let server = TestServer::seeded(ServerConfig::default());

    let (status, content_type, doc) = get(&server.url("/customers/1"));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/hal+json"));
    assert_eq!(doc["name"], "Jeremy Corbyn");
    assert_eq!(doc["_links"]["self"]["href"], server.url("/customers/1"));
    assert_eq!(doc["accounts"].as_array().unwrap().len(), 2);
    assert_eq!(
        doc["accounts"][0]["_links"]["type"]["href"],
        server.url("/accountTypes/1")
    );
}

#[test]
fn account_types_are_addressable() {
    let server = TestServer::seeded(ServerConfig::default());

    let (status, _, doc) = get(&server.url("/accountTypes/2"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["name"], "PlatyPlus");

    let (status, _, doc) = get(&server.url("/accountTypes"));
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = doc["_embedded"]["accountTypes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Aardvantage", "PlatyPlus"]);
}

#[test]
fn unknown_ids_are_404_with_error_body() {
    let server = TestServer::seeded(ServerConfig::default());

    let (status, _, body) = get(&server.url("/customers/99"));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "CUSTOMER_NOT_FOUND");

    let (status, _, body) = get(&server.url("/accountTypes/99"));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ACCOUNT_TYPE_NOT_FOUND");
}

#[test]
fn linked_accounts_mode_serves_accounts_collection() {
    let server = TestServer::seeded(ServerConfig {
        accounts: AccountsRepresentation::Linked,
        types: TypeRepresentation::Linked,
    });

    let (_, _, customer) = get(&server.url("/customers/1"));
    assert!(customer.get("accounts").is_none());
    let accounts_href = customer["_links"]["accounts"]["href"].as_str().unwrap();
    assert_eq!(accounts_href, server.url("/customers/1/accounts"));

    let (status, _, accounts) = get(accounts_href);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accounts["_embedded"]["accounts"].as_array().unwrap().len(), 2);
}

#[test]
fn embedded_types_mode_inlines_type() {
    let server = TestServer::seeded(ServerConfig {
        accounts: AccountsRepresentation::Inline,
        types: TypeRepresentation::Embedded,
    });

    let (_, _, customer) = get(&server.url("/customers/1"));
    assert_eq!(
        customer["accounts"][0]["_embedded"]["type"]["name"],
        "Aardvantage"
    );
}

#[test]
fn root_links_collections() {
    let server = TestServer::seeded(ServerConfig::default());

    let (_, _, root) = get(&server.url("/"));
    assert_eq!(root["_links"]["customers"]["href"], server.url("/customers"));
    assert_eq!(
        root["_links"]["accountTypes"]["href"],
        server.url("/accountTypes")
    );

    let (_, _, customers) = get(&server.url("/customers"));
    assert_eq!(
        customers["_embedded"]["customers"][0]["name"],
        "Jeremy Corbyn"
    );
}
