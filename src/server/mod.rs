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

//! HAL resource server for the demo data set.
//!
//! ## Endpoints
//!
//! - `GET /` - Entry point linking the collections
//! - `GET /customers` - All customers
//! - `GET /customers/{id}` - A customer with its accounts
//! - `GET /customers/{id}/accounts` - A customer's accounts as a collection
//! - `GET /accountTypes` - All account types
//! - `GET /accountTypes/{id}` - An account type
//!
//! Every response is `application/hal+json` with absolute hrefs built from
//! the request's `Host` header. [`ServerConfig`] chooses whether customers
//! carry their accounts inline or behind a link, and whether accounts embed
//! their type or only link to it.
//!
//! ## Example Usage
//!
//! ```bash
//! cargo run --bin hal-server -- --accounts linked --types embedded
//! curl http://localhost:8080/customers/1
//! ```

pub mod store;

use crate::base::{AccountTypeId, CustomerId};
use crate::hal;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use store::{Store, StoredAccount, StoredAccountType, StoredCustomer};
use tokio::net::TcpListener;
use tracing::debug;

/// How a customer presents its accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum AccountsRepresentation {
    /// `accounts` array on the customer document
    #[default]
    Inline,
    /// `_links.accounts` pointing at `/customers/{id}/accounts`
    Linked,
}

/// How an account presents its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TypeRepresentation {
    /// Only `_links.type`
    #[default]
    Linked,
    /// `_links.type` plus `_embedded.type`
    Embedded,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerConfig {
    pub accounts: AccountsRepresentation,
    pub types: TypeRepresentation,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub config: ServerConfig,
    /// Base URL used when a request carries no `Host` header.
    pub fallback_base: String,
}

impl AppState {
    pub fn new(store: Arc<Store>, config: ServerConfig, fallback_base: impl Into<String>) -> Self {
        Self {
            store,
            config,
            fallback_base: fallback_base.into(),
        }
    }

    fn base_url(&self, headers: &HeaderMap) -> String {
        headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .map(|host| format!("http://{host}"))
            .unwrap_or_else(|| self.fallback_base.trim_end_matches('/').to_string())
    }
}

/// A JSON body served as `application/hal+json`.
pub struct Hal(pub Value);

impl IntoResponse for Hal {
    fn into_response(self) -> Response {
        let mut response = Json(self.0).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(hal::MEDIA_TYPE),
        );
        response
    }
}

/// Response body for errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Lookup failures, rendered as 404s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppError {
    CustomerNotFound(CustomerId),
    AccountTypeNotFound(AccountTypeId),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (error, code) = match self {
            AppError::CustomerNotFound(id) => {
                (format!("customer {id} not found"), "CUSTOMER_NOT_FOUND")
            }
            AppError::AccountTypeNotFound(id) => (
                format!("account type {id} not found"),
                "ACCOUNT_TYPE_NOT_FOUND",
            ),
        };

        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

// HAL representations

fn customer_href(base: &str, id: CustomerId) -> String {
    format!("{base}/customers/{id}")
}

fn account_type_href(base: &str, id: AccountTypeId) -> String {
    format!("{base}/accountTypes/{id}")
}

pub fn account_type_document(base: &str, account_type: &StoredAccountType) -> Value {
    let href = account_type_href(base, account_type.id);
    json!({
        "name": account_type.name,
        "_links": hal::links([("self", href.clone()), ("accountType", href)]),
    })
}

pub fn account_document(base: &str, store: &Store, config: ServerConfig, account: &StoredAccount) -> Value {
    let mut doc = json!({
        "creditLimit": account.credit_limit.to_string(),
        "_links": hal::links([("type", account_type_href(base, account.account_type))]),
    });

    if config.types == TypeRepresentation::Embedded {
        if let Some(account_type) = store.account_type(account.account_type) {
            doc[hal::EMBEDDED] = json!({ "type": account_type_document(base, &account_type) });
        }
    }
    doc
}

fn accounts_href(base: &str, id: CustomerId) -> String {
    format!("{}/accounts", customer_href(base, id))
}

pub fn customer_document(base: &str, store: &Store, config: ServerConfig, customer: &StoredCustomer) -> Value {
    let href = customer_href(base, customer.id);

    match config.accounts {
        AccountsRepresentation::Inline => {
            let accounts: Vec<Value> = customer
                .accounts
                .iter()
                .map(|a| account_document(base, store, config, a))
                .collect();
            json!({
                "name": customer.name,
                "accounts": accounts,
                "_links": hal::links([("self", href.clone()), ("customer", href)]),
            })
        }
        AccountsRepresentation::Linked => json!({
            "name": customer.name,
            "_links": hal::links([
                ("self", href.clone()),
                ("customer", href),
                ("accounts", accounts_href(base, customer.id)),
            ]),
        }),
    }
}

fn collection(rel: &str, self_href: String, items: Vec<Value>) -> Value {
    json!({
        "_embedded": { rel: items },
        "_links": hal::links([("self", self_href)]),
    })
}

// Handlers

/// GET / - Entry point.
async fn root(State(state): State<AppState>, headers: HeaderMap) -> Hal {
    let base = state.base_url(&headers);
    Hal(json!({
        "_links": hal::links([
            ("customers", format!("{base}/customers")),
            ("accountTypes", format!("{base}/accountTypes")),
        ]),
    }))
}

/// GET /customers - List all customers.
async fn list_customers(State(state): State<AppState>, headers: HeaderMap) -> Hal {
    let base = state.base_url(&headers);
    let items = state
        .store
        .customers()
        .iter()
        .map(|c| customer_document(&base, &state.store, state.config, c))
        .collect();
    Hal(collection("customers", format!("{base}/customers"), items))
}

/// GET /customers/{id} - Get a customer.
async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    headers: HeaderMap,
) -> Result<Hal, AppError> {
    let id = CustomerId(id);
    let customer = state
        .store
        .customer(id)
        .ok_or(AppError::CustomerNotFound(id))?;
    debug!(%id, "serving customer");

    let base = state.base_url(&headers);
    Ok(Hal(customer_document(&base, &state.store, state.config, &customer)))
}

/// GET /customers/{id}/accounts - A customer's accounts.
async fn get_customer_accounts(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    headers: HeaderMap,
) -> Result<Hal, AppError> {
    let id = CustomerId(id);
    let customer = state
        .store
        .customer(id)
        .ok_or(AppError::CustomerNotFound(id))?;

    let base = state.base_url(&headers);
    let items = customer
        .accounts
        .iter()
        .map(|a| account_document(&base, &state.store, state.config, a))
        .collect();
    Ok(Hal(collection("accounts", accounts_href(&base, id), items)))
}

/// GET /accountTypes - List all account types.
async fn list_account_types(State(state): State<AppState>, headers: HeaderMap) -> Hal {
    let base = state.base_url(&headers);
    let items = state
        .store
        .account_types()
        .iter()
        .map(|t| account_type_document(&base, t))
        .collect();
    Hal(collection("accountTypes", format!("{base}/accountTypes"), items))
}

/// GET /accountTypes/{id} - Get an account type.
async fn get_account_type(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    headers: HeaderMap,
) -> Result<Hal, AppError> {
    let id = AccountTypeId(id);
    let account_type = state
        .store
        .account_type(id)
        .ok_or(AppError::AccountTypeNotFound(id))?;
    debug!(%id, "serving account type");

    let base = state.base_url(&headers);
    Ok(Hal(account_type_document(&base, &account_type)))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/customers", get(list_customers))
        .route("/customers/{id}", get(get_customer))
        .route("/customers/{id}/accounts", get(get_customer_accounts))
        .route("/accountTypes", get(list_account_types))
        .route("/accountTypes/{id}", get(get_account_type))
        .with_state(state)
}

/// Serves the API on `listener` until the process stops.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, create_router(state)).await
}
