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

//! # HAL Credit
//!
//! A HAL (Hypertext Application Language) client that loads a customer from
//! a Spring-Data-REST-style API, resolves each account's `type` association
//! (reading it inline when embedded, following its link otherwise) and
//! renders the credit limit per account. A small resource server exposing
//! the same data set is included.
//!
//! ## Core Components
//!
//! - [`AssociationResolver`] / [`LinkResolver`]: Resolve an association field
//!   to its full representation
//! - [`HalClient`]: Loads a [`Customer`] with every [`AccountType`] resolved
//! - [`CreditLimitReport`]: Rendered `"<type>: credit limit £<amount>"` lines
//! - [`Fetch`]: Blocking document retrieval ([`HttpFetcher`] in production,
//!   [`mock::MockFetcher`] in tests)
//! - [`server`]: axum resource server over an in-memory [`server::store::Store`]
//!
//! ## Example
//!
//! ```
//! use hal_credit::{HalClient, mock::MockFetcher, render_customer};
//! use serde_json::json;
//!
//! let fetcher = MockFetcher::new()
//!     .with_document("http://h/customers/1", json!({
//!         "name": "Jeremy Corbyn",
//!         "accounts": [
//!             { "creditLimit": 2000.0, "_links": { "type": { "href": "http://h/accountTypes/1" } } }
//!         ]
//!     }))
//!     .with_document("http://h/accountTypes/1", json!({ "name": "Aardvantage" }));
//!
//! let client = HalClient::new(&fetcher);
//! let report = render_customer(&client, "http://h/customers/1").unwrap();
//! assert_eq!(report.lines, vec!["Aardvantage: credit limit £2000.00"]);
//! ```
//!
//! ## Failure Policy
//!
//! Loading is all-or-nothing: if any account's type cannot be resolved the
//! whole customer fails and no lines are produced.

mod base;
mod client;
pub mod error;
mod fetch;
pub mod hal;
pub mod logging;
pub mod mock;
mod model;
mod report;
mod resolver;
pub mod server;

pub use base::{AccountId, AccountTypeId, CustomerId};
pub use client::{ACCOUNTS_REL, CREDIT_LIMIT_FIELD, HalClient, TYPE_REL};
pub use error::{ClientError, FetchError, LinkResolutionError};
pub use fetch::{DEFAULT_TIMEOUT, Fetch, HttpFetcher};
pub use model::{Account, AccountType, Customer};
pub use report::{CreditLimitReport, format_line, format_total, render_customer};
pub use resolver::{AssociationResolver, FieldDescriptor, LinkResolver, resolve_with};
