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

//! Loads a customer and resolves every account's type.

use crate::error::{ClientError, FetchError};
use crate::fetch::Fetch;
use crate::hal;
use crate::model::{Account, AccountType, Customer, amount_field, string_field};
use crate::resolver::{AssociationResolver, FieldDescriptor, LinkResolver, resolve_with};
use serde_json::Value;
use tracing::debug;

/// Relation / property holding a customer's accounts.
pub const ACCOUNTS_REL: &str = "accounts";

/// Association from an account to its account type.
pub const TYPE_REL: &str = "type";

/// Account property holding the credit limit.
pub const CREDIT_LIMIT_FIELD: &str = "creditLimit";

/// HAL client for the customer/account/account-type resources.
///
/// All requests are blocking and sequential. A failure on any account
/// aborts the whole load; no partially resolved [`Customer`] is returned.
#[derive(Debug, Clone)]
pub struct HalClient<F, R> {
    fetcher: F,
    resolver: R,
}

impl<F: Fetch + Clone> HalClient<F, LinkResolver<F>> {
    /// Creates a client that follows links with the same fetcher it uses
    /// for customers.
    pub fn new(fetcher: F) -> Self {
        Self {
            resolver: LinkResolver::new(fetcher.clone()),
            fetcher,
        }
    }
}

impl<F: Fetch, R: AssociationResolver> HalClient<F, R> {
    pub fn with_resolver(fetcher: F, resolver: R) -> Self {
        Self { fetcher, resolver }
    }

    /// Fetches the customer at `uri` with every account type resolved.
    ///
    /// Accounts keep the order the server listed them in.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Customer`] - the customer or its accounts collection
    ///   could not be fetched or decoded.
    /// - [`ClientError::Link`] - an account's type could not be resolved.
    pub fn get_customer(&self, uri: &str) -> Result<Customer, ClientError> {
        let doc = self.fetcher.get_json(uri)?;
        let name = string_field(&doc, "name", uri)?;
        let (entries, origin) = self.account_entries(&doc, uri)?;
        debug!(uri, accounts = entries.len(), "customer loaded");

        let accounts = entries
            .iter()
            .map(|entry| self.resolve_account(entry, &origin))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Customer { name, accounts })
    }

    /// Materializes one account entry, resolving its `type` association.
    pub fn resolve_account(&self, entry: &Value, origin: &str) -> Result<Account, ClientError> {
        let credit_limit = amount_field(entry, CREDIT_LIMIT_FIELD, origin)?;
        let account_type = resolve_with(
            &self.resolver,
            &FieldDescriptor::new(entry, TYPE_REL, origin),
            AccountType::from_document,
        )?;

        Ok(Account {
            account_type,
            credit_limit,
        })
    }

    /// Finds the customer's account entries and the URI they were read from.
    ///
    /// Looks for an inline `accounts` array, then `_embedded.accounts`, then
    /// follows `_links.accounts`. A customer with none of them has no
    /// accounts.
    fn account_entries(&self, doc: &Value, uri: &str) -> Result<(Vec<Value>, String), FetchError> {
        if let Some(inline) = doc.get(ACCOUNTS_REL) {
            return Ok((array_of(inline, uri)?, uri.to_string()));
        }
        if let Some(embedded) = hal::embedded(doc, ACCOUNTS_REL) {
            return Ok((array_of(embedded, uri)?, uri.to_string()));
        }
        let Some(link) = hal::link(doc, ACCOUNTS_REL) else {
            return Ok((Vec::new(), uri.to_string()));
        };

        let target = link.target();
        debug!(uri = %target, "following accounts link");
        let collection = self.fetcher.get_json(&target)?;
        let entries = match &collection {
            Value::Array(_) => array_of(&collection, &target)?,
            other => match hal::embedded(other, ACCOUNTS_REL) {
                Some(embedded) => array_of(embedded, &target)?,
                None => {
                    return Err(FetchError::decode(
                        &target,
                        ACCOUNTS_REL,
                        "collection has no embedded accounts",
                    ));
                }
            },
        };
        Ok((entries, target))
    }
}

fn array_of(value: &Value, uri: &str) -> Result<Vec<Value>, FetchError> {
    match value {
        Value::Array(items) => Ok(items.clone()),
        Value::Null => Ok(Vec::new()),
        other => Err(FetchError::decode(
            uri,
            ACCOUNTS_REL,
            format!("expected an array, found {other}"),
        )),
    }
}
