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

//! Client-side view of customers, accounts and account types.
//!
//! These are the fully resolved forms: an [`Account`] always owns its
//! [`AccountType`], whichever way the server chose to deliver it.

use crate::error::FetchError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Product an account belongs to, e.g. "Aardvantage".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountType {
    pub name: String,
}

impl AccountType {
    /// Reads an account type out of its HAL representation.
    pub fn from_document(doc: &Value, uri: &str) -> Result<Self, FetchError> {
        Ok(Self {
            name: string_field(doc, "name", uri)?,
        })
    }
}

/// A customer account with its resolved type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub account_type: AccountType,
    pub credit_limit: Decimal,
}

/// A customer and all of its accounts, in the order the server listed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub name: String,
    pub accounts: Vec<Account>,
}

impl Customer {
    /// Sum of the credit limits of every account.
    pub fn total_credit_limit(&self) -> Decimal {
        self.accounts.iter().map(|a| a.credit_limit).sum()
    }
}

pub(crate) fn string_field(doc: &Value, field: &str, uri: &str) -> Result<String, FetchError> {
    match doc.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(FetchError::decode(
            uri,
            field,
            format!("expected a string, found {other}"),
        )),
        None => Err(FetchError::decode(uri, field, "missing")),
    }
}

/// Reads a non-negative amount sent either as a JSON number or a string.
pub(crate) fn amount_field(doc: &Value, field: &str, uri: &str) -> Result<Decimal, FetchError> {
    let raw = match doc.get(field) {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => {
            return Err(FetchError::decode(
                uri,
                field,
                format!("expected a decimal, found {other}"),
            ));
        }
        None => return Err(FetchError::decode(uri, field, "missing")),
    };

    let amount = Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|e| FetchError::decode(uri, field, format!("invalid decimal {raw:?}: {e}")))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(FetchError::decode(
            uri,
            field,
            format!("amount must not be negative, got {amount}"),
        ));
    }
    Ok(amount)
}
