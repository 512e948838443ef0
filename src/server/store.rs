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

//! In-memory store behind the resource server.
//!
//! Built once at startup and shared read-only through `Arc`; identifiers are
//! assigned sequentially from 1 per entity kind.

use crate::base::{AccountId, AccountTypeId, CustomerId};
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU32, Ordering};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An account referenced an account type that was never added
    #[error("unknown account type {0}")]
    UnknownAccountType(AccountTypeId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAccountType {
    pub id: AccountTypeId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAccount {
    pub id: AccountId,
    pub customer: CustomerId,
    pub account_type: AccountTypeId,
    pub credit_limit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCustomer {
    pub id: CustomerId,
    pub name: String,
    /// Accounts in insertion order.
    pub accounts: Vec<StoredAccount>,
}

#[derive(Debug, Default)]
pub struct Store {
    account_types: DashMap<AccountTypeId, StoredAccountType>,
    customers: DashMap<CustomerId, StoredCustomer>,
    next_account_type: AtomicU32,
    next_customer: AtomicU32,
    next_account: AtomicU32,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the demo data set: two account types and one customer
    /// with an account of each.
    pub fn seeded() -> Self {
        let store = Self::new();
        let aardvantage = store.add_account_type("Aardvantage");
        let platy_plus = store.add_account_type("PlatyPlus");

        store.insert_customer(
            "Jeremy Corbyn",
            &[
                (aardvantage, Decimal::new(20000, 1)),
                (platy_plus, Decimal::new(10000, 1)),
            ],
        );
        store
    }

    pub fn add_account_type(&self, name: &str) -> AccountTypeId {
        let id = AccountTypeId(self.next_account_type.fetch_add(1, Ordering::SeqCst) + 1);
        self.account_types.insert(
            id,
            StoredAccountType {
                id,
                name: name.to_string(),
            },
        );
        id
    }

    /// Adds a customer owning one account per `(type, credit limit)` pair.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownAccountType`] if any pair names a type not in the
    /// store; nothing is inserted in that case.
    pub fn add_customer(
        &self,
        name: &str,
        accounts: &[(AccountTypeId, Decimal)],
    ) -> Result<CustomerId, StoreError> {
        if let Some((missing, _)) = accounts
            .iter()
            .find(|(type_id, _)| !self.account_types.contains_key(type_id))
        {
            return Err(StoreError::UnknownAccountType(*missing));
        }
        Ok(self.insert_customer(name, accounts))
    }

    fn insert_customer(&self, name: &str, accounts: &[(AccountTypeId, Decimal)]) -> CustomerId {
        let id = CustomerId(self.next_customer.fetch_add(1, Ordering::SeqCst) + 1);
        let accounts = accounts
            .iter()
            .map(|&(account_type, credit_limit)| StoredAccount {
                id: AccountId(self.next_account.fetch_add(1, Ordering::SeqCst) + 1),
                customer: id,
                account_type,
                credit_limit,
            })
            .collect();

        self.customers.insert(
            id,
            StoredCustomer {
                id,
                name: name.to_string(),
                accounts,
            },
        );
        id
    }

    pub fn account_type(&self, id: AccountTypeId) -> Option<StoredAccountType> {
        self.account_types.get(&id).map(|entry| entry.value().clone())
    }

    pub fn customer(&self, id: CustomerId) -> Option<StoredCustomer> {
        self.customers.get(&id).map(|entry| entry.value().clone())
    }

    /// All account types, ordered by id.
    pub fn account_types(&self) -> Vec<StoredAccountType> {
        let mut all: Vec<_> = self.account_types.iter().map(|e| e.value().clone()).collect();
        all.sort_by_key(|t| t.id);
        all
    }

    /// All customers, ordered by id.
    pub fn customers(&self) -> Vec<StoredCustomer> {
        let mut all: Vec<_> = self.customers.iter().map(|e| e.value().clone()).collect();
        all.sort_by_key(|c| c.id);
        all
    }
}
