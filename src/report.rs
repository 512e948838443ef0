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

//! Credit limit report rendering.
//!
//! Lines look like `Aardvantage: credit limit £2000.00`: the account type
//! name, then the limit rounded half away from zero to two places.
//!
//! Rendering is all-or-nothing. [`render_customer`] returns either every
//! line or an error; a failure partway through the accounts discards the
//! lines already built.

use crate::client::HalClient;
use crate::error::ClientError;
use crate::fetch::Fetch;
use crate::model::{Account, Customer};
use crate::resolver::AssociationResolver;
use rust_decimal::{Decimal, RoundingStrategy};
use std::io::{self, Write};

fn money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("£{rounded:.2}")
}

/// Renders one account line.
pub fn format_line(account: &Account) -> String {
    format!(
        "{}: credit limit {}",
        account.account_type.name,
        money(account.credit_limit)
    )
}

/// Renders the line summing all accounts.
pub fn format_total(total: Decimal) -> String {
    format!("Total: credit limit {}", money(total))
}

/// Rendered credit limits of one customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditLimitReport {
    pub customer: String,
    /// One line per account, in account order.
    pub lines: Vec<String>,
    pub total: Decimal,
}

impl CreditLimitReport {
    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            customer: customer.name.clone(),
            lines: customer.accounts.iter().map(format_line).collect(),
            total: customer.total_credit_limit(),
        }
    }

    /// Writes the account lines, and the total line if asked.
    pub fn write_to<W: Write>(&self, mut writer: W, with_total: bool) -> io::Result<()> {
        for line in &self.lines {
            writeln!(writer, "{line}")?;
        }
        if with_total {
            writeln!(writer, "{}", format_total(self.total))?;
        }
        writer.flush()
    }
}

/// Loads the customer at `uri` and renders its report.
pub fn render_customer<F, R>(
    client: &HalClient<F, R>,
    uri: &str,
) -> Result<CreditLimitReport, ClientError>
where
    F: Fetch,
    R: AssociationResolver,
{
    let customer = client.get_customer(uri)?;
    Ok(CreditLimitReport::from_customer(&customer))
}
