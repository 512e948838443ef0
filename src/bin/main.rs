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

use clap::Parser;
use hal_credit::logging::setup_tracing;
use hal_credit::{DEFAULT_TIMEOUT, HalClient, HttpFetcher, render_customer};
use std::process;
use std::time::Duration;

/// Customer loaded when no URL is given.
const DEFAULT_CUSTOMER_URI: &str = "http://localhost:8080/customers/1";

/// HAL Credit - Print a customer's credit limit per account
///
/// Loads a customer resource, resolves each account's type link and prints
/// one `<type>: credit limit £<amount>` line per account to stdout. Any
/// failure prints nothing to stdout and exits with status 1.
#[derive(Parser, Debug)]
#[command(name = "hal-credit")]
#[command(about = "Prints the credit limit of every account of a HAL customer", long_about = None)]
struct Args {
    /// Customer resource to load
    #[arg(long, value_name = "URI", default_value = DEFAULT_CUSTOMER_URI)]
    url: String,

    /// Also print the total credit limit across all accounts
    #[arg(long)]
    total: bool,

    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,
}

fn main() {
    let args = Args::parse();
    setup_tracing("warn");

    let fetcher = match HttpFetcher::new(Duration::from_secs(args.timeout_secs)) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error creating HTTP client: {}", e);
            process::exit(1);
        }
    };
    let client = HalClient::new(fetcher);

    // Nothing is written unless every account resolved
    let report = match render_customer(&client, &args.url) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = report.write_to(std::io::stdout().lock(), args.total) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}
