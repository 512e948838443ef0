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

//! Seeded HAL resource server.
//!
//! Run with: `cargo run --bin hal-server`
//!
//! Serves one customer ("Jeremy Corbyn") with an Aardvantage account
//! (limit 2000.0) and a PlatyPlus account (limit 1000.0).

use clap::Parser;
use hal_credit::logging::setup_tracing;
use hal_credit::server::store::Store;
use hal_credit::server::{AccountsRepresentation, AppState, ServerConfig, TypeRepresentation, serve};
use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "hal-server")]
#[command(about = "Serves the demo customer and account types as HAL resources", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// How customers present their accounts
    #[arg(long, value_enum, default_value_t = AccountsRepresentation::Inline)]
    accounts: AccountsRepresentation,

    /// How accounts present their type
    #[arg(long, value_enum, default_value_t = TypeRepresentation::Linked)]
    types: TypeRepresentation,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    setup_tracing("info");

    let config = ServerConfig {
        accounts: args.accounts,
        types: args.types,
    };
    let state = AppState::new(
        Arc::new(Store::seeded()),
        config,
        format!("http://{}", args.bind),
    );

    let listener = match TcpListener::bind(args.bind).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Error binding {}: {}", args.bind, e);
            process::exit(1);
        }
    };
    info!(addr = %args.bind, ?config, "HAL server listening");

    if let Err(e) = serve(listener, state).await {
        eprintln!("Server error: {}", e);
        process::exit(1);
    }
}
