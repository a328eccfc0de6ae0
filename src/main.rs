// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `authik` command-line tool.
//!
//! ```text
//! authik verify <session-token>   verify a token and print the session
//! authik user <user-id>           print a user record
//! ```
//!
//! Configuration comes from `AUTHIK_*` environment variables; see
//! `authik::config`.

use std::env;
use std::process::ExitCode;

use authik::config::LOG_FORMAT_ENV;
use authik::Client;
use tracing::error;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: authik verify <session-token> | authik user <user-id>";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let (command, argument) = match args.as_slice() {
        [command, argument] => (command.as_str(), argument.as_str()),
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    let client = match Client::from_env() {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let output = match command {
        "verify" => client
            .verify_session_token(argument)
            .await
            .map(serde_json::to_value),
        "user" => client
            .get_user(argument)
            .await
            .map(serde_json::to_value),
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match output {
        Ok(Ok(value)) => {
            println!("{value:#}");
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            error!(error = %e, "Failed to encode output");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, code = e.error_code(), "Request failed");
            ExitCode::FAILURE
        }
    }
}
