// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod args;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;
use vigil_policy::{PolicyEngine, PolicyError};

use args::{Args, Command};

const EXIT_DENY: u8 = 1;
const EXIT_FAULT: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
	init_logging();

	let args = Args::parse();

	let config = match &args.config {
		Some(path) => vigil_config::load_config_with_file(path),
		None => vigil_config::load_config(),
	};
	let config = match config {
		Ok(config) => config,
		Err(e) => {
			error!(error = %e, "failed to load configuration");
			return ExitCode::from(EXIT_FAULT);
		}
	};

	let engine = match PolicyEngine::from_config(&config).await {
		Ok(engine) => engine,
		Err(e) => {
			error!(error = %e, "failed to build policy engine");
			return ExitCode::from(EXIT_FAULT);
		}
	};

	let token = args.token.unwrap_or_default();
	let operation = args.command.name();
	let result = decide(&engine, &token, args.command).await;
	engine.close().await;

	match result {
		Ok(true) => {
			println!("allow");
			ExitCode::SUCCESS
		}
		Ok(false) => {
			println!("deny");
			ExitCode::from(EXIT_DENY)
		}
		Err(e) => {
			error!(operation, kind = e.kind(), error = %e, "policy fault");
			println!("fault: {e}");
			ExitCode::from(EXIT_FAULT)
		}
	}
}

async fn decide(engine: &PolicyEngine, token: &str, command: Command) -> Result<bool, PolicyError> {
	match command {
		Command::Authenticate => engine.authenticate(token, "").await,
		Command::Superuser => engine.is_privileged(token).await,
		Command::Acl {
			topic,
			client_id,
			acc,
		} => {
			engine
				.check_access(token, &topic, &client_id, Command::level(acc))
				.await
		}
	}
}

/// Logs go to stderr so stdout carries only the verdict.
fn init_logging() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	let json = std::env::var("VIGIL_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

	if json {
		tracing_subscriber::fmt()
			.json()
			.with_env_filter(filter)
			.with_writer(std::io::stderr)
			.init();
	} else {
		tracing_subscriber::fmt()
			.with_env_filter(filter)
			.with_writer(std::io::stderr)
			.init();
	}
}
