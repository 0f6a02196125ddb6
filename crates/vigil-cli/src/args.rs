// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vigil_acl::AccessLevel;

/// Vigil - check broker authorization decisions by hand
#[derive(Parser, Debug)]
#[command(name = "vigil", version)]
pub struct Args {
	/// Config file (defaults to /etc/vigil/vigil.toml)
	#[arg(long, env = "VIGIL_CONFIG")]
	pub config: Option<PathBuf>,

	/// Bearer token to check (or set VIGIL_TOKEN)
	#[arg(long, env = "VIGIL_TOKEN", hide_env_values = true, global = true)]
	pub token: Option<String>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// May the token holder connect?
	Authenticate,
	/// Is the token holder a superuser?
	Superuser,
	/// May the token holder use a topic?
	Acl {
		#[arg(long)]
		topic: String,

		#[arg(long, default_value = "vigil-cli")]
		client_id: String,

		/// 1 = subscribe/read, 2 = publish/write
		#[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i64).range(1..))]
		acc: i64,
	},
}

impl Command {
	pub fn name(&self) -> &'static str {
		match self {
			Command::Authenticate => "authenticate",
			Command::Superuser => "superuser",
			Command::Acl { .. } => "acl",
		}
	}

	pub fn level(acc: i64) -> AccessLevel {
		AccessLevel::new(acc)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;

	#[test]
	fn args_are_well_formed() {
		Args::command().debug_assert();
	}

	#[test]
	fn parses_acl() {
		let args = Args::try_parse_from([
			"vigil",
			"--token",
			"t",
			"acl",
			"--topic",
			"test/topic",
			"--acc",
			"2",
		])
		.unwrap();
		assert_eq!(args.token.as_deref(), Some("t"));
		match args.command {
			Command::Acl {
				topic,
				client_id,
				acc,
			} => {
				assert_eq!(topic, "test/topic");
				assert_eq!(client_id, "vigil-cli");
				assert_eq!(Command::level(acc), AccessLevel::WRITE);
			}
			other => panic!("unexpected command {other:?}"),
		}
	}

	#[test]
	fn rejects_zero_level() {
		assert!(Args::try_parse_from(["vigil", "acl", "--topic", "a", "--acc", "0"]).is_err());
	}
}
