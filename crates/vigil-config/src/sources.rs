// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::env::load_secret;
use crate::error::ConfigError;
use crate::layer::VigilConfigLayer;
use crate::sections::{
	BackendConfigLayer, BackendMode, LocalConfigLayer, RemoteConfigLayer, TokenConfigLayer,
};

pub const SYSTEM_CONFIG_PATH: &str = "/etc/vigil/vigil.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<VigilConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<VigilConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(VigilConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<VigilConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(VigilConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: VigilConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: VIGIL_<SECTION>_<FIELD>
#[derive(Default)]
pub struct EnvSource {
	vars: Option<HashMap<String, String>>,
}

impl EnvSource {
	/// Reads the process environment.
	pub fn new() -> Self {
		Self::default()
	}

	/// Reads a fixed set of variables instead of the process environment.
	pub fn from_vars<I, K, V>(vars: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self {
			vars: Some(
				vars.into_iter()
					.map(|(k, v)| (k.into(), v.into()))
					.collect(),
			),
		}
	}

	fn raw(&self, name: &str) -> Option<String> {
		match &self.vars {
			Some(vars) => vars.get(name).cloned(),
			None => std::env::var(name).ok(),
		}
	}

	fn var(&self, name: &str) -> Option<String> {
		self.raw(name).filter(|s| !s.is_empty())
	}

	fn bool(&self, name: &str) -> Option<bool> {
		self.var(name)
			.map(|v| v.eq_ignore_ascii_case("true") || v == "1")
	}

	fn parse<T: FromStr>(&self, name: &str, what: &str) -> Result<Option<T>, ConfigError> {
		match self.var(name) {
			Some(v) => v.trim().parse().map(Some).map_err(|_| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid {what} value '{v}'"),
			}),
			None => Ok(None),
		}
	}

	fn load_backend(&self) -> Result<BackendConfigLayer, ConfigError> {
		Ok(BackendConfigLayer {
			mode: self.parse::<BackendMode>("VIGIL_BACKEND_MODE", "backend mode")?,
		})
	}

	fn load_token(&self) -> Result<TokenConfigLayer, ConfigError> {
		let secret = load_secret("VIGIL_TOKEN_SECRET", |name| self.raw(name))
			.map_err(|e| ConfigError::Secret(e.to_string()))?;

		Ok(TokenConfigLayer {
			secret,
			algorithm: self.var("VIGIL_TOKEN_ALGORITHM"),
			public_key_path: self.var("VIGIL_TOKEN_PUBLIC_KEY_PATH").map(PathBuf::from),
			identity_claim: self.var("VIGIL_TOKEN_IDENTITY_CLAIM"),
			issuer: self.var("VIGIL_TOKEN_ISSUER"),
			audience: self.var("VIGIL_TOKEN_AUDIENCE"),
			leeway_secs: self.parse("VIGIL_TOKEN_LEEWAY_SECS", "u64")?,
		})
	}

	fn load_local(&self) -> Result<LocalConfigLayer, ConfigError> {
		Ok(LocalConfigLayer {
			database_url: self.var("VIGIL_LOCAL_DATABASE_URL"),
			max_connections: self.parse("VIGIL_LOCAL_MAX_CONNECTIONS", "u32")?,
			query_timeout_secs: self.parse("VIGIL_LOCAL_QUERY_TIMEOUT_SECS", "u64")?,
			user_query: self.var("VIGIL_LOCAL_USER_QUERY"),
			superuser_query: self.var("VIGIL_LOCAL_SUPERUSER_QUERY"),
			acl_query: self.var("VIGIL_LOCAL_ACL_QUERY"),
			skip_user_expiration: self.bool("VIGIL_LOCAL_SKIP_USER_EXPIRATION"),
			skip_acl_expiration: self.bool("VIGIL_LOCAL_SKIP_ACL_EXPIRATION"),
		})
	}

	fn load_remote(&self) -> Result<RemoteConfigLayer, ConfigError> {
		Ok(RemoteConfigLayer {
			host: self.var("VIGIL_REMOTE_HOST"),
			port: self.parse("VIGIL_REMOTE_PORT", "u16")?,
			with_tls: self.bool("VIGIL_REMOTE_WITH_TLS"),
			verify_peer: self.bool("VIGIL_REMOTE_VERIFY_PEER"),
			getuser_uri: self.var("VIGIL_REMOTE_GETUSER_URI"),
			superuser_uri: self.var("VIGIL_REMOTE_SUPERUSER_URI"),
			aclcheck_uri: self.var("VIGIL_REMOTE_ACLCHECK_URI"),
			params_mode: self.parse("VIGIL_REMOTE_PARAMS_MODE", "params mode")?,
			response_mode: self.parse("VIGIL_REMOTE_RESPONSE_MODE", "response mode")?,
			timeout_secs: self.parse("VIGIL_REMOTE_TIMEOUT_SECS", "u64")?,
		})
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<VigilConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(VigilConfigLayer {
			backend: Some(self.load_backend()?),
			token: Some(self.load_token()?),
			local: Some(self.load_local()?),
			remote: Some(self.load_remote()?),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;
	use vigil_policy_remote::{ParamsMode, ResponseMode};

	#[test]
	fn test_precedence_order() {
		assert!(Precedence::Defaults < Precedence::ConfigFile);
		assert!(Precedence::ConfigFile < Precedence::Environment);
	}

	#[test]
	fn test_missing_toml_file_is_empty_layer() {
		let layer = TomlSource::new("/nonexistent/vigil.toml").load().unwrap();
		assert!(layer.backend.is_none());
		assert!(layer.local.is_none());
	}

	#[test]
	fn test_toml_source_parses_sections() {
		let mut file = NamedTempFile::new().unwrap();
		write!(
			file,
			r#"
[backend]
mode = "remote"

[token]
secret = "some_jwt_secret"
identity_claim = "sub"

[remote]
host = "auth.internal"
port = 8080
params_mode = "form"
response_mode = "status"
"#
		)
		.unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		assert_eq!(layer.backend.unwrap().mode, Some(BackendMode::Remote));
		let token = layer.token.unwrap();
		assert_eq!(token.secret.unwrap().expose(), "some_jwt_secret");
		assert_eq!(token.identity_claim.as_deref(), Some("sub"));
		let remote = layer.remote.unwrap();
		assert_eq!(remote.port, Some(8080));
		assert_eq!(remote.params_mode, Some(ParamsMode::Form));
		assert_eq!(remote.response_mode, Some(ResponseMode::Status));
	}

	#[test]
	fn test_invalid_toml_is_an_error() {
		let mut file = NamedTempFile::new().unwrap();
		write!(file, "[backend\nmode = ").unwrap();
		let err = TomlSource::new(file.path()).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}

	#[test]
	fn test_unknown_mode_in_toml_is_an_error() {
		let mut file = NamedTempFile::new().unwrap();
		write!(file, "[remote]\nresponse_mode = \"xml\"\n").unwrap();
		let err = TomlSource::new(file.path()).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}

	#[test]
	fn test_env_source_reads_every_section() {
		let env = EnvSource::from_vars([
			("VIGIL_BACKEND_MODE", "remote"),
			("VIGIL_TOKEN_SECRET", "some_jwt_secret"),
			("VIGIL_TOKEN_LEEWAY_SECS", "30"),
			("VIGIL_LOCAL_SKIP_ACL_EXPIRATION", "true"),
			("VIGIL_REMOTE_HOST", "auth.internal"),
			("VIGIL_REMOTE_WITH_TLS", "1"),
			("VIGIL_REMOTE_PARAMS_MODE", "FORM"),
			("VIGIL_REMOTE_RESPONSE_MODE", "text"),
		]);
		let layer = env.load().unwrap();

		assert_eq!(layer.backend.unwrap().mode, Some(BackendMode::Remote));
		let token = layer.token.unwrap();
		assert_eq!(token.secret.unwrap().expose(), "some_jwt_secret");
		assert_eq!(token.leeway_secs, Some(30));
		assert_eq!(layer.local.unwrap().skip_acl_expiration, Some(true));
		let remote = layer.remote.unwrap();
		assert_eq!(remote.with_tls, Some(true));
		assert_eq!(remote.params_mode, Some(ParamsMode::Form));
		assert_eq!(remote.response_mode, Some(ResponseMode::Text));
	}

	#[test]
	fn test_env_empty_values_are_unset() {
		let env = EnvSource::from_vars([("VIGIL_REMOTE_HOST", ""), ("VIGIL_TOKEN_SECRET", "")]);
		let layer = env.load().unwrap();
		assert!(layer.remote.unwrap().host.is_none());
		assert!(layer.token.unwrap().secret.is_none());
	}

	#[test]
	fn test_env_invalid_number() {
		let env = EnvSource::from_vars([("VIGIL_REMOTE_PORT", "eighty")]);
		let err = env.load().unwrap_err();
		assert!(matches!(
			err,
			ConfigError::InvalidValue { key, .. } if key == "VIGIL_REMOTE_PORT"
		));
	}

	#[test]
	fn test_env_invalid_mode() {
		let env = EnvSource::from_vars([("VIGIL_BACKEND_MODE", "ldap")]);
		let err = env.load().unwrap_err();
		assert!(matches!(
			err,
			ConfigError::InvalidValue { key, .. } if key == "VIGIL_BACKEND_MODE"
		));
	}

	#[test]
	fn test_env_secret_from_file() {
		let mut file = NamedTempFile::new().unwrap();
		writeln!(file, "file_secret").unwrap();
		let path = file.path().display().to_string();
		let env = EnvSource::from_vars([("VIGIL_TOKEN_SECRET_FILE", path.as_str())]);

		let token = env.load().unwrap().token.unwrap();
		assert_eq!(token.secret.unwrap().expose(), "file_secret");
	}
}
