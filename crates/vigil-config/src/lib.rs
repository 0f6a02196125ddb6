// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for the Vigil policy engine.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Cross-field validation: the selected backend must be fully configured
//! - Consistent environment variable naming (`VIGIL_*`), with `VAR_FILE`
//!   support for the token secret
//!
//! # Usage
//!
//! ```ignore
//! use vigil_config::load_config;
//!
//! let config = load_config()?;
//! println!("backend: {}", config.backend.mode());
//! ```

pub mod env;
pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use env::{load_secret_env, SecretEnvError};
pub use error::ConfigError;
pub use layer::VigilConfigLayer;
pub use sections::*;
pub use sources::{
	ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, SYSTEM_CONFIG_PATH,
};

use tracing::{debug, info};
use vigil_policy_local::LocalStoreConfig;
use vigil_policy_remote::RemoteServiceConfig;
use vigil_token::TokenConfig;

/// The selected backend and its settings.
#[derive(Debug, Clone)]
pub enum BackendConfig {
	Local(LocalStoreConfig),
	Remote(RemoteServiceConfig),
}

impl BackendConfig {
	pub fn mode(&self) -> BackendMode {
		match self {
			BackendConfig::Local(_) => BackendMode::Local,
			BackendConfig::Remote(_) => BackendMode::Remote,
		}
	}
}

/// Fully resolved engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
	pub token: TokenConfig,
	pub backend: BackendConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`VIGIL_*`)
/// 2. Config file (`/etc/vigil/vigil.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<EngineConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource::new()),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<EngineConfig, ConfigError> {
	load_from_sources(vec![Box::new(EnvSource::new())])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<EngineConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource::new()),
	])
}

/// Merge `sources` in precedence order and finalize the result.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<EngineConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = VigilConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
///
/// Only the selected backend's section is validated.
fn finalize(layer: VigilConfigLayer) -> Result<EngineConfig, ConfigError> {
	let mode = layer.backend.unwrap_or_default().finalize();
	let token = layer.token.unwrap_or_default().finalize()?;

	let backend = match mode {
		BackendMode::Local => BackendConfig::Local(layer.local.unwrap_or_default().finalize()?),
		BackendMode::Remote => BackendConfig::Remote(layer.remote.unwrap_or_default().finalize()?),
	};

	validate_config(&token, &backend)?;

	match &backend {
		BackendConfig::Local(local) => info!(
			backend = %mode,
			algorithm = ?token.algorithm,
			identity_claim = %token.identity_claim,
			max_connections = local.max_connections,
			query_timeout_secs = local.query_timeout.as_secs(),
			superuser_query = local.queries.superuser_query.is_some(),
			"Vigil configuration loaded"
		),
		BackendConfig::Remote(remote) => info!(
			backend = %mode,
			algorithm = ?token.algorithm,
			identity_claim = %token.identity_claim,
			base_url = %remote.base_url(),
			params_mode = %remote.params_mode,
			response_mode = %remote.response_mode,
			local_verification = token.has_key(),
			"Vigil configuration loaded"
		),
	}

	Ok(EngineConfig { token, backend })
}

/// Validate cross-field configuration rules.
fn validate_config(token: &TokenConfig, backend: &BackendConfig) -> Result<(), ConfigError> {
	if matches!(backend, BackendConfig::Local(_)) && !token.has_key() {
		return Err(ConfigError::Validation(
			"local backend verifies tokens itself: set token.secret (VIGIL_TOKEN_SECRET) \
			 or token.public_key_path (VIGIL_TOKEN_PUBLIC_KEY_PATH)"
				.to_string(),
		));
	}

	if token.identity_claim.trim().is_empty() {
		return Err(ConfigError::Validation(
			"token.identity_claim (VIGIL_TOKEN_IDENTITY_CLAIM) cannot be empty".to_string(),
		));
	}

	Ok(())
}
