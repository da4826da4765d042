use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use hachimi_core::Parameters;
use hachimi_core::model::parameters::{DEFAULT_MIN_PHRASE_LENGTH, DEFAULT_PHRASE_PROBABILITY};

/// Server configuration loaded from environment variables.
///
/// A `.env` file in the working directory is read first when present.
#[derive(Debug, Clone)]
pub struct ServerConfig {
	pub host: String,
	pub port: u16,
	pub parameters: Parameters,
	pub rust_log: String,
}

impl ServerConfig {
	pub fn from_env() -> Result<Self> {
		dotenvy::dotenv().ok(); // missing .env is fine

		Ok(Self {
			host: env::var("HACHIMI_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned()),
			port: parse_env("HACHIMI_PORT", 5000)?,
			parameters: Parameters::new(
				parse_env("HACHIMI_PHRASE_PROBABILITY", DEFAULT_PHRASE_PROBABILITY)?,
				parse_env("HACHIMI_MIN_PHRASE_LENGTH", DEFAULT_MIN_PHRASE_LENGTH)?,
			),
			rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned()),
		})
	}
}

/// Reads `key` and parses it, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
	T: FromStr,
	T::Err: std::error::Error + Send + Sync + 'static,
{
	match env::var(key) {
		Ok(value) => value
			.trim()
			.parse::<T>()
			.with_context(|| {
				format!("Environment variable '{key}' has an invalid value: '{value}'")
			}),
		Err(_) => Ok(default),
	}
}
