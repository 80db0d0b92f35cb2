// BodyPress - Outbound Payload Compression
// Copyright (C) 2025 BodyPress Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
use crate::error::{ConfigError, ConfigResult};
use crate::schema::Config;
use crate::validation::Validator;
use bodypress_compression::FailurePolicy;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Environment variable overriding `compression.content_compression`
pub const ENV_CONTENT_COMPRESSION: &str = "BODYPRESS_CONTENT_COMPRESSION";
/// Environment variable overriding `compression.accept_encoding`
pub const ENV_ACCEPT_ENCODING: &str = "BODYPRESS_ACCEPT_ENCODING";
/// Environment variable overriding `compression.on_failure`
pub const ENV_ON_COMPRESSION_FAILURE: &str = "BODYPRESS_ON_COMPRESSION_FAILURE";
/// Environment variable overriding `observability.log_level`
pub const ENV_LOG_LEVEL: &str = "BODYPRESS_LOG_LEVEL";
/// Environment variable overriding `observability.log_format`
pub const ENV_LOG_FORMAT: &str = "BODYPRESS_LOG_FORMAT";

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML document
    Toml,
    /// JSON document
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::InvalidPath(path.to_path_buf())),
        }
    }

    /// Get format name as string
    pub fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Json => "JSON",
        }
    }
}

/// Configuration loader
pub struct ConfigLoader {
    validate: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        ConfigLoader { validate: true }
    }

    /// Create a loader without validation
    pub fn without_validation() -> Self {
        ConfigLoader { validate: false }
    }

    /// Load configuration from a file
    pub async fn load_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<Config> {
        let config = self.read_file(path.as_ref()).await?;
        self.check(&config)?;
        Ok(config)
    }

    /// Load configuration from a string
    pub fn load_from_string(&self, content: &str, format: ConfigFormat) -> ConfigResult<Config> {
        let config = parse(content, format)?;
        self.check(&config)?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Validation runs after the overrides are applied, so an environment
    /// variable can repair an invalid file value and vice versa.
    pub async fn load_with_overrides<P: AsRef<Path>>(&self, path: P) -> ConfigResult<Config> {
        let mut config = self.read_file(path.as_ref()).await?;
        self.apply_env_overrides(&mut config)?;
        self.check(&config)?;
        Ok(config)
    }

    /// Build configuration from defaults and environment variables only
    pub fn load_from_env(&self) -> ConfigResult<Config> {
        let mut config = Config::default();
        self.apply_env_overrides(&mut config)?;
        self.check(&config)?;
        Ok(config)
    }

    /// Apply `BODYPRESS_*` environment variable overrides
    pub fn apply_env_overrides(&self, config: &mut Config) -> ConfigResult<()> {
        self.apply_overrides_from(config, |name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn apply_overrides_from<F>(&self, config: &mut Config, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Compression settings
        if let Some(value) = lookup(ENV_CONTENT_COMPRESSION) {
            config.compression.content_compression = value;
        }
        if let Some(value) = lookup(ENV_ACCEPT_ENCODING) {
            config.compression.accept_encoding = Some(value);
        }
        if let Some(value) = lookup(ENV_ON_COMPRESSION_FAILURE) {
            config.compression.on_failure = value.parse::<FailurePolicy>().map_err(|_| {
                ConfigError::env_var_parsing_error(
                    ENV_ON_COMPRESSION_FAILURE,
                    &value,
                    "expected 'fallback' or 'abort'",
                )
            })?;
        }

        // Observability settings
        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            config.observability.log_level = value;
        }
        if let Some(value) = lookup(ENV_LOG_FORMAT) {
            config.observability.log_format = value;
        }

        Ok(())
    }

    async fn read_file(&self, path: &Path) -> ConfigResult<Config> {
        debug!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path).await?;

        info!(
            "Loaded {} configuration file: {}",
            format.name(),
            path.display()
        );

        parse(&content, format)
    }

    fn check(&self, config: &Config) -> ConfigResult<()> {
        if self.validate {
            config.validate()?;
            debug!("Configuration validated successfully");
        }
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse(content: &str, format: ConfigFormat) -> ConfigResult<Config> {
    let config: Config = match format {
        ConfigFormat::Toml => toml::from_str(content)?,
        ConfigFormat::Json => serde_json::from_str(content)?,
    };
    Ok(config)
}
