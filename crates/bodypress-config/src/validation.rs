use crate::error::{ConfigError, ConfigResult};
use crate::schema::*;
use bodypress_compression::{is_supported, ALL_LITERAL};

/// Log levels accepted by `observability.log_level`
pub const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Log formats accepted by `observability.log_format`
pub const VALID_LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];

/// Validator for configuration settings
pub trait Validator {
    /// Check the settings, naming the offending field on failure
    fn validate(&self) -> ConfigResult<()>;
}

impl Validator for Config {
    fn validate(&self) -> ConfigResult<()> {
        self.compression.validate()?;
        self.observability.validate()?;
        Ok(())
    }
}

impl Validator for CompressionConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !is_supported(&self.content_compression) {
            return Err(ConfigError::invalid_value(
                "compression.content_compression",
                format!("unsupported algorithm '{}'", self.content_compression),
            ));
        }

        if let Some(accept) = &self.accept_encoding {
            if accept != ALL_LITERAL && !is_supported(accept) {
                return Err(ConfigError::invalid_value(
                    "compression.accept_encoding",
                    format!(
                        "must be '{}' or a supported algorithm, got '{}'",
                        ALL_LITERAL, accept
                    ),
                ));
            }
        }

        Ok(())
    }
}

impl Validator for ObservabilityConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::invalid_value(
                "observability.log_level",
                format!("must be one of: {}", VALID_LOG_LEVELS.join(", ")),
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.log_format.as_str()) {
            return Err(ConfigError::invalid_value(
                "observability.log_format",
                format!("must be one of: {}", VALID_LOG_FORMATS.join(", ")),
            ));
        }

        Ok(())
    }
}
