use bodypress_compression::{AcceptEncoding, Algorithm, CompressionError, FailurePolicy};
use serde::{Deserialize, Serialize};

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Outbound body compression
    pub compression: CompressionConfig,

    /// Logging settings
    pub observability: ObservabilityConfig,
}

/// Compression applied to outbound message bodies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompressionConfig {
    /// Algorithm identifier (identity, gzip, deflate, ...)
    #[serde(default = "default_content_compression")]
    pub content_compression: String,

    /// Encodings accepted from peers: an identifier or "all"
    #[serde(default)]
    pub accept_encoding: Option<String>,

    /// What to do with a body that fails to compress
    #[serde(default)]
    pub on_failure: FailurePolicy,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        CompressionConfig {
            content_compression: default_content_compression(),
            accept_encoding: None,
            on_failure: FailurePolicy::default(),
        }
    }
}

impl CompressionConfig {
    /// Resolve `content_compression` to a registry algorithm
    pub fn algorithm(&self) -> Result<Algorithm, CompressionError> {
        self.content_compression.parse()
    }

    /// Resolve `accept_encoding`, if configured
    pub fn accept_encoding(&self) -> Result<Option<AcceptEncoding>, CompressionError> {
        self.accept_encoding
            .as_deref()
            .map(AcceptEncoding::parse)
            .transpose()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObservabilityConfig {
    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (pretty, compact, json)
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        ObservabilityConfig {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_content_compression() -> String {
    Algorithm::Identity.as_str().to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
