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
//! Configuration management for BodyPress
//!
//! Loads the outbound compression and logging settings from TOML or JSON
//! files, applies `BODYPRESS_` environment overrides and validates the
//! result against the compression registry.
//!
//! # Example
//!
//! ```no_run
//! use bodypress_config::ConfigLoader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = ConfigLoader::new();
//!     let config = loader.load_with_overrides("bodypress.toml").await?;
//!
//!     println!("Content compression: {}", config.compression.content_compression);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

// Re-export commonly used items
pub use error::{ConfigError, ConfigResult};
pub use loader::{
    ConfigFormat, ConfigLoader, ENV_ACCEPT_ENCODING, ENV_CONTENT_COMPRESSION, ENV_LOG_FORMAT,
    ENV_LOG_LEVEL, ENV_ON_COMPRESSION_FAILURE,
};
pub use schema::*;
pub use validation::Validator;
