//! BodyPress Observability Module
//!
//! Structured logging setup for BodyPress binaries.
//!
//! # Features
//!
//! - **Multiple Output Formats**: Pretty, JSON, and compact output formats
//! - **Environment-based Filtering**: Dynamic log level control via `RUST_LOG`
//! - **Codec Diagnostics**: compression failures are `ERROR` events on the
//!   `compression` target carrying a `category` field
//!
//! # Example
//!
//! ```ignore
//! use bodypress_observability::{init_tracing, LogFormat};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_tracing(LogFormat::Pretty, None)?;
//!     tracing::info!("Application started");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod initialization;

pub use config::{LogConfig, LogError, LogFormat, LogOutput};
pub use initialization::{init_tracing, init_tracing_with_config};

/// Tracing re-exports for convenience
pub use tracing::{debug, error, info, trace, warn, Level};
