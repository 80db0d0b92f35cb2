use anyhow::{bail, Context, Result};
use bodypress_compression::{compressor_from_name, encode_body};
use bodypress_config::Config;
use clap::Parser;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::{self, AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info};

/// Compress a body the way an outbound transport would
#[derive(Parser, Debug)]
pub struct CompressCmd {
    /// Algorithm identifier, overrides the configured content compression
    #[arg(short, long, value_name = "ALGO")]
    pub algorithm: Option<String>,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "OUT")]
    pub output: Option<PathBuf>,

    /// Input file (stdin if omitted)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,
}

impl CompressCmd {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let name = self
            .algorithm
            .as_deref()
            .unwrap_or(&config.compression.content_compression);
        let compressor = compressor_from_name(name)?;
        let policy = config.compression.on_failure;

        let body = self.read_input().await?;
        debug!(algorithm = name, bytes = body.len(), "read body");

        let Some(encoded) = encode_body(compressor.as_ref(), &body, policy) else {
            bail!("Compression with {} failed and on_failure = {}; body dropped", name, policy);
        };

        self.write_output(&encoded.bytes).await?;

        if let Some(header) = encoded.header_line() {
            eprintln!("{}", header);
        }
        info!(
            algorithm = name,
            input_bytes = body.len(),
            output_bytes = encoded.bytes.len(),
            "body encoded"
        );

        Ok(())
    }

    async fn read_input(&self) -> Result<Vec<u8>> {
        match &self.input {
            Some(path) => fs::read(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display())),
            None => {
                let mut body = Vec::new();
                io::stdin()
                    .read_to_end(&mut body)
                    .await
                    .context("Failed to read stdin")?;
                Ok(body)
            }
        }
    }

    async fn write_output(&self, bytes: &[u8]) -> Result<()> {
        match &self.output {
            Some(path) => fs::write(path, bytes)
                .await
                .with_context(|| format!("Failed to write {}", path.display())),
            None => {
                let mut stdout = io::stdout();
                stdout.write_all(bytes).await.context("Failed to write stdout")?;
                stdout.flush().await.context("Failed to flush stdout")?;
                Ok(())
            }
        }
    }
}
