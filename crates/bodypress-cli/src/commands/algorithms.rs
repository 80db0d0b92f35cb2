use anyhow::Result;
use bodypress_compression::{is_supported, Algorithm};
use bodypress_config::Config;
use clap::Parser;
use console::style;

/// List compression algorithm identifiers
#[derive(Parser, Debug)]
pub struct AlgorithmsCmd {
    /// Only list algorithms with a compiled-in backend
    #[arg(long)]
    pub supported: bool,
}

impl AlgorithmsCmd {
    pub fn execute(&self, config: &Config) -> Result<()> {
        for algorithm in Algorithm::ALL {
            let supported = is_supported(algorithm.as_str());
            if self.supported && !supported {
                continue;
            }

            let flag = if supported {
                style("supported").green()
            } else {
                style("unsupported").dim()
            };
            println!("{:>2}  {:<10} {}", algorithm.ordinal(), algorithm.as_str(), flag);
        }

        if let Some(accept) = config.compression.accept_encoding()? {
            println!();
            println!("Accept-Encoding: {}", accept.header_value());
        }

        Ok(())
    }
}
