//! Encoder configuration.

use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Runtime configuration for the encoder service.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Root directory artifacts are written under
    pub output_dir: PathBuf,
    /// Topic path appended under each date partition
    pub topic_path: String,
}

impl EncoderConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            output_dir: env::var("DAT_OUTPUT_DIR")
                .unwrap_or_else(|_| "./output".to_string())
                .into(),
            topic_path: env::var("DAT_TOPIC_PATH").unwrap_or_else(|_| "wis/cyclone".to_string()),
        })
    }
}
