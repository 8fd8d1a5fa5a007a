use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_UPLOAD_LIMIT_BYTES: usize = 50 * 1024 * 1024;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Root for per-request scratch workspaces. `None` uses the OS temp dir.
    pub scratch_dir: Option<PathBuf>,
    /// Fixed seed for generated content; unset means process randomness.
    pub content_seed: Option<u64>,
    pub upload_limit_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            scratch_dir: None,
            content_seed: None,
            upload_limit_bytes: DEFAULT_UPLOAD_LIMIT_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            scratch_dir: optional_env("SCRATCH_DIR").map(PathBuf::from),
            content_seed: optional_env("CONTENT_SEED")
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("CONTENT_SEED must be an unsigned 64-bit integer")?,
            upload_limit_bytes: optional_env("UPLOAD_LIMIT_BYTES")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("UPLOAD_LIMIT_BYTES must be a byte count")?
                .unwrap_or(DEFAULT_UPLOAD_LIMIT_BYTES),
        })
    }
}

/// Unset and blank values are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
