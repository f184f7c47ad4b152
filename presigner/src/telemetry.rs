//! Logging setup

use std::env;

use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

/// Output format of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    /// Reads `LOG_FORMAT`, defaulting to text
    #[must_use]
    pub fn from_env() -> Self {
        match env::var("LOG_FORMAT") {
            Ok(format) if format.trim().eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Level used when `RUST_LOG` is not set, from `TRACING_LEVEL`
#[must_use]
pub fn tracing_level() -> Level {
    env::var("TRACING_LEVEL")
        .ok()
        .and_then(|val| val.parse::<Level>().ok())
        .unwrap_or(Level::INFO)
}

/// Installs the global subscriber; logs go to stderr so stdout only carries results
pub fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(tracing_level()).into())
        .from_env_lossy();

    match LogFormat::from_env() {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Text => {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
