//! Sanitized logging
//!
//! All store log lines go through [`Logger`], which redacts metadata before
//! handing it to `tracing`. Messages are fixed strings; only metadata varies.

use serde_json::Value;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::sanitize::redact_metadata;

/// Target for every event the store emits
pub const LOG_TARGET: &str = "api_config";

/// Redacting front-end over `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct Logger {
    production_mode: bool,
}

impl Logger {
    pub fn new(production_mode: bool) -> Self {
        Self { production_mode }
    }

    pub fn production_mode(&self) -> bool {
        self.production_mode
    }

    /// Informational event, dropped in production mode
    pub fn info(&self, message: &str, metadata: Value) {
        if self.production_mode {
            return;
        }
        info!(target: LOG_TARGET, metadata = %redact_metadata(&metadata), "{}", message);
    }

    pub fn warn(&self, message: &str, metadata: Value) {
        warn!(target: LOG_TARGET, metadata = %redact_metadata(&metadata), "{}", message);
    }

    pub fn error(&self, message: &str, metadata: Value) {
        error!(target: LOG_TARGET, metadata = %redact_metadata(&metadata), "{}", message);
    }
}

/// Install a fmt subscriber filtered by `RUST_LOG` (default `info`)
///
/// Returns false when a global subscriber was already set.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
