//! Device fingerprint passphrase

use chrono::Local;
use serde::{Deserialize, Serialize};

use super::PassphraseSource;
use crate::crypto::Passphrase;
use crate::error::Result;

/// Separator between fingerprint components
pub const SEPARATOR: &str = "|";

/// Environment description used as key material
///
/// Serializes to `user_agent|language|timezone_offset|WIDTHxHEIGHT`, the same
/// string Web Crypto clients derive their key from, so envelopes written there
/// decrypt here when the host reports identical values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceFingerprint {
    pub user_agent: String,
    /// Locale tag, e.g. `en-US`
    pub language: String,
    /// Minutes behind UTC (positive west of Greenwich), as browsers report it
    pub timezone_offset: i32,
    pub screen_width: u32,
    pub screen_height: u32,
}

impl DeviceFingerprint {
    pub fn new(
        user_agent: impl Into<String>,
        language: impl Into<String>,
        timezone_offset: i32,
        screen_width: u32,
        screen_height: u32,
    ) -> Self {
        Self {
            user_agent: user_agent.into(),
            language: language.into(),
            timezone_offset,
            screen_width,
            screen_height,
        }
    }

    /// Offset of the local clock in browser convention (UTC minus local, in minutes)
    pub fn local_timezone_offset() -> i32 {
        -(Local::now().offset().local_minus_utc() / 60)
    }

    /// Replace the timezone offset with the local clock's
    pub fn with_local_timezone(mut self) -> Self {
        self.timezone_offset = Self::local_timezone_offset();
        self
    }

    /// The joined passphrase string
    pub fn material(&self) -> String {
        [
            self.user_agent.clone(),
            self.language.clone(),
            self.timezone_offset.to_string(),
            format!("{}x{}", self.screen_width, self.screen_height),
        ]
        .join(SEPARATOR)
    }
}

impl PassphraseSource for DeviceFingerprint {
    fn passphrase(&self) -> Result<Passphrase> {
        Ok(Passphrase::new(self.material()))
    }

    fn source_name(&self) -> &'static str {
        "device fingerprint"
    }
}
