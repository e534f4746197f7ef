//! Passphrase sources for key derivation
//!
//! The device fingerprint reproduces the key material of Web Crypto clients and is
//! therefore only as secret as the environment it describes. Hosts with a
//! real secret should plug in [`StaticPassphrase`] or [`KeychainPassphrase`].

mod fingerprint;
mod keychain;

pub use fingerprint::DeviceFingerprint;
pub use keychain::KeychainPassphrase;

use crate::crypto::Passphrase;
use crate::error::{Result, VaultError};

/// Supplies the material the session key is derived from
///
/// Must return the same material every session for stored envelopes to stay
/// readable.
pub trait PassphraseSource: Send + Sync {
    fn passphrase(&self) -> Result<Passphrase>;

    /// Short description for log lines
    fn source_name(&self) -> &'static str;
}

/// Caller-supplied passphrase
pub struct StaticPassphrase {
    passphrase: Passphrase,
}

impl StaticPassphrase {
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: Passphrase::new(passphrase),
        }
    }
}

impl PassphraseSource for StaticPassphrase {
    fn passphrase(&self) -> Result<Passphrase> {
        if self.passphrase.is_empty() {
            return Err(VaultError::Passphrase("Passphrase is empty".to_string()));
        }
        Ok(Passphrase::new(self.passphrase.expose()))
    }

    fn source_name(&self) -> &'static str {
        "static passphrase"
    }
}
