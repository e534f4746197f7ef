//! OS keychain backed passphrase
//!
//! Uses the system keychain to hold a random secret:
//! - macOS: Keychain
//! - Windows: Credential Manager (DPAPI)
//! - Linux: Secret Service (GNOME Keyring, KWallet)

use keyring::Entry;
use rand::RngCore;
use tracing::{debug, info, warn};
use zeroize::Zeroize;

use super::PassphraseSource;
use crate::crypto::Passphrase;
use crate::error::{Result, VaultError};

/// Service name used for keychain entries
const SERVICE_NAME: &str = "api-config-vault";

/// Account the secret is stored under unless overridden
const DEFAULT_ACCOUNT: &str = "config-encryption-secret";

/// Random secret size in bytes
const SECRET_LEN: usize = 32;

/// Random secret kept in the OS keychain, created on first use
pub struct KeychainPassphrase {
    service: String,
    account: String,
}

impl KeychainPassphrase {
    pub fn new() -> Self {
        Self::with_account(SERVICE_NAME, DEFAULT_ACCOUNT)
    }

    /// Use a custom service/account pair (for namespacing or testing)
    pub fn with_account(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }

    fn entry(&self) -> Result<Entry> {
        Entry::new(&self.service, &self.account).map_err(|e| VaultError::Keychain(e.to_string()))
    }

    /// Test if the keychain can store and delete entries
    pub fn is_available(&self) -> bool {
        let probe = match Entry::new(&self.service, "__test_availability__") {
            Ok(entry) => entry,
            Err(_) => return false,
        };

        if probe.set_password("test").is_ok() {
            let _ = probe.delete_password();
            true
        } else {
            warn!("Keychain is not available");
            false
        }
    }

    /// Delete the stored secret; envelopes derived from it become unreadable
    pub fn forget(&self) -> Result<()> {
        match self.entry()?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(VaultError::Keychain(e.to_string())),
        }
    }

    fn generate_secret() -> String {
        let mut bytes = [0u8; SECRET_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        let secret = hex::encode(bytes);
        bytes.zeroize();
        secret
    }
}

impl Default for KeychainPassphrase {
    fn default() -> Self {
        Self::new()
    }
}

impl PassphraseSource for KeychainPassphrase {
    fn passphrase(&self) -> Result<Passphrase> {
        let entry = self.entry()?;

        match entry.get_password() {
            Ok(secret) => {
                debug!("Loaded passphrase from keychain: {}", self.account);
                Ok(Passphrase::new(secret))
            }
            Err(keyring::Error::NoEntry) => {
                let secret = Passphrase::new(Self::generate_secret());
                entry
                    .set_password(secret.expose())
                    .map_err(|e| VaultError::Keychain(e.to_string()))?;
                info!("Generated new keychain passphrase: {}", self.account);
                Ok(secret)
            }
            Err(e) => Err(VaultError::Keychain(e.to_string())),
        }
    }

    fn source_name(&self) -> &'static str {
        "OS keychain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_secret_shape() {
        let secret = KeychainPassphrase::generate_secret();
        assert_eq!(secret.len(), SECRET_LEN * 2);
        assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(secret, KeychainPassphrase::generate_secret());
    }

    #[test]
    fn test_keychain_roundtrip_when_available() {
        let source = KeychainPassphrase::with_account(SERVICE_NAME, "__config_vault_test__");
        if !source.is_available() {
            // Headless CI usually has no secret service
            return;
        }

        let first = source.passphrase().unwrap();
        let second = source.passphrase().unwrap();
        assert_eq!(first.expose(), second.expose());

        source.forget().unwrap();
        source.forget().unwrap();
    }
}
