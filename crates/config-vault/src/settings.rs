//! Vault settings
//!
//! Non-sensitive knobs stored in a plain JSON file. Every field has a
//! default, so a missing file or a partial one is fine.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::crypto::{KdfAlgorithm, KeyDerivationParams, MIN_PBKDF2_ITERATIONS};
use crate::error::{Result, VaultError};

/// Storage key the encrypted envelope lives under
pub const DEFAULT_STORAGE_KEY: &str = "msp_api_config_encrypted";

/// Settings for a [`CredentialStore`](crate::CredentialStore)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VaultSettings {
    /// Key the serialized envelope is written under
    pub storage_key: String,
    /// Key derivation parameters
    pub kdf: KeyDerivationParams,
    /// Suppress informational log lines; warnings and errors still go out
    pub production_mode: bool,
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            kdf: KeyDerivationParams::default(),
            production_mode: false,
        }
    }
}

impl VaultSettings {
    /// Load settings from a JSON file, falling back to defaults when it does not exist
    pub async fn load_or_default(path: &Path) -> Result<Self> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let settings: Self = serde_json::from_str(&contents)?;
        settings.validate()?;

        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to a JSON file
    pub async fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;

        // Write atomically using temp file
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, path).await?;

        debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Reject settings the store cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(VaultError::InvalidConfig(
                "Storage key must not be empty".to_string(),
            ));
        }
        if self.kdf.salt.is_empty() {
            return Err(VaultError::InvalidConfig("Salt must not be empty".to_string()));
        }

        if self.kdf.algorithm == KdfAlgorithm::Pbkdf2Sha256 {
            if self.kdf.iterations == 0 {
                return Err(VaultError::InvalidConfig(
                    "PBKDF2 iterations must be positive".to_string(),
                ));
            }
            if self.kdf.iterations < MIN_PBKDF2_ITERATIONS {
                warn!(
                    "PBKDF2 iteration count {} is below the recommended {}",
                    self.kdf.iterations, MIN_PBKDF2_ITERATIONS
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_settings_default() {
        let settings = VaultSettings::default();
        assert_eq!(settings.storage_key, "msp_api_config_encrypted");
        assert_eq!(settings.kdf.iterations, 100_000);
        assert!(!settings.production_mode);
        assert!(settings.validate().is_ok());
    }

    #[tokio::test]
    async fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = VaultSettings::load_or_default(&temp_dir.path().join("vault.json"))
            .await
            .unwrap();
        assert_eq!(settings, VaultSettings::default());
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vault.json");
        std::fs::write(&path, r#"{"productionMode":true,"kdf":{"iterations":250000}}"#).unwrap();

        let settings = VaultSettings::load_or_default(&path).await.unwrap();
        assert!(settings.production_mode);
        assert_eq!(settings.kdf.iterations, 250_000);
        assert_eq!(settings.kdf.salt, "msp-command-center-salt");
        assert_eq!(settings.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[tokio::test]
    async fn test_settings_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vault.json");

        let mut settings = VaultSettings::default();
        settings.storage_key = "tenant_a_config".to_string();
        settings.kdf.algorithm = KdfAlgorithm::Argon2id;
        settings.save(&path).await.unwrap();

        let loaded = VaultSettings::load_or_default(&path).await.unwrap();
        assert_eq!(loaded, settings);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"storageKey\""));
        assert!(raw.contains("\"argon2id\""));
    }

    #[test]
    fn test_validation() {
        let mut settings = VaultSettings::default();
        settings.storage_key = "  ".to_string();
        assert!(settings.validate().is_err());

        let mut settings = VaultSettings::default();
        settings.kdf.iterations = 0;
        assert!(settings.validate().is_err());

        let mut settings = VaultSettings::default();
        settings.kdf.iterations = 1_000;
        assert!(settings.validate().is_ok());
    }

    #[tokio::test]
    async fn test_invalid_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vault.json");
        std::fs::write(&path, r#"{"storageKey":""}"#).unwrap();
        assert!(VaultSettings::load_or_default(&path).await.is_err());

        std::fs::write(&path, "not json").unwrap();
        assert!(VaultSettings::load_or_default(&path).await.is_err());
    }
}
