//! Encrypted credential store
//!
//! One configuration, encrypted as a single JSON blob and persisted under one
//! storage key. Public operations never return errors (except
//! [`CredentialStore::export_config`]); each has a `try_` twin that reports the
//! typed [`VaultError`] instead.

use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use zeroize::Zeroizing;

use crate::config::{Configuration, Provider};
use crate::crypto::{AesGcmProvider, CryptoProvider, DerivedKey, Envelope};
use crate::error::{Result, VaultError};
use crate::logging::Logger;
use crate::passphrase::PassphraseSource;
use crate::sanitize::sanitize_config;
use crate::settings::VaultSettings;
use crate::storage::KeyValueStore;

/// Mutable state, guarded by one lock so operations run strictly in sequence
#[derive(Default)]
struct StoreState {
    /// Session key, absent until the first derivation
    key: Option<DerivedKey>,
    /// Last saved or loaded configuration
    config: Configuration,
}

/// Encrypts API credentials into a host key-value store
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStore>,
    crypto: Arc<dyn CryptoProvider>,
    passphrase: Arc<dyn PassphraseSource>,
    settings: VaultSettings,
    log: Logger,
    state: Mutex<StoreState>,
}

impl CredentialStore {
    /// Create a store with the default crypto provider and settings
    pub fn new(storage: Arc<dyn KeyValueStore>, passphrase: Arc<dyn PassphraseSource>) -> Self {
        let settings = VaultSettings::default();
        Self {
            storage,
            crypto: Arc::new(AesGcmProvider),
            passphrase,
            log: Logger::new(settings.production_mode),
            settings,
            state: Mutex::new(StoreState::default()),
        }
    }

    pub fn builder() -> CredentialStoreBuilder {
        CredentialStoreBuilder::default()
    }

    pub fn settings(&self) -> &VaultSettings {
        &self.settings
    }

    /// Key the envelope is persisted under
    pub fn storage_key(&self) -> &str {
        &self.settings.storage_key
    }

    /// Whether a session key has been derived
    pub async fn is_initialized(&self) -> bool {
        self.state.lock().await.key.is_some()
    }

    /// Derive the session key; safe to call again, it simply re-derives
    pub async fn initialize(&self) -> bool {
        match self.try_initialize().await {
            Ok(()) => true,
            Err(e) => {
                self.log
                    .error("Failed to initialize encryption", json!({ "error": e.to_string() }));
                false
            }
        }
    }

    pub async fn try_initialize(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.key = Some(self.derive_key().await?);
        self.log.info(
            "Encryption initialized",
            json!({
                "passphraseSource": self.passphrase.source_name(),
                "provider": self.crypto.provider_name(),
                "backend": self.storage.backend_name(),
            }),
        );
        Ok(())
    }

    /// Encrypt and persist a configuration, replacing whatever was stored
    pub async fn save_config(&self, config: &Configuration) -> bool {
        match self.try_save_config(config).await {
            Ok(()) => true,
            Err(e) => {
                self.log
                    .error("Failed to save configuration", json!({ "error": e.to_string() }));
                false
            }
        }
    }

    pub async fn try_save_config(&self, config: &Configuration) -> Result<()> {
        if !config.has_credentials() {
            return Err(VaultError::InvalidConfig(
                "No recognized credential field is set".to_string(),
            ));
        }

        let mut state = self.state.lock().await;
        let key = self.ensure_key(&mut state).await?;

        let plaintext = Zeroizing::new(serde_json::to_vec(config)?);
        let envelope = self.crypto.encrypt(&key, &plaintext)?;
        self.storage
            .set(self.storage_key(), &envelope.to_json()?)
            .await?;

        state.config = config.clone();

        self.log.info(
            "Configuration saved successfully",
            json!({ "providers": config.non_sensitive_fields() }),
        );
        Ok(())
    }

    /// Load and decrypt the stored configuration; empty on any failure
    pub async fn load_config(&self) -> Configuration {
        match self.try_load_config().await {
            Ok(config) => config,
            Err(e) => {
                self.log
                    .error("Failed to load configuration", json!({ "error": e.to_string() }));
                Configuration::new()
            }
        }
    }

    /// Load and decrypt the stored configuration
    ///
    /// A missing entry is not an error and yields an empty configuration.
    pub async fn try_load_config(&self) -> Result<Configuration> {
        let mut state = self.state.lock().await;
        self.load_locked(&mut state).await
    }

    /// Secret for a provider from the cached configuration
    ///
    /// `provider` is one of `openai`, `anthropic`, `microsoft`, `atera`,
    /// `zoho` or `zoho_assist`; anything else yields `None`.
    pub async fn get_api_key(&self, provider: &str) -> Option<String> {
        match Provider::from_name(provider) {
            Some(provider) => self.api_key(provider).await,
            None => {
                self.log
                    .warn("API key not found", json!({ "provider": provider }));
                None
            }
        }
    }

    pub async fn api_key(&self, provider: Provider) -> Option<String> {
        let state = self.state.lock().await;

        match state.config.get(provider.key_field()).filter(|v| !v.is_empty()) {
            Some(value) => {
                self.log.info(
                    "API key retrieved",
                    json!({ "provider": provider.name(), "keyLength": value.chars().count() }),
                );
                Some(value.to_string())
            }
            None => {
                self.log
                    .warn("API key not found", json!({ "provider": provider.name() }));
                None
            }
        }
    }

    /// Cached configuration with sensitive values masked, for display
    pub async fn get_sanitized_config(&self) -> Configuration {
        sanitize_config(&self.state.lock().await.config)
    }

    /// Cached configuration, unmasked
    pub async fn current_config(&self) -> Configuration {
        self.state.lock().await.config.clone()
    }

    /// Remove the stored entry and forget the cached configuration
    pub async fn clear_config(&self) {
        let mut state = self.state.lock().await;

        if let Err(e) = self.storage.remove(self.storage_key()).await {
            self.log
                .warn("Failed to remove stored configuration", json!({ "error": e.to_string() }));
        }
        state.config = Configuration::new();

        self.log.info("Configuration cleared", json!({}));
    }

    /// Raw serialized envelope currently in storage, for backup
    pub async fn export_config(&self) -> Result<String> {
        let _state = self.state.lock().await;

        let exported = match self.storage.get(self.storage_key()).await {
            Ok(Some(data)) => Ok(data),
            Ok(None) => Err(VaultError::NothingStored),
            Err(e) => Err(e),
        };

        match &exported {
            Ok(_) => self.log.info("Configuration exported", json!({})),
            Err(e) => self
                .log
                .error("Export failed", json!({ "error": e.to_string() })),
        }
        exported
    }

    /// Replace storage with a previously exported envelope and reload
    pub async fn import_config(&self, data: &str) -> bool {
        match self.try_import_config(data).await {
            Ok(()) => true,
            Err(e) => {
                self.log
                    .error("Import failed", json!({ "error": e.to_string() }));
                false
            }
        }
    }

    /// Validate and store an exported envelope verbatim, then reload
    ///
    /// Only the envelope's shape is checked before writing. If it was sealed
    /// under another key the import still succeeds and the follow-up load
    /// leaves the cached configuration unchanged.
    pub async fn try_import_config(&self, data: &str) -> Result<()> {
        Envelope::from_json(data)?;

        let mut state = self.state.lock().await;
        self.storage.set(self.storage_key(), data).await?;

        if let Err(e) = self.load_locked(&mut state).await {
            self.log
                .error("Failed to load configuration", json!({ "error": e.to_string() }));
        }

        self.log.info("Configuration imported successfully", json!({}));
        Ok(())
    }

    async fn load_locked(&self, state: &mut StoreState) -> Result<Configuration> {
        let key = self.ensure_key(state).await?;

        let Some(raw) = self.storage.get(self.storage_key()).await? else {
            self.log.info("No saved configuration found", json!({}));
            return Ok(Configuration::new());
        };

        let envelope = Envelope::from_json(&raw)?;
        let plaintext = Zeroizing::new(self.crypto.decrypt(&key, &envelope)?);

        // serde errors can quote the input, so drop them
        let config: Configuration = serde_json::from_slice(&plaintext).map_err(|_| {
            VaultError::Decryption("Decrypted payload is not a configuration object".to_string())
        })?;

        state.config = config.clone();

        self.log.info(
            "Configuration loaded successfully",
            json!({
                "hasOpenAI": config.has_value("openai_api_key"),
                "hasAnthropic": config.has_value("anthropic_api_key"),
                "hasMicrosoft": config.has_value("ms_client_id"),
                "hasAtera": config.has_value("atera_api_key"),
                "hasZoho": config.has_value("zoho_client_id"),
            }),
        );
        Ok(config)
    }

    /// Session key, deriving it on first use
    async fn ensure_key(&self, state: &mut StoreState) -> Result<DerivedKey> {
        if let Some(key) = &state.key {
            return Ok(key.clone());
        }

        let key = self.derive_key().await?;
        state.key = Some(key.clone());
        Ok(key)
    }

    /// Run key derivation off the async executor
    async fn derive_key(&self) -> Result<DerivedKey> {
        let crypto = Arc::clone(&self.crypto);
        let passphrase = Arc::clone(&self.passphrase);
        let params = self.settings.kdf.clone();

        tokio::task::spawn_blocking(move || {
            let material = passphrase.passphrase()?;
            crypto.derive_key(material.as_bytes(), &params)
        })
        .await
        .map_err(|e| VaultError::KeyDerivation(e.to_string()))?
    }
}

/// Builder for [`CredentialStore`]
///
/// Storage and passphrase source are required; the crypto provider defaults
/// to AES-256-GCM and settings to [`VaultSettings::default`].
#[derive(Default)]
pub struct CredentialStoreBuilder {
    storage: Option<Arc<dyn KeyValueStore>>,
    crypto: Option<Arc<dyn CryptoProvider>>,
    passphrase: Option<Arc<dyn PassphraseSource>>,
    settings: VaultSettings,
}

impl CredentialStoreBuilder {
    pub fn storage(mut self, storage: Arc<dyn KeyValueStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn crypto(mut self, crypto: Arc<dyn CryptoProvider>) -> Self {
        self.crypto = Some(crypto);
        self
    }

    pub fn passphrase(mut self, passphrase: Arc<dyn PassphraseSource>) -> Self {
        self.passphrase = Some(passphrase);
        self
    }

    pub fn settings(mut self, settings: VaultSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Result<CredentialStore> {
        self.settings.validate()?;

        let storage = self
            .storage
            .ok_or_else(|| VaultError::Storage("No storage backend configured".to_string()))?;
        let passphrase = self
            .passphrase
            .ok_or_else(|| VaultError::Passphrase("No passphrase source configured".to_string()))?;

        Ok(CredentialStore {
            storage,
            crypto: self.crypto.unwrap_or_else(|| Arc::new(AesGcmProvider)),
            passphrase,
            log: Logger::new(self.settings.production_mode),
            settings: self.settings,
            state: Mutex::new(StoreState::default()),
        })
    }
}
