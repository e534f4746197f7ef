//! # config-vault
//!
//! Encrypted at-rest storage for third-party API credentials:
//! - One configuration blob sealed with AES-256-GCM under a fresh IV per save
//! - Session key derived with PBKDF2-HMAC-SHA256 from a pluggable passphrase
//!   source (device fingerprint, static secret, OS keychain)
//! - Host-provided key-value storage (in-memory and JSON file backends included)
//! - Masked display copies and redacted log metadata
//!
//! ```no_run
//! use std::sync::Arc;
//! use config_vault::{Configuration, CredentialStore, DeviceFingerprint, MemoryStore};
//!
//! # async fn example() {
//! let store = CredentialStore::new(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(DeviceFingerprint::new("Mozilla/5.0", "en-US", 0, 1920, 1080)),
//! );
//! store.initialize().await;
//!
//! let config: Configuration = [("openai_api_key", "sk-...")].into_iter().collect();
//! store.save_config(&config).await;
//! let key = store.get_api_key("openai").await;
//! # }
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod passphrase;
pub mod sanitize;
pub mod settings;
pub mod storage;
mod store;

pub use config::{Configuration, Provider, CREDENTIAL_FIELDS};
pub use crypto::{AesGcmProvider, CryptoProvider, DerivedKey, Envelope, KdfAlgorithm, KeyDerivationParams};
pub use error::{ErrorKind, Result, VaultError};
pub use passphrase::{DeviceFingerprint, KeychainPassphrase, PassphraseSource, StaticPassphrase};
pub use sanitize::{is_sensitive_field, mask_value, redact_metadata};
pub use settings::VaultSettings;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{CredentialStore, CredentialStoreBuilder};
