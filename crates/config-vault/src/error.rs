//! Error types for config-vault

use thiserror::Error;

/// Result type alias for vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Coarse failure category for a [`VaultError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Key derivation, passphrase, encryption or decryption failed
    CryptoFailure,
    /// Configuration or imported envelope is structurally invalid
    ValidationFailure,
    /// Nothing is stored under the storage key
    StorageMiss,
    /// The storage backend itself failed
    StorageFailure,
}

/// Vault error types
///
/// Messages never carry credential values.
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Passphrase unavailable: {0}")]
    Passphrase(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Invalid configuration format: {0}")]
    InvalidConfig(String),

    #[error("Invalid encrypted data format: {0}")]
    InvalidEnvelope(String),

    #[error("No configuration to export")]
    NothingStored,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Keychain error: {0}")]
    Keychain(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl VaultError {
    /// Map this error onto its failure category
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::KeyDerivation(_)
            | Self::Passphrase(_)
            | Self::Encryption(_)
            | Self::Decryption(_)
            | Self::Keychain(_) => ErrorKind::CryptoFailure,
            Self::InvalidConfig(_) | Self::InvalidEnvelope(_) | Self::Serialization(_) => {
                ErrorKind::ValidationFailure
            }
            Self::NothingStored => ErrorKind::StorageMiss,
            Self::Storage(_) | Self::Io(_) => ErrorKind::StorageFailure,
        }
    }
}
