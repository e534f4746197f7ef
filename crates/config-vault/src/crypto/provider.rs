//! Cryptographic provider abstraction

use super::encryption::{self, Envelope, IV_LEN};
use super::key_derivation::{self, KeyDerivationParams};
use super::DerivedKey;
use crate::error::Result;

/// Source of key derivation, AEAD and randomness used by the store
pub trait CryptoProvider: Send + Sync {
    /// Derive the session key from passphrase bytes
    fn derive_key(&self, passphrase: &[u8], params: &KeyDerivationParams) -> Result<DerivedKey>;

    /// Produce a fresh random IV
    fn random_iv(&self) -> [u8; IV_LEN];

    /// Encrypt under an explicit IV
    fn encrypt_with_iv(
        &self,
        key: &DerivedKey,
        iv: [u8; IV_LEN],
        plaintext: &[u8],
    ) -> Result<Envelope>;

    /// Decrypt and authenticate an envelope
    fn decrypt(&self, key: &DerivedKey, envelope: &Envelope) -> Result<Vec<u8>>;

    /// Get a human-readable name for this provider
    fn provider_name(&self) -> &'static str;

    /// Encrypt under a freshly generated IV
    fn encrypt(&self, key: &DerivedKey, plaintext: &[u8]) -> Result<Envelope> {
        self.encrypt_with_iv(key, self.random_iv(), plaintext)
    }
}

/// AES-256-GCM with PBKDF2/Argon2id key derivation
#[derive(Debug, Default, Clone, Copy)]
pub struct AesGcmProvider;

impl CryptoProvider for AesGcmProvider {
    fn derive_key(&self, passphrase: &[u8], params: &KeyDerivationParams) -> Result<DerivedKey> {
        key_derivation::derive_key(passphrase, params)
    }

    fn random_iv(&self) -> [u8; IV_LEN] {
        encryption::generate_iv()
    }

    fn encrypt_with_iv(
        &self,
        key: &DerivedKey,
        iv: [u8; IV_LEN],
        plaintext: &[u8],
    ) -> Result<Envelope> {
        encryption::encrypt_with_iv(plaintext, key, iv)
    }

    fn decrypt(&self, key: &DerivedKey, envelope: &Envelope) -> Result<Vec<u8>> {
        encryption::decrypt(envelope, key)
    }

    fn provider_name(&self) -> &'static str {
        "AES-256-GCM"
    }
}
