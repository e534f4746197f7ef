//! Cryptographic primitives for credential envelopes
//!
//! This module provides:
//! - AES-256-GCM authenticated encryption into JSON envelopes
//! - PBKDF2-HMAC-SHA256 (default) and Argon2id key derivation
//! - Secure memory handling with zeroize
//! - The [`CryptoProvider`] seam the store talks to

mod encryption;
mod key_derivation;
mod provider;
mod secure_memory;

pub use encryption::{decrypt, encrypt, encrypt_with_iv, generate_iv, Envelope, IV_LEN, TAG_LEN};
pub use key_derivation::{
    derive_key, KdfAlgorithm, KeyDerivationParams, DEFAULT_SALT, MIN_PBKDF2_ITERATIONS,
};
pub use provider::{AesGcmProvider, CryptoProvider};
pub use secure_memory::{DerivedKey, Passphrase};
