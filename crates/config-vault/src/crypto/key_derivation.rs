//! Passphrase-based key derivation
//!
//! PBKDF2-HMAC-SHA256 is the default so that envelopes written by
//! Web Crypto clients (`deriveKey`) stay readable. Argon2id is offered
//! for hosts that supply a real secret and do not need that compatibility.

use argon2::{Algorithm, Argon2, Params, Version};
use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroize;

use super::DerivedKey;
use crate::error::{Result, VaultError};

/// Fixed salt shared by every installation
pub const DEFAULT_SALT: &str = "msp-command-center-salt";

/// Recommended lower bound for PBKDF2 iterations
pub const MIN_PBKDF2_ITERATIONS: u32 = 100_000;

/// Key derivation function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KdfAlgorithm {
    #[default]
    Pbkdf2Sha256,
    Argon2id,
}

/// Parameters for key derivation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyDerivationParams {
    pub algorithm: KdfAlgorithm,
    /// Salt string, used as UTF-8 bytes
    pub salt: String,
    /// PBKDF2 iteration count (default: 100 000)
    pub iterations: u32,
    /// Argon2 time cost (default: 3)
    pub time_cost: u32,
    /// Argon2 memory cost in KiB (default: 65536 = 64MB)
    pub memory_cost: u32,
    /// Argon2 parallelism (default: 4)
    pub parallelism: u32,
}

impl Default for KeyDerivationParams {
    fn default() -> Self {
        Self {
            algorithm: KdfAlgorithm::Pbkdf2Sha256,
            salt: DEFAULT_SALT.to_string(),
            iterations: MIN_PBKDF2_ITERATIONS,
            time_cost: 3,
            memory_cost: 65536,
            parallelism: 4,
        }
    }
}

/// Derive a 256-bit key from passphrase bytes
///
/// Deterministic: the same passphrase and parameters always produce the same key.
pub fn derive_key(passphrase: &[u8], params: &KeyDerivationParams) -> Result<DerivedKey> {
    if params.salt.is_empty() {
        return Err(VaultError::KeyDerivation("Salt must not be empty".to_string()));
    }

    let mut out = [0u8; 32];

    match params.algorithm {
        KdfAlgorithm::Pbkdf2Sha256 => {
            if params.iterations == 0 {
                return Err(VaultError::KeyDerivation(
                    "Iteration count must be positive".to_string(),
                ));
            }
            pbkdf2_hmac::<Sha256>(passphrase, params.salt.as_bytes(), params.iterations, &mut out);
        }
        KdfAlgorithm::Argon2id => {
            let argon2_params = Params::new(
                params.memory_cost,
                params.time_cost,
                params.parallelism,
                Some(out.len()),
            )
            .map_err(|e| VaultError::KeyDerivation(e.to_string()))?;

            Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params)
                .hash_password_into(passphrase, params.salt.as_bytes(), &mut out)
                .map_err(|e| VaultError::KeyDerivation(e.to_string()))?;
        }
    }

    let key = DerivedKey::new(out);
    out.zeroize();
    Ok(key)
}
