//! AES-256-GCM authenticated encryption
//!
//! Stored format: `{"iv":[..12 byte values..],"data":[..byte values..]}`
//! - IV: 12 bytes (96 bits) - standard for GCM
//! - data: ciphertext with the 16-byte auth tag appended, the same layout
//!   Web Crypto `encrypt` returns

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::DerivedKey;
use crate::error::{Result, VaultError};

/// IV length in bytes
pub const IV_LEN: usize = 12;

/// GCM auth tag length in bytes
pub const TAG_LEN: usize = 16;

/// Encrypted envelope as persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Initialization vector, fresh for every encryption
    pub iv: [u8; IV_LEN],
    /// Ciphertext followed by the auth tag
    pub data: Vec<u8>,
}

impl Envelope {
    /// Serialize to the stored JSON form
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse the stored JSON form
    ///
    /// Fails unless the input is an object with an `iv` of exactly 12 byte
    /// values and a `data` array of byte values.
    pub fn from_json(s: &str) -> Result<Self> {
        // serde messages can quote the input, keep only where it broke
        serde_json::from_str(s).map_err(|e| {
            VaultError::InvalidEnvelope(format!(
                "{:?} error at line {} column {}",
                e.classify(),
                e.line(),
                e.column()
            ))
        })
    }
}

/// Generate a random IV
pub fn generate_iv() -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    rand::thread_rng().fill_bytes(&mut iv);
    iv
}

/// Encrypt plaintext under a caller-chosen IV
///
/// Never reuse an IV with the same key; [`encrypt`] picks a random one.
pub fn encrypt_with_iv(plaintext: &[u8], key: &DerivedKey, iv: [u8; IV_LEN]) -> Result<Envelope> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::Encryption(e.to_string()))?;

    // aes-gcm appends the auth tag to the ciphertext
    let data = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext)
        .map_err(|e| VaultError::Encryption(e.to_string()))?;

    Ok(Envelope { iv, data })
}

/// Encrypt plaintext using AES-256-GCM with a random IV
pub fn encrypt(plaintext: &[u8], key: &DerivedKey) -> Result<Envelope> {
    encrypt_with_iv(plaintext, key, generate_iv())
}

/// Decrypt an envelope using AES-256-GCM
pub fn decrypt(envelope: &Envelope, key: &DerivedKey) -> Result<Vec<u8>> {
    if envelope.data.len() < TAG_LEN {
        return Err(VaultError::Decryption(format!(
            "Ciphertext too short: expected at least {} bytes, got {}",
            TAG_LEN,
            envelope.data.len()
        )));
    }

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::Decryption(e.to_string()))?;

    cipher
        .decrypt(Nonce::from_slice(&envelope.iv), envelope.data.as_slice())
        .map_err(|e| VaultError::Decryption(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> DerivedKey {
        DerivedKey::new([42u8; 32])
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = test_key();
        let plaintext = br#"{"openai_api_key":"sk-test"}"#;

        let envelope = encrypt(plaintext, &key).unwrap();
        assert_eq!(envelope.data.len(), plaintext.len() + TAG_LEN);

        let decrypted = decrypt(&envelope, &key).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_stored_json_shape() {
        let envelope = encrypt_with_iv(b"x", &test_key(), [1u8; IV_LEN]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&envelope.to_json().unwrap()).unwrap();

        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["iv"], serde_json::json!([1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]));
        assert_eq!(object["data"].as_array().unwrap().len(), 1 + TAG_LEN);
        assert!(object["data"].as_array().unwrap().iter().all(|b| b.is_u64()));
    }

    #[test]
    fn test_parse_error_omits_input() {
        let err = Envelope::from_json(r#"{"iv":"sk-ABCDEFGH1234","data":[]}"#).unwrap_err();
        let message = err.to_string();
        assert!(!message.contains("sk-"));
        assert!(message.contains("line 1"));

        let err = Envelope::from_json(r#"{"iv":[1,2,3,4,5,6,7,8,9,10,11,12],"data":"secret-data"}"#)
            .unwrap_err();
        assert!(!err.to_string().contains("secret-data"));
    }

    #[test]
    fn test_json_roundtrip_preserves_bytes() {
        let envelope = encrypt(b"payload", &test_key()).unwrap();
        let parsed = Envelope::from_json(&envelope.to_json().unwrap()).unwrap();
        assert_eq!(parsed, envelope);
    }

    #[test]
    fn test_different_ivs_produce_different_ciphertext() {
        let key = test_key();
        let plaintext = b"same plaintext";

        let envelope1 = encrypt(plaintext, &key).unwrap();
        let envelope2 = encrypt(plaintext, &key).unwrap();

        assert_ne!(envelope1.iv, envelope2.iv);
        assert_ne!(envelope1.data, envelope2.data);
    }

    #[test]
    fn test_wrong_key_fails_decryption() {
        let envelope = encrypt(b"secret data", &test_key()).unwrap();
        let result = decrypt(&envelope, &DerivedKey::new([1u8; 32]));

        assert!(matches!(result, Err(VaultError::Decryption(_))));
    }

    #[test]
    fn test_tampered_data_fails_decryption() {
        let key = test_key();
        let mut envelope = encrypt(b"secret data", &key).unwrap();
        envelope.data[0] ^= 0xFF;

        assert!(decrypt(&envelope, &key).is_err());

        let mut envelope = encrypt(b"secret data", &key).unwrap();
        let last = envelope.data.len() - 1;
        envelope.data[last] ^= 0xFF;

        assert!(decrypt(&envelope, &key).is_err());
    }

    #[test]
    fn test_short_data_fails_decryption() {
        let envelope = Envelope {
            iv: [0u8; IV_LEN],
            data: vec![0u8; 4],
        };
        assert!(decrypt(&envelope, &test_key()).is_err());
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(Envelope::from_json("not json").is_err());
        assert!(Envelope::from_json(r#"{"not":"valid"}"#).is_err());
        assert!(Envelope::from_json(r#"{"iv":[1,2,3],"data":[]}"#).is_err());
        assert!(Envelope::from_json(r#"{"iv":[0,0,0,0,0,0,0,0,0,0,0,0]}"#).is_err());
        assert!(Envelope::from_json(r#"{"iv":[0,0,0,0,0,0,0,0,0,0,0,256],"data":[]}"#).is_err());
        assert!(Envelope::from_json(r#"{"iv":[0,0,0,0,0,0,0,0,0,0,0,0],"data":[1,2]}"#).is_ok());
    }
}
