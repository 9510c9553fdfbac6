//! Symmetric encryption for integration settings at rest.
//!
//! Key material is derived by one-way hashing two independent long-lived
//! secrets: the 256-bit AES key from the primary secret, the 128-bit CBC
//! initialization vector from the secondary salt. Compromise of one secret
//! does not by itself expose ciphertext.
//!
//! The IV is fixed by derivation rather than random per call, so identical
//! plaintext under the same secrets always yields identical ciphertext.
//! That is a deliberate tradeoff: the vault protects stored credentials
//! against at-rest database compromise and keeps existing blobs decryptable
//! across deploys. It does not provide semantic security against
//! chosen-plaintext analysis.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Errors produced by [`Vault`] operations.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Key material could not be derived.
    #[error("Encryption unavailable: {0}")]
    Unavailable(String),

    /// Encryption failed.
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Ciphertext could not be decrypted.
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// JSON (de)serialization around encrypt/decrypt failed.
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

/// Encrypts and decrypts settings blobs with AES-256-CBC.
///
/// Stateless after construction and cheap to clone; safe to share across
/// concurrent callers without coordination. Never logs plaintext.
#[derive(Clone)]
pub struct Vault {
    key: [u8; 32],
    iv: [u8; 16],
}

impl Vault {
    /// Derive a vault from two independent long-lived secrets.
    ///
    /// Fails with [`VaultError::Unavailable`] when either secret is empty,
    /// since a vault keyed from an empty string would silently weaken the
    /// derived material.
    pub fn from_secrets(secret_key: &str, secret_salt: &str) -> Result<Self, VaultError> {
        if secret_key.is_empty() {
            return Err(VaultError::Unavailable(
                "vault secret key is empty".to_string(),
            ));
        }
        if secret_salt.is_empty() {
            return Err(VaultError::Unavailable(
                "vault secret salt is empty".to_string(),
            ));
        }

        let key: [u8; 32] = Sha256::digest(secret_key.as_bytes()).into();
        let salt_hash = Sha256::digest(secret_salt.as_bytes());
        let mut iv = [0u8; 16];
        iv.copy_from_slice(&salt_hash[..16]);

        Ok(Self { key, iv })
    }

    /// Encrypt a plaintext string, returning base64-encoded ciphertext.
    ///
    /// Empty input passes through as an empty string so optional stored
    /// fields stay optional.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, VaultError> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }

        let cipher = Aes256CbcEnc::new(&self.key.into(), &self.iv.into());
        let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
        Ok(BASE64.encode(ciphertext))
    }

    /// Decrypt base64-encoded ciphertext produced by [`encrypt`](Self::encrypt).
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, VaultError> {
        if ciphertext.is_empty() {
            return Ok(String::new());
        }

        let raw = BASE64
            .decode(ciphertext)
            .map_err(|e| VaultError::Decryption(format!("invalid base64: {e}")))?;

        let cipher = Aes256CbcDec::new(&self.key.into(), &self.iv.into());
        let plaintext = cipher
            .decrypt_padded_vec_mut::<Pkcs7>(&raw)
            .map_err(|_| VaultError::Decryption("bad ciphertext or key".to_string()))?;

        String::from_utf8(plaintext)
            .map_err(|e| VaultError::Decryption(format!("plaintext is not valid UTF-8: {e}")))
    }

    /// Serialize a value to JSON and encrypt it.
    pub fn encrypt_json<T: Serialize>(&self, value: &T) -> Result<String, VaultError> {
        let json = serde_json::to_string(value)
            .map_err(|e| VaultError::Serialization(format!("JSON encode failed: {e}")))?;
        self.encrypt(&json)
    }

    /// Decrypt a blob and deserialize the contained JSON.
    pub fn decrypt_json<T: DeserializeOwned>(&self, ciphertext: &str) -> Result<T, VaultError> {
        let json = self.decrypt(ciphertext)?;
        serde_json::from_str(&json)
            .map_err(|e| VaultError::Serialization(format!("JSON decode failed: {e}")))
    }
}

impl std::fmt::Debug for Vault {
    /// Key material must never appear in logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_vault() -> Vault {
        Vault::from_secrets("primary-secret", "secondary-salt").unwrap()
    }

    #[test]
    fn round_trip_restores_plaintext() {
        let vault = test_vault();
        let ciphertext = vault.encrypt("hello world").unwrap();
        assert_ne!(ciphertext, "hello world");
        assert_eq!(vault.decrypt(&ciphertext).unwrap(), "hello world");
    }

    #[test]
    fn round_trip_preserves_non_ascii_text() {
        let vault = test_vault();
        let plaintext = "hôtel Ägir — 東京 🏨";
        let ciphertext = vault.encrypt(plaintext).unwrap();
        assert_eq!(vault.decrypt(&ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn same_plaintext_yields_same_ciphertext() {
        // The IV is derived, not random, so encryption is deterministic.
        let vault = test_vault();
        let first = vault.encrypt("repeatable").unwrap();
        let second = vault.encrypt("repeatable").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_passes_through() {
        let vault = test_vault();
        assert_eq!(vault.encrypt("").unwrap(), "");
        assert_eq!(vault.decrypt("").unwrap(), "");
    }

    #[test]
    fn empty_secret_is_unavailable() {
        assert!(matches!(
            Vault::from_secrets("", "salt"),
            Err(VaultError::Unavailable(_))
        ));
        assert!(matches!(
            Vault::from_secrets("key", ""),
            Err(VaultError::Unavailable(_))
        ));
    }

    #[test]
    fn wrong_key_fails_to_decrypt() {
        let vault = test_vault();
        let other = Vault::from_secrets("different-secret", "secondary-salt").unwrap();
        let ciphertext = vault.encrypt("confidential").unwrap();

        // A different key either fails padding validation or produces
        // garbage that is not the original plaintext.
        match other.decrypt(&ciphertext) {
            Err(VaultError::Decryption(_)) => {}
            Ok(plaintext) => assert_ne!(plaintext, "confidential"),
            Err(other_err) => panic!("unexpected error: {other_err}"),
        }
    }

    #[test]
    fn garbage_ciphertext_is_a_decryption_failure() {
        let vault = test_vault();
        assert!(matches!(
            vault.decrypt("not-base64!!"),
            Err(VaultError::Decryption(_))
        ));
        // Valid base64 that is not AES-block-aligned.
        assert!(matches!(
            vault.decrypt("YWJj"),
            Err(VaultError::Decryption(_))
        ));
    }

    #[test]
    fn json_round_trip_preserves_nested_values() {
        let vault = test_vault();
        let value = json!({
            "credentials": { "api_key": "k", "region": "eu" },
            "categories_sort": [
                { "id": "1", "name": "Pièce à vivre", "order": 0, "excluded": false,
                  "sites": [{ "site_id": "s1", "site_name": "Zimmer 1", "order": 0, "excluded": true }] }
            ]
        });

        let blob = vault.encrypt_json(&value).unwrap();
        let back: serde_json::Value = vault.decrypt_json(&blob).unwrap();
        assert_eq!(back, value);
    }
}
