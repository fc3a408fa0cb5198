//! Payload Encryption
//!
//! Encrypts serialized records under a freshly generated 256-bit key.
//!
//! Two modes are supported:
//! - `aes-256-cbc-zero-iv` (default): AES-256-CBC, PKCS#7 padding, sixteen
//!   zero bytes as IV. Ciphertext is the raw CBC output.
//! - `aes-256-gcm`: AES-256-GCM, random 96-bit nonce prepended to the
//!   ciphertext and tag.
//!
//! The default mode is a compatibility contract, not a security
//! recommendation. A constant IV makes encryption deterministic per key, and
//! the key is handed back in the same payload as the ciphertext, so no
//! confidentiality holds between the producer and whoever receives the
//! payload. CBC also carries no integrity protection.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Key length in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// CBC IV length in bytes
pub const IV_LEN: usize = 16;

/// GCM nonce length in bytes
pub const NONCE_LEN: usize = 12;

/// The IV used by every CBC encryption
const ZERO_IV: [u8; IV_LEN] = [0u8; IV_LEN];

/// Cipher errors
#[derive(Error, Debug)]
pub enum CipherError {
    /// Key has the wrong length or encoding
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Ciphertext is not valid hex
    #[error("Invalid ciphertext encoding: {0}")]
    Encoding(String),

    /// Encryption failed
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Decryption failed (bad padding, bad tag, truncated input)
    #[error("Decryption error: {0}")]
    Decryption(String),
}

/// Result type for cipher operations
pub type Result<T> = std::result::Result<T, CipherError>;

/// Block cipher mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CipherMode {
    /// AES-256-CBC with an all-zero IV
    #[default]
    #[serde(rename = "aes-256-cbc-zero-iv")]
    Aes256CbcZeroIv,

    /// AES-256-GCM with a random nonce
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
}

/// Ciphertext and key, both hex encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedPayload {
    /// Hex ciphertext
    pub encrypted_data: String,

    /// Hex key
    pub key: String,
}

/// Payload cipher
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadCipher {
    mode: CipherMode,
}

impl PayloadCipher {
    /// Create a cipher for the given mode
    pub fn new(mode: CipherMode) -> Self {
        if mode == CipherMode::Aes256CbcZeroIv {
            warn!("Payload cipher uses AES-256-CBC with a fixed zero IV; keys are returned with ciphertext");
        }
        Self { mode }
    }

    /// Mode in use
    pub fn mode(&self) -> CipherMode {
        self.mode
    }

    /// Encrypt `plaintext` under a fresh random key
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<EncryptedPayload> {
        let key: [u8; KEY_LEN] = rand::random();
        let ciphertext = self.encrypt_with_key(&key, plaintext)?;

        Ok(EncryptedPayload {
            encrypted_data: hex::encode(ciphertext),
            key: hex::encode(key),
        })
    }

    /// Decrypt a payload produced by [`PayloadCipher::encrypt`]
    pub fn decrypt(&self, payload: &EncryptedPayload) -> Result<Vec<u8>> {
        let key_bytes =
            hex::decode(&payload.key).map_err(|e| CipherError::InvalidKey(e.to_string()))?;
        let key: [u8; KEY_LEN] = key_bytes.as_slice().try_into().map_err(|_| {
            CipherError::InvalidKey(format!(
                "expected {} bytes, got {}",
                KEY_LEN,
                key_bytes.len()
            ))
        })?;

        let ciphertext = hex::decode(&payload.encrypted_data)
            .map_err(|e| CipherError::Encoding(e.to_string()))?;

        self.decrypt_with_key(&key, &ciphertext)
    }

    /// Encrypt under a caller-supplied key
    pub fn encrypt_with_key(&self, key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
        match self.mode {
            CipherMode::Aes256CbcZeroIv => {
                let encryptor = Aes256CbcEnc::new_from_slices(key, &ZERO_IV)
                    .map_err(|e| CipherError::InvalidKey(e.to_string()))?;
                Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
            }
            CipherMode::Aes256Gcm => {
                let cipher = Aes256Gcm::new_from_slice(key)
                    .map_err(|e| CipherError::InvalidKey(e.to_string()))?;
                let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

                let encrypted = cipher
                    .encrypt(&nonce, plaintext)
                    .map_err(|e| CipherError::Encryption(e.to_string()))?;

                // Prepend nonce
                let mut data = Vec::with_capacity(NONCE_LEN + encrypted.len());
                data.extend_from_slice(&nonce);
                data.extend_from_slice(&encrypted);
                Ok(data)
            }
        }
    }

    /// Decrypt under a caller-supplied key
    pub fn decrypt_with_key(&self, key: &[u8; KEY_LEN], ciphertext: &[u8]) -> Result<Vec<u8>> {
        match self.mode {
            CipherMode::Aes256CbcZeroIv => {
                let decryptor = Aes256CbcDec::new_from_slices(key, &ZERO_IV)
                    .map_err(|e| CipherError::InvalidKey(e.to_string()))?;
                decryptor
                    .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                    .map_err(|e| CipherError::Decryption(e.to_string()))
            }
            CipherMode::Aes256Gcm => {
                if ciphertext.len() < NONCE_LEN {
                    return Err(CipherError::Decryption(
                        "Invalid encrypted data".to_string(),
                    ));
                }

                let cipher = Aes256Gcm::new_from_slice(key)
                    .map_err(|e| CipherError::InvalidKey(e.to_string()))?;
                let nonce = Nonce::from_slice(&ciphertext[..NONCE_LEN]);

                cipher
                    .decrypt(nonce, &ciphertext[NONCE_LEN..])
                    .map_err(|e| CipherError::Decryption(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cbc_round_trip() {
        let cipher = PayloadCipher::new(CipherMode::Aes256CbcZeroIv);
        let plaintext = br#"{"transactionId":"TXN123456789","amount":250}"#;

        let payload = cipher.encrypt(plaintext).unwrap();
        assert_eq!(payload.key.len(), KEY_LEN * 2);
        // PKCS#7 always pads to the next full block
        assert_eq!(payload.encrypted_data.len() % (IV_LEN * 2), 0);

        let decrypted = cipher.decrypt(&payload).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_cbc_zero_iv_is_deterministic_per_key() {
        let cipher = PayloadCipher::new(CipherMode::Aes256CbcZeroIv);
        let key = [7u8; KEY_LEN];

        let first = cipher.encrypt_with_key(&key, b"same plaintext").unwrap();
        let second = cipher.encrypt_with_key(&key, b"same plaintext").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_cbc_matches_reference_vector() {
        // AES-256-CBC, key = 0x00..00, IV = 0x00..00, plaintext = 16 zero bytes.
        // First block is AES-256(0^32, 0^16); the second block is the full
        // PKCS#7 padding block.
        let cipher = PayloadCipher::new(CipherMode::Aes256CbcZeroIv);
        let ciphertext = cipher
            .encrypt_with_key(&[0u8; KEY_LEN], &[0u8; 16])
            .unwrap();

        assert_eq!(ciphertext.len(), 32);
        assert_eq!(
            hex::encode(&ciphertext[..16]),
            "dc95c078a2408989ad48a21492842087"
        );
    }

    #[test]
    fn test_fresh_key_per_call() {
        let cipher = PayloadCipher::default();
        let a = cipher.encrypt(b"payload").unwrap();
        let b = cipher.encrypt(b"payload").unwrap();

        assert_ne!(a.key, b.key);
        assert_ne!(a.encrypted_data, b.encrypted_data);
    }

    #[test]
    fn test_gcm_round_trip() {
        let cipher = PayloadCipher::new(CipherMode::Aes256Gcm);
        let payload = cipher.encrypt(b"{\"currency\":\"EUR\"}").unwrap();

        let decrypted = cipher.decrypt(&payload).unwrap();
        assert_eq!(decrypted, b"{\"currency\":\"EUR\"}");
    }

    #[test]
    fn test_gcm_detects_tampering() {
        let cipher = PayloadCipher::new(CipherMode::Aes256Gcm);
        let mut payload = cipher.encrypt(b"amount=250").unwrap();

        let mut bytes = hex::decode(&payload.encrypted_data).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        payload.encrypted_data = hex::encode(bytes);

        assert!(matches!(
            cipher.decrypt(&payload),
            Err(CipherError::Decryption(_))
        ));
    }

    #[test]
    fn test_decrypt_rejects_bad_key() {
        let cipher = PayloadCipher::default();
        let mut payload = cipher.encrypt(b"data").unwrap();

        payload.key = "abcd".to_string();
        assert!(matches!(
            cipher.decrypt(&payload),
            Err(CipherError::InvalidKey(_))
        ));

        payload.key = "not hex".to_string();
        assert!(matches!(
            cipher.decrypt(&payload),
            Err(CipherError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_mode_serde_names() {
        let mode: CipherMode = serde_json::from_str("\"aes-256-gcm\"").unwrap();
        assert_eq!(mode, CipherMode::Aes256Gcm);
        assert_eq!(
            serde_json::to_string(&CipherMode::Aes256CbcZeroIv).unwrap(),
            "\"aes-256-cbc-zero-iv\""
        );
    }
}
