// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM authenticated encryption with 256-bit key, 96-bit nonce and
//! 128-bit tag appended to the ciphertext.
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use thiserror::Error;

/// 256-bit key size.
pub const AEAD_KEY_SIZE: usize = 32;

/// 96-bit nonce size.
pub const AEAD_NONCE_SIZE: usize = 12;

/// 128-bit authentication tag size.
pub const AEAD_TAG_SIZE: usize = 16;

pub type AeadKey = [u8; AEAD_KEY_SIZE];

pub type AeadNonce = [u8; AEAD_NONCE_SIZE];

/// Seals a plaintext, returning the ciphertext with the tag appended.
pub fn aead_encrypt(
    key: &AeadKey,
    plaintext: &[u8],
    nonce: &AeadNonce,
) -> Result<Vec<u8>, AeadError> {
    Aes256Gcm::new(key.into())
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| AeadError::Encrypt)
}

/// Opens a ciphertext with appended tag. Fails whenever the key, nonce,
/// ciphertext or tag do not match the sealing call.
pub fn aead_decrypt(
    key: &AeadKey,
    ciphertext_tag: &[u8],
    nonce: &AeadNonce,
) -> Result<Vec<u8>, AeadError> {
    Aes256Gcm::new(key.into())
        .decrypt(Nonce::from_slice(nonce), ciphertext_tag)
        .map_err(|_| AeadError::Decrypt)
}

#[derive(Debug, Error)]
pub enum AeadError {
    #[error("could not encrypt with aead")]
    Encrypt,

    #[error("could not decrypt with aead")]
    Decrypt,
}

#[cfg(test)]
mod tests {
    use crate::crypto::Rng;

    use super::{AEAD_TAG_SIZE, AeadKey, AeadNonce, aead_decrypt, aead_encrypt};

    #[test]
    fn encrypt_decrypt() {
        let rng = Rng::from_seed([1; 32]);

        let key: AeadKey = rng.random_array().unwrap();
        let nonce: AeadNonce = rng.random_array().unwrap();

        let ciphertext = aead_encrypt(&key, b"Hello World", &nonce).unwrap();
        assert_eq!(ciphertext.len(), b"Hello World".len() + AEAD_TAG_SIZE);

        let plaintext = aead_decrypt(&key, &ciphertext, &nonce).unwrap();
        assert_eq!(plaintext, b"Hello World");
    }

    #[test]
    fn wrong_key_or_nonce_fails() {
        let rng = Rng::from_seed([2; 32]);

        let key: AeadKey = rng.random_array().unwrap();
        let nonce: AeadNonce = rng.random_array().unwrap();
        let ciphertext = aead_encrypt(&key, b"Hello World", &nonce).unwrap();

        let other_key: AeadKey = rng.random_array().unwrap();
        let other_nonce: AeadNonce = rng.random_array().unwrap();
        assert!(aead_decrypt(&other_key, &ciphertext, &nonce).is_err());
        assert!(aead_decrypt(&key, &ciphertext, &other_nonce).is_err());
    }

    #[test]
    fn truncated_ciphertext_fails() {
        let rng = Rng::from_seed([3; 32]);

        let key: AeadKey = rng.random_array().unwrap();
        let nonce: AeadNonce = rng.random_array().unwrap();
        let ciphertext = aead_encrypt(&key, b"Hello World", &nonce).unwrap();

        assert!(aead_decrypt(&key, &ciphertext[..AEAD_TAG_SIZE - 1], &nonce).is_err());
        assert!(aead_decrypt(&key, &[], &nonce).is_err());
    }
}
