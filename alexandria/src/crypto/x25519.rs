// SPDX-License-Identifier: MIT OR Apache-2.0

//! X25519 elliptic-curve Diffie-Hellman key agreement and the base58 text
//! form of both key halves.
use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use x25519_dalek::StaticSecret;

use crate::crypto::secret::Secret;
use crate::crypto::{Rng, RngError};

/// 256-bit secret key size.
pub const SECRET_KEY_SIZE: usize = 32;

/// 256-bit public key size.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Secret Curve25519 scalar.
///
/// Never serialized implicitly; exporting the raw or base58 form is always
/// an explicit method call by the holder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretKey(Secret<SECRET_KEY_SIZE>);

impl SecretKey {
    /// Generates a fresh secret key, drawing exactly 32 bytes from `rng`.
    pub fn generate(rng: &Rng) -> Result<Self, RngError> {
        Ok(Self::from_bytes(rng.random_array()?))
    }

    /// Key from raw bytes. Clamping happens inside the curve operations, so
    /// any 32 bytes form a usable key.
    pub fn from_bytes(bytes: [u8; SECRET_KEY_SIZE]) -> Self {
        Self(Secret::from_bytes(bytes))
    }

    /// Key from its base58 text form.
    pub fn from_base58(value: &str) -> Result<Self, KeyDecodeError> {
        Ok(Self(Secret::from_bytes(decode_base58(value)?)))
    }

    /// Exports the raw scalar bytes.
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_SIZE] {
        *self.0.as_bytes()
    }

    /// Exports the base58 text form.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0.as_bytes()).into_string()
    }

    /// Derives the public counterpart by multiplying the curve base point
    /// with this scalar. Pure and infallible.
    pub fn public_key(&self) -> PublicKey {
        let secret = StaticSecret::from(*self.0.as_bytes());
        PublicKey(x25519_dalek::PublicKey::from(&secret).to_bytes())
    }

    /// Raw X25519 shared secret between this key and a peer's public key.
    ///
    /// Symmetric in its inputs. The raw output is biased and must be run
    /// through a key derivation step before use as a cipher key; low-order
    /// peer points are not rejected here.
    pub(crate) fn calculate_agreement(
        &self,
        their_public: &PublicKey,
    ) -> [u8; SECRET_KEY_SIZE] {
        let secret = StaticSecret::from(*self.0.as_bytes());
        let their_public = x25519_dalek::PublicKey::from(their_public.0);
        secret.diffie_hellman(&their_public).to_bytes()
    }
}

impl FromStr for SecretKey {
    type Err = KeyDecodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_base58(value)
    }
}

/// Public Curve25519 point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PublicKey([u8; PUBLIC_KEY_SIZE]);

impl PublicKey {
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Key from its base58 text form.
    pub fn from_base58(value: &str) -> Result<Self, KeyDecodeError> {
        Ok(Self(decode_base58(value)?))
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; PUBLIC_KEY_SIZE] {
        self.0
    }

    pub fn to_base58(self) -> String {
        bs58::encode(&self.0).into_string()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl FromStr for PublicKey {
    type Err = KeyDecodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_base58(value)
    }
}

fn decode_base58(value: &str) -> Result<[u8; 32], KeyDecodeError> {
    if value.is_empty() {
        return Err(KeyDecodeError::Empty);
    }
    let bytes = bs58::decode(value).into_vec()?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| KeyDecodeError::Length(len))
}

#[derive(Debug, Error)]
pub enum KeyDecodeError {
    #[error("empty key")]
    Empty,

    #[error("invalid key encoding: {0}")]
    Encoding(#[from] bs58::decode::Error),

    #[error("invalid key length {0}, expected 32 bytes")]
    Length(usize),
}
