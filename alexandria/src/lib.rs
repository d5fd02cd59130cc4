// SPDX-License-Identifier: MIT OR Apache-2.0

//! `alexandria` seals a message towards any number of recipients inside one
//! self-contained binary envelope.
//!
//! A fresh 32-byte session key encrypts the whole plaintext once with
//! AES-256-GCM. That session key is then wrapped separately for every
//! recipient: an X25519 agreement between the sender's secret key and the
//! recipient's public key is hashed with BLAKE2b-256 into a shared key, and
//! the session key is stream-encrypted (AES-256-CTR) under it. The envelope
//! carries the nonce, the sender's public key, a varint recipient count and
//! one 32-byte wrapped session key per recipient, followed by the sealed
//! ciphertext.
//!
//! Recipients are not told which slot is theirs. Decryption walks the slots
//! in order, unwraps each candidate session key and lets the AEAD tag decide:
//! the first slot that authenticates the ciphertext wins. An envelope
//! therefore never reveals who its recipients are, only how many slots it
//! carries. The sender's public key, in contrast, is visible to anyone
//! holding the envelope.
//!
//! ```
//! use alexandria::{Rng, SecretKey, decrypt, encrypt};
//!
//! let rng = Rng::default();
//!
//! let sender = SecretKey::generate(&rng)?;
//! let recipient = SecretKey::generate(&rng)?;
//!
//! let envelope = encrypt(b"Hello World", &sender, &[recipient.public_key()], &rng)?;
//! let plaintext = decrypt(&envelope, &recipient)?;
//! assert_eq!(plaintext, b"Hello World");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Out of scope: key storage, recipient revocation, forward secrecy beyond
//! the single random session key, and streaming payloads (the plaintext is
//! sealed in one call, held in memory).
mod armor;
mod crypto;
mod envelope;
mod varint;


pub use armor::{ArmorError, armor, dearmor, is_armored};
pub use crypto::rng::{Rng, RngError};
pub use crypto::x25519::{KeyDecodeError, PublicKey, SecretKey};
pub use envelope::{DecryptError, EncryptError, decrypt, encrypt};
