// SPDX-License-Identifier: MIT OR Apache-2.0

//! Envelope wire format: encoding seals one plaintext towards a list of
//! recipients, decoding recovers it by bounded trial decryption.
//!
//! Layout, byte-exact and unpadded:
//!
//! ```text
//! offset 0         nonce                 16 bytes
//! offset 16        sender public key     32 bytes
//! offset 48        recipient count        1-3 bytes (varint, `c` bytes)
//! offset 48+c      wrapped session keys  32 bytes each, one per recipient
//! offset 48+c+32n  ciphertext || tag     plaintext length + 16 bytes
//! ```
use std::slice;

use thiserror::Error;

use crate::crypto::aead::{AEAD_NONCE_SIZE, AEAD_TAG_SIZE, AeadNonce, aead_decrypt, aead_encrypt};
use crate::crypto::blake2::blake2b_256;
use crate::crypto::ctr::xor_keystream;
use crate::crypto::x25519::{PUBLIC_KEY_SIZE, PublicKey, SecretKey};
use crate::crypto::{Rng, RngError, Secret};
use crate::varint::{CountError, MAX_RECIPIENTS, decode_count, encode_count};

/// 128-bit envelope nonce size.
pub const NONCE_SIZE: usize = 16;

/// 256-bit session key size, which is also the size of every wrapped
/// session key slot.
pub const SESSION_KEY_SIZE: usize = 32;

type Nonce = [u8; NONCE_SIZE];

type SessionKey = Secret<SESSION_KEY_SIZE>;

/// Seals `plaintext` towards every key in `recipients` into a single
/// envelope, readable by each of them independently.
///
/// Recipient order fixes slot order; duplicates simply occupy extra slots.
/// An empty recipient list encrypts towards the sender's own public key.
pub fn encrypt(
    plaintext: &[u8],
    secret_key: &SecretKey,
    recipients: &[PublicKey],
    rng: &Rng,
) -> Result<Vec<u8>, EncryptError> {
    let own_public_key = secret_key.public_key();
    let recipients = if recipients.is_empty() {
        slice::from_ref(&own_public_key)
    } else {
        recipients
    };
    if recipients.len() > MAX_RECIPIENTS {
        return Err(EncryptError::TooManyRecipients(recipients.len()));
    }

    let nonce: Nonce = rng.random_array()?;
    // Dropped, and with it zeroised, when this call returns.
    let session_key = SessionKey::from_bytes(rng.random_array()?);

    let (count, count_len) = encode_count(recipients.len() as u16);

    let mut out = Vec::with_capacity(
        NONCE_SIZE
            + PUBLIC_KEY_SIZE
            + count_len
            + SESSION_KEY_SIZE * recipients.len()
            + plaintext.len()
            + AEAD_TAG_SIZE,
    );
    out.extend_from_slice(&nonce);
    out.extend_from_slice(own_public_key.as_bytes());
    out.extend_from_slice(&count[..count_len]);

    for (index, recipient) in recipients.iter().enumerate() {
        let shared_key = derive_shared_key(secret_key, recipient);
        let mut wrapped = *session_key.as_bytes();
        xor_keystream(&shared_key, &slot_iv(&nonce, index as u32), &mut wrapped);
        out.extend_from_slice(&wrapped);
    }

    let sealed = aead_encrypt(session_key.as_bytes(), plaintext, &aead_nonce(&nonce))
        .map_err(|_| EncryptError::Unexpected)?;
    out.extend_from_slice(&sealed);

    Ok(out)
}

/// Opens an envelope with one recipient's secret key.
///
/// The envelope does not say which slot belongs to whom, so every slot is
/// tried in order: unwrap the candidate session key, attempt to open the
/// ciphertext, and return on the first slot whose tag authenticates. All
/// failures to find such a slot collapse into the single opaque
/// [`DecryptError::FailedToDecrypt`].
pub fn decrypt(envelope: &[u8], secret_key: &SecretKey) -> Result<Vec<u8>, DecryptError> {
    let (nonce, sender_public_key, recipients, mut offset) = decode_header(envelope)?;

    let slots_len = SESSION_KEY_SIZE
        .checked_mul(recipients)
        .ok_or(DecryptError::Malformed)?;
    let ciphertext = envelope
        .get(offset + slots_len..)
        .ok_or(DecryptError::Malformed)?;

    // The agreement only involves our key and the sender's, not the slot
    // index, so one derivation serves every trial.
    let shared_key = derive_shared_key(secret_key, &sender_public_key);

    for index in 0..recipients {
        let mut candidate = [0u8; SESSION_KEY_SIZE];
        candidate.copy_from_slice(&envelope[offset..offset + SESSION_KEY_SIZE]);
        xor_keystream(&shared_key, &slot_iv(&nonce, index as u32), &mut candidate);
        let candidate = SessionKey::from_bytes(candidate);

        if let Ok(plaintext) =
            aead_decrypt(candidate.as_bytes(), ciphertext, &aead_nonce(&nonce))
        {
            return Ok(plaintext);
        }

        offset += SESSION_KEY_SIZE;
    }

    Err(DecryptError::FailedToDecrypt)
}

/// Parses the fixed header, returning the nonce, the sender's public key,
/// the recipient count and the offset of the first slot.
fn decode_header(envelope: &[u8]) -> Result<(Nonce, PublicKey, usize, usize), DecryptError> {
    let nonce: Nonce = envelope
        .get(..NONCE_SIZE)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(DecryptError::Malformed)?;
    let sender_public_key: [u8; PUBLIC_KEY_SIZE] = envelope
        .get(NONCE_SIZE..NONCE_SIZE + PUBLIC_KEY_SIZE)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(DecryptError::Malformed)?;

    let offset = NONCE_SIZE + PUBLIC_KEY_SIZE;
    let (recipients, count_len) = decode_count(&envelope[offset..])?;

    Ok((
        nonce,
        PublicKey::from_bytes(sender_public_key),
        recipients as usize,
        offset + count_len,
    ))
}

/// Derives the symmetric wrap key shared between one secret key and one
/// peer public key: BLAKE2b-256 over the raw X25519 agreement, never the
/// raw agreement itself.
fn derive_shared_key(secret_key: &SecretKey, their_public: &PublicKey) -> [u8; 32] {
    blake2b_256(&[&secret_key.calculate_agreement(their_public)])
}

/// Initialisation vector for the session-key wrap at slot `index`: the
/// first four nonce bytes XORed with the little-endian index, the rest of
/// the nonce unchanged.
///
/// Keeps wrapped keys distinguishable per slot even when two slots share a
/// wrap key, which the trial-decryption loop depends on: with one IV per
/// envelope, duplicate recipients would unwrap each other's slots.
fn slot_iv(nonce: &Nonce, index: u32) -> Nonce {
    let mut iv = *nonce;
    for (iv_byte, index_byte) in iv.iter_mut().zip(index.to_le_bytes()) {
        *iv_byte ^= index_byte;
    }
    iv
}

/// The AEAD uses the low-order 12 bytes of the envelope nonce.
fn aead_nonce(nonce: &Nonce) -> AeadNonce {
    let mut out = [0u8; AEAD_NONCE_SIZE];
    out.copy_from_slice(&nonce[..AEAD_NONCE_SIZE]);
    out
}

#[derive(Debug, Error)]
pub enum EncryptError {
    /// The random source failed to produce the nonce or session key.
    #[error(transparent)]
    Rng(#[from] RngError),

    /// More recipients than the count field can represent.
    #[error("{0} recipients exceed the envelope maximum of {MAX_RECIPIENTS}")]
    TooManyRecipients(usize),

    /// Cipher construction failed. Keys are correctly sized by
    /// construction, so this is unreachable short of a library defect.
    #[error("unexpected cipher failure")]
    Unexpected,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecryptError {
    /// Header offsets run past the end of the envelope, or the recipient
    /// count field overflows its budget.
    #[error("malformed envelope")]
    Malformed,

    /// No slot authenticated the ciphertext. Deliberately does not say
    /// whether the key was wrong, the envelope was tampered with or the
    /// caller was never a recipient.
    #[error("failed to decrypt")]
    FailedToDecrypt,
}

impl From<CountError> for DecryptError {
    fn from(_: CountError) -> Self {
        DecryptError::Malformed
    }
}
