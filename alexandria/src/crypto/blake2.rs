// SPDX-License-Identifier: MIT OR Apache-2.0

//! BLAKE2b hashing functions.
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// 256-bit digest size.
pub const BLAKE2B_256_DIGEST_SIZE: usize = 32;

/// BLAKE2b-256 hashing function.
pub fn blake2b_256(messages: &[&[u8]]) -> [u8; BLAKE2B_256_DIGEST_SIZE] {
    let mut hasher = Blake2b256::new();
    for message in messages {
        hasher.update(message);
    }
    hasher.finalize().into()
}
