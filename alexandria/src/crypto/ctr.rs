// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256 in counter mode, used to wrap session keys per recipient.
use aes::Aes256;
use ctr::Ctr128BE;
use ctr::cipher::{KeyIvInit, StreamCipher};

/// 256-bit key size.
pub const CTR_KEY_SIZE: usize = 32;

/// 128-bit initialisation vector size (one AES block).
pub const CTR_IV_SIZE: usize = 16;

type Aes256Ctr = Ctr128BE<Aes256>;

/// XORs the AES-CTR keystream for `key`/`iv` into `buf` in place.
///
/// Counter mode is its own inverse: applying the same keystream twice
/// restores the original bytes, so this single function both wraps and
/// unwraps.
pub fn xor_keystream(key: &[u8; CTR_KEY_SIZE], iv: &[u8; CTR_IV_SIZE], buf: &mut [u8]) {
    let mut cipher = Aes256Ctr::new(key.into(), iv.into());
    cipher.apply_keystream(buf);
}

#[cfg(test)]
mod tests {
    use crate::crypto::Rng;

    use super::xor_keystream;

    #[test]
    fn keystream_is_an_involution() {
        let rng = Rng::from_seed([4; 32]);

        let key = rng.random_array().unwrap();
        let iv = rng.random_array().unwrap();

        let mut buf = *b"thirty-two bytes of session key!";
        xor_keystream(&key, &iv, &mut buf);
        assert_ne!(&buf, b"thirty-two bytes of session key!");

        xor_keystream(&key, &iv, &mut buf);
        assert_eq!(&buf, b"thirty-two bytes of session key!");
    }

    #[test]
    fn distinct_ivs_give_distinct_keystreams() {
        let rng = Rng::from_seed([5; 32]);

        let key = rng.random_array().unwrap();
        let iv_1 = rng.random_array().unwrap();
        let iv_2 = rng.random_array().unwrap();

        let mut buf_1 = [0u8; 32];
        let mut buf_2 = [0u8; 32];
        xor_keystream(&key, &iv_1, &mut buf_1);
        xor_keystream(&key, &iv_2, &mut buf_2);

        assert_ne!(buf_1, buf_2);
    }
}
