// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Mutex;

use rand_chacha::rand_core::{SeedableRng, TryRngCore};
use thiserror::Error;

/// Cryptographically-secure random number generator based on the ChaCha
/// stream cipher, seeded from the operating system.
///
/// A handle is passed explicitly into every operation which consumes
/// randomness; the crate holds no process-wide generator state.
#[derive(Debug)]
pub struct Rng {
    rng: Mutex<rand_chacha::ChaCha20Rng>,
}

impl Default for Rng {
    fn default() -> Self {
        Self {
            rng: Mutex::new(rand_chacha::ChaCha20Rng::from_os_rng()),
        }
    }
}

#[cfg(any(test, feature = "test_utils"))]
impl Rng {
    /// Deterministic generator for reproducible tests.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            rng: Mutex::new(rand_chacha::ChaCha20Rng::from_seed(seed)),
        }
    }
}

impl Rng {
    /// Fills a fixed-size array with random bytes.
    ///
    /// A short read from the underlying source fails with
    /// [`RngError::InsufficientEntropy`]; partial output is never returned.
    pub fn random_array<const N: usize>(&self) -> Result<[u8; N], RngError> {
        let mut rng = self.rng.lock().map_err(|_| RngError::LockPoisoned)?;
        let mut out = [0u8; N];
        rng.try_fill_bytes(&mut out)
            .map_err(|_| RngError::InsufficientEntropy)?;
        Ok(out)
    }
}

#[derive(Debug, Error)]
pub enum RngError {
    #[error("rng lock is poisoned")]
    LockPoisoned,

    #[error("insufficient random entropy")]
    InsufficientEntropy,
}
