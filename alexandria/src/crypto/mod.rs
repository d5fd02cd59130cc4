// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod aead;
pub mod blake2;
pub mod ctr;
pub mod rng;
mod secret;
pub mod x25519;

pub use rng::{Rng, RngError};
pub use secret::Secret;
