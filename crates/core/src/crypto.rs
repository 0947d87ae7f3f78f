//! Cryptographic utilities.

use rand::{CryptoRng, RngCore};

/// Number of random bytes in a generated nonce.
pub const NONCE_BYTES: usize = 16;

/// Generates a nonce as the lowercase hex encoding of [`NONCE_BYTES`] random bytes from the given
/// cryptographically secure random number generator.
pub fn random_nonce<R: RngCore + CryptoRng>(rng: &mut R) -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    rng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
