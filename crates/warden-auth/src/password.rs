//! Credential hashing.
//!
//! Secrets are the lowercase hex SHA-512 digest of the plaintext. The
//! digest is unsalted and deterministic: the same password always
//! yields the same secret, which is what lets login compare secrets by
//! equality in the store. Unsalted digests are open to precomputation
//! attacks; moving to a salted KDF means switching login to a
//! fetch-then-verify flow.

use sha2::{Digest, Sha512};

/// Hash a plaintext password into its stored representation
/// (128 hex characters).
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
