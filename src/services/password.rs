//! Password hashing with argon2.
//!
//! Hashes are stored in PHC string format, which embeds the salt and
//! parameters, so verification needs nothing but the stored string.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|err| anyhow!("{}", err))?
        .to_string();
    Ok(hash)
}

/// Verify a plaintext password against a stored PHC hash string.
///
/// A malformed stored hash verifies as false rather than erroring; the
/// caller only needs a yes/no.
pub fn verify_password(plain: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
