//! Argon2 password hashing.
//!
//! Hashing is CPU bound, so both operations run on tokio's blocking pool.
//!
//! Accounts carried over from the old key-value store hold bcrypt hashes
//! (`$2a$...`). Those are not verified here: they never match, a warning is
//! logged, and an admin password reset moves the account to Argon2.

use anyhow::Result;
use rand::RngCore;
use tracing::warn;

const SALT_LEN: usize = 16;

/// True for bcrypt hashes in any of the `$2a$`, `$2b$`, `$2x$` or `$2y$` forms
pub fn is_legacy_bcrypt(encoded_hash: &str) -> bool {
    matches!(
        encoded_hash.get(..4),
        Some("$2a$") | Some("$2b$") | Some("$2x$") | Some("$2y$")
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    mem_cost: u32,
    time_cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        // argon2id recommended minimums: 19 MiB, two passes
        Self {
            mem_cost: 19 * 1024,
            time_cost: 2,
        }
    }
}

impl PasswordHasher {
    pub fn new(mem_cost: u32, time_cost: u32) -> Self {
        Self { mem_cost, time_cost }
    }

    /// Cheap parameters for tests
    #[cfg(test)]
    pub fn fast() -> Self {
        Self::new(64, 1)
    }

    pub async fn hash(&self, password: &str) -> Result<String> {
        let hasher = *self;
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash_blocking(&password)).await?
    }

    /// `false` for a wrong password, a legacy bcrypt hash and a malformed
    /// stored hash
    pub async fn verify(&self, encoded_hash: &str, password: &str) -> Result<bool> {
        if is_legacy_bcrypt(encoded_hash) {
            warn!("Stored password hash is legacy bcrypt; the account needs a password reset");
            return Ok(false);
        }

        let encoded_hash = encoded_hash.to_owned();
        let password = password.to_owned();
        let matches = tokio::task::spawn_blocking(move || {
            argon2::verify_encoded(&encoded_hash, password.as_bytes()).unwrap_or_else(|e| {
                warn!("Unreadable stored password hash: {}", e);
                false
            })
        })
        .await?;
        Ok(matches)
    }

    fn hash_blocking(&self, password: &str) -> Result<String> {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);

        let config = argon2::Config {
            variant: argon2::Variant::Argon2id,
            mem_cost: self.mem_cost,
            time_cost: self.time_cost,
            ..argon2::Config::default()
        };
        Ok(argon2::hash_encoded(password.as_bytes(), &salt, &config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hasher = PasswordHasher::fast();

        let hash = hasher.hash("secret1").await.unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(&hash, "secret1").await.unwrap());
        assert!(!hasher.verify(&hash, "secret2").await.unwrap());
    }

    #[tokio::test]
    async fn test_same_password_gets_different_salts() {
        let hasher = PasswordHasher::fast();

        let first = hasher.hash("secret1").await.unwrap();
        let second = hasher.hash("secret1").await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_legacy_bcrypt_hash_never_matches() {
        let hasher = PasswordHasher::fast();
        let bcrypt = "$2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";

        assert!(is_legacy_bcrypt(bcrypt));
        assert!(!is_legacy_bcrypt("$argon2id$v=19$m=64,t=1,p=1$c2FsdA$aGFzaA"));
        assert!(!hasher.verify(bcrypt, "password").await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hash_never_matches() {
        let hasher = PasswordHasher::fast();
        assert!(!hasher.verify("plaintext", "plaintext").await.unwrap());
    }
}
