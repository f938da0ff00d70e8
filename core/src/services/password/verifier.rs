use std::sync::Arc;

use constant_time_eq::constant_time_eq;
use once_cell::sync::OnceCell;
use sha2::{Digest, Sha256};

use crate::errors::DomainError;

pub const DEFAULT_BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];
const LEGACY_HEX_LEN: usize = 64;

/// Plaintext behind the hash checked when no account matches
const DUMMY_PASSWORD: &str = "sg-dummy-password";

/// Outcome of a password check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordMatch {
    pub matched: bool,
    /// The stored value used the legacy SHA-256 format
    pub is_legacy: bool,
}

impl PasswordMatch {
    /// A matched legacy hash should be rewritten as bcrypt
    pub fn needs_upgrade(&self) -> bool {
        self.matched && self.is_legacy
    }
}

/// bcrypt verifier that also accepts hex SHA-256 digests from the old schema
///
/// bcrypt work runs on the blocking pool so it never stalls the reactor.
#[derive(Debug, Clone)]
pub struct PasswordVerifier {
    cost: u32,
    /// bcrypt hash of [`DUMMY_PASSWORD`] at `cost`, built on first use
    dummy_hash: Arc<OnceCell<String>>,
}

impl Default for PasswordVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl PasswordVerifier {
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Check `plaintext` against a stored bcrypt or legacy hash.
    /// Unrecognised or malformed stored values never match.
    pub async fn verify(&self, plaintext: &str, stored_hash: &str) -> Result<PasswordMatch, DomainError> {
        let stored = stored_hash.trim();

        if BCRYPT_PREFIXES.iter().any(|p| stored.starts_with(p)) {
            let plaintext = plaintext.to_string();
            let stored = stored.to_string();
            let matched = tokio::task::spawn_blocking(move || {
                bcrypt::verify(plaintext, &stored).unwrap_or(false)
            })
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("password verification task failed: {}", e),
            })?;
            return Ok(PasswordMatch {
                matched,
                is_legacy: false,
            });
        }

        if is_legacy_hash(stored) {
            let matched = hex::decode(stored)
                .map(|expected| constant_time_eq(&Sha256::digest(plaintext.as_bytes()), &expected))
                .unwrap_or(false);
            return Ok(PasswordMatch {
                matched,
                is_legacy: true,
            });
        }

        Ok(PasswordMatch {
            matched: false,
            is_legacy: false,
        })
    }

    /// Run one full bcrypt verification against a fixed hash
    ///
    /// Used when the phone has no account, so that branch costs the same
    /// as a wrong password.
    pub async fn verify_dummy(&self, plaintext: &str) -> Result<(), DomainError> {
        let plaintext = plaintext.to_string();
        let dummy_hash = Arc::clone(&self.dummy_hash);
        let cost = self.cost;
        tokio::task::spawn_blocking(move || {
            let hash = dummy_hash.get_or_try_init(|| bcrypt::hash(DUMMY_PASSWORD, cost))?;
            bcrypt::verify(plaintext, hash).map(|_| ())
        })
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("password verification task failed: {}", e),
        })?
        .map_err(|e| DomainError::Internal {
            message: format!("password verification failed: {}", e),
        })
    }

    /// Whether [`verify_dummy`](Self::verify_dummy) has run on this verifier or a clone
    #[cfg(test)]
    pub(crate) fn dummy_checked(&self) -> bool {
        self.dummy_hash.get().is_some()
    }

    /// Produce a bcrypt hash for storage
    pub async fn hash(&self, plaintext: &str) -> Result<String, DomainError> {
        let plaintext = plaintext.to_string();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("password hashing task failed: {}", e),
            })?
            .map_err(|e| DomainError::Internal {
                message: format!("password hashing failed: {}", e),
            })
    }
}

fn is_legacy_hash(stored: &str) -> bool {
    stored.len() == LEGACY_HEX_LEN && stored.chars().all(|c| c.is_ascii_hexdigit())
}

/// Hex SHA-256 of the plaintext, the pre-bcrypt storage format
pub fn legacy_digest(plaintext: &str) -> String {
    hex::encode(Sha256::digest(plaintext.as_bytes()))
}
