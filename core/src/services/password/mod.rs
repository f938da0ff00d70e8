//! Password verification with transparent legacy-hash upgrade.

mod verifier;

pub use verifier::{legacy_digest, PasswordMatch, PasswordVerifier, DEFAULT_BCRYPT_COST};
