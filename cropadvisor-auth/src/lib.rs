//! Credential storage and session authentication for the crop advisor.
//!
//! Provides:
//! - Password digests (SHA-256 hex, optional Argon2id for new records)
//! - A flat-file credential store with atomic replacement
//! - An in-memory session manager keyed by opaque cookie tokens
//! - The signup / login / logout flow tying the two together

use argon2::{
    password_hash::{
        rand_core::{OsRng, RngCore},
        PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use cropadvisor_config::PasswordSchemeName;
use sha2::{Digest, Sha256};
use thiserror::Error;

pub mod flow;
pub mod session;
pub mod store;

pub use flow::{AuthFlow, AuthFlowError, LoginOutcome};
pub use session::{Session, SessionManager, SessionOptions, DEFAULT_LANGUAGE};
pub use store::{CredentialStore, Credentials, StoreError};

// ============================================================================
// Errors
// ============================================================================

/// Password-related errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    HashingFailed(String),
    #[error("unknown password scheme: {0}")]
    UnknownScheme(String),
}

// ============================================================================
// Digests
// ============================================================================

/// Length of a SHA-256 hex digest.
pub const SHA256_HEX_LENGTH: usize = 64;

const ARGON2_PREFIX: &str = "$argon2";

/// Compute SHA-256 of the input and return it as a lowercase hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Deterministic one-way digest used for the credential file.
#[inline]
pub fn hash_password(plaintext: &str) -> String {
    sha256_hex(plaintext)
}

/// Check whether a stored value looks like a SHA-256 hex digest.
#[inline]
pub fn is_sha256_digest(stored: &str) -> bool {
    stored.len() == SHA256_HEX_LENGTH && stored.chars().all(|c| c.is_ascii_hexdigit())
}

/// Verify a plaintext password against a stored record of either format.
pub fn verify_password(plaintext: &str, stored: &str) -> bool {
    if stored.starts_with(ARGON2_PREFIX) {
        return Argon2Hasher::new().verify(plaintext, stored);
    }
    is_sha256_digest(stored) && hash_password(plaintext).eq_ignore_ascii_case(stored)
}

/// Generate a cryptographically secure random token as hex string.
pub fn generate_token() -> String {
    let mut buf = [0u8; 32];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

// ============================================================================
// Argon2
// ============================================================================

/// Password hasher using Argon2id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argon2Hasher {
    /// Memory cost in KiB (default: 19456 = 19 MiB)
    m_cost: u32,
    t_cost: u32,
    p_cost: u32,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        // OWASP recommended minimum parameters for Argon2id
        Self {
            m_cost: 19456,
            t_cost: 2,
            p_cost: 1,
        }
    }
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure memory cost in KiB.
    pub fn with_memory_cost(mut self, kib: u32) -> Self {
        self.m_cost = kib;
        self
    }

    /// Configure time cost (iterations).
    pub fn with_time_cost(mut self, iterations: u32) -> Self {
        self.t_cost = iterations;
        self
    }

    fn argon2(&self) -> Result<Argon2<'static>, PasswordError> {
        let params = argon2::Params::new(self.m_cost, self.t_cost, self.p_cost, None)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;
        Ok(Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            params,
        ))
    }

    /// Hash a password, returning the PHC-format hash string.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored PHC-format hash.
    ///
    /// Parameters are read from the PHC string, so records hashed with other
    /// cost settings still verify.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored_hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

// ============================================================================
// Scheme selection
// ============================================================================

/// Digest scheme applied to newly created credential records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PasswordScheme {
    /// Plain SHA-256 hex digest, the historical file format.
    #[default]
    Sha256,
    Argon2(Argon2Hasher),
}

impl PasswordScheme {
    /// Resolve a scheme from its configuration name.
    pub fn from_name(name: &str) -> Result<Self, PasswordError> {
        match PasswordSchemeName::parse(name) {
            Some(PasswordSchemeName::Sha256) => Ok(Self::Sha256),
            Some(PasswordSchemeName::Argon2) => Ok(Self::Argon2(Argon2Hasher::new())),
            None => Err(PasswordError::UnknownScheme(name.trim().to_string())),
        }
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        match self {
            Self::Sha256 => Ok(hash_password(plaintext)),
            Self::Argon2(hasher) => hasher.hash(plaintext),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_digest_is_stable() {
        let a = hash_password("pw1");
        let b = hash_password("pw1");
        assert_eq!(a, b);
        assert_eq!(a.len(), SHA256_HEX_LENGTH);
        assert_ne!(a, hash_password("pw2"));
        // Known vector for the empty string.
        assert_eq!(
            hash_password(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn verify_accepts_both_formats() {
        let sha = hash_password("hunter2");
        assert!(verify_password("hunter2", &sha));
        assert!(verify_password("hunter2", &sha.to_uppercase()));
        assert!(!verify_password("hunter3", &sha));

        let hasher = Argon2Hasher::new().with_memory_cost(1024).with_time_cost(1);
        let phc = hasher.hash("hunter2").expect("hash");
        assert!(phc.starts_with("$argon2id$"));
        assert!(verify_password("hunter2", &phc));
        assert!(!verify_password("hunter3", &phc));
    }

    #[test]
    fn verify_rejects_garbage_records() {
        assert!(!verify_password("x", "not-a-digest"));
        assert!(!verify_password("x", "$argon2id$broken"));
        assert!(!verify_password("", ""));
    }

    #[test]
    fn scheme_from_name() {
        assert_eq!(PasswordScheme::from_name("SHA256"), Ok(PasswordScheme::Sha256));
        assert!(matches!(
            PasswordScheme::from_name("argon2"),
            Ok(PasswordScheme::Argon2(_))
        ));
        assert!(matches!(
            PasswordScheme::from_name(" Argon2ID "),
            Ok(PasswordScheme::Argon2(_))
        ));
        assert!(matches!(
            PasswordScheme::from_name("md5"),
            Err(PasswordError::UnknownScheme(_))
        ));
    }

    #[test]
    fn tokens_are_random_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
