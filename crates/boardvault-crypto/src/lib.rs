//! Password-based encryption engine for BoardVault documents.
//!
//! Transforms opaque byte payloads to and from an authenticated ciphertext
//! blob using a password. The engine knows nothing about the data model
//! and performs no I/O; the store hands it serialized documents.
//!
//! # Blob format
//!
//! ```text
//! magic (8) || salt (16) || nonce (12) || AES-256-GCM ciphertext + tag
//! ```
//!
//! The salt is generated fresh for every derived key and stored inside the
//! blob, so identical passwords across workspaces never share a key and
//! the password itself is never persisted anywhere. The magic prefix lets
//! callers distinguish ciphertext from plaintext documents without a
//! password (see [`is_ciphertext`]).
//!
//! Key derivation is PBKDF2-HMAC-SHA256 at 100 000 iterations — slow by
//! construction. Callers are expected to derive once per workspace open or
//! password change and keep the resulting [`SessionKey`] for the session;
//! [`SessionKey::seal`] only pays for a fresh nonce and an AES pass.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, OsRng};
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Marker prefix identifying an encrypted BoardVault blob (format v1).
pub const MAGIC: [u8; 8] = *b"BVENC\x00\x01\x00";

/// PBKDF2 iteration count for key derivation.
pub const KDF_ITERATIONS: u32 = 100_000;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

const HEADER_LEN: usize = MAGIC.len() + SALT_LEN + NONCE_LEN;

/// Errors produced by the encryption engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Decryption failed.
    ///
    /// A wrong password and a corrupted or tampered blob are
    /// indistinguishable after the fact, so they are deliberately
    /// reported as a single error kind.
    #[error("wrong password or corrupt data")]
    WrongPasswordOrCorruptData,

    /// The cipher rejected the plaintext (payload too large).
    #[error("encryption failure")]
    EncryptionFailure,
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, CryptoError>;

/// Returns true if the bytes carry the encrypted-blob magic prefix.
///
/// A cheap structural check: no password or key derivation is needed to
/// decide whether a document requires one.
pub fn is_ciphertext(bytes: &[u8]) -> bool {
    bytes.starts_with(&MAGIC)
}

/// Derives a key from a password and salt.
///
/// Deterministic: the same password and salt always yield the same key.
pub fn derive_key(password: &str, salt: &[u8]) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, KDF_ITERATIONS, &mut key);
    key
}

/// A derived key together with the salt it was derived from.
///
/// Deriving is intentionally slow; a session holds on to this value so
/// that only workspace open and password changes pay the KDF cost, never
/// individual auto-saves. Key material is zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey {
    salt: [u8; SALT_LEN],
    key: [u8; KEY_LEN],
}

impl SessionKey {
    /// Derives a key from the password with a fresh random salt.
    pub fn generate(password: &str) -> Self {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let key = derive_key(password, &salt);
        Self { salt, key }
    }

    /// Re-derives the key for an existing salt.
    pub fn rederive(password: &str, salt: [u8; SALT_LEN]) -> Self {
        let key = derive_key(password, &salt);
        Self { salt, key }
    }

    /// Re-derives the key for the salt embedded in an existing blob.
    ///
    /// Fails if the bytes are not a structurally valid blob.
    pub fn for_blob(password: &str, blob: &[u8]) -> Result<Self> {
        let (salt, _, _) = split_blob(blob)?;
        Ok(Self::rederive(password, salt))
    }

    /// The salt this key was derived from.
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// Encrypts a payload into a self-contained blob.
    ///
    /// A fresh random nonce is generated per call; the salt is the one
    /// this key was derived from.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| CryptoError::EncryptionFailure)?;

        let mut blob = Vec::with_capacity(HEADER_LEN + ciphertext.len());
        blob.extend_from_slice(&MAGIC);
        blob.extend_from_slice(&self.salt);
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);
        Ok(blob)
    }

    /// Decrypts a blob sealed with this key.
    ///
    /// Fails with [`CryptoError::WrongPasswordOrCorruptData`] if the blob
    /// was sealed under a different salt, has been tampered with, or the
    /// password the key was derived from does not match.
    pub fn open(&self, blob: &[u8]) -> Result<Vec<u8>> {
        let (salt, nonce, ciphertext) = split_blob(blob)?;
        if salt != self.salt {
            return Err(CryptoError::WrongPasswordOrCorruptData);
        }
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        cipher
            .decrypt(Nonce::from_slice(&nonce), ciphertext)
            .map_err(|_| CryptoError::WrongPasswordOrCorruptData)
    }
}

impl std::fmt::Debug for SessionKey {
    // key material stays out of logs
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKey").finish_non_exhaustive()
    }
}

/// Encrypts a payload with a password, using a freshly derived key.
pub fn encrypt(plaintext: &[u8], password: &str) -> Result<Vec<u8>> {
    SessionKey::generate(password).seal(plaintext)
}

/// Decrypts a blob with a password.
pub fn decrypt(blob: &[u8], password: &str) -> Result<Vec<u8>> {
    let (plaintext, _) = open(blob, password)?;
    Ok(plaintext)
}

/// Decrypts a blob and returns the derived key alongside the plaintext,
/// so callers can cache it for subsequent [`SessionKey::seal`] calls.
pub fn open(blob: &[u8], password: &str) -> Result<(Vec<u8>, SessionKey)> {
    let key = SessionKey::for_blob(password, blob)?;
    let plaintext = key.open(blob)?;
    Ok((plaintext, key))
}

fn split_blob(blob: &[u8]) -> Result<([u8; SALT_LEN], [u8; NONCE_LEN], &[u8])> {
    if !is_ciphertext(blob) || blob.len() < HEADER_LEN {
        return Err(CryptoError::WrongPasswordOrCorruptData);
    }
    let mut salt = [0u8; SALT_LEN];
    let mut nonce = [0u8; NONCE_LEN];
    salt.copy_from_slice(&blob[MAGIC.len()..MAGIC.len() + SALT_LEN]);
    nonce.copy_from_slice(&blob[MAGIC.len() + SALT_LEN..HEADER_LEN]);
    Ok((salt, nonce, &blob[HEADER_LEN..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &[u8] = br#"{"name":"Alpha","boards":[]}"#;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let blob = encrypt(PAYLOAD, "hunter2").unwrap();

        assert_ne!(blob.as_slice(), PAYLOAD);
        assert_eq!(decrypt(&blob, "hunter2").unwrap(), PAYLOAD);
    }

    #[test]
    fn test_wrong_password_fails() {
        let blob = encrypt(PAYLOAD, "hunter2").unwrap();

        let result = decrypt(&blob, "hunter3");

        assert_eq!(result, Err(CryptoError::WrongPasswordOrCorruptData));
    }

    #[test]
    fn test_tampering_any_ciphertext_byte_is_detected() {
        let blob = encrypt(PAYLOAD, "hunter2").unwrap();
        // derive once; flipping ciphertext bytes must never yield plaintext
        let key = SessionKey::for_blob("hunter2", &blob).unwrap();

        for index in HEADER_LEN..blob.len() {
            let mut tampered = blob.clone();
            tampered[index] ^= 0x01;
            assert_eq!(
                key.open(&tampered),
                Err(CryptoError::WrongPasswordOrCorruptData),
                "flipped byte {index} went undetected"
            );
        }
    }

    #[test]
    fn test_truncated_blob_fails() {
        let blob = encrypt(PAYLOAD, "hunter2").unwrap();

        assert_eq!(
            decrypt(&blob[..HEADER_LEN - 1], "hunter2"),
            Err(CryptoError::WrongPasswordOrCorruptData)
        );
    }

    #[test]
    fn test_is_ciphertext_discriminates() {
        let blob = encrypt(PAYLOAD, "hunter2").unwrap();

        assert!(is_ciphertext(&blob));
        assert!(!is_ciphertext(PAYLOAD));
        assert!(!is_ciphertext(b""));
    }

    #[test]
    fn test_fresh_salt_per_encrypt() {
        let a = encrypt(PAYLOAD, "hunter2").unwrap();
        let b = encrypt(PAYLOAD, "hunter2").unwrap();

        let salt_a = &a[MAGIC.len()..MAGIC.len() + SALT_LEN];
        let salt_b = &b[MAGIC.len()..MAGIC.len() + SALT_LEN];
        assert_ne!(salt_a, salt_b);
    }

    #[test]
    fn test_derive_key_deterministic() {
        let salt = [7u8; SALT_LEN];

        assert_eq!(derive_key("pw", &salt), derive_key("pw", &salt));
        assert_ne!(derive_key("pw", &salt), derive_key("pw2", &salt));
    }

    #[test]
    fn test_session_key_seal_reuses_salt() {
        let key = SessionKey::generate("hunter2");

        let blob = key.seal(PAYLOAD).unwrap();

        assert_eq!(&blob[MAGIC.len()..MAGIC.len() + SALT_LEN], key.salt());
        assert_eq!(key.open(&blob).unwrap(), PAYLOAD);
    }

    #[test]
    fn test_session_key_rederive_opens_existing_blob() {
        let blob = encrypt(PAYLOAD, "hunter2").unwrap();

        let (plaintext, key) = open(&blob, "hunter2").unwrap();
        assert_eq!(plaintext, PAYLOAD);

        // the cached key seals new payloads other sessions can open
        let resealed = key.seal(b"updated").unwrap();
        assert_eq!(decrypt(&resealed, "hunter2").unwrap(), b"updated");
    }

    #[test]
    fn test_open_with_wrong_salt_fails() {
        let key = SessionKey::generate("hunter2");
        let other = SessionKey::generate("hunter2");

        let blob = other.seal(PAYLOAD).unwrap();

        assert_eq!(key.open(&blob), Err(CryptoError::WrongPasswordOrCorruptData));
    }
}
