use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::errors::CoreError;

pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// Argon2id cost parameters, recorded in the envelope header so a file
/// can always be reopened with the parameters it was sealed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Iterations
    pub time_cost: u32,
    /// Lanes
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_cost: 19_456, // 19 MiB
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// Cheap parameters for tests and low-end devices.
    pub fn light() -> Self {
        Self {
            memory_cost: 1_024,
            time_cost: 1,
            parallelism: 1,
        }
    }

    /// Reject parameters outside a safe range, so a crafted header cannot
    /// make the loader allocate gigabytes or spin for minutes.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(8..=1_048_576).contains(&self.memory_cost) {
            return Err(CoreError::InvalidFileFormat(format!(
                "KDF memory cost out of range: {} KiB",
                self.memory_cost
            )));
        }
        if !(1..=20).contains(&self.time_cost) {
            return Err(CoreError::InvalidFileFormat(format!(
                "KDF time cost out of range: {}",
                self.time_cost
            )));
        }
        if !(1..=16).contains(&self.parallelism) {
            return Err(CoreError::InvalidFileFormat(format!(
                "KDF parallelism out of range: {}",
                self.parallelism
            )));
        }
        Ok(())
    }
}

/// Output of `seal`: everything besides the passphrase needed to open it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    /// AES-256-GCM ciphertext with the authentication tag appended
    pub ciphertext: Vec<u8>,
}

/// Encrypt `plaintext` under a key derived from `passphrase`.
/// A fresh salt and nonce are drawn for every call.
pub fn seal(plaintext: &[u8], passphrase: &str, params: &KdfParams) -> Result<Sealed, CoreError> {
    let salt = random_bytes::<SALT_LEN>()?;
    let nonce = random_bytes::<NONCE_LEN>()?;
    let cipher = cipher_for(passphrase, &salt, params)?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CoreError::Encryption(format!("AES-GCM encryption failed: {e}")))?;
    Ok(Sealed {
        salt,
        nonce,
        ciphertext,
    })
}

/// Decrypt a sealed payload. A wrong passphrase and a tampered payload
/// both surface as `CoreError::Decryption`.
pub fn open(sealed: &Sealed, passphrase: &str, params: &KdfParams) -> Result<Vec<u8>, CoreError> {
    let cipher = cipher_for(passphrase, &sealed.salt, params)?;
    Ok(cipher.decrypt(Nonce::from_slice(&sealed.nonce), sealed.ciphertext.as_slice())?)
}

fn cipher_for(
    passphrase: &str,
    salt: &[u8; SALT_LEN],
    params: &KdfParams,
) -> Result<Aes256Gcm, CoreError> {
    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| CoreError::Encryption(format!("invalid Argon2 params: {e}")))?;

    let mut key = [0u8; KEY_LEN];
    Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params)
        .hash_password_into(passphrase.as_bytes(), salt, &mut key)
        .map_err(|e| CoreError::Encryption(format!("key derivation failed: {e}")))?;

    Aes256Gcm::new_from_slice(&key)
        .map_err(|e| CoreError::Encryption(format!("failed to create cipher: {e}")))
}

fn random_bytes<const N: usize>() -> Result<[u8; N], CoreError> {
    let mut buf = [0u8; N];
    getrandom::getrandom(&mut buf)
        .map_err(|e| CoreError::Encryption(format!("system RNG unavailable: {e}")))?;
    Ok(buf)
}
