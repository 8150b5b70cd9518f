use tracing::{debug, info};

#[cfg(not(target_arch = "wasm32"))]
use crate::api::fallback::LocalFallback;
use crate::errors::CoreError;
use crate::models::student::StudentData;

use super::encryption::{self, KdfParams};
use super::format::{self, Envelope};

/// Encode/decode student data to the encrypted local store format.
pub struct StorageManager;

impl StorageManager {
    /// StudentData → bincode → AES-256-GCM(Argon2id(passphrase)) → FNPL bytes.
    pub fn save_to_bytes(data: &StudentData, passphrase: &str) -> Result<Vec<u8>, CoreError> {
        Self::save_with_params(data, passphrase, KdfParams::default())
    }

    /// Same as `save_to_bytes` with explicit KDF costs.
    pub fn save_with_params(
        data: &StudentData,
        passphrase: &str,
        kdf: KdfParams,
    ) -> Result<Vec<u8>, CoreError> {
        if passphrase.is_empty() {
            return Err(CoreError::ValidationError("passphrase must not be empty".into()));
        }
        kdf.validate()?;
        let plaintext = bincode::serialize(data)?;
        let sealed = encryption::seal(&plaintext, passphrase, &kdf)?;
        Ok(format::encode(&Envelope {
            version: format::CURRENT_VERSION,
            kdf,
            sealed,
        }))
    }

    /// FNPL bytes → header → decrypt → bincode → StudentData.
    pub fn load_from_bytes(bytes: &[u8], passphrase: &str) -> Result<StudentData, CoreError> {
        let envelope = format::decode(bytes)?;
        let plaintext = encryption::open(&envelope.sealed, passphrase, &envelope.kdf)?;
        bincode::deserialize(&plaintext)
            .map_err(|e| CoreError::Deserialization(format!("corrupt student data: {e}")))
    }
}

/// An encrypted file on the device, used as the write fallback and read
/// cache when the API is unreachable.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone)]
pub struct LocalStore {
    path: std::path::PathBuf,
    passphrase: String,
    kdf: KdfParams,
}

#[cfg(not(target_arch = "wasm32"))]
impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore")
            .field("path", &self.path)
            .field("kdf", &self.kdf)
            .finish_non_exhaustive()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl LocalStore {
    pub fn new(path: impl Into<std::path::PathBuf>, passphrase: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            passphrase: passphrase.into(),
            kdf: KdfParams::default(),
        }
    }

    #[must_use]
    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write the data. The file is replaced atomically via a sibling temp file.
    pub fn save(&self, data: &StudentData) -> Result<(), CoreError> {
        let bytes = StorageManager::save_with_params(data, &self.passphrase, self.kdf)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, &bytes)?;
        std::fs::rename(&tmp, &self.path)?;
        info!(path = %self.path.display(), bytes = bytes.len(), "local store written");
        Ok(())
    }

    pub fn load(&self) -> Result<StudentData, CoreError> {
        let bytes = std::fs::read(&self.path)?;
        let data = StorageManager::load_from_bytes(&bytes, &self.passphrase)?;
        debug!(path = %self.path.display(), "local store read");
        Ok(data)
    }

    /// Load if the file exists; `None` otherwise.
    pub fn load_if_exists(&self) -> Result<Option<StudentData>, CoreError> {
        if !self.exists() {
            return Ok(None);
        }
        self.load().map(Some)
    }

    pub fn remove(&self) -> Result<(), CoreError> {
        if self.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl LocalFallback for LocalStore {
    fn store(&self, data: &StudentData) -> Result<(), CoreError> {
        self.save(data)
    }
}
