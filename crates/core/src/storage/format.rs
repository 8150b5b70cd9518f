use crate::errors::CoreError;

use super::encryption::{KdfParams, Sealed, NONCE_LEN, SALT_LEN};

/// Magic bytes at the start of every local store file.
pub const MAGIC: &[u8; 4] = b"FNPL";

/// Envelope version written by this build.
pub const CURRENT_VERSION: u16 = 1;

/// magic(4) + version(2) + kdf(12) + salt(16) + nonce(12) + payload_len(8)
pub const HEADER_LEN: usize = 4 + 2 + 12 + SALT_LEN + NONCE_LEN + 8;

/// Parsed envelope: format version, KDF parameters and the sealed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub version: u16,
    pub kdf: KdfParams,
    pub sealed: Sealed,
}

/// Serialize an envelope.
///
/// ```text
/// [FNPL] [version u16 LE] [memory u32 LE] [time u32 LE] [lanes u32 LE]
/// [salt 16B] [nonce 12B] [payload_len u64 LE] [payload]
/// ```
pub fn encode(envelope: &Envelope) -> Vec<u8> {
    let payload = &envelope.sealed.ciphertext;
    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&envelope.version.to_le_bytes());
    buf.extend_from_slice(&envelope.kdf.memory_cost.to_le_bytes());
    buf.extend_from_slice(&envelope.kdf.time_cost.to_le_bytes());
    buf.extend_from_slice(&envelope.kdf.parallelism.to_le_bytes());
    buf.extend_from_slice(&envelope.sealed.salt);
    buf.extend_from_slice(&envelope.sealed.nonce);
    buf.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    buf.extend_from_slice(payload);
    buf
}

/// Parse and sanity-check an envelope. Trailing bytes after the declared
/// payload are rejected.
pub fn decode(data: &[u8]) -> Result<Envelope, CoreError> {
    if data.len() < HEADER_LEN {
        return Err(CoreError::InvalidFileFormat(format!(
            "file too small: {} bytes, header needs {HEADER_LEN}",
            data.len()
        )));
    }

    let mut reader = Reader { data, pos: 0 };
    if &reader.take::<4>()? != MAGIC {
        return Err(CoreError::InvalidFileFormat("not a local store file".into()));
    }

    let version = u16::from_le_bytes(reader.take()?);
    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let kdf = KdfParams {
        memory_cost: u32::from_le_bytes(reader.take()?),
        time_cost: u32::from_le_bytes(reader.take()?),
        parallelism: u32::from_le_bytes(reader.take()?),
    };
    kdf.validate()?;

    let salt = reader.take::<SALT_LEN>()?;
    let nonce = reader.take::<NONCE_LEN>()?;
    let payload_len = u64::from_le_bytes(reader.take()?);

    let remaining = reader.remaining();
    if payload_len != remaining.len() as u64 {
        return Err(CoreError::InvalidFileFormat(format!(
            "payload length mismatch: header says {payload_len}, file has {}",
            remaining.len()
        )));
    }

    Ok(Envelope {
        version,
        kdf,
        sealed: Sealed {
            salt,
            nonce,
            ciphertext: remaining.to_vec(),
        },
    })
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N], CoreError> {
        let end = self.pos + N;
        let bytes: [u8; N] = self
            .data
            .get(self.pos..end)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| CoreError::InvalidFileFormat("truncated header".into()))?;
        self.pos = end;
        Ok(bytes)
    }

    fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}
