//! Versioned binary envelope for trained transformers: a little-endian `u16`
//! major and minor version followed by the payload fields in declared order.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{FeaturizerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveVersion {
    pub major: u16,
    pub minor: u16,
}

impl ArchiveVersion {
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

pub fn serialize<P: Serialize>(version: ArchiveVersion, payload: &P) -> Result<Vec<u8>> {
    let mut buffer = bincode::serialize(&version)?;
    buffer.extend(bincode::serialize(payload)?);
    Ok(buffer)
}

pub fn deserialize<P: DeserializeOwned>(expected: ArchiveVersion, bytes: &[u8]) -> Result<P> {
    let mut reader = bytes;
    let version: ArchiveVersion = bincode::deserialize_from(&mut reader)?;
    if version != expected {
        return Err(FeaturizerError::UnsupportedArchiveVersion {
            major: version.major,
            minor: version.minor,
        });
    }
    let payload = bincode::deserialize_from(&mut reader)?;
    if !reader.is_empty() {
        return Err(FeaturizerError::Archive(format!(
            "{} unexpected trailing bytes",
            reader.len()
        )));
    }
    Ok(payload)
}

/// Types that can be written to and restored from a versioned archive.
pub trait Persist: Sized {
    const VERSION: ArchiveVersion;

    type Payload: Serialize + DeserializeOwned;

    fn to_payload(&self) -> Self::Payload;

    /// Rebuilds the value, re-running its construction checks.
    fn from_payload(payload: Self::Payload) -> Result<Self>;

    fn save(&self) -> Result<Vec<u8>> {
        serialize(Self::VERSION, &self.to_payload())
    }

    fn load(bytes: &[u8]) -> Result<Self> {
        Self::from_payload(deserialize(Self::VERSION, bytes)?)
    }
}
