//! Value encodings for cache entries.

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::AppResult;

/// How typed values are turned into cache bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Codec {
    /// UTF-8 JSON, readable by other clients
    #[default]
    Json,
    /// Compact bincode encoding, only readable by Rust services
    Binary,
}

impl Codec {
    pub fn encode<T>(&self, value: &T) -> AppResult<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        match self {
            Codec::Json => Ok(serde_json::to_vec(value)?),
            Codec::Binary => Ok(bincode::serialize(value)?),
        }
    }

    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> AppResult<T> {
        match self {
            Codec::Json => Ok(serde_json::from_slice(bytes)?),
            Codec::Binary => Ok(bincode::deserialize(bytes)?),
        }
    }
}
