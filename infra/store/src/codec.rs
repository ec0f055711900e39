//! Record serialization boundary.
//!
//! The store never inspects record contents; it hands typed values to a [`Codec`]
//! and persists whatever bytes come back. The codec also owns the file extension
//! that every resource is stored under.

use crate::error::{Result, StoreError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// Encodes typed records into bytes and back.
///
/// Implementations must be deterministic about their [`extension`](Codec::extension):
/// it is part of the on-disk layout (`<resource>.<ext>`), so changing it for an
/// existing store makes previously written records unreachable by bare name.
pub trait Codec: Debug + Send + Sync + 'static {
    /// File extension without the leading dot, e.g. `"json"`.
    fn extension(&self) -> &str;

    /// Serializes a record.
    ///
    /// # Errors
    /// Returns [`StoreError::Serialization`] if the value cannot be represented.
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized;

    /// Deserializes a record.
    ///
    /// # Errors
    /// Returns [`StoreError::Serialization`] on malformed or mismatched content.
    fn decode<T>(&self, bytes: &[u8]) -> Result<T>
    where
        T: DeserializeOwned;
}

/// Pretty-printed JSON with tab indentation and a trailing newline.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct JsonCodec;

impl JsonCodec {
    const INDENT: &'static [u8] = b"\t";
}

impl Codec for JsonCodec {
    fn extension(&self) -> &str {
        "json"
    }

    fn encode<T>(&self, value: &T) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        let mut buf = Vec::with_capacity(128);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(Self::INDENT);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut ser).map_err(StoreError::codec)?;
        buf.push(b'\n');
        Ok(buf)
    }

    fn decode<T>(&self, bytes: &[u8]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(bytes).map_err(StoreError::codec)
    }
}
