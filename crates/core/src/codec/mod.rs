//! Wire codec for values crossing the store boundary.
//!
//! Values are protobuf-encoded (field tagged, so older blobs keep decoding
//! after optional fields are added) and then wrapped in a one-byte format
//! tag followed by the body. Tag `0` is a raw body, tag `1` is a zstd frame.

use prost::Message;
use thiserror::Error;

/// Format tag for an uncompressed body.
pub const FORMAT_RAW: u8 = 0;
/// Format tag for a zstd compressed body.
pub const FORMAT_ZSTD: u8 = 1;

const ZSTD_LEVEL: i32 = 1;

/// Errors raised while decoding a stored blob.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Empty blob")]
    Empty,
    #[error("Unknown blob format tag: {0}")]
    UnknownFormat(u8),
    #[error("Compression failed: {0}")]
    Compress(String),
    #[error("Decompression failed: {0}")]
    Decompress(String),
    #[error("Decode failed: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;

/// Encodes a message to its protobuf bytes.
pub fn encode<M: Message>(message: &M) -> Vec<u8> {
    message.encode_to_vec()
}

/// Decodes protobuf bytes into `M`.
pub fn decode<M: Message + Default>(bytes: &[u8]) -> Result<M> {
    M::decode(bytes).map_err(|e| CodecError::Decode(e.to_string()))
}

/// Compresses an encoded body and prefixes the zstd format tag.
pub fn compress(body: &[u8]) -> Result<Vec<u8>> {
    let compressed =
        zstd::encode_all(body, ZSTD_LEVEL).map_err(|e| CodecError::Compress(e.to_string()))?;
    let mut blob = Vec::with_capacity(compressed.len() + 1);
    blob.push(FORMAT_ZSTD);
    blob.extend_from_slice(&compressed);
    Ok(blob)
}

/// Reverses [`compress`]. Raw blobs written by older writers are accepted.
pub fn decompress(blob: &[u8]) -> Result<Vec<u8>> {
    let (tag, body) = blob.split_first().ok_or(CodecError::Empty)?;
    match *tag {
        FORMAT_RAW => Ok(body.to_vec()),
        FORMAT_ZSTD => zstd::decode_all(body).map_err(|e| CodecError::Decompress(e.to_string())),
        other => Err(CodecError::UnknownFormat(other)),
    }
}

/// Encodes and compresses a message for storage.
pub fn pack<M: Message>(message: &M) -> Result<Vec<u8>> {
    compress(&encode(message))
}

/// Decompresses and decodes a stored blob.
pub fn unpack<M: Message + Default>(blob: &[u8]) -> Result<M> {
    decode(&decompress(blob)?)
}
