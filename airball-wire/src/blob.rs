//! Compressed settings snapshots
//!
//! When a settings leader shares its whole catalog over a line transport,
//! the JSON document is too long for one comfortable sentence. It travels
//! instead as the `$CS` payload: zlib-deflated, then base64-wrapped so the
//! result is a single token with no commas or control bytes.
//!
//! Inflation is capped well above any real catalog so a hostile or corrupt
//! blob cannot balloon memory.

#[cfg(not(feature = "std"))]
use alloc::string::String;

use base64::{engine::general_purpose::STANDARD, Engine};
use miniz_oxide::deflate::compress_to_vec_zlib;
use miniz_oxide::inflate::decompress_to_vec_zlib_with_limit;
use thiserror_no_std::Error;

/// Largest accepted decompressed snapshot. The settings store banks are
/// 16 KiB, so anything past this is garbage by construction.
const MAX_SNAPSHOT_LEN: usize = 64 * 1024;

const COMPRESSION_LEVEL: u8 = 6;

/// Reasons a received blob cannot be expanded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlobError {
    /// The base64 wrapping is invalid.
    #[error("Invalid base64 wrapping: {0}")]
    Encoding(#[from] base64::DecodeError),
    /// The zlib stream is corrupt or inflates past the size cap.
    #[error("Zlib stream corrupt or oversized")]
    Compression,
    /// The inflated payload is not UTF-8 text.
    #[error("Snapshot is not UTF-8 text")]
    Utf8,
}

/// Pack a settings JSON document into a `$CS` payload token.
pub fn compress_settings(json: &str) -> String {
    STANDARD.encode(compress_to_vec_zlib(json.as_bytes(), COMPRESSION_LEVEL))
}

/// Unpack a `$CS` payload token back into a settings JSON document.
pub fn expand_settings(blob: &str) -> Result<String, BlobError> {
    let deflated = STANDARD.decode(blob.trim())?;
    let inflated = decompress_to_vec_zlib_with_limit(&deflated, MAX_SNAPSHOT_LEN)
        .map_err(|_| BlobError::Compression)?;
    String::from_utf8(inflated).map_err(|_| BlobError::Utf8)
}
