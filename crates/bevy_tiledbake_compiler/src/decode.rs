//! Tile layer data decoding.
//!
//! Turns the `<data>` payload of a tile layer into a dense, row-major grid of
//! global tile ids. Supported payloads:
//!
//! | Encoding | Compression | Payload |
//! |----------|-------------|---------|
//! | none (inline `<tile>` records) | none | [`TilePayload::Cells`] |
//! | `csv` | none | [`TilePayload::Text`] |
//! | `base64` | none, `gzip`, `zlib` | [`TilePayload::Text`] |

use std::io::Read;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use flate2::read::{GzDecoder, ZlibDecoder};
use thiserror::Error;

use crate::model::{TileData, TilePayload};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported tile data encoding '{0}'")]
    UnsupportedEncoding(String),

    #[error("unsupported tile data compression '{0}'")]
    UnsupportedCompression(String),

    #[error("invalid tile id '{token}' at cell {index}")]
    Format { index: usize, token: String },

    #[error("decoded {actual} cells, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("{encoding} tile data does not match its payload")]
    PayloadMismatch { encoding: &'static str },

    #[error("invalid base64 tile data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to decompress tile data: {0}")]
    Decompress(#[source] std::io::Error),
}

/// Tile data encodings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// Inline `<tile gid="..."/>` records.
    Xml,
    Csv,
    Base64,
}

impl Encoding {
    /// Interpret an encoding tag, `None` meaning inline records.
    pub fn from_tag(tag: Option<&str>) -> Result<Self, DecodeError> {
        match tag {
            None => Ok(Encoding::Xml),
            Some("csv") => Ok(Encoding::Csv),
            Some("base64") => Ok(Encoding::Base64),
            Some(other) => Err(DecodeError::UnsupportedEncoding(other.to_string())),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Encoding::Xml => "inline",
            Encoding::Csv => "csv",
            Encoding::Base64 => "base64",
        }
    }
}

/// Compression codecs for base64 payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Zlib,
}

impl Compression {
    pub fn from_tag(tag: Option<&str>) -> Result<Self, DecodeError> {
        match tag {
            None => Ok(Compression::None),
            Some("gzip") => Ok(Compression::Gzip),
            Some("zlib") => Ok(Compression::Zlib),
            Some(other) => Err(DecodeError::UnsupportedCompression(other.to_string())),
        }
    }
}

/// Decode a layer's [`TileData`] into `width * height` global ids.
pub fn decode_tile_data(data: &TileData, width: u32, height: u32) -> Result<Vec<u32>, DecodeError> {
    decode(
        data.encoding.as_deref(),
        data.compression.as_deref(),
        &data.payload,
        width,
        height,
    )
}

/// Decode an encoded payload into a dense row-major grid.
///
/// # Arguments
///
/// * `encoding` - Encoding tag, `None` for inline records
/// * `compression` - Compression tag, only valid with `base64`
/// * `payload` - The payload as carried by the document
/// * `width`, `height` - Layer size in tiles
///
/// # Errors
///
/// Fails on unknown encoding or compression tags, unparsable CSV tokens,
/// malformed base64 or compressed streams, and whenever the decoded cell
/// count is not exactly `width * height`.
pub fn decode(
    encoding: Option<&str>,
    compression: Option<&str>,
    payload: &TilePayload,
    width: u32,
    height: u32,
) -> Result<Vec<u32>, DecodeError> {
    let encoding = Encoding::from_tag(encoding)?;
    let compression = Compression::from_tag(compression)?;
    let expected = width as usize * height as usize;

    if compression != Compression::None && encoding != Encoding::Base64 {
        // Compression only applies to binary payloads
        return Err(DecodeError::UnsupportedCompression(format!(
            "{compression:?} with {} encoding",
            encoding.name()
        )));
    }

    let cells = match (encoding, payload) {
        (Encoding::Xml, TilePayload::Cells(cells)) => cells.clone(),
        (Encoding::Csv, TilePayload::Text(text)) => decode_csv(text)?,
        (Encoding::Base64, TilePayload::Text(text)) => {
            // One cell past the grid is enough to report an oversized stream
            let limit = (expected as u64 + 1) * 4;
            let bytes = decode_base64(text, compression, limit)?;
            if bytes.len() % 4 != 0 {
                return Err(DecodeError::SizeMismatch {
                    expected,
                    actual: bytes.len() / 4,
                });
            }
            bytes
                .chunks_exact(4)
                .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                .collect()
        }
        (encoding, _) => {
            return Err(DecodeError::PayloadMismatch {
                encoding: encoding.name(),
            });
        }
    };

    if cells.len() != expected {
        return Err(DecodeError::SizeMismatch {
            expected,
            actual: cells.len(),
        });
    }
    Ok(cells)
}

/// Parse comma-separated ids, ignoring whitespace and empty tokens.
fn decode_csv(text: &str) -> Result<Vec<u32>, DecodeError> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(index, token)| {
            token.parse::<u32>().map_err(|_| DecodeError::Format {
                index,
                token: token.to_string(),
            })
        })
        .collect()
}

/// Decompressed output stops after `limit` bytes.
fn decode_base64(
    text: &str,
    compression: Compression,
    limit: u64,
) -> Result<Vec<u8>, DecodeError> {
    let raw = STANDARD.decode(text.trim())?;
    let mut bytes = Vec::new();
    match compression {
        Compression::None => return Ok(raw),
        Compression::Gzip => GzDecoder::new(raw.as_slice())
            .take(limit)
            .read_to_end(&mut bytes)
            .map_err(DecodeError::Decompress)?,
        Compression::Zlib => ZlibDecoder::new(raw.as_slice())
            .take(limit)
            .read_to_end(&mut bytes)
            .map_err(DecodeError::Decompress)?,
    };
    Ok(bytes)
}
