// ============================================================
// Layer 6 — Model Blob Codec
// ============================================================
// Turns a fitted model into the opaque `model_blob` string and
// back. Nothing touches disk; the caller stores the text.
//
// Byte layout (bincode, varint integers):
//
//   ┌────────────┬──────────────────┬───────────────────────┐
//   │ magic "GBDT" │ format_version │ model (serde fields…) │
//   └────────────┴──────────────────┴───────────────────────┘
//
// The header is read on its own first, so a blob from some other
// producer is reported as foreign and a blob from a newer build
// as an unsupported version, instead of a generic decode error.
//
// Text form: standard base64 alphabet with padding.
//
// Reference: bincode 1.x Options API
//            Rust Book §9 (Recoverable Errors with Result)

use base64::{engine::general_purpose::STANDARD, Engine};
use bincode::Options;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::domain::error::ModelError;

pub const MAGIC: [u8; 4] = *b"GBDT";
pub const FORMAT_VERSION: u32 = 1;

/// Upper bound on decoded size; stops crafted length prefixes
/// from triggering huge allocations.
const MAX_BLOB_BYTES: u64 = 256 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct BlobHeader {
    magic:          [u8; 4],
    format_version: u32,
}

impl BlobHeader {
    fn current() -> Self {
        Self { magic: MAGIC, format_version: FORMAT_VERSION }
    }
}

#[derive(Serialize)]
struct BlobRef<'a, T> {
    header: BlobHeader,
    model:  &'a T,
}

#[derive(Deserialize)]
struct BlobOwned<T> {
    #[allow(dead_code)]
    header: BlobHeader,
    model:  T,
}

fn options() -> impl Options {
    bincode::DefaultOptions::new().with_limit(MAX_BLOB_BYTES)
}

// ─── Bytes ────────────────────────────────────────────────────────────────────

pub fn to_bytes<T: Serialize>(model: &T) -> Result<Vec<u8>, ModelError> {
    let blob = BlobRef { header: BlobHeader::current(), model };
    Ok(options().serialize(&blob)?)
}

pub fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ModelError> {
    let header: BlobHeader = options()
        .allow_trailing_bytes()
        .deserialize(bytes)
        .map_err(|_| ModelError::ForeignBlob)?;

    if header.magic != MAGIC {
        return Err(ModelError::ForeignBlob);
    }
    if header.format_version != FORMAT_VERSION {
        return Err(ModelError::UnsupportedVersion {
            found:    header.format_version,
            expected: FORMAT_VERSION,
        });
    }

    let blob: BlobOwned<T> = options().deserialize(bytes)?;
    Ok(blob.model)
}

// ─── Text ─────────────────────────────────────────────────────────────────────

pub fn encode_text(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Surrounding whitespace (e.g. a trailing newline from a shell) is ignored.
pub fn decode_text(text: &str) -> Result<Vec<u8>, ModelError> {
    Ok(STANDARD.decode(text.trim())?)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        values: Vec<f64>,
        name:   String,
    }

    fn sample() -> Sample {
        Sample { values: vec![0.1, -2.5, f64::MAX], name: "stump".into() }
    }

    #[test]
    fn test_blob_starts_with_magic() {
        let bytes = to_bytes(&sample()).unwrap();
        assert_eq!(&bytes[..4], b"GBDT");
        let back: Sample = from_bytes(&bytes).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_foreign_bytes_are_reported_as_foreign() {
        let err = from_bytes::<Sample>(b"PK\x03\x04 zip file").unwrap_err();
        assert!(matches!(err, ModelError::ForeignBlob));
        assert!(matches!(from_bytes::<Sample>(&[]), Err(ModelError::ForeignBlob)));
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let mut bytes = to_bytes(&sample()).unwrap();
        // varint u32 below 251 is a single byte right after the magic
        bytes[4] = 2;
        match from_bytes::<Sample>(&bytes) {
            Err(ModelError::UnsupportedVersion { found: 2, expected: 1 }) => {}
            other => panic!("expected a version error, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_blob_is_a_codec_error() {
        let bytes = to_bytes(&sample()).unwrap();
        let err = from_bytes::<Sample>(&bytes[..bytes.len() - 3]).unwrap_err();
        assert!(matches!(err, ModelError::Codec(_)));
    }

    #[test]
    fn test_text_decoding() {
        let text = encode_text(b"\x00\x01GBDT");
        assert_eq!(decode_text(&format!("{text}\n")).unwrap(), b"\x00\x01GBDT");
        assert!(matches!(decode_text("not base64!!"), Err(ModelError::Base64(_))));
    }
}
