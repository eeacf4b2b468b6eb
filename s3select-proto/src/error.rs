//! Error types for frame decoding.

use std::fmt;

/// Alias for `Result<T, s3select_proto::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Which part of a frame an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Section {
    /// The fixed 12-byte header.
    Header,
    /// The payload body and its trailing checksum.
    Payload,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Header => "header",
            Self::Payload => "payload",
        })
    }
}

/// Errors returned while decoding a frame stream.
///
/// Every variant is fatal: a [`FrameReader`](crate::FrameReader) yields no
/// further frames once it has returned an error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The CRC-32 computed over a section does not match its checksum field.
    #[error("{section} checksum mismatch: expected {expected:#010x}, computed {actual:#010x}")]
    Checksum {
        /// Section whose checksum failed.
        section: Section,
        /// Checksum carried on the wire.
        expected: u32,
        /// Checksum computed over the bytes read.
        actual: u32,
    },

    /// The stream ended in the middle of a frame.
    #[error("truncated {section}: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Section that was cut short.
        section: Section,
        /// Number of bytes the frame declared.
        expected: usize,
        /// Number of bytes actually available.
        actual: usize,
    },

    /// The declared payload length exceeds the reader's limit.
    #[error("payload of {len} bytes exceeds {max} byte limit")]
    PayloadTooLarge {
        /// Declared payload length.
        len: usize,
        /// Configured maximum.
        max: u32,
    },

    /// An I/O error from the underlying stream.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
