//! Frame types for the response wire format.

use std::fmt;

use crate::{Error, Result};

/// Size of the fixed frame header.
pub const HEADER_SIZE: usize = 12;

/// Number of leading header bytes covered by the header checksum.
pub const PRELUDE_SIZE: usize = 8;

/// Size of a big-endian CRC-32 checksum field.
pub const CHECKSUM_SIZE: usize = 4;

/// Size of the opaque offset prefixed to `record`, `stats` and
/// `continuation` payloads. A shorter body is taken whole as the offset.
pub const OFFSET_SIZE: usize = 8;

/// Version byte written by [`Frame::new`].
pub const DEFAULT_VERSION: u8 = 1;

/// Largest value representable in the 3-byte type field.
pub(crate) const MAX_TYPE_CODE: u32 = 0x00FF_FFFF;

/// Symbolic type of a frame, resolved from its 3-byte wire code.
///
/// Codes outside the fixed table are kept as [`FrameType::Unknown`] so the
/// decoder never rejects them; rejecting is left to whoever consumes the
/// frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_enums)]
pub enum FrameType {
    /// A chunk of result records.
    Record,
    /// Record-level exceptions encountered during the query.
    Exception,
    /// Query statistics.
    Stats,
    /// Keep-alive with no new data.
    Continuation,
    /// End of the response; no frame follows.
    End,
    /// A code not in the fixed table.
    Unknown(u32),
}

impl FrameType {
    /// Resolves a raw type code through the fixed table.
    pub const fn from_code(code: u32) -> Self {
        match code {
            0x80_0001 => Self::Record,
            0x80_0002 => Self::Exception,
            0x80_0003 => Self::Stats,
            0x80_0004 => Self::Continuation,
            0x80_0005 => Self::End,
            other => Self::Unknown(other),
        }
    }

    /// Returns the raw wire code.
    pub const fn code(self) -> u32 {
        match self {
            Self::Record => 0x80_0001,
            Self::Exception => 0x80_0002,
            Self::Stats => 0x80_0003,
            Self::Continuation => 0x80_0004,
            Self::End => 0x80_0005,
            Self::Unknown(code) => code,
        }
    }

    /// Returns `true` if payloads of this type start with an 8-byte offset.
    pub const fn has_offset(self) -> bool {
        matches!(self, Self::Record | Self::Stats | Self::Continuation)
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record => f.write_str("record"),
            Self::Exception => f.write_str("exception"),
            Self::Stats => f.write_str("stats"),
            Self::Continuation => f.write_str("continuation"),
            Self::End => f.write_str("end"),
            Self::Unknown(code) => write!(f, "unknown({code})"),
        }
    }
}

/// The fixed 12-byte frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct FrameHeader {
    /// Format version byte. Carried through, never interpreted.
    pub version: u8,
    /// Symbolic frame type.
    pub frame_type: FrameType,
    /// Length of the payload body, excluding its trailing checksum.
    pub payload_length: u32,
    /// CRC-32 of the first 8 header bytes.
    pub checksum: u32,
}

impl FrameHeader {
    /// Builds a header and computes its checksum.
    ///
    /// Type codes wider than 24 bits are truncated to the low 3 bytes, the
    /// same value the wire can carry.
    pub fn new(version: u8, frame_type: FrameType, payload_length: u32) -> Self {
        let frame_type = FrameType::from_code(frame_type.code() & MAX_TYPE_CODE);
        let mut header = Self {
            version,
            frame_type,
            payload_length,
            checksum: 0,
        };
        header.checksum = crc32fast::hash(&header.prelude());
        header
    }

    /// Parses and verifies a header.
    ///
    /// Fails with [`Error::Checksum`] if the checksum field does not match
    /// the CRC-32 of bytes `0..8`.
    pub fn parse(buf: &[u8; HEADER_SIZE]) -> Result<Self> {
        let [version, t0, t1, t2, l0, l1, l2, l3, c0, c1, c2, c3] = *buf;
        let checksum = u32::from_be_bytes([c0, c1, c2, c3]);
        let actual = crc32fast::hash(&buf[..PRELUDE_SIZE]);
        if checksum != actual {
            return Err(Error::Checksum {
                section: crate::Section::Header,
                expected: checksum,
                actual,
            });
        }
        Ok(Self {
            version,
            frame_type: FrameType::from_code(u32::from_be_bytes([0, t0, t1, t2])),
            payload_length: u32::from_be_bytes([l0, l1, l2, l3]),
            checksum,
        })
    }

    /// Serializes the header, including the stored checksum as-is.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[..PRELUDE_SIZE].copy_from_slice(&self.prelude());
        out[PRELUDE_SIZE..].copy_from_slice(&self.checksum.to_be_bytes());
        out
    }

    /// The checksummed part of the header: version, type and length.
    fn prelude(&self) -> [u8; PRELUDE_SIZE] {
        let [_, t0, t1, t2] = self.frame_type.code().to_be_bytes();
        let [l0, l1, l2, l3] = self.payload_length.to_be_bytes();
        [self.version, t0, t1, t2, l0, l1, l2, l3]
    }
}

/// The payload section of a frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct FramePayload {
    /// Payload data with any offset removed. `None` when empty.
    pub data: Option<Vec<u8>>,
    /// Opaque offset, present only for `record`, `stats` and `continuation`.
    ///
    /// Holds [`OFFSET_SIZE`] bytes, or the whole body when the body is
    /// shorter than that.
    pub offset: Option<Vec<u8>>,
    /// CRC-32 of the full payload body. `None` for zero-length payloads.
    pub checksum: Option<u32>,
}

impl FramePayload {
    /// Splits a checksum-verified payload body into offset and data.
    pub(crate) fn split(frame_type: FrameType, mut body: Vec<u8>, checksum: u32) -> Self {
        let offset = frame_type.has_offset().then(|| {
            let data = body.split_off(body.len().min(OFFSET_SIZE));
            std::mem::replace(&mut body, data)
        });
        Self {
            data: (!body.is_empty()).then_some(body),
            offset,
            checksum: Some(checksum),
        }
    }

    /// Reassembles the payload body as it appears on the wire.
    pub fn body(&self) -> Vec<u8> {
        let data = self.data.as_deref().unwrap_or_default();
        let mut body = Vec::with_capacity(OFFSET_SIZE + data.len());
        if let Some(offset) = &self.offset {
            body.extend_from_slice(offset);
        }
        body.extend_from_slice(data);
        body
    }
}

/// A decoded frame: header plus payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Frame {
    /// The frame header.
    pub header: FrameHeader,
    /// The frame payload.
    pub payload: FramePayload,
}

impl Frame {
    /// Builds a well-formed frame with correct lengths and checksums.
    ///
    /// The type is first reduced to the code the 3-byte wire field can
    /// carry, so an `Unknown` alias of a known code builds that frame. For
    /// offset-carrying types a missing `offset` is written as zeros; for
    /// other types `offset` is ignored.
    pub fn new(
        frame_type: FrameType,
        offset: Option<[u8; OFFSET_SIZE]>,
        data: impl Into<Vec<u8>>,
    ) -> Result<Self> {
        let frame_type = FrameType::from_code(frame_type.code() & MAX_TYPE_CODE);
        let data = data.into();
        let offset = frame_type
            .has_offset()
            .then(|| offset.unwrap_or_default().to_vec());
        let mut payload = FramePayload {
            data: (!data.is_empty()).then_some(data),
            offset,
            checksum: None,
        };

        let body = payload.body();
        let payload_length = u32::try_from(body.len()).map_err(|_| Error::PayloadTooLarge {
            len: body.len(),
            max: u32::MAX,
        })?;
        if payload_length > 0 {
            payload.checksum = Some(crc32fast::hash(&body));
        }

        Ok(Self {
            header: FrameHeader::new(DEFAULT_VERSION, frame_type, payload_length),
            payload,
        })
    }

    /// Returns the symbolic frame type.
    pub const fn frame_type(&self) -> FrameType {
        self.header.frame_type
    }

    /// Returns the payload data, or an empty slice if there is none.
    pub fn data(&self) -> &[u8] {
        self.payload.data.as_deref().unwrap_or_default()
    }
}
