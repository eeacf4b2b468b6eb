//! Wire format for streamed object-query responses.
//!
//! A response body is a sequence of frames. Each frame is a fixed 12-byte
//! header followed by an optional payload section with its own trailing
//! checksum:
//!
//! ```text
//! [version u8][type u24 BE][payload_length u32 BE][header_crc u32 BE]
//! [payload (payload_length bytes)][payload_crc u32 BE]
//! ```
//!
//! Both checksums are CRC-32 (IEEE). Frames are read lazily with
//! [`FrameReader`], which stops after the `end` frame or at a clean
//! end-of-stream.

mod codec;
mod error;
mod frame;

pub use codec::{DEFAULT_MAX_PAYLOAD, FrameReader, decode, encode};
pub use error::{Error, Result, Section};
pub use frame::{
    CHECKSUM_SIZE, DEFAULT_VERSION, Frame, FrameHeader, FramePayload, FrameType, HEADER_SIZE,
    OFFSET_SIZE, PRELUDE_SIZE,
};
