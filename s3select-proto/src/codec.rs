//! Frame codec over any `Read`/`Write` stream.
//!
//! Decoding is lazy: [`FrameReader`] pulls exactly one frame per
//! [`Iterator::next`] call and performs no read-ahead.

use std::io::{self, Read, Write};
use std::iter::FusedIterator;

use crate::frame::{CHECKSUM_SIZE, HEADER_SIZE};
use crate::{Error, Frame, FrameHeader, FramePayload, FrameType, Result, Section};

/// Default maximum payload length accepted by a [`FrameReader`] (16 MiB).
pub const DEFAULT_MAX_PAYLOAD: u32 = 16 * 1024 * 1024;

/// Writes `frame` to `w` exactly as it would appear on the wire.
///
/// Stored checksums are written unchanged, so a frame whose fields were
/// edited after [`Frame::new`] produces a stream that fails verification.
pub fn encode<W: Write>(w: &mut W, frame: &Frame) -> io::Result<()> {
    w.write_all(&frame.header.to_bytes())?;
    if frame.header.payload_length > 0 {
        let body = frame.payload.body();
        let checksum = frame
            .payload
            .checksum
            .unwrap_or_else(|| crc32fast::hash(&body));
        w.write_all(&body)?;
        w.write_all(&checksum.to_be_bytes())?;
    }
    w.flush()
}

/// Returns a lazy frame sequence over `r` with the default payload limit.
pub fn decode<R: Read>(r: R) -> FrameReader<R> {
    FrameReader::new(r)
}

/// A one-pass cursor yielding verified frames from a byte stream.
///
/// The sequence ends after a frame of type [`FrameType::End`] has been
/// yielded, when a header read finds the stream already exhausted, or after
/// the first error.
#[derive(Debug)]
pub struct FrameReader<R> {
    /// The underlying byte stream.
    inner: R,
    /// Largest payload length accepted before allocating.
    max_payload: u32,
    /// Set once the sequence has ended.
    done: bool,
}

impl<R: Read> FrameReader<R> {
    /// Creates a reader with the default payload limit.
    pub const fn new(inner: R) -> Self {
        Self::with_max_payload(inner, DEFAULT_MAX_PAYLOAD)
    }

    /// Creates a reader that rejects payloads longer than `max_payload`.
    pub const fn with_max_payload(inner: R, max_payload: u32) -> Self {
        Self {
            inner,
            max_payload,
            done: false,
        }
    }

    /// Returns the configured payload limit.
    pub const fn max_payload(&self) -> u32 {
        self.max_payload
    }

    /// Returns `true` once no further frames will be yielded.
    pub const fn is_finished(&self) -> bool {
        self.done
    }

    /// Returns a reference to the underlying stream.
    pub const fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Returns a mutable reference to the underlying stream.
    pub const fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consumes the reader, returning the underlying stream.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Reads one frame, or `None` on a clean end-of-stream.
    fn read_frame(&mut self) -> Result<Option<Frame>> {
        let mut buf = [0u8; HEADER_SIZE];
        match read_full(&mut self.inner, &mut buf)? {
            0 => return Ok(None),
            HEADER_SIZE => {}
            n => {
                return Err(Error::Truncated {
                    section: Section::Header,
                    expected: HEADER_SIZE,
                    actual: n,
                });
            }
        }
        let header = FrameHeader::parse(&buf)?;
        let payload = self.read_payload(&header)?;

        tracing::trace!(
            frame_type = %header.frame_type,
            version = header.version,
            payload_length = header.payload_length,
            "decoded frame"
        );
        Ok(Some(Frame { header, payload }))
    }

    /// Reads and verifies the payload section described by `header`.
    fn read_payload(&mut self, header: &FrameHeader) -> Result<FramePayload> {
        if header.payload_length == 0 {
            return Ok(FramePayload::default());
        }
        if header.payload_length > self.max_payload {
            return Err(Error::PayloadTooLarge {
                len: header.payload_length as usize,
                max: self.max_payload,
            });
        }

        let len = header.payload_length as usize;
        let mut body = vec![0u8; len];
        let n = read_full(&mut self.inner, &mut body)?;
        let mut crc = [0u8; CHECKSUM_SIZE];
        let m = if n == len {
            read_full(&mut self.inner, &mut crc)?
        } else {
            0
        };
        if n < len || m < CHECKSUM_SIZE {
            return Err(Error::Truncated {
                section: Section::Payload,
                expected: len + CHECKSUM_SIZE,
                actual: n + m,
            });
        }

        let checksum = u32::from_be_bytes(crc);
        let actual = crc32fast::hash(&body);
        if checksum != actual {
            return Err(Error::Checksum {
                section: Section::Payload,
                expected: checksum,
                actual,
            });
        }

        Ok(FramePayload::split(header.frame_type, body, checksum))
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_frame() {
            Ok(Some(frame)) => {
                self.done = frame.frame_type() == FrameType::End;
                Some(Ok(frame))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> FusedIterator for FrameReader<R> {}

/// Reads until `buf` is full or the stream ends, returning the byte count.
fn read_full<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
