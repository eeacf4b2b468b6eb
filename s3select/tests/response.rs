//! End-to-end tests for response handling over encoded frame streams.

#![allow(clippy::unwrap_used, clippy::missing_docs_in_private_items)]

use std::io::{self, Cursor, Read};

use s3select::{
    Body, Collected, Error, Exceptions, Frame, FrameType, Handlers, RecordException,
    ResponseHandler, Stats, handle_response,
};
use s3select_proto::{FrameHeader, encode};

/// A body that counts how often it is closed and how much was read.
struct Tracked {
    inner: Cursor<Vec<u8>>,
    closes: usize,
}

impl Tracked {
    fn new(frames: &[Frame]) -> Self {
        Self::raw(stream(frames))
    }

    fn raw(bytes: Vec<u8>) -> Self {
        Self {
            inner: Cursor::new(bytes),
            closes: 0,
        }
    }
}

impl Read for Tracked {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Body for Tracked {
    fn close(&mut self) -> io::Result<()> {
        self.closes += 1;
        Ok(())
    }
}

fn stream(frames: &[Frame]) -> Vec<u8> {
    let mut buf = Vec::new();
    for frame in frames {
        encode(&mut buf, frame).unwrap();
    }
    buf
}

fn end() -> Frame {
    Frame::new(FrameType::End, None, Vec::new()).unwrap()
}

fn record(data: &[u8]) -> Frame {
    Frame::new(FrameType::Record, Some([0, 0, 0, 0, 0, 0, 0, 1]), data.to_vec()).unwrap()
}

#[test]
fn record_then_end() {
    let mut body = Tracked::new(&[record(b"hello"), end()]);
    let mut calls = Vec::new();
    let mut handlers = Handlers::new().on_records(|r| {
        calls.push(r.to_vec());
        Ok(())
    });

    handle_response(&mut body, &mut handlers).unwrap();
    drop(handlers);

    assert_eq!(calls, [b"hello".to_vec()]);
    assert_eq!(body.closes, 1);
}

#[test]
fn stats_parsed_into_mapping() {
    let stats = Frame::new(
        FrameType::Stats,
        None,
        br#"{"BytesScanned": 100}"#.to_vec(),
    )
    .unwrap();
    let mut body = Tracked::new(&[stats, end()]);
    let mut c = Collected::default();

    handle_response(&mut body, &mut c).unwrap();

    let expected: Stats = [("BytesScanned", 100)].into_iter().collect();
    assert_eq!(c.stats, Some(expected));
    assert!(c.records.is_empty());
}

#[test]
fn exceptions_parsed_into_structure() {
    let doc = br#"{"Exceptions":[{"Code":"X","Offset":"0","Message":"m"}],"Counts":[{"Total":1}]}"#;
    let frame = Frame::new(FrameType::Exception, None, doc.to_vec()).unwrap();
    let mut body = Tracked::new(&[frame, end()]);
    let mut c = Collected::default();

    handle_response(&mut body, &mut c).unwrap();

    assert_eq!(
        c.exceptions,
        [Exceptions {
            exceptions: vec![RecordException {
                code: "X".into(),
                offset: "0".into(),
                message: "m".into(),
            }],
            counts: vec![[("Total".to_owned(), 1)].into_iter().collect()],
        }]
    );
    assert_eq!(c.exceptions[0].total(), 1);
}

#[test]
fn bad_header_checksum_reads_no_payload() {
    let mut frame = record(b"hello");
    frame.header.checksum = frame.header.checksum.wrapping_add(1);
    let mut body = Tracked::new(&[frame]);
    let mut c = Collected::default();

    let err = handle_response(&mut body, &mut c).unwrap_err();

    assert!(matches!(
        err,
        Error::Frame(s3select_proto::Error::Checksum {
            section: s3select_proto::Section::Header,
            ..
        })
    ));
    assert_eq!(body.inner.position(), s3select_proto::HEADER_SIZE as u64);
    assert_eq!(body.closes, 1);
    assert_eq!(c, Collected::default());
}

#[test]
fn unknown_frame_type_aborts() {
    let unknown = Frame::new(FrameType::Unknown(0x7F_0001), None, b"?".to_vec()).unwrap();
    let mut body = Tracked::new(&[record(b"a"), unknown, record(b"b"), end()]);
    let mut c = Collected::default();

    let err = handle_response(&mut body, &mut c).unwrap_err();

    assert!(matches!(err, Error::UnknownFrameType(0x7F_0001)));
    assert_eq!(err.to_string(), "unknown frame type encountered: 8323073");
    assert_eq!(c.records, [b"a".to_vec()]);
    assert_eq!(body.closes, 1);
}

#[test]
fn handler_error_closes_body() {
    let mut body = Tracked::new(&[record(b"a"), record(b"b"), end()]);
    let mut seen = 0;
    let mut handlers = Handlers::new().on_records(|_| {
        seen += 1;
        Err(Error::handler("disk full"))
    });

    let err = handle_response(&mut body, &mut handlers).unwrap_err();
    drop(handlers);

    assert!(matches!(err, Error::Handler(_)));
    assert_eq!(seen, 1);
    assert_eq!(body.closes, 1);
}

#[test]
fn missing_callback_is_reported() {
    let stats = Frame::new(FrameType::Stats, None, b"{}".to_vec()).unwrap();
    let mut body = Tracked::new(&[record(b"a"), stats, end()]);
    let mut handlers = Handlers::new().on_records(|_| Ok(()));

    let err = handle_response(&mut body, &mut handlers).unwrap_err();

    assert!(matches!(err, Error::Unhandled(FrameType::Stats)));
    assert_eq!(body.closes, 1);
}

#[test]
fn continuation_frames_are_silent() {
    let keepalive = Frame::new(FrameType::Continuation, None, Vec::new()).unwrap();
    let mut body = Tracked::new(&[keepalive.clone(), record(b"r"), keepalive, end()]);
    let mut c = Collected::default();

    handle_response(&mut body, &mut c).unwrap();

    assert_eq!(c.records, [b"r".to_vec()]);
}

#[test]
fn nothing_after_end_is_processed() {
    let mut body = Tracked::new(&[record(b"first"), end(), record(b"late")]);
    let mut c = Collected::default();

    handle_response(&mut body, &mut c).unwrap();

    assert_eq!(c.record_text().unwrap(), ["first"]);
}

#[test]
fn empty_body_is_clean() {
    let mut body = Tracked::raw(Vec::new());
    let mut c = Collected::default();

    handle_response(&mut body, &mut c).unwrap();

    assert_eq!(c, Collected::default());
    assert_eq!(body.closes, 1);
}

#[test]
fn truncated_body_is_fatal() {
    let mut bytes = stream(&[record(b"hello"), end()]);
    bytes.truncate(bytes.len() - 14);
    let mut body = Tracked::raw(bytes);
    let mut c = Collected::default();

    let err = handle_response(&mut body, &mut c).unwrap_err();

    assert!(matches!(
        err,
        Error::Frame(s3select_proto::Error::Truncated { .. })
    ));
    assert_eq!(body.closes, 1);
}

#[test]
fn raw_header_with_unmapped_code() {
    let header = FrameHeader::new(1, FrameType::Unknown(5), 0);
    let mut body = Tracked::raw(header.to_bytes().to_vec());
    let mut c = Collected::default();

    let err = handle_response(&mut body, &mut c).unwrap_err();

    assert!(matches!(err, Error::UnknownFrameType(5)));
}

#[test]
fn multiple_records_in_order() {
    let mut body = Tracked::new(&[
        record(b"{\"a\":1}\n{\"a\":2}\n"),
        record(b"{\"a\":3}\n"),
        end(),
    ]);
    let mut lines = Vec::new();
    let mut handlers = Handlers::new().on_records(|chunk| {
        let text = std::str::from_utf8(chunk).map_err(Error::handler)?;
        lines.extend(text.lines().map(str::to_owned));
        Ok(())
    });

    handle_response(&mut body, &mut handlers).unwrap();
    drop(handlers);

    assert_eq!(lines, [r#"{"a":1}"#, r#"{"a":2}"#, r#"{"a":3}"#]);
}

/// A hand-written handler relying on trait defaults for stats.
struct CountRecords(usize);

impl ResponseHandler for CountRecords {
    fn handle_records(&mut self, records: &[u8]) -> s3select::Result<()> {
        self.0 += records.len();
        Ok(())
    }

    fn handle_exceptions(&mut self, _exceptions: Exceptions) -> s3select::Result<()> {
        Ok(())
    }
}

#[test]
fn trait_object_handler() {
    let mut body = Tracked::new(&[record(b"12345"), end()]);
    let mut counter = CountRecords(0);
    let handler: &mut dyn ResponseHandler = &mut counter;

    handle_response(&mut body, handler).unwrap();

    assert_eq!(counter.0, 5);
}

#[test]
fn record_shorter_than_offset_dispatches_without_data() {
    let mut raw = FrameHeader::new(1, FrameType::Record, 3).to_bytes().to_vec();
    raw.extend_from_slice(b"abc");
    raw.extend_from_slice(&crc32fast::hash(b"abc").to_be_bytes());
    raw.extend_from_slice(&end().header.to_bytes());
    let mut body = Tracked::raw(raw);
    let mut c = Collected::default();

    handle_response(&mut body, &mut c).unwrap();

    assert_eq!(c.records, [Vec::<u8>::new()]);
    assert_eq!(body.closes, 1);
}
