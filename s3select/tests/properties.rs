//! Property tests for response dispatch.

#![allow(clippy::unwrap_used, clippy::missing_docs_in_private_items)]

use proptest::prelude::*;
use s3select::{Collected, Error, Frame, FrameType, handle_response};
use s3select_proto::encode;

fn encode_all(frames: &[Frame]) -> Vec<u8> {
    let mut buf = Vec::new();
    for frame in frames {
        encode(&mut buf, frame).unwrap();
    }
    buf
}

proptest! {
    #[test]
    fn record_chunks_arrive_in_order(
        chunks in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..32), 0..16),
        keepalive_every in 1usize..4,
    ) {
        let mut frames = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i % keepalive_every == 0 {
                frames.push(Frame::new(FrameType::Continuation, None, Vec::new()).unwrap());
            }
            frames.push(Frame::new(FrameType::Record, None, chunk.clone()).unwrap());
        }
        frames.push(Frame::new(FrameType::End, None, Vec::new()).unwrap());

        let buf = encode_all(&frames);
        let mut c = Collected::default();
        handle_response(&buf[..], &mut c).unwrap();

        prop_assert_eq!(c.records, chunks);
    }

    #[test]
    fn unknown_codes_never_reach_handlers(code in 0u32..0x80_0000) {
        let buf = encode_all(&[Frame::new(FrameType::Unknown(code), None, b"payload".to_vec()).unwrap()]);
        let mut c = Collected::default();

        let err = handle_response(&buf[..], &mut c).unwrap_err();

        prop_assert!(matches!(err, Error::UnknownFrameType(raw) if raw == code));
        prop_assert_eq!(c, Collected::default());
    }
}
