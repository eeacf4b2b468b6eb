//! Frame dispatch loop.

use s3select_proto::{DEFAULT_MAX_PAYLOAD, Frame, FrameReader, FrameType};

use crate::document::parse;
use crate::{Body, Error, ResponseHandler, Result};

/// Handles a response body with default settings.
///
/// See [`ResponseDispatcher::handle_response`].
pub fn handle_response<B, H>(body: B, handler: &mut H) -> Result<()>
where
    B: Body,
    H: ResponseHandler + ?Sized,
{
    ResponseDispatcher::new().handle_response(body, handler)
}

/// Routes one frame to the matching handler callback.
///
/// `continuation` and `end` frames are accepted without calling the
/// handler. A frame with an unknown type code fails with
/// [`Error::UnknownFrameType`] before any callback runs.
pub fn dispatch<H>(frame: &Frame, handler: &mut H) -> Result<()>
where
    H: ResponseHandler + ?Sized,
{
    match frame.frame_type() {
        FrameType::Record => handler.handle_records(frame.data()),
        FrameType::Stats => handler.handle_stats(parse(frame)?),
        FrameType::Exception => handler.handle_exceptions(parse(frame)?),
        FrameType::Continuation => {
            tracing::trace!("continuation frame");
            Ok(())
        }
        FrameType::End => {
            tracing::debug!("end frame");
            Ok(())
        }
        FrameType::Unknown(code) => Err(Error::UnknownFrameType(code)),
    }
}

/// Drives a [`FrameReader`] over a response body and dispatches every
/// frame to a [`ResponseHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseDispatcher {
    /// Largest payload accepted from the stream.
    max_payload: u32,
}

impl Default for ResponseDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseDispatcher {
    /// Creates a dispatcher with the default payload limit.
    pub const fn new() -> Self {
        Self {
            max_payload: DEFAULT_MAX_PAYLOAD,
        }
    }

    /// Sets the largest payload length accepted from the stream.
    #[must_use]
    pub const fn max_payload(mut self, max_payload: u32) -> Self {
        self.max_payload = max_payload;
        self
    }

    /// Decodes `body` frame by frame and dispatches each frame to `handler`.
    ///
    /// Returns after the `end` frame or when the body is exhausted. The
    /// body is closed exactly once before returning, whether dispatch
    /// succeeded or not. If dispatch fails, that error is returned even if
    /// closing also fails.
    pub fn handle_response<B, H>(&self, mut body: B, handler: &mut H) -> Result<()>
    where
        B: Body,
        H: ResponseHandler + ?Sized,
    {
        let result = self.drive(&mut body, handler);
        let closed = body.close();
        match result {
            Ok(frames) => {
                closed?;
                tracing::debug!(frames, "response handled");
                Ok(())
            }
            Err(e) => {
                tracing::debug!(error = %e, "response aborted");
                Err(e)
            }
        }
    }

    /// Runs the dispatch loop, returning the number of frames handled.
    fn drive<B, H>(&self, body: &mut B, handler: &mut H) -> Result<usize>
    where
        B: Body,
        H: ResponseHandler + ?Sized,
    {
        let mut count = 0;
        for frame in FrameReader::with_max_payload(body, self.max_payload) {
            dispatch(&frame?, handler)?;
            count += 1;
        }
        Ok(count)
    }
}
