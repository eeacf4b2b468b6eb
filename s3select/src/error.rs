//! Error types for response handling.

use s3select_proto::FrameType;

/// Alias for `Result<T, s3select::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned while handling a response stream.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The frame stream was corrupt or truncated.
    #[error(transparent)]
    Frame(#[from] s3select_proto::Error),

    /// A frame's type code is not one this handler understands.
    #[error("unknown frame type encountered: {0}")]
    UnknownFrameType(u32),

    /// A stats or exception payload was not valid UTF-8.
    #[error("{frame_type} payload is not valid UTF-8")]
    Utf8 {
        /// Type of the offending frame.
        frame_type: FrameType,
        /// Underlying decode error.
        #[source]
        source: std::str::Utf8Error,
    },

    /// A stats or exception payload was not the expected JSON document.
    #[error("malformed {frame_type} document")]
    Document {
        /// Type of the offending frame.
        frame_type: FrameType,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The handler set has no callback for a frame kind that arrived.
    #[error("no handler registered for {0} frames")]
    Unhandled(FrameType),

    /// A handler callback aborted dispatch.
    #[error("handler failed: {0}")]
    Handler(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Closing the response body failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wraps an arbitrary error raised inside a handler callback.
    pub fn handler(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Handler(err.into())
    }
}
