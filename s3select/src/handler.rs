//! Per-frame-type callbacks.

use std::fmt;

use s3select_proto::FrameType;

use crate::{Error, Exceptions, Result, Stats};

/// Receives the payloads of data-bearing frames.
///
/// Every method defaults to returning [`Error::Unhandled`], so an
/// implementation only needs the callbacks for frame kinds it expects.
/// Returning an error from any callback aborts dispatch.
pub trait ResponseHandler {
    /// Handles the raw bytes of one `record` frame.
    ///
    /// A record never spans frames, but one frame may hold several
    /// records; splitting them is up to the implementation.
    fn handle_records(&mut self, records: &[u8]) -> Result<()> {
        let _ = records;
        Err(Error::Unhandled(FrameType::Record))
    }

    /// Handles the parsed document of one `stats` frame.
    fn handle_stats(&mut self, stats: Stats) -> Result<()> {
        let _ = stats;
        Err(Error::Unhandled(FrameType::Stats))
    }

    /// Handles the parsed document of one `exception` frame.
    fn handle_exceptions(&mut self, exceptions: Exceptions) -> Result<()> {
        let _ = exceptions;
        Err(Error::Unhandled(FrameType::Exception))
    }
}

impl<H: ResponseHandler + ?Sized> ResponseHandler for &mut H {
    fn handle_records(&mut self, records: &[u8]) -> Result<()> {
        (**self).handle_records(records)
    }

    fn handle_stats(&mut self, stats: Stats) -> Result<()> {
        (**self).handle_stats(stats)
    }

    fn handle_exceptions(&mut self, exceptions: Exceptions) -> Result<()> {
        (**self).handle_exceptions(exceptions)
    }
}

type RecordsFn<'a> = Box<dyn FnMut(&[u8]) -> Result<()> + 'a>;
type StatsFn<'a> = Box<dyn FnMut(Stats) -> Result<()> + 'a>;
type ExceptionsFn<'a> = Box<dyn FnMut(Exceptions) -> Result<()> + 'a>;

/// A [`ResponseHandler`] assembled from closures.
///
/// Slots left empty behave like the trait defaults and fail with
/// [`Error::Unhandled`] if their frame kind arrives. Use
/// [`Handlers::ignore_stats`] and friends to accept and drop a kind.
#[derive(Default)]
#[must_use = "a Handlers set does nothing until passed to a dispatcher"]
pub struct Handlers<'a> {
    /// Callback for `record` frames.
    records: Option<RecordsFn<'a>>,
    /// Callback for `stats` frames.
    stats: Option<StatsFn<'a>>,
    /// Callback for `exception` frames.
    exceptions: Option<ExceptionsFn<'a>>,
}

impl<'a> Handlers<'a> {
    /// Creates a handler set with no callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the callback for `record` frames.
    pub fn on_records(mut self, f: impl FnMut(&[u8]) -> Result<()> + 'a) -> Self {
        self.records = Some(Box::new(f));
        self
    }

    /// Sets the callback for `stats` frames.
    pub fn on_stats(mut self, f: impl FnMut(Stats) -> Result<()> + 'a) -> Self {
        self.stats = Some(Box::new(f));
        self
    }

    /// Sets the callback for `exception` frames.
    pub fn on_exceptions(mut self, f: impl FnMut(Exceptions) -> Result<()> + 'a) -> Self {
        self.exceptions = Some(Box::new(f));
        self
    }

    /// Accepts and discards `stats` frames.
    pub fn ignore_stats(self) -> Self {
        self.on_stats(|_| Ok(()))
    }

    /// Accepts and discards `exception` frames.
    pub fn ignore_exceptions(self) -> Self {
        self.on_exceptions(|_| Ok(()))
    }
}

impl ResponseHandler for Handlers<'_> {
    fn handle_records(&mut self, records: &[u8]) -> Result<()> {
        match &mut self.records {
            Some(f) => f(records),
            None => Err(Error::Unhandled(FrameType::Record)),
        }
    }

    fn handle_stats(&mut self, stats: Stats) -> Result<()> {
        match &mut self.stats {
            Some(f) => f(stats),
            None => Err(Error::Unhandled(FrameType::Stats)),
        }
    }

    fn handle_exceptions(&mut self, exceptions: Exceptions) -> Result<()> {
        match &mut self.exceptions {
            Some(f) => f(exceptions),
            None => Err(Error::Unhandled(FrameType::Exception)),
        }
    }
}

impl fmt::Debug for Handlers<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("records", &self.records.is_some())
            .field("stats", &self.stats.is_some())
            .field("exceptions", &self.exceptions.is_some())
            .finish()
    }
}

/// A [`ResponseHandler`] that keeps everything it receives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collected {
    /// Record chunks, one per `record` frame, in stream order.
    pub records: Vec<Vec<u8>>,
    /// The most recent stats document.
    pub stats: Option<Stats>,
    /// Every exception document, in stream order.
    pub exceptions: Vec<Exceptions>,
}

impl Collected {
    /// Concatenates all record chunks.
    pub fn record_bytes(&self) -> Vec<u8> {
        self.records.concat()
    }

    /// Decodes each record chunk as UTF-8.
    pub fn record_text(&self) -> std::result::Result<Vec<&str>, std::str::Utf8Error> {
        self.records.iter().map(|r| std::str::from_utf8(r)).collect()
    }
}

impl ResponseHandler for Collected {
    fn handle_records(&mut self, records: &[u8]) -> Result<()> {
        self.records.push(records.to_vec());
        Ok(())
    }

    fn handle_stats(&mut self, stats: Stats) -> Result<()> {
        self.stats = Some(stats);
        Ok(())
    }

    fn handle_exceptions(&mut self, exceptions: Exceptions) -> Result<()> {
        self.exceptions.push(exceptions);
        Ok(())
    }
}
