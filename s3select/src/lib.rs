//! Streaming response handler for object-query results.
//!
//! A query response body is a stream of checksummed frames (see
//! [`s3select_proto`]). This crate drives the frame decoder over a
//! [`Body`] and routes each frame to a [`ResponseHandler`]:
//!
//! - `record` frames → [`ResponseHandler::handle_records`] with raw bytes
//! - `stats` frames → [`ResponseHandler::handle_stats`] with parsed [`Stats`]
//! - `exception` frames → [`ResponseHandler::handle_exceptions`] with parsed
//!   [`Exceptions`]
//! - `continuation` and `end` frames are absorbed
//!
//! # Quick start
//!
//! ```no_run
//! use std::fs::File;
//!
//! use s3select::Handlers;
//!
//! let body = File::open("response.bin")?;
//! let mut out = Vec::new();
//! let mut handlers = Handlers::new()
//!     .on_records(|chunk| {
//!         out.extend_from_slice(chunk);
//!         Ok(())
//!     })
//!     .on_stats(|stats| {
//!         eprintln!("scanned {:?} bytes", stats.bytes_scanned());
//!         Ok(())
//!     });
//!
//! s3select::handle_response(body, &mut handlers)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod body;
mod dispatch;
mod document;
mod error;
mod handler;

pub use body::Body;
pub use dispatch::{ResponseDispatcher, dispatch, handle_response};
pub use document::{Exceptions, RecordException, Stats};
pub use error::{Error, Result};
pub use handler::{Collected, Handlers, ResponseHandler};
pub use s3select_proto::{Frame, FrameType};
