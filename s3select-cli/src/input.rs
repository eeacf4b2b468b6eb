//! Opening response bodies from files or stdin.

use std::fs::File;
use std::io::{self, BufReader};

use anyhow::{Context, Result};
use s3select::Body;

/// Opens `path` as a response body; `-` reads stdin.
pub(crate) fn open(path: &str) -> Result<Box<dyn Body>> {
    if path == "-" {
        return Ok(Box::new(io::stdin()));
    }
    let file = File::open(path).with_context(|| format!("failed to open {path}"))?;
    Ok(Box::new(BufReader::new(file)))
}
