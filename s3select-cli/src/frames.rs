//! `s3select frames`: list the frames of a response body.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use s3select::Body;
use s3select_proto::{DEFAULT_MAX_PAYLOAD, Frame, FrameReader};

use crate::OutputFormat;

/// Arguments for `s3select frames`.
#[derive(clap::Args)]
pub struct FramesArgs {
    /// Response body to inspect (`-` for stdin).
    #[arg(default_value = "-")]
    pub input: String,

    /// Largest frame payload to accept, in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_PAYLOAD)]
    pub max_payload: u32,

    /// Output format.
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,
}

pub fn run(args: &FramesArgs) -> Result<()> {
    let mut body = crate::input::open(&args.input)?;
    let listed = list(&mut body, args.max_payload);
    body.close()?;
    let frames = listed.with_context(|| format!("failed to decode {}", args.input))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Json => {
            let rows: Vec<_> = frames.iter().map(to_json).collect();
            serde_json::to_writer_pretty(&mut out, &rows)?;
            writeln!(out)?;
        }
        OutputFormat::Table => print_table(&mut out, &frames)?,
    }
    Ok(())
}

/// Decodes every frame of `body`, stopping at the first error.
fn list<B: Body>(body: &mut B, max_payload: u32) -> Result<Vec<Frame>> {
    let mut frames = Vec::new();
    for (i, frame) in FrameReader::with_max_payload(body, max_payload).enumerate() {
        frames.push(frame.with_context(|| format!("frame {i}"))?);
    }
    Ok(frames)
}

fn print_table(out: &mut impl Write, frames: &[Frame]) -> std::io::Result<()> {
    if frames.is_empty() {
        return writeln!(out, "No frames.");
    }
    writeln!(
        out,
        "{:<4} {:<16} {:>3} {:>10} {:<18} {:>10}",
        "#", "TYPE", "VER", "LENGTH", "OFFSET", "DATA"
    )?;
    for (i, frame) in frames.iter().enumerate() {
        writeln!(
            out,
            "{:<4} {:<16} {:>3} {:>10} {:<18} {:>10}",
            i,
            frame.frame_type().to_string(),
            frame.header.version,
            frame.header.payload_length,
            offset_hex(frame).unwrap_or_else(|| "-".into()),
            frame.data().len()
        )?;
    }
    Ok(())
}

fn to_json(frame: &Frame) -> serde_json::Value {
    serde_json::json!({
        "type": frame.frame_type().to_string(),
        "code": frame.frame_type().code(),
        "version": frame.header.version,
        "payload_length": frame.header.payload_length,
        "offset": offset_hex(frame),
        "data_length": frame.data().len(),
    })
}

fn offset_hex(frame: &Frame) -> Option<String> {
    frame.payload.offset.as_ref().map(|offset| {
        offset.iter().fold(String::with_capacity(2 * offset.len()), |mut s, b| {
            let _ = write!(s, "{b:02x}");
            s
        })
    })
}
