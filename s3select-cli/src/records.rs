//! `s3select records`: extract record payloads from a response body.

use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use s3select::{Body, Error, Handlers, ResponseDispatcher, Stats};
use s3select_proto::DEFAULT_MAX_PAYLOAD;

/// Arguments for `s3select records`.
#[derive(clap::Args)]
pub struct RecordsArgs {
    /// Response body to decode (`-` for stdin).
    #[arg(default_value = "-")]
    pub input: String,

    /// Largest frame payload to accept, in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_PAYLOAD)]
    pub max_payload: u32,

    /// Do not print stats or exception documents.
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

pub fn run(args: &RecordsArgs) -> Result<()> {
    let body = crate::input::open(&args.input)?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let stderr = io::stderr();
    let mut diag: Box<dyn Write> = if args.quiet {
        Box::new(io::sink())
    } else {
        Box::new(stderr.lock())
    };

    let dispatcher = ResponseDispatcher::new().max_payload(args.max_payload);
    let summary = extract(&dispatcher, body, &mut out, &mut diag)
        .with_context(|| format!("failed to decode {}", args.input))?;
    out.flush()?;

    tracing::debug!(
        chunks = summary.chunks,
        bytes = summary.bytes,
        "records written"
    );
    Ok(())
}

/// Counts of what [`extract`] wrote.
#[derive(Debug, Default)]
pub(crate) struct Summary {
    pub chunks: usize,
    pub bytes: usize,
}

/// Streams record bytes to `out` and JSON documents to `diag`.
///
/// Stats are printed once, after the body has been fully handled.
pub(crate) fn extract<B: Body>(
    dispatcher: &ResponseDispatcher,
    body: B,
    out: &mut impl Write,
    diag: &mut impl Write,
) -> Result<Summary> {
    let mut summary = Summary::default();
    let mut stats: Option<Stats> = None;

    {
        let mut handlers = Handlers::new()
            .on_records(|chunk| {
                out.write_all(chunk).map_err(Error::handler)?;
                summary.chunks += 1;
                summary.bytes += chunk.len();
                Ok(())
            })
            .on_stats(|doc| {
                stats = Some(doc);
                Ok(())
            })
            .on_exceptions(|doc| {
                serde_json::to_writer(&mut *diag, &doc).map_err(Error::handler)?;
                writeln!(diag).map_err(Error::handler)
            });
        dispatcher.handle_response(body, &mut handlers)?;
    }

    if let Some(stats) = stats {
        serde_json::to_writer(&mut *diag, &stats)?;
        writeln!(diag)?;
    }
    Ok(summary)
}
