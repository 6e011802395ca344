// In: src/stream/mod.rs

//! The solution-stream engine: wiring the line-level state machine to the
//! lazy collection, for both operating modes.
//!
//! Batch mode (`parse_lines`) runs the whole pipeline to completion on the
//! caller's thread over already-materialized output. Streaming mode
//! (`parse_reader`) pumps the same machine from a dedicated producer thread
//! reading a live line source, so the caller observes solutions as the
//! external solver emits them.

pub mod collection;
pub mod machine;


use std::collections::BTreeMap;
use std::io::BufRead;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::codec::statements::parse_document;
use crate::config::ParseOptions;
use crate::error::DznError;
use crate::model::{Solution, Status, VariableType};

pub use collection::{SolutionStream, StreamProducer};
pub use machine::StreamState;

//==================================================================================
// 1. Stream Options
//==================================================================================

/// Options for one solving session's output stream.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "snake_case")]
pub struct StreamOptions {
    /// Retention mode of the resulting collection. See `SolutionStream`.
    #[serde(default = "default_true")]
    pub keep: bool,

    /// If true (the default), each solution block is decoded into structured
    /// assignments; if false, solutions carry only their raw dzn text.
    #[serde(default = "default_true")]
    pub structured: bool,

    /// Value-level decode options for structured mode.
    #[serde(default)]
    pub parse: ParseOptions,

    /// Optional type descriptors (from the model compiler's interface dump)
    /// directing the decode of each variable.
    #[serde(default)]
    pub var_types: Option<BTreeMap<String, VariableType>>,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            keep: true,
            structured: true,
            parse: ParseOptions::default(),
            var_types: None,
        }
    }
}

impl StreamOptions {
    pub fn raw() -> Self {
        Self {
            structured: false,
            ..Self::default()
        }
    }
}

fn default_true() -> bool {
    true
}

//==================================================================================
// 2. Entry Points
//==================================================================================

/// Batch mode: parses fully materialized solver output lines into a
/// `SolutionStream`. Deterministic, single-threaded, no suspension.
pub fn parse_lines<I, S>(lines: I, opts: &StreamOptions) -> SolutionStream
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let (producer, stream) = SolutionStream::channel(opts.keep);
    pump(
        lines.into_iter().map(|l| Ok(l.as_ref().to_string())),
        &producer,
        opts,
    );
    stream
}

/// Batch mode over a full output block, split into lines.
pub fn parse_output(output: &str, opts: &StreamOptions) -> SolutionStream {
    parse_lines(output.lines(), opts)
}

/// Streaming mode: spawns a producer thread that reads lines from a live
/// source (typically a solver process's stdout) and populates the returned
/// collection as solutions arrive.
pub fn parse_reader<R>(reader: R, opts: StreamOptions) -> SolutionStream
where
    R: BufRead + Send + 'static,
{
    let (producer, stream) = SolutionStream::channel(opts.keep);
    let spawned = std::thread::Builder::new()
        .name("dzn-solution-stream".to_string())
        .spawn(move || pump(reader.lines(), &producer, &opts));
    if let Err(e) = spawned {
        // The producer was consumed by the failed spawn, so the stream sees
        // an immediate disconnect and stays Incomplete and empty.
        warn!("failed to spawn solution-stream producer: {}", e);
    }
    stream
}

/// Convenience entry point for callers that expect exactly one (final)
/// solution and want failure semantics instead of a status-tagged empty
/// collection. Blocks until the stream finishes; for optimization runs the
/// last solution is the best one found.
pub fn expect_one(stream: &mut SolutionStream) -> Result<Solution, DznError> {
    let last = if stream.keep() {
        stream.wait()?.last().cloned()
    } else {
        let mut last = None;
        while let Some(sol) = stream.next_solution()? {
            last = Some(sol);
        }
        last
    };
    match stream.status() {
        Status::Unsatisfiable => Err(DznError::Unsatisfiable),
        Status::Unbounded => Err(DznError::Unbounded),
        Status::UnsatOrUnbounded => Err(DznError::UnsatOrUnbounded),
        Status::Unknown => Err(DznError::NoSolution),
        Status::Error => Err(DznError::Solver(stream.log())),
        Status::Complete | Status::Incomplete => last.ok_or(DznError::NoSolution),
    }
}

//==================================================================================
// 3. The Producer Loop
//==================================================================================

/// Drives the state machine over a line source and feeds the queue.
///
/// A solution is decoded fully before it becomes visible in the queue; a
/// decode failure aborts the whole stream with an `Error` status (a safe
/// resume point after a mid-document parse error cannot be guaranteed), but
/// never corrupts solutions already enqueued.
fn pump<I>(lines: I, producer: &StreamProducer, opts: &StreamOptions)
where
    I: Iterator<Item = std::io::Result<String>>,
{
    let mut machine = StreamState::new();
    for line in lines {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                producer.set_status(Status::Error);
                producer.set_log(format!("{}\nread error: {}", machine.log(), e));
                return;
            }
        };
        if let Some(raw) = machine.feed(&line) {
            match build_solution(raw, opts) {
                Ok(solution) => {
                    if !producer.send(solution) {
                        // Consumer abandoned the stream.
                        return;
                    }
                }
                Err(e) => {
                    producer.set_status(Status::Error);
                    producer.set_log(format!("{}\ndecode error: {}", machine.log(), e));
                    return;
                }
            }
        }
    }
    producer.set_status(machine.status());
    producer.set_log(machine.log());
}

fn build_solution(raw: String, opts: &StreamOptions) -> Result<Solution, DznError> {
    if !opts.structured {
        return Ok(Solution::new(BTreeMap::new(), raw));
    }
    let doc = parse_document(&raw, opts.var_types.as_ref(), &opts.parse)?;
    Ok(Solution::new(doc.assignments, raw))
}
