//! The consumer / sink interface (§6): `deliver` per hypothesis, `finish`
//! exactly once on every exit path.

use std::io::{self, Write};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub trait HypothesisSink {
    fn deliver(&mut self, line: &str) -> Result<(), SinkError>;
    fn finish(&mut self);
}

/// Collects delivered lines in memory. The reference sink for tests.
#[derive(Debug, Default)]
pub struct VecSink {
    pub lines: Vec<String>,
    pub finished: bool,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HypothesisSink for VecSink {
    fn deliver(&mut self, line: &str) -> Result<(), SinkError> {
        self.lines.push(line.to_string());
        Ok(())
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

/// Wraps a `Write`r (typically a `BufWriter`, as in `kbtool`) as a sink.
pub struct WriteSink<W: Write> {
    writer: W,
    finished: bool,
}

impl<W: Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            finished: false,
        }
    }
}

impl<W: Write> HypothesisSink for WriteSink<W> {
    fn deliver(&mut self, line: &str) -> Result<(), SinkError> {
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    fn finish(&mut self) {
        let _ = self.writer.flush();
        self.finished = true;
    }
}
