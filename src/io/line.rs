//! The tab-delimited line format.
//!
//! One record per line:
//!
//! ```text
//! <label>\t<token> <token> ... <token> \n
//! ```
//!
//! # Format notes
//! - Only the first two tab-separated fields are read; later fields are ignored.
//! - The writer emits a space after **every** token, so each line ends with
//!   `" \n"`. Existing corpora depend on this; the reader drops the resulting
//!   empty token.
//! - An empty line ends the scan, even when more records follow it.
//! - Tabs or newlines inside labels/tokens are not escaped and corrupt the line.
//! - `sparse_features` is never written or read by this format.

use crate::error::{OpenError, ReadError, WriteError};
use crate::io::stream::{LineSink, LineSource};
use crate::io::{Reader, Writer};
use crate::record::Record;
use std::path::Path;

/// [`Reader`] for the tab-delimited line format.
#[derive(Default)]
pub struct RecordReader {
    source: LineSource,
    record: Record,
}

impl RecordReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reader for RecordReader {
    fn start(&mut self, path: &Path) -> Result<(), OpenError> {
        self.record.clear();
        self.source.open(path)
    }

    fn next(&mut self) -> Result<Option<&Record>, ReadError> {
        self.record.clear();
        let Some((line_no, line)) = self.source.next_line()? else {
            return Ok(None);
        };
        if let Err(e) = parse_line(line, line_no, &mut self.record) {
            self.source.terminate();
            self.record.clear();
            return Err(e);
        }
        Ok(Some(&self.record))
    }

    fn finish(&mut self) {
        self.source.close();
    }

    fn is_open(&self) -> bool {
        self.source.is_open()
    }
}

/// Parse `label\ttokens` into `out`, which must already be cleared.
pub(crate) fn parse_line(line: &str, line_no: usize, out: &mut Record) -> Result<(), ReadError> {
    let mut fields = line.split('\t');
    let label = fields.next().unwrap_or_default();
    let Some(tokens) = fields.next() else {
        return Err(ReadError::Malformed {
            line: line_no,
            reason: "missing tab-separated token field".into(),
        });
    };

    out.label.push_str(label);
    out.tokens
        .extend(tokens.split(' ').filter(|t| !t.is_empty()).map(str::to_owned));
    if out.tokens.is_empty() {
        return Err(ReadError::Malformed {
            line: line_no,
            reason: "token field is empty".into(),
        });
    }
    Ok(())
}

/// [`Writer`] for the tab-delimited line format.
#[derive(Default)]
pub struct RecordWriter {
    sink: LineSink,
    buf: String,
}

impl RecordWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Writer for RecordWriter {
    fn start(&mut self, path: &Path) -> Result<(), OpenError> {
        self.sink.open(path)
    }

    fn write(&mut self, record: &Record) -> Result<(), WriteError> {
        if !self.sink.is_open() {
            return Err(WriteError::NotOpen);
        }
        self.buf.clear();
        format_line(record, &mut self.buf);
        self.sink.write_all(self.buf.as_bytes())
    }

    fn finish(&mut self) -> Result<(), WriteError> {
        self.sink.close()
    }

    fn is_open(&self) -> bool {
        self.sink.is_open()
    }
}

fn format_line(record: &Record, out: &mut String) {
    out.push_str(&record.label);
    out.push('\t');
    for token in &record.tokens {
        out.push_str(token);
        out.push(' ');
    }
    out.push('\n');
}
