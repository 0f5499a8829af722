//! JSON Lines reader and writer.
//!
//! Each record is one JSON object on its own line:
//!
//! ```text
//! {"label":"pos","tokens":["good","movie"],"sparse_features":[]}
//! ```
//!
//! # Notes
//! - `sparse_features` may be omitted on input and defaults to empty.
//! - Unlike the line format, sparse features survive a write/read round trip.
//! - As with the line format, an empty line ends the scan.

use crate::error::{OpenError, ReadError, WriteError};
use crate::io::stream::{LineSink, LineSource};
use crate::io::{Reader, Writer};
use crate::record::Record;
use std::path::Path;

/// [`Reader`] for JSON Lines corpora.
#[derive(Default)]
pub struct JsonlReader {
    source: LineSource,
    record: Record,
}

impl JsonlReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reader for JsonlReader {
    fn start(&mut self, path: &Path) -> Result<(), OpenError> {
        self.record.clear();
        self.source.open(path)
    }

    fn next(&mut self) -> Result<Option<&Record>, ReadError> {
        self.record.clear();
        let Some((line_no, line)) = self.source.next_line()? else {
            return Ok(None);
        };
        match parse_record(line, line_no) {
            Ok(parsed) => {
                self.record = parsed;
                Ok(Some(&self.record))
            }
            Err(e) => {
                self.source.terminate();
                Err(e)
            }
        }
    }

    fn finish(&mut self) {
        self.source.close();
    }

    fn is_open(&self) -> bool {
        self.source.is_open()
    }
}

fn parse_record(line: &str, line_no: usize) -> Result<Record, ReadError> {
    let parsed: Record = serde_json::from_str(line).map_err(|e| ReadError::Malformed {
        line: line_no,
        reason: format!("invalid JSON record: {e}"),
    })?;
    if parsed.tokens.is_empty() {
        return Err(ReadError::Malformed {
            line: line_no,
            reason: "record has no tokens".into(),
        });
    }
    Ok(parsed)
}

/// [`Writer`] for JSON Lines corpora.
#[derive(Default)]
pub struct JsonlWriter {
    sink: LineSink,
    buf: Vec<u8>,
}

impl JsonlWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Writer for JsonlWriter {
    fn start(&mut self, path: &Path) -> Result<(), OpenError> {
        self.sink.open(path)
    }

    fn write(&mut self, record: &Record) -> Result<(), WriteError> {
        let Some(path) = self.sink.path() else {
            return Err(WriteError::NotOpen);
        };
        self.buf.clear();
        serde_json::to_writer(&mut self.buf, record).map_err(|source| WriteError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        self.buf.push(b'\n');
        self.sink.write_all(&self.buf)
    }

    fn finish(&mut self) -> Result<(), WriteError> {
        self.sink.close()
    }

    fn is_open(&self) -> bool {
        self.sink.is_open()
    }
}
