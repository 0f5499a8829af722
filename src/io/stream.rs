//! Open/close bookkeeping shared by every reader and writer.

use crate::error::{OpenError, ReadError, WriteError};
use crate::io::compression::{CorpusWriter, create_writer, open_reader};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

struct OpenInput {
    reader: Box<dyn BufRead>,
    path: PathBuf,
    line: usize,
    exhausted: bool,
}

/// A line-oriented input stream that can be opened, drained and closed.
///
/// Once end of stream, a blank line or an error has been seen the source stays
/// exhausted until it is reopened.
#[derive(Default)]
pub(crate) struct LineSource {
    input: Option<OpenInput>,
    buf: String,
}

impl LineSource {
    pub(crate) fn open(&mut self, path: &Path) -> Result<(), OpenError> {
        self.close();
        match open_reader(path) {
            Ok(reader) => {
                debug!(path = %path.display(), "opened corpus for reading");
                self.input = Some(OpenInput {
                    reader,
                    path: path.to_path_buf(),
                    line: 0,
                    exhausted: false,
                });
                Ok(())
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot open corpus for reading");
                Err(OpenError::read(path, e))
            }
        }
    }

    pub(crate) fn close(&mut self) {
        if let Some(input) = self.input.take() {
            debug!(path = %input.path.display(), lines = input.line, "closed corpus");
        }
        self.buf.clear();
    }

    pub(crate) fn is_open(&self) -> bool {
        self.input.is_some()
    }

    /// End the current scan after a line the caller could not parse.
    pub(crate) fn terminate(&mut self) {
        if let Some(input) = self.input.as_mut() {
            input.exhausted = true;
        }
    }

    /// Next non-terminal line with its 1-based number, line ending stripped.
    ///
    /// `Ok(None)` at end of stream, on an empty line, and when nothing is open.
    pub(crate) fn next_line(&mut self) -> Result<Option<(usize, &str)>, ReadError> {
        let Some(input) = self.input.as_mut() else {
            return Ok(None);
        };
        if input.exhausted {
            return Ok(None);
        }

        self.buf.clear();
        let n = match input.reader.read_line(&mut self.buf) {
            Ok(n) => n,
            Err(source) => {
                input.exhausted = true;
                warn!(path = %input.path.display(), line = input.line + 1, error = %source, "read failed");
                return Err(ReadError::Io {
                    line: input.line + 1,
                    source,
                });
            }
        };
        if n == 0 {
            input.exhausted = true;
            return Ok(None);
        }
        input.line += 1;

        let line = self.buf.trim_end_matches('\n').trim_end_matches('\r');
        if line.is_empty() {
            debug!(path = %input.path.display(), line = input.line, "blank line ends scan");
            input.exhausted = true;
            return Ok(None);
        }
        Ok(Some((input.line, line)))
    }
}

struct OpenOutput {
    writer: CorpusWriter,
    path: PathBuf,
}

/// An output stream that accepts whole serialized lines.
#[derive(Default)]
pub(crate) struct LineSink {
    output: Option<OpenOutput>,
}

impl LineSink {
    pub(crate) fn open(&mut self, path: &Path) -> Result<(), OpenError> {
        if let Err(e) = self.close() {
            warn!(error = %e, "flush of previous output failed");
        }
        match create_writer(path) {
            Ok(writer) => {
                debug!(path = %path.display(), "opened corpus for writing");
                self.output = Some(OpenOutput {
                    writer,
                    path: path.to_path_buf(),
                });
                Ok(())
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot open corpus for writing");
                Err(OpenError::write(path, e))
            }
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.output.is_some()
    }

    pub(crate) fn path(&self) -> Option<&Path> {
        self.output.as_ref().map(|o| o.path.as_path())
    }

    pub(crate) fn write_all(&mut self, bytes: &[u8]) -> Result<(), WriteError> {
        let output = self.output.as_mut().ok_or(WriteError::NotOpen)?;
        output.writer.write_all(bytes).map_err(|source| WriteError::Io {
            path: output.path.clone(),
            source,
        })
    }

    /// Flush, write any codec trailer and release the stream.
    pub(crate) fn close(&mut self) -> Result<(), WriteError> {
        let Some(output) = self.output.take() else {
            return Ok(());
        };
        match output.writer.finish() {
            Ok(()) => {
                debug!(path = %output.path.display(), "closed corpus output");
                Ok(())
            }
            Err(source) => {
                warn!(path = %output.path.display(), error = %source, "finishing corpus output failed");
                Err(WriteError::Io {
                    path: output.path,
                    source,
                })
            }
        }
    }
}
