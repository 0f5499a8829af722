//! Corpus materialization.
//!
//! A [`Pipeline`] owns one [`Reader`] and one [`Writer`] and turns corpus files
//! into owned, ordered `Vec<Record>`s for training and evaluation code (and back).
//!
//! ```no_run
//! use ironcorpus::{Options, Pipeline};
//! # fn main() -> anyhow::Result<()> {
//! let opts = Options::load("train.options")?;
//! let mut pipe = Pipeline::new();
//! let train = pipe.materialize_with("train.tsv", &opts)?;
//! let tests = pipe.materialize_test_sets(&opts)?;
//! # Ok(())
//! # }
//! ```

use crate::error::{OpenError, PipelineError, ReadError, WriteError};
use crate::io::glob::expand_glob_required;
use crate::io::{Reader, RecordReader, RecordWriter, Writer};
use crate::options::Options;
use crate::record::Record;
use anyhow::Context;
use std::path::Path;
use tracing::{info, warn};

/// Owns a reader/writer pair and drives whole-corpus reads and writes.
///
/// Every entrypoint that opens a stream also closes it before returning,
/// whether it finished, hit its cap or failed. Dropping the pipeline closes
/// anything still open.
pub struct Pipeline {
    reader: Box<dyn Reader>,
    writer: Box<dyn Writer>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::with_io(RecordReader::new(), RecordWriter::new())
    }
}

impl Pipeline {
    /// A pipeline over the tab-delimited line format.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A pipeline over any reader/writer pair; the two need not share a format.
    pub fn with_io(reader: impl Reader + 'static, writer: impl Writer + 'static) -> Self {
        Self {
            reader: Box::new(reader),
            writer: Box::new(writer),
        }
    }

    /// A pipeline over JSON Lines.
    #[cfg(feature = "io-jsonl")]
    #[must_use]
    pub fn jsonl() -> Self {
        use crate::io::jsonl::{JsonlReader, JsonlWriter};
        Self::with_io(JsonlReader::new(), JsonlWriter::new())
    }

    /// Open `path` on the reader, replacing any input already open.
    ///
    /// # Errors
    ///
    /// Returns [`OpenError`] if the file cannot be opened.
    pub fn open_input(&mut self, path: impl AsRef<Path>) -> Result<(), OpenError> {
        self.reader.start(path.as_ref())
    }

    /// Close the input. A no-op when nothing is open.
    pub fn close_input(&mut self) {
        self.reader.finish();
    }

    /// Create (truncating) `path` on the writer.
    ///
    /// # Errors
    ///
    /// Returns [`OpenError`] if the file cannot be created.
    pub fn open_output(&mut self, path: impl AsRef<Path>) -> Result<(), OpenError> {
        self.writer.start(path.as_ref())
    }

    /// Flush and close the output. A no-op when nothing is open.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Io`] if the final flush fails.
    pub fn close_output(&mut self) -> Result<(), WriteError> {
        self.writer.finish()
    }

    /// Pull the next record as an owned copy.
    ///
    /// `Ok(None)` at end of input, on a blank line, or when no input is open.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError`] if the line cannot be read or parsed.
    pub fn next_record(&mut self) -> Result<Option<Record>, ReadError> {
        Ok(self.reader.next()?.map(|scratch| {
            let mut owned = Record::default();
            owned.copy_from(scratch);
            owned
        }))
    }

    /// Write one record to the open output.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::NotOpen`] if no output is open; the caller may open
    /// one and retry.
    pub fn write_record(&mut self, record: &Record) -> Result<(), WriteError> {
        self.writer.write(record)
    }

    /// Read `path` into a new vector, stopping after `cap` records if given.
    ///
    /// Stops at end of file or at the first blank line. The input is closed on
    /// every return path.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Open`] without reading anything if the file
    /// cannot be opened, or [`PipelineError::Read`] if the scan fails; records
    /// read before the failure are discarded.
    pub fn materialize(
        &mut self,
        path: impl AsRef<Path>,
        cap: Option<usize>,
    ) -> Result<Vec<Record>, PipelineError> {
        let mut out = Vec::new();
        self.materialize_into(path, cap, &mut out)?;
        Ok(out)
    }

    /// [`materialize`](Self::materialize) appending into `out`; returns how many
    /// records were added. On error `out` is restored to its original length.
    ///
    /// # Errors
    ///
    /// Same as [`materialize`](Self::materialize).
    pub fn materialize_into(
        &mut self,
        path: impl AsRef<Path>,
        cap: Option<usize>,
        out: &mut Vec<Record>,
    ) -> Result<usize, PipelineError> {
        let path = path.as_ref();
        self.open_input(path)?;

        let before = out.len();
        let drained = self.drain(cap, out);
        self.close_input();

        match drained {
            Ok(n) => {
                info!(path = %path.display(), instances = n, "materialized corpus");
                Ok(n)
            }
            Err(e) => {
                out.truncate(before);
                warn!(path = %path.display(), error = %e, "corpus scan aborted");
                Err(e.into())
            }
        }
    }

    fn drain(&mut self, cap: Option<usize>, out: &mut Vec<Record>) -> Result<usize, ReadError> {
        let mut count = 0;
        while cap != Some(count) {
            let Some(scratch) = self.reader.next()? else {
                break;
            };
            let mut owned = Record::default();
            owned.copy_from(scratch);
            out.push(owned);
            count += 1;
        }
        Ok(count)
    }

    /// Materialize `path` capped by [`Options::instance_cap`].
    ///
    /// # Errors
    ///
    /// Same as [`materialize`](Self::materialize).
    pub fn materialize_with(
        &mut self,
        path: impl AsRef<Path>,
        options: &Options,
    ) -> Result<Vec<Record>, PipelineError> {
        self.materialize(path, options.instance_cap())
    }

    /// Materialize several files, in order, into one vector.
    ///
    /// `cap` bounds the combined count; files after the cap is reached are not
    /// opened.
    ///
    /// # Errors
    ///
    /// The first open or read failure aborts the whole call.
    pub fn materialize_many<I, P>(
        &mut self,
        paths: I,
        cap: Option<usize>,
    ) -> Result<Vec<Record>, PipelineError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut out = Vec::new();
        for path in paths {
            let remaining = cap.map(|c| c.saturating_sub(out.len()));
            if remaining == Some(0) {
                break;
            }
            self.materialize_into(path, remaining, &mut out)?;
        }
        Ok(out)
    }

    /// Materialize every file matching `pattern`, in sorted path order.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is invalid, matches nothing, or any
    /// matched file fails to materialize.
    pub fn materialize_glob(
        &mut self,
        pattern: &str,
        cap: Option<usize>,
    ) -> anyhow::Result<Vec<Record>> {
        let files = expand_glob_required(pattern)?;
        self.materialize_many(&files, cap)
            .with_context(|| format!("materialize corpus files matching {pattern}"))
    }

    /// One materialized set per entry of [`Options::test_files`], each capped
    /// independently.
    ///
    /// # Errors
    ///
    /// The first failing test file aborts the call.
    pub fn materialize_test_sets(
        &mut self,
        options: &Options,
    ) -> Result<Vec<Vec<Record>>, PipelineError> {
        options
            .test_files
            .iter()
            .map(|path| self.materialize_with(path, options))
            .collect()
    }

    /// Write `records` to `path`, replacing its contents; returns the count.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Open`] if the file cannot be created or
    /// [`PipelineError::Write`] if a write or the final flush fails.
    pub fn write_all(
        &mut self,
        path: impl AsRef<Path>,
        records: &[Record],
    ) -> Result<usize, PipelineError> {
        let path = path.as_ref();
        self.open_output(path)?;

        let written = records.iter().try_for_each(|r| self.writer.write(r));
        let closed = self.close_output();
        written?;
        closed?;

        info!(path = %path.display(), instances = records.len(), "wrote corpus");
        Ok(records.len())
    }

    /// Stream `src` through this pipeline's reader into `dst` through its
    /// writer without materializing; returns the number of records copied.
    ///
    /// Pair different formats with [`with_io`](Self::with_io) to convert a
    /// corpus, or use a compressed `dst` extension to compress it.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be opened or any record fails
    /// to read or write. Both streams are closed before returning.
    pub fn convert(
        &mut self,
        src: impl AsRef<Path>,
        dst: impl AsRef<Path>,
    ) -> anyhow::Result<usize> {
        let (src, dst) = (src.as_ref(), dst.as_ref());
        self.open_input(src)?;
        if let Err(e) = self.open_output(dst) {
            self.close_input();
            return Err(e.into());
        }

        let copied = self.pump();
        self.close_input();
        let closed = self.close_output();
        let n = copied.with_context(|| {
            format!("convert {} -> {}", src.display(), dst.display())
        })?;
        closed.with_context(|| format!("finish {}", dst.display()))?;

        info!(src = %src.display(), dst = %dst.display(), instances = n, "converted corpus");
        Ok(n)
    }

    fn pump(&mut self) -> Result<usize, PipelineError> {
        let mut n = 0;
        while let Some(record) = self.reader.next()? {
            self.writer.write(record)?;
            n += 1;
        }
        Ok(n)
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.reader.finish();
        if let Err(e) = self.writer.finish() {
            warn!(error = %e, "flush on drop failed");
        }
    }
}
