//! Record readers and writers.
//!
//! [`Reader`] and [`Writer`] are the two capabilities the [`Pipeline`](crate::Pipeline)
//! drives. Each file format is one implementation of both:
//!
//! - [`line`]: the tab-delimited `label<TAB>tokens` format ([`RecordReader`], [`RecordWriter`])
//! - [`jsonl`]: one JSON object per line ([`JsonlReader`](jsonl::JsonlReader),
//!   [`JsonlWriter`](jsonl::JsonlWriter), feature `io-jsonl`)
//!
//! Both formats go through [`compression`], so `train.tsv.gz` and
//! `train.jsonl.zst` work without extra setup.

use crate::error::{OpenError, ReadError, WriteError};
use crate::record::Record;
use std::path::Path;

pub mod compression;
pub mod glob;
pub mod line;
mod stream;

#[cfg_attr(docsrs, doc(cfg(feature = "io-jsonl")))]
#[cfg(feature = "io-jsonl")]
pub mod jsonl;

pub use line::{RecordReader, RecordWriter};

/// Owns an input stream and parses it into a sequence of records.
///
/// A reader keeps one scratch [`Record`] for the whole scan and overwrites it on
/// every [`next`](Reader::next). The returned borrow is only valid until the next
/// pull; copy out anything you need to keep.
pub trait Reader {
    /// Open `path`, closing any stream that is already open.
    ///
    /// # Errors
    ///
    /// Returns [`OpenError`] if the path cannot be opened. The reader is left
    /// closed in that case.
    fn start(&mut self, path: &Path) -> Result<(), OpenError>;

    /// Parse the next record.
    ///
    /// Returns `Ok(None)` both at end of stream and on a blank line; callers
    /// cannot and should not tell the two apart. A reader that is not open also
    /// returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError`] on an I/O failure or a malformed line. The error
    /// ends the scan: later calls return `Ok(None)` until the next
    /// [`start`](Reader::start).
    fn next(&mut self) -> Result<Option<&Record>, ReadError>;

    /// Close the stream if open. Safe to call repeatedly.
    fn finish(&mut self);

    /// Whether a stream is held. Stays `true` after the scan ends, until
    /// [`finish`](Reader::finish).
    fn is_open(&self) -> bool;
}

/// Owns an output stream and serializes records into it one at a time.
pub trait Writer {
    /// Create or truncate `path` for writing.
    ///
    /// # Errors
    ///
    /// Returns [`OpenError`] if the destination cannot be created.
    fn start(&mut self, path: &Path) -> Result<(), OpenError>;

    /// Serialize one record.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::NotOpen`] when no stream is open, leaving the writer
    /// untouched, or [`WriteError::Io`] if the underlying write fails.
    fn write(&mut self, record: &Record) -> Result<(), WriteError>;

    /// Flush and close the stream. A no-op when nothing is open.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Io`] if the final flush or the codec trailer write
    /// fails. The stream is closed regardless.
    fn finish(&mut self) -> Result<(), WriteError>;

    /// Whether [`write`](Writer::write) currently has a destination.
    fn is_open(&self) -> bool;
}
