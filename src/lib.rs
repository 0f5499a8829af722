//! # Ironcorpus
//!
//! Reading, writing and materializing **labeled text corpora** for supervised
//! text-classification training.
//!
//! ## Key Features
//!
//! - **Pluggable formats** - every format implements the [`Reader`]/[`Writer`] traits
//! - **Tab-delimited line format** - [`RecordReader`]/[`RecordWriter`]
//! - **JSON Lines** - [`JsonlReader`](io::jsonl::JsonlReader)/[`JsonlWriter`](io::jsonl::JsonlWriter) (feature `io-jsonl`)
//! - **Transparent compression** - gzip, zstd, bzip2 and xz by extension or magic bytes
//! - **Capped materialization** - [`Pipeline::materialize`] with an optional record cap
//! - **Multi-file corpora** - lists of files and glob patterns
//!
//! ## Quick Start
//!
//! ```no_run
//! use ironcorpus::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let mut pipe = Pipeline::new();
//!
//! // At most 10 000 training records
//! let train = pipe.materialize("train.tsv", Some(10_000))?;
//!
//! let mut metric = Metric::default();
//! for record in &train {
//!     record.evaluate("pos", &mut metric);
//! }
//! println!("{metric}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Line Format
//!
//! ```text
//! pos\tgood movie here \n
//! neg\tbad film indeed \n
//! ```
//!
//! Field 0 is the label, field 1 the space-separated tokens. The writer leaves
//! a space after the last token. A blank line ends reading, so anything after
//! it is ignored.
//!
//! ## Module Overview
//!
//! - [`record`] - the [`Record`] type
//! - [`io`] - reader/writer traits, formats, compression and globbing
//! - [`pipeline`] - the [`Pipeline`] orchestrator
//! - [`options`] - run [`Options`] and option-file loading
//! - [`metric`] - label accuracy [`Metric`]
//! - [`error`] - error types
//! - [`testing`] - fixtures and assertions for tests

pub mod error;
pub mod io;
pub mod metric;
pub mod options;
pub mod pipeline;
pub mod record;
pub mod testing;

pub use error::{ConfigError, OpenError, PipelineError, ReadError, WriteError};
pub use io::{Reader, RecordReader, RecordWriter, Writer};
pub use metric::Metric;
pub use options::Options;
pub use pipeline::Pipeline;
pub use record::Record;

#[cfg(feature = "io-jsonl")]
pub use io::jsonl::{JsonlReader, JsonlWriter};
