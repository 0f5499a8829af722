//! Helpers for testing code that consumes corpora.
//!
//! - [`CorpusDir`]: a temporary directory that writes corpus files on demand
//! - [`sample_corpus_lines`]: a tiny sentiment corpus with a blank line in it
//! - [`records`] / [`assert_records_match`]: build and compare expected records
//!
//! ```
//! use ironcorpus::Pipeline;
//! use ironcorpus::testing::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dir = CorpusDir::new()?;
//! let path = dir.write("train.tsv", &sample_corpus_lines())?;
//!
//! let got = Pipeline::new().materialize(&path, None)?;
//! assert_records_match(&got, &[("pos", "good movie here"), ("neg", "bad film indeed")]);
//! # Ok(())
//! # }
//! ```

use crate::record::Record;
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Four lines in the tab-delimited format; the third is blank, so readers stop
/// after two records.
#[must_use]
pub fn sample_corpus_lines() -> Vec<&'static str> {
    vec![
        "pos\tgood movie here",
        "neg\tbad film indeed",
        "",
        "pos\tanother one",
    ]
}

/// `n` distinct, well-formed lines with alternating labels.
#[must_use]
pub fn numbered_corpus_lines(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            let label = if i % 2 == 0 { "pos" } else { "neg" };
            format!("{label}\tline {i} text")
        })
        .collect()
}

/// A temporary directory removed on drop.
pub struct CorpusDir {
    dir: TempDir,
}

impl CorpusDir {
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of `name` inside the directory, without creating it.
    #[must_use]
    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write `lines` to `name`, each followed by `\n`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write<S: AsRef<str>>(&self, name: &str, lines: &[S]) -> io::Result<PathBuf> {
        let mut body = String::new();
        for line in lines {
            let _ = writeln!(body, "{}", line.as_ref());
        }
        let path = self.join(name);
        std::fs::write(&path, body)?;
        Ok(path)
    }
}

/// Build records from `(label, "space separated tokens")` pairs.
#[must_use]
pub fn records(expected: &[(&str, &str)]) -> Vec<Record> {
    expected
        .iter()
        .map(|(label, tokens)| Record::new(*label, tokens.split_whitespace()))
        .collect()
}

/// Assert that `actual` has exactly the labels and tokens of `expected`, in order.
///
/// Sparse features are not compared.
///
/// # Panics
///
/// Panics with the first differing index if the records differ.
pub fn assert_records_match(actual: &[Record], expected: &[(&str, &str)]) {
    let expected = records(expected);
    assert_eq!(
        actual.len(),
        expected.len(),
        "Record count mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
    for (i, (a, e)) in actual.iter().zip(&expected).enumerate() {
        assert_eq!(
            (&a.label, &a.tokens),
            (&e.label, &e.tokens),
            "Record mismatch at index {i}"
        );
    }
}
