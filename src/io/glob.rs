//! Expanding corpus shard patterns such as `data/train-*.tsv.gz`.
//!
//! Large corpora are usually split into shards that must be read in a stable
//! order so that a capped materialization always yields the same prefix. The
//! helpers here turn one or more patterns into a sorted, de-duplicated list of
//! regular files.
//!
//! # Matching rules
//!
//! - Standard glob syntax: `*`, `?`, `**`, `[abc]`, `[!abc]`
//! - Hidden files (a leading `.` in a path component) only match a pattern that
//!   spells the dot out, so editor swap files next to a shard are skipped
//! - Directories that happen to match are skipped
//! - Zero matches is not an error unless you use [`expand_glob_required`]
//!
//! # Examples
//!
//! ```no_run
//! use ironcorpus::io::glob::{expand_glob, expand_globs};
//!
//! let shards = expand_glob("corpus/train/part-*.tsv")?;
//!
//! // Mixed plain and compressed shards, each file listed once.
//! let mixed = expand_globs(["corpus/train/*.tsv", "corpus/train/*.tsv.gz"])?;
//! # use anyhow::Error; Ok::<(), Error>(())
//! ```

use anyhow::{Context, Result, bail};
use glob::{MatchOptions, glob_with};
use std::collections::BTreeSet;
use std::path::PathBuf;

const SHARD_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: true,
};

/// Expand `pattern` into the matching regular files, sorted lexicographically.
///
/// # Examples
///
/// ```no_run
/// use ironcorpus::io::glob::expand_glob;
///
/// // Every shard under any language directory.
/// let files = expand_glob("corpus/**/train-*.tsv")?;
/// # use anyhow::Error; Ok::<(), Error>(())
/// ```
///
/// # Errors
///
/// Returns an error if the pattern is invalid or a directory cannot be read
/// while walking it. No match yields an empty vector.
pub fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    expand_globs([pattern])
}

/// Expand several patterns into one sorted list; a file matched by more than
/// one pattern appears once.
///
/// # Examples
///
/// ```no_run
/// use ironcorpus::io::glob::expand_globs;
///
/// let files = expand_globs(["dev/*.tsv", "test/*.tsv"])?;
/// # use anyhow::Error; Ok::<(), Error>(())
/// ```
///
/// # Errors
///
/// Returns an error naming the offending pattern if any pattern is invalid or
/// its walk hits an unreadable entry.
pub fn expand_globs<I, S>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut shards = BTreeSet::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let entries = glob_with(pattern, SHARD_MATCH)
            .with_context(|| format!("invalid corpus pattern: {pattern}"))?;
        for entry in entries {
            let path = entry.with_context(|| format!("walking corpus pattern: {pattern}"))?;
            if path.is_file() {
                shards.insert(path);
            }
        }
    }
    Ok(shards.into_iter().collect())
}

/// Like [`expand_glob`] but fails when nothing matches.
///
/// Used by [`Pipeline::materialize_glob`](crate::Pipeline::materialize_glob),
/// where an empty training set is almost always a mistyped path.
///
/// # Examples
///
/// ```no_run
/// use ironcorpus::io::glob::expand_glob_required;
///
/// let shards = expand_glob_required("corpus/train/part-*.tsv.gz")?;
/// assert!(!shards.is_empty());
/// # use anyhow::Error; Ok::<(), Error>(())
/// ```
///
/// # Errors
///
/// Returns an error if the pattern is invalid, walking fails, or no file
/// matches.
pub fn expand_glob_required(pattern: &str) -> Result<Vec<PathBuf>> {
    let files = expand_glob(pattern)?;
    if files.is_empty() {
        bail!("no corpus files found matching pattern: {pattern}");
    }
    Ok(files)
}
