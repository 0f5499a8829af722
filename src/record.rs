//! The labeled example type shared by every reader, writer and the pipeline.

use crate::metric::Metric;
use serde::{Deserialize, Serialize};

/// One labeled example: a token sequence, reserved sparse features and a label.
///
/// An empty `label` is a legal label, not an "unset" marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    pub label: String,
    pub tokens: Vec<String>,
    /// Never populated by the tab-delimited line format.
    #[serde(default)]
    pub sparse_features: Vec<String>,
}

impl Record {
    /// Build a record from a label and a token sequence.
    pub fn new<L, I, S>(label: L, tokens: I) -> Self
    where
        L: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            tokens: tokens.into_iter().map(Into::into).collect(),
            sparse_features: Vec::new(),
        }
    }

    /// Reset tokens and sparse features. The label is left untouched.
    pub fn clear_features(&mut self) {
        self.tokens.clear();
        self.sparse_features.clear();
    }

    /// Reset the whole record, label included.
    pub fn clear(&mut self) {
        self.clear_features();
        self.label.clear();
    }

    /// Clear, then pre-size `tokens` to `n` empty slots.
    pub fn allocate(&mut self, n: usize) {
        self.clear();
        self.tokens.resize(n, String::new());
    }

    /// Deep-copy `other` into `self`. The label and the outer vectors keep their
    /// capacity; token strings are reallocated.
    pub fn copy_from(&mut self, other: &Record) {
        self.allocate(other.size());
        self.label.clone_from(&other.label);
        for (dst, src) in self.tokens.iter_mut().zip(&other.tokens) {
            dst.clone_from(src);
        }
        self.sparse_features.clone_from(&other.sparse_features);
    }

    pub fn assign_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Token count.
    #[must_use]
    pub fn size(&self) -> usize {
        self.tokens.len()
    }

    /// Score `predicted_label` against this record's label.
    ///
    /// `overall_label_count` always advances; `correct_label_count` advances on
    /// an exact match.
    pub fn evaluate(&self, predicted_label: &str, metric: &mut Metric) {
        if predicted_label == self.label {
            metric.correct_label_count += 1;
        }
        metric.overall_label_count += 1;
    }
}
