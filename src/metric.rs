//! Label accuracy accumulation.
//!
//! A [`Metric`] is passed by `&mut` into [`Record::evaluate`](crate::Record::evaluate)
//! for every scored example and read back once scoring is done.
//!
//! ```
//! use ironcorpus::{Metric, Record};
//!
//! let gold = vec![Record::new("pos", ["great"]), Record::new("neg", ["awful"])];
//! let mut metric = Metric::default();
//! for r in &gold {
//!     r.evaluate("pos", &mut metric);
//! }
//! assert_eq!(metric.accuracy(), 0.5);
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Correct/overall label counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub correct_label_count: u64,
    pub overall_label_count: u64,
}

impl Metric {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fraction of correct labels, `0.0` when nothing has been scored.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.overall_label_count == 0 {
            return 0.0;
        }
        self.correct_label_count as f64 / self.overall_label_count as f64
    }

    /// Fold another metric's counts into this one.
    pub fn merge(&mut self, other: &Metric) {
        self.correct_label_count += other.correct_label_count;
        self.overall_label_count += other.overall_label_count;
    }

    /// Save the counters and derived accuracy as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written to.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let body = json!({
            "correct_label_count": self.correct_label_count,
            "overall_label_count": self.overall_label_count,
            "accuracy": self.accuracy(),
        });
        let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        let formatted = serde_json::to_string_pretty(&body)?;
        file.write_all(formatted.as_bytes())
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Accuracy: P = {}/{} = {:.5}",
            self.correct_label_count,
            self.overall_label_count,
            self.accuracy()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_metric_has_zero_accuracy() {
        assert_eq!(Metric::default().accuracy(), 0.0);
    }

    #[test]
    fn merge_and_reset() {
        let mut a = Metric {
            correct_label_count: 3,
            overall_label_count: 4,
        };
        let b = Metric {
            correct_label_count: 1,
            overall_label_count: 4,
        };
        a.merge(&b);
        assert_eq!(a.correct_label_count, 4);
        assert_eq!(a.overall_label_count, 8);
        assert_eq!(a.accuracy(), 0.5);

        a.reset();
        assert_eq!(a, Metric::default());
    }

    #[test]
    fn display_format() {
        let m = Metric {
            correct_label_count: 1,
            overall_label_count: 4,
        };
        assert_eq!(m.to_string(), "Accuracy: P = 1/4 = 0.25000");
    }

    #[test]
    fn save_to_file_writes_json() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("metric.json");
        let m = Metric {
            correct_label_count: 3,
            overall_label_count: 4,
        };
        m.save_to_file(&path)?;

        let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(v["correct_label_count"], 3);
        assert_eq!(v["overall_label_count"], 4);
        assert_eq!(v["accuracy"], 0.75);
        Ok(())
    }
}
