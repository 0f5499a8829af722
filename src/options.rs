//! Training/run options.
//!
//! Options are built once and passed by reference wherever they are needed;
//! there is no process-wide instance. Two on-disk forms are supported:
//!
//! - a `key=value` file, one option per line, using camelCase keys
//!   (`maxInstance=5000`, `testFile=dev.tsv`, ...); see [`Options::load`]
//! - JSON with the snake_case field names; see [`Options::from_json_file`]
//!
//! ```
//! use ironcorpus::Options;
//!
//! let mut opts = Options::default();
//! opts.set_options(["maxInstance=2", "testFile=dev.tsv", "testFile=test.tsv"])?;
//! assert_eq!(opts.instance_cap(), Some(2));
//! assert_eq!(opts.test_files.len(), 2);
//! # Ok::<(), ironcorpus::error::ConfigError>(())
//! ```

use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Every tunable of a training run.
///
/// Only `max_instance` and `test_files` drive corpus materialization; the
/// remaining fields are carried for the model code that shares this
/// configuration. Defaults match an untuned run with no instance cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub word_cut_off: i32,
    pub feat_cut_off: i32,
    pub init_range: f64,
    pub max_iter: u32,
    pub batch_size: u32,
    pub ada_eps: f64,
    pub ada_alpha: f64,
    pub reg_parameter: f64,
    pub drop_prob: f64,

    pub hidden_size: u32,
    pub word_emb_size: u32,
    pub word_context: u32,
    pub word_emb_fine_tune: bool,

    pub cnn_layer_size: u32,
    pub verbose_iter: u32,
    pub save_intermediate: bool,
    pub train: bool,
    /// Upper bound on records materialized per corpus; `None` reads everything.
    ///
    /// In JSON, `null`, `0` and negative numbers all mean no cap.
    #[serde(deserialize_with = "signed_cap")]
    pub max_instance: Option<usize>,
    pub test_files: Vec<PathBuf>,
    pub out_best: String,
    pub seg: bool,

    pub word_file: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            word_cut_off: 0,
            feat_cut_off: 0,
            init_range: 0.01,
            max_iter: 1000,
            batch_size: 1,
            ada_eps: 1e-6,
            ada_alpha: 0.01,
            reg_parameter: 1e-8,
            drop_prob: 0.0,

            hidden_size: 100,
            word_emb_size: 50,
            word_context: 2,
            word_emb_fine_tune: true,

            cnn_layer_size: 2,
            verbose_iter: 100,
            save_intermediate: true,
            train: false,
            max_instance: None,
            test_files: Vec::new(),
            out_best: String::new(),
            seg: false,

            word_file: String::new(),
        }
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Non-positive values mean no cap.
fn cap_from(n: i64) -> Option<usize> {
    usize::try_from(n).ok().filter(|&n| n > 0)
}

fn signed_cap<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
    Ok(Option::<i64>::deserialize(deserializer)?.and_then(cap_from))
}

fn flag(value: &str) -> bool {
    value == "true"
}

impl Options {
    /// Apply `key=value` settings on top of the current values.
    ///
    /// Booleans are `true` only for the literal `true`. `testFile` may repeat and
    /// appends. A non-positive `maxInstance` removes the cap. Unknown keys are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an entry without `=` or a value that does not
    /// parse as the option's type. Entries before the bad one stay applied.
    pub fn set_options<I, S>(&mut self, settings: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for setting in settings {
            let setting = setting.as_ref();
            let (key, value) = setting
                .split_once('=')
                .ok_or_else(|| ConfigError::MissingSeparator(setting.to_string()))?;
            let (key, value) = (key.trim(), value.trim());
            match key {
                "wordCutOff" => self.word_cut_off = parse(key, value)?,
                "featCutOff" => self.feat_cut_off = parse(key, value)?,
                "initRange" => self.init_range = parse(key, value)?,
                "maxIter" => self.max_iter = parse(key, value)?,
                "batchSize" => self.batch_size = parse(key, value)?,
                "adaEps" => self.ada_eps = parse(key, value)?,
                "adaAlpha" => self.ada_alpha = parse(key, value)?,
                "regParameter" => self.reg_parameter = parse(key, value)?,
                "dropProb" => self.drop_prob = parse(key, value)?,
                "hiddenSize" => self.hidden_size = parse(key, value)?,
                "wordcontext" => self.word_context = parse(key, value)?,
                "wordEmbSize" => self.word_emb_size = parse(key, value)?,
                "wordEmbFineTune" => self.word_emb_fine_tune = flag(value),
                "cnnLayerSize" => self.cnn_layer_size = parse(key, value)?,
                "verboseIter" => self.verbose_iter = parse(key, value)?,
                "train" => self.train = flag(value),
                "saveIntermediate" => self.save_intermediate = flag(value),
                "maxInstance" => {
                    self.max_instance = cap_from(parse(key, value)?);
                }
                "testFile" => self.test_files.push(PathBuf::from(value)),
                "outBest" => self.out_best = value.to_string(),
                "seg" => self.seg = flag(value),
                "wordFile" => self.word_file = value.to_string(),
                other => debug!(key = other, "ignoring unknown option"),
            }
        }
        Ok(())
    }

    /// Read a `key=value` option file on top of the defaults. Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or any entry is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("read options {}", path.display()))?;
        let mut opts = Self::default();
        opts.set_options(text.lines().filter(|l| !l.trim().is_empty()))
            .with_context(|| format!("parse options {}", path.display()))?;
        Ok(opts)
    }

    /// Read options from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON for
    /// this struct.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("read options {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parse options {}", path.display()))
    }

    /// Write options as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let body = serde_json::to_string_pretty(self)?;
        fs::write(path, body).with_context(|| format!("write options {}", path.display()))
    }

    /// The cap handed to [`Pipeline::materialize`](crate::Pipeline::materialize).
    #[must_use]
    pub fn instance_cap(&self) -> Option<usize> {
        self.max_instance
    }

    /// Log every option at `info` level.
    pub fn show(&self) {
        info!("wordCutOff = {}", self.word_cut_off);
        info!("featCutOff = {}", self.feat_cut_off);
        info!("initRange = {}", self.init_range);
        info!("maxIter = {}", self.max_iter);
        info!("batchSize = {}", self.batch_size);
        info!("adaEps = {}", self.ada_eps);
        info!("adaAlpha = {}", self.ada_alpha);
        info!("regParameter = {}", self.reg_parameter);
        info!("dropProb = {}", self.drop_prob);

        info!("hiddenSize = {}", self.hidden_size);
        info!("wordEmbSize = {}", self.word_emb_size);
        info!("wordcontext = {}", self.word_context);
        info!("wordEmbFineTune = {}", self.word_emb_fine_tune);

        info!("cnnLayerSize = {}", self.cnn_layer_size);
        info!("verboseIter = {}", self.verbose_iter);
        info!("saveIntermediate = {}", self.save_intermediate);
        info!("train = {}", self.train);
        match self.max_instance {
            Some(n) => info!("maxInstance = {n}"),
            None => info!("maxInstance = unlimited"),
        }
        for file in &self.test_files {
            info!("testFile = {}", file.display());
        }
        info!("outBest = {}", self.out_best);
        info!("seg = {}", self.seg);
        info!("wordFile = {}", self.word_file);
    }
}
