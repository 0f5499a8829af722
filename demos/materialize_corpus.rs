//! Materialize a small corpus under an instance cap and score a trivial predictor.
//!
//! Run with: `RUST_LOG=debug cargo run --example materialize_corpus`

use anyhow::Result;
use ironcorpus::testing::CorpusDir;
use ironcorpus::{Metric, Options, Pipeline, Record};

fn majority_label(records: &[Record]) -> &str {
    let pos = records.iter().filter(|r| r.label == "pos").count();
    if pos * 2 >= records.len() { "pos" } else { "neg" }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ironcorpus=info".parse()?),
        )
        .init();

    let dir = CorpusDir::new()?;
    let train = dir.write(
        "train.tsv",
        &[
            "pos\tgood movie here",
            "neg\tbad film indeed",
            "pos\ta fine cast",
            "pos\tloved every minute",
            "neg\ttoo long",
        ],
    )?;
    let dev = dir.write("dev-plain.tsv", &["pos\tgreat fun", "neg\tboring plot"])?;
    let options_file = dir.write(
        "run.options",
        &[
            "maxInstance=4".to_string(),
            format!("testFile={}", dir.join("dev.tsv.gz").display()),
        ],
    )?;

    let mut pipe = Pipeline::new();
    // Compress the dev set on the way in.
    pipe.convert(&dev, dir.join("dev.tsv.gz"))?;

    let options = Options::load(&options_file)?;
    options.show();

    let train_set = pipe.materialize_with(&train, &options)?;
    let label = majority_label(&train_set).to_string();
    println!("Training records: {}, majority label: {label}", train_set.len());

    for (path, set) in options
        .test_files
        .iter()
        .zip(pipe.materialize_test_sets(&options)?)
    {
        let mut metric = Metric::default();
        for record in &set {
            record.evaluate(&label, &mut metric);
        }
        println!("{}: {metric}", path.display());
    }
    Ok(())
}
