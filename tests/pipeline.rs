//! Tests for Pipeline materialization, capping and writing.

use anyhow::Result;
use ironcorpus::testing::*;
use ironcorpus::*;
use std::fs;

#[test]
fn materialize_stops_at_blank_line() -> Result<()> {
    let dir = CorpusDir::new()?;
    let path = dir.write("train.tsv", &sample_corpus_lines())?;

    let got = Pipeline::new().materialize(&path, None)?;
    assert_records_match(&got, &[("pos", "good movie here"), ("neg", "bad film indeed")]);
    Ok(())
}

#[test]
fn materialize_with_cap_one() -> Result<()> {
    let dir = CorpusDir::new()?;
    let path = dir.write("train.tsv", &sample_corpus_lines())?;

    let got = Pipeline::new().materialize(&path, Some(1))?;
    assert_records_match(&got, &[("pos", "good movie here")]);
    Ok(())
}

#[test]
fn materialize_reads_every_line_in_order() -> Result<()> {
    let dir = CorpusDir::new()?;
    let lines = numbered_corpus_lines(25);
    let path = dir.write("train.tsv", &lines)?;

    let got = Pipeline::new().materialize(&path, None)?;
    assert_eq!(got.len(), 25);
    for (i, r) in got.iter().enumerate() {
        assert_eq!(r.tokens, vec!["line".to_string(), i.to_string(), "text".to_string()]);
        assert_eq!(r.label, if i % 2 == 0 { "pos" } else { "neg" });
    }
    Ok(())
}

#[test]
fn capped_result_is_prefix_of_uncapped() -> Result<()> {
    let dir = CorpusDir::new()?;
    let path = dir.write("train.tsv", &numbered_corpus_lines(10))?;

    let mut pipe = Pipeline::new();
    let full = pipe.materialize(&path, None)?;
    for cap in 0..10 {
        let capped = pipe.materialize(&path, Some(cap))?;
        assert_eq!(capped.len(), cap);
        assert_eq!(capped, full[..cap]);
    }
    Ok(())
}

#[test]
fn cap_at_or_above_length_changes_nothing() -> Result<()> {
    let dir = CorpusDir::new()?;
    let path = dir.write("train.tsv", &numbered_corpus_lines(6))?;

    let mut pipe = Pipeline::new();
    let full = pipe.materialize(&path, None)?;
    for cap in [6, 7, 100, usize::MAX] {
        assert_eq!(pipe.materialize(&path, Some(cap))?, full);
    }
    Ok(())
}

#[test]
fn blank_line_at_position_k_yields_k_records() -> Result<()> {
    let dir = CorpusDir::new()?;
    let mut lines = numbered_corpus_lines(8);
    lines.insert(3, String::new());
    let path = dir.write("train.tsv", &lines)?;

    let got = Pipeline::new().materialize(&path, None)?;
    assert_eq!(got.len(), 3);
    Ok(())
}

#[test]
fn leading_blank_line_yields_nothing() -> Result<()> {
    let dir = CorpusDir::new()?;
    let path = dir.write("train.tsv", &["", "pos\tnever read"])?;

    assert!(Pipeline::new().materialize(&path, None)?.is_empty());
    Ok(())
}

#[test]
fn empty_file_yields_nothing() -> Result<()> {
    let dir = CorpusDir::new()?;
    let path = dir.join("empty.tsv");
    fs::write(&path, "")?;

    assert!(Pipeline::new().materialize(&path, None)?.is_empty());
    Ok(())
}

#[test]
fn missing_file_is_open_error() -> Result<()> {
    let dir = CorpusDir::new()?;
    let missing = dir.join("nope.tsv");
    let mut pipe = Pipeline::new();

    assert!(pipe.open_input(&missing).is_err());
    pipe.close_input();

    match pipe.materialize(&missing, None) {
        Err(PipelineError::Open(e)) => assert_eq!(e.path, missing),
        other => panic!("expected open error, got {other:?}"),
    }
    pipe.close_input();
    Ok(())
}

#[test]
fn read_error_is_surfaced_not_truncated() -> Result<()> {
    let dir = CorpusDir::new()?;
    let path = dir.write("bad.tsv", &["pos\tok", "neg\tfine", "broken"])?;

    let mut out = vec![Record::new("keep", ["me"])];
    let mut pipe = Pipeline::new();
    let err = pipe.materialize_into(&path, None, &mut out).unwrap_err();
    assert!(matches!(err, PipelineError::Read(ReadError::Malformed { line: 3, .. })));
    assert_eq!(out, vec![Record::new("keep", ["me"])]);

    // The pipeline is reusable after a failed scan.
    let ok = dir.write("ok.tsv", &["pos\tagain"])?;
    assert_eq!(pipe.materialize(&ok, None)?.len(), 1);
    Ok(())
}

#[test]
fn materialize_into_appends() -> Result<()> {
    let dir = CorpusDir::new()?;
    let path = dir.write("train.tsv", &numbered_corpus_lines(3))?;

    let mut out = records(&[("seed", "x")]);
    let n = Pipeline::new().materialize_into(&path, Some(2), &mut out)?;
    assert_eq!(n, 2);
    assert_eq!(out.len(), 3);
    assert_eq!(out[0].label, "seed");
    Ok(())
}

#[test]
fn next_record_returns_owned_copies() -> Result<()> {
    let dir = CorpusDir::new()?;
    let path = dir.write("train.tsv", &["pos\ta b", "neg\tc"])?;

    let mut pipe = Pipeline::new();
    pipe.open_input(&path)?;
    let first = pipe.next_record()?.expect("first");
    let second = pipe.next_record()?.expect("second");
    assert!(pipe.next_record()?.is_none());
    pipe.close_input();

    // The first copy is untouched by the second pull.
    assert_eq!(first, Record::new("pos", ["a", "b"]));
    assert_eq!(second, Record::new("neg", ["c"]));
    Ok(())
}

#[test]
fn materialized_records_outlive_the_pipeline() -> Result<()> {
    let dir = CorpusDir::new()?;
    let path = dir.write("train.tsv", &["pos\tkept"])?;

    let got = {
        let mut pipe = Pipeline::new();
        pipe.materialize(&path, None)?
    };
    assert_records_match(&got, &[("pos", "kept")]);
    Ok(())
}

#[test]
fn input_is_closed_after_capped_materialize() -> Result<()> {
    let dir = CorpusDir::new()?;
    let path = dir.write("train.tsv", &numbered_corpus_lines(5))?;

    let mut pipe = Pipeline::new();
    pipe.materialize(&path, Some(2))?;
    // Nothing left open to pull from.
    assert!(pipe.next_record()?.is_none());
    Ok(())
}

#[test]
fn write_all_then_materialize_round_trips() -> Result<()> {
    let dir = CorpusDir::new()?;
    let path = dir.join("out.tsv");
    let data = records(&[("pos", "good movie"), ("neg", "bad film"), ("neu", "meh")]);

    let mut pipe = Pipeline::new();
    assert_eq!(pipe.write_all(&path, &data)?, 3);
    assert_eq!(
        fs::read_to_string(&path)?,
        "pos\tgood movie \nneg\tbad film \nneu\tmeh \n"
    );
    assert_eq!(pipe.materialize(&path, None)?, data);
    Ok(())
}

#[test]
fn write_record_requires_open_output() -> Result<()> {
    let dir = CorpusDir::new()?;
    let mut pipe = Pipeline::new();
    let rec = Record::new("pos", ["x"]);

    assert!(matches!(pipe.write_record(&rec), Err(WriteError::NotOpen)));
    pipe.close_output()?;

    let path = dir.join("out.tsv");
    pipe.open_output(&path)?;
    pipe.write_record(&rec)?;
    pipe.close_output()?;
    assert_eq!(fs::read_to_string(&path)?, "pos\tx \n");
    Ok(())
}

#[test]
fn open_output_on_unwritable_path_fails() -> Result<()> {
    let dir = CorpusDir::new()?;
    let blocker = dir.write("file.tsv", &["pos\tx"])?;
    // A regular file cannot be used as a parent directory.
    let target = blocker.join("child.tsv");

    let mut pipe = Pipeline::new();
    assert!(pipe.open_output(&target).is_err());
    pipe.close_output()?;
    Ok(())
}

#[test]
fn materialize_with_uses_option_cap() -> Result<()> {
    let dir = CorpusDir::new()?;
    let path = dir.write("train.tsv", &numbered_corpus_lines(5))?;

    let mut opts = Options::default();
    opts.set_options(["maxInstance=3"])?;
    assert_eq!(Pipeline::new().materialize_with(&path, &opts)?.len(), 3);

    opts.set_options(["maxInstance=-1"])?;
    assert_eq!(Pipeline::new().materialize_with(&path, &opts)?.len(), 5);
    Ok(())
}

#[test]
fn materialize_many_caps_combined_count() -> Result<()> {
    let dir = CorpusDir::new()?;
    let a = dir.write("a.tsv", &["pos\ta1", "pos\ta2"])?;
    let b = dir.write("b.tsv", &["neg\tb1", "neg\tb2"])?;
    let missing = dir.join("never-opened.tsv");

    let mut pipe = Pipeline::new();
    let all = pipe.materialize_many([&a, &b], None)?;
    assert_records_match(&all, &[("pos", "a1"), ("pos", "a2"), ("neg", "b1"), ("neg", "b2")]);

    let three = pipe.materialize_many([&a, &b], Some(3))?;
    assert_records_match(&three, &[("pos", "a1"), ("pos", "a2"), ("neg", "b1")]);

    // Once the cap is met later files are not touched.
    let two = pipe.materialize_many([&a, &missing], Some(2))?;
    assert_eq!(two.len(), 2);

    assert!(pipe.materialize_many([&a, &missing], None).is_err());
    Ok(())
}

#[test]
fn materialize_test_sets_per_file() -> Result<()> {
    let dir = CorpusDir::new()?;
    let dev = dir.write("dev.tsv", &numbered_corpus_lines(4))?;
    let test = dir.write("test.tsv", &numbered_corpus_lines(1))?;

    let mut opts = Options::default();
    opts.max_instance = Some(2);
    opts.test_files = vec![dev, test];

    let sets = Pipeline::new().materialize_test_sets(&opts)?;
    assert_eq!(sets.iter().map(Vec::len).collect::<Vec<_>>(), vec![2, 1]);
    Ok(())
}

#[test]
fn evaluate_over_materialized_corpus() -> Result<()> {
    let dir = CorpusDir::new()?;
    let path = dir.write("train.tsv", &numbered_corpus_lines(4))?;

    let mut metric = Metric::default();
    for r in Pipeline::new().materialize(&path, None)? {
        r.evaluate("pos", &mut metric);
    }
    assert_eq!(metric.correct_label_count, 2);
    assert_eq!(metric.overall_label_count, 4);
    Ok(())
}
