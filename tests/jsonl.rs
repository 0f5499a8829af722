//! Tests for the JSON Lines reader/writer and cross-format conversion.

#![cfg(feature = "io-jsonl")]

use anyhow::Result;
use ironcorpus::testing::*;
use ironcorpus::*;
use std::fs;

#[test]
fn jsonl_round_trip_keeps_sparse_features() -> Result<()> {
    let dir = CorpusDir::new()?;
    let path = dir.join("out.jsonl");

    let mut rec = Record::new("pos", ["good", "movie"]);
    rec.sparse_features = vec!["len=2".into(), "has_adj".into()];
    let data = vec![rec, Record::new("neg", ["bad"])];

    let mut pipe = Pipeline::jsonl();
    assert_eq!(pipe.write_all(&path, &data)?, 2);
    assert_eq!(pipe.materialize(&path, None)?, data);
    Ok(())
}

#[test]
fn jsonl_reader_defaults_missing_sparse_features() -> Result<()> {
    let dir = CorpusDir::new()?;
    let path = dir.write(
        "in.jsonl",
        &[
            r#"{"label":"pos","tokens":["a","b"]}"#,
            r#"{"label":"neg","tokens":["c"],"sparse_features":["f"]}"#,
        ],
    )?;

    let got = Pipeline::jsonl().materialize(&path, None)?;
    assert_records_match(&got, &[("pos", "a b"), ("neg", "c")]);
    assert!(got[0].sparse_features.is_empty());
    assert_eq!(got[1].sparse_features, vec!["f".to_string()]);
    Ok(())
}

#[test]
fn jsonl_blank_line_terminates_and_cap_applies() -> Result<()> {
    let dir = CorpusDir::new()?;
    let path = dir.write(
        "in.jsonl",
        &[
            r#"{"label":"a","tokens":["1"]}"#,
            r#"{"label":"b","tokens":["2"]}"#,
            "",
            r#"{"label":"c","tokens":["3"]}"#,
        ],
    )?;

    let mut pipe = Pipeline::jsonl();
    assert_eq!(pipe.materialize(&path, None)?.len(), 2);
    assert_eq!(pipe.materialize(&path, Some(1))?.len(), 1);
    Ok(())
}

#[test]
fn jsonl_rejects_bad_json_and_empty_tokens() -> Result<()> {
    let dir = CorpusDir::new()?;
    let bad = dir.write("bad.jsonl", &[r#"{"label":"a","tokens":["1"]}"#, "{not json"])?;
    let empty = dir.write("empty.jsonl", &[r#"{"label":"a","tokens":[]}"#])?;

    let mut pipe = Pipeline::jsonl();
    assert!(matches!(
        pipe.materialize(&bad, None),
        Err(PipelineError::Read(ReadError::Malformed { line: 2, .. }))
    ));
    assert!(matches!(
        pipe.materialize(&empty, None),
        Err(PipelineError::Read(ReadError::Malformed { line: 1, .. }))
    ));
    Ok(())
}

#[test]
fn jsonl_malformed_line_ends_scan_until_restart() -> Result<()> {
    let dir = CorpusDir::new()?;
    let path = dir.write(
        "bad.jsonl",
        &[
            r#"{"label":"pos","tokens":["a"]}"#,
            r#"{"label":"neg","tokens":[]}"#,
            r#"{"label":"neg","tokens":["b"]}"#,
        ],
    )?;

    let mut r = JsonlReader::new();
    r.start(&path)?;
    assert!(r.next()?.is_some());
    assert!(matches!(r.next(), Err(ReadError::Malformed { line: 2, .. })));
    assert!(r.next()?.is_none());

    r.start(&path)?;
    assert_eq!(r.next()?.map(|rec| rec.tokens.clone()), Some(vec!["a".to_string()]));
    r.finish();
    Ok(())
}

#[test]
fn jsonl_writer_requires_open_stream() {
    let mut w = JsonlWriter::new();
    assert!(matches!(
        w.write(&Record::new("a", ["b"])),
        Err(WriteError::NotOpen)
    ));
}

#[test]
fn convert_line_format_to_jsonl_and_back() -> Result<()> {
    let dir = CorpusDir::new()?;
    let tsv = dir.write("train.tsv", &sample_corpus_lines())?;
    let jsonl = dir.join("train.jsonl");
    let back = dir.join("back.tsv");

    let n = Pipeline::with_io(RecordReader::new(), JsonlWriter::new()).convert(&tsv, &jsonl)?;
    assert_eq!(n, 2);
    assert_eq!(fs::read_to_string(&jsonl)?.lines().count(), 2);

    let n = Pipeline::with_io(JsonlReader::new(), RecordWriter::new()).convert(&jsonl, &back)?;
    assert_eq!(n, 2);
    assert_eq!(
        fs::read_to_string(&back)?,
        "pos\tgood movie here \nneg\tbad film indeed \n"
    );
    Ok(())
}

#[test]
fn convert_missing_source_fails_without_creating_output() -> Result<()> {
    let dir = CorpusDir::new()?;
    let out = dir.join("out.jsonl");

    let mut pipe = Pipeline::with_io(RecordReader::new(), JsonlWriter::new());
    assert!(pipe.convert(dir.join("missing.tsv"), &out).is_err());
    assert!(!out.exists());
    Ok(())
}
