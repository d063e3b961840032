use std::fs;

use abs_cli::output::{ASSEMBLED_FILE, OutputPaths, write_csv, write_outputs};
use abs_cli::registry::load_registry;
use abs_core::harmonize_study;
use abs_model::{LabeledColumn, Wave, WaveDataset};
use abs_transform::HarmonizeOptions;
use polars::prelude::{Column, DataFrame};

fn wave(wave: Wave, q7: &[i64]) -> WaveDataset {
    let column = LabeledColumn::new(Column::new("q7".into(), q7.to_vec()));
    WaveDataset::from_columns(wave, vec![column]).expect("dataset")
}

#[test]
fn writes_assembled_codebook_and_diagnostics() {
    let registry = load_registry(None, None).expect("registry");
    let options = HarmonizeOptions::default();
    let outcome = harmonize_study(
        vec![wave(Wave::W3, &[1, 4, 98]), wave(Wave::W2, &[1, 2, 97])],
        &registry,
        &options,
    )
    .expect("harmonize");

    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("run");
    let paths = write_outputs(&out, &outcome, &registry, &options).expect("write");
    assert_eq!(paths, OutputPaths::in_dir(&out));

    let assembled = fs::read_to_string(&paths.assembled).expect("assembled");
    let lines: Vec<&str> = assembled.lines().collect();
    assert_eq!(lines.len(), 7);
    assert!(lines[0].starts_with("wave,respondent_row,q7,q7_harm,"));
    assert!(lines[0].contains(",trust_executive,"));
    assert!(lines[1].starts_with("W2,0,1,1,"));
    assert!(lines[3].starts_with("W2,2,97,,"));
    assert!(lines[4].starts_with("W3,0,1,4,"));
    assert!(lines[5].starts_with("W3,1,4,1,"));

    let codebook = fs::read_to_string(&paths.codebook).expect("codebook");
    let mut rows = codebook.lines();
    assert_eq!(rows.next(), Some("concept,domain,W2,W3,W4,W5,W6"));
    assert_eq!(rows.count(), registry.len());
    assert!(codebook.contains("trust_executive,trust,q7,q7,q8,q8,q8"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&paths.diagnostics).expect("diagnostics"))
            .expect("json");
    assert_eq!(json["fingerprint"], registry.fingerprint().as_str());
    assert_eq!(json["total_rows"], 6);
    assert_eq!(json["waves"][0]["wave"], "W2");
    assert_eq!(json["waves"][1]["rows"], 3);
    assert_eq!(json["options"]["parallel"], false);
    assert_eq!(
        json["diagnostics"].as_array().map(Vec::len),
        Some(outcome.report.len())
    );
}

#[test]
fn absent_values_are_empty_cells() {
    let data = DataFrame::new(vec![
        Column::new("a".into(), [Some(1i64), None, Some(3)]),
        Column::new("b".into(), [Some("x"), Some("y"), None]),
    ])
    .expect("frame");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(ASSEMBLED_FILE);
    write_csv(&path, &data).expect("write");
    let text = fs::read_to_string(&path).expect("read");
    assert_eq!(text.lines().collect::<Vec<_>>(), ["a,b", "1,x", ",y", "3,"]);
}

#[test]
fn unwritable_output_dir_reports_path() {
    let registry = load_registry(None, None).expect("registry");
    let options = HarmonizeOptions::default();
    let outcome =
        harmonize_study(vec![wave(Wave::W2, &[1])], &registry, &options).expect("harmonize");
    let dir = tempfile::tempdir().expect("tempdir");
    let blocker = dir.path().join("file");
    fs::write(&blocker, "x").expect("blocker");

    let err = write_outputs(&blocker.join("out"), &outcome, &registry, &options)
        .expect_err("dir under a file");
    assert!(format!("{err:#}").contains("create"));
}
