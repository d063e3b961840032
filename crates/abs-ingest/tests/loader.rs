//! Loading study folders from disk.

use abs_ingest::{IngestError, load_study, load_wave_path};
use abs_model::Wave;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) {
    std::fs::write(dir.path().join(name), contents).unwrap();
}

#[test]
fn loads_waves_with_labels_in_canonical_order() {
    let dir = TempDir::new().unwrap();
    write(&dir, "abs_w4.csv", "q8,q1,se2\n1,2,1\n4,98,2\n,3,1\n");
    write(&dir, "abs_w2.csv", "Q7,q1\n4,1\n3,5\n");
    write(
        &dir,
        "abs_w2.labels.json",
        r#"{
            "q7": {"description": "Trust in the president",
                   "value_labels": {"1": "None at all", "4": "A great deal of trust"}},
            "q99": {"description": "Not in the data"}
        }"#,
    );

    let waves = load_study(dir.path()).unwrap();
    assert_eq!(
        waves.iter().map(|w| w.wave).collect::<Vec<_>>(),
        vec![Wave::W2, Wave::W4]
    );

    let w2 = &waves[0];
    assert_eq!(w2.row_count(), 2);
    let q7 = w2.column("q7").unwrap();
    assert_eq!(q7.name(), "Q7");
    assert_eq!(q7.description.as_deref(), Some("Trust in the president"));
    assert_eq!(q7.labels().unwrap().get(4), Some("A great deal of trust"));
    assert!(!w2.metadata.contains_key("q99"));

    let w4 = &waves[1];
    assert_eq!(w4.row_count(), 3);
    assert_eq!(w4.column("q8").unwrap().absent_count(), 1);
    assert!(w4.metadata.is_empty());
}

#[test]
fn malformed_sidecar_is_an_error() {
    let dir = TempDir::new().unwrap();
    write(&dir, "w3.csv", "q1\n1\n");
    write(&dir, "w3.labels.json", "{ not json");
    let err = load_study(dir.path()).unwrap_err();
    assert!(matches!(err, IngestError::Sidecar { .. }));
}

#[test]
fn single_file_loads_as_the_given_wave() {
    let dir = TempDir::new().unwrap();
    write(&dir, "survey.csv", "q8\n2\n");
    let dataset = load_wave_path(&dir.path().join("survey.csv"), Wave::W5).unwrap();
    assert_eq!(dataset.wave, Wave::W5);

    let err = load_wave_path(&dir.path().join("absent.csv"), Wave::W5).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}
