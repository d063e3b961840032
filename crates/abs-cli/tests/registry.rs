use std::io::Write;

use abs_cli::registry::load_registry;
use abs_model::Wave;
use abs_registry::ConceptRegistry;

const ONE_CONCEPT: &str = "\
concept,domain,description,W2_var,W3_var,W4_var,W5_var,W6_var,scale_type,direction,notes
trust_executive,trust,Trust in the executive,q7,q7,q8,q8,q8,trust,higher_is_more_positive,
";

#[test]
fn defaults_to_embedded_tables() {
    let loaded = load_registry(None, None).expect("registry");
    let embedded = ConceptRegistry::embedded().expect("embedded");
    assert_eq!(loaded.fingerprint(), embedded.fingerprint());
}

#[test]
fn concept_file_overrides_embedded_concepts() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(ONE_CONCEPT.as_bytes()).expect("write");

    let registry = load_registry(Some(file.path()), None).expect("registry");
    assert_eq!(registry.len(), 1);
    assert_eq!(
        registry.variable_for("trust_executive", Wave::W4).expect("known"),
        Some("q8")
    );
    assert!(registry.family("trust").is_some());
}

#[test]
fn missing_file_error_names_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.toml");
    let err = load_registry(None, Some(&path)).expect_err("missing families");
    assert!(format!("{err:#}").contains("absent.toml"));
}
