//! Wave harmonization end to end.

use std::collections::BTreeMap;

use abs_common::column_codes;
use abs_model::{
    CanonicalDirection, ConceptMapping, DiagnosticKind, Domain, LabeledColumn, ValueLabels, Wave,
    WaveDataset,
};
use abs_registry::{ConceptRegistry, parse_families_str};
use abs_transform::{HarmonizeOptions, harmonize};
use polars::prelude::Column;

const FAMILIES: &str = r#"
[[family]]
name = "trust"
domain = "trust"

[family.waves.W2]
width = 4
direction = "ascending"

[family.waves.W4]
width = 4
direction = "descending"
members = ["q21"]

[[family]]
name = "economic"
domain = "economic"

[family.waves.W2]
width = 5
direction = "descending"

[family.waves.W4]
width = 5
direction = "descending"

[family.waves.W6]
width = 5
direction = "ascending"

[[family]]
name = "social_trust"
domain = "social"
missing_policy = "numeric_then_label"

[family.waves.W4]
width = 4
direction = "descending"
"#;

fn concept(name: &str, domain: Domain, scale_type: &str, vars: &[(Wave, &str)]) -> ConceptMapping {
    ConceptMapping {
        concept: name.to_string(),
        domain,
        description: format!("{name} description"),
        variables: vars
            .iter()
            .map(|(wave, var)| (*wave, (*var).to_string()))
            .collect::<BTreeMap<_, _>>(),
        scale_type: scale_type.to_string(),
        canonical_direction: CanonicalDirection::HigherIsMorePositive,
        notes: String::new(),
    }
}

fn registry() -> ConceptRegistry {
    ConceptRegistry::new(
        vec![
            concept(
                "trust_executive",
                Domain::Trust,
                "trust",
                &[(Wave::W2, "q7"), (Wave::W4, "q8")],
            ),
            concept(
                "econ_national_current",
                Domain::Economic,
                "economic",
                &[(Wave::W2, "q1"), (Wave::W4, "q1"), (Wave::W6, "q1")],
            ),
            concept(
                "social_trust_relatives",
                Domain::Social,
                "social_trust",
                &[(Wave::W4, "q24")],
            ),
            concept(
                "gender",
                Domain::Demographic,
                "categorical",
                &[(Wave::W2, "se2"), (Wave::W4, "se2")],
            ),
            concept(
                "covid_government_handling",
                Domain::Covid,
                "ordinal_4",
                &[(Wave::W6, "q138")],
            ),
        ],
        parse_families_str(FAMILIES, "test families").unwrap(),
    )
    .unwrap()
}

fn int_column(name: &str, values: &[i64]) -> LabeledColumn {
    LabeledColumn::new(Column::new(name.into(), values.to_vec()))
}

fn w2() -> WaveDataset {
    WaveDataset::from_columns(
        Wave::W2,
        vec![
            int_column("q7", &[4, 1, 3, 98]).with_description("Trust in the president"),
            int_column("q1", &[1, 5, 0, 3]),
            int_column("se2", &[1, 2, 2, 1]).with_description("Gender"),
        ],
    )
    .unwrap()
}

fn w4() -> WaveDataset {
    let trust_labels: ValueLabels = [
        (1, "A great deal of trust"),
        (2, "Quite a lot of trust"),
        (3, "Not very much trust"),
        (4, "None at all"),
    ]
    .into_iter()
    .collect();
    let relatives_labels: ValueLabels = [(1, "A great deal"), (4, "None at all"), (7, "Can't choose")]
        .into_iter()
        .collect();
    WaveDataset::from_columns(
        Wave::W4,
        vec![
            int_column("q8", &[1, 4, 2, 99])
                .with_description("Trust in the president")
                .with_value_labels(trust_labels),
            int_column("q1", &[1, 5, 0, 2]),
            int_column("q21", &[2, 2, 3, 1]),
            int_column("q24", &[1, 7, 4, 98]).with_value_labels(relatives_labels),
            int_column("se2", &[2, 1, 1, 2]),
        ],
    )
    .unwrap()
}

fn codes(dataset: &WaveDataset, column: &str) -> Vec<Option<i64>> {
    column_codes(dataset.data.column(column).unwrap())
}

#[test]
fn ascending_wave_passes_values_through() {
    let out = harmonize(&w2(), &registry(), &HarmonizeOptions::default()).unwrap();
    assert_eq!(
        codes(&out.dataset, "q7_harm"),
        vec![Some(4), Some(1), Some(3), None]
    );
    assert_eq!(
        codes(&out.dataset, "trust_executive"),
        codes(&out.dataset, "q7_harm")
    );
}

#[test]
fn descending_wave_is_reversed_to_canonical_direction() {
    let out = harmonize(&w4(), &registry(), &HarmonizeOptions::default()).unwrap();
    assert_eq!(
        codes(&out.dataset, "q8_harm"),
        vec![Some(4), Some(1), Some(3), None]
    );
    assert_eq!(
        codes(&out.dataset, "trust_executive"),
        vec![Some(4), Some(1), Some(3), None]
    );

    let harm = out.dataset.column("q8_harm").unwrap();
    assert_eq!(
        harm.labels().unwrap().get(4),
        Some("A great deal of trust")
    );
    assert!(
        harm.description
            .as_deref()
            .unwrap()
            .contains("4-point, source descending, reversed")
    );

    // Concept column keeps the raw description.
    let concept = out.dataset.column("trust_executive").unwrap();
    assert_eq!(concept.description.as_deref(), Some("Trust in the president"));
}

#[test]
fn economic_skip_code_never_becomes_an_endpoint() {
    let registry = registry();
    for dataset in [w2(), w4()] {
        let out = harmonize(&dataset, &registry, &HarmonizeOptions::default()).unwrap();
        let values = codes(&out.dataset, "q1_harm");
        assert_eq!(values[2], None, "{}", dataset.wave);
        assert_eq!(values[0], Some(5));
        assert_eq!(values[1], Some(1));
    }
}

#[test]
fn family_members_without_concepts_are_harmonized() {
    let out = harmonize(&w4(), &registry(), &HarmonizeOptions::default()).unwrap();
    assert_eq!(
        codes(&out.dataset, "q21_harm"),
        vec![Some(3), Some(3), Some(2), Some(4)]
    );
}

#[test]
fn family_policy_applies_label_catalog() {
    let out = harmonize(&w4(), &registry(), &HarmonizeOptions::default()).unwrap();
    assert_eq!(
        codes(&out.dataset, "social_trust_relatives"),
        vec![Some(4), None, Some(1), None]
    );
}

#[test]
fn originals_are_left_untouched() {
    let input = w4();
    let out = harmonize(&input, &registry(), &HarmonizeOptions::default()).unwrap();
    for name in input.column_names() {
        assert_eq!(codes(&out.dataset, &name), codes(&input, &name), "{name}");
    }
    assert_eq!(out.dataset.row_count(), input.row_count());
}

#[test]
fn raw_concepts_and_unmapped_concepts() {
    let out = harmonize(&w2(), &registry(), &HarmonizeOptions::default()).unwrap();
    assert_eq!(
        codes(&out.dataset, "gender"),
        vec![Some(1), Some(2), Some(2), Some(1)]
    );
    // Not asked in W2: present as an all-absent column.
    let covid = out.dataset.column("covid_government_handling").unwrap();
    assert_eq!(covid.absent_count(), 4);

    let report = &out.report;
    assert!(report.diagnostics.iter().any(|d| {
        d.kind == DiagnosticKind::ConceptNotMapped
            && d.concept.as_deref() == Some("covid_government_handling")
            && d.wave == Some(Wave::W2)
    }));
    assert_eq!(report.warning_count(), 0);
}

#[test]
fn missing_variable_is_a_diagnostic() {
    let dataset = WaveDataset::from_columns(
        Wave::W6,
        vec![int_column("q1", &[1, 2]), int_column("se2", &[1, 2])],
    )
    .unwrap();
    let out = harmonize(&dataset, &registry(), &HarmonizeOptions::default()).unwrap();

    let covid = out.dataset.column("covid_government_handling").unwrap();
    assert_eq!(covid.absent_count(), 2);
    let missing: Vec<_> = out
        .report
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::VariableMissing)
        .collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].variable.as_deref(), Some("q138"));

    assert!(
        out.report
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::FamilyNotConfigured)
    );
}

#[test]
fn text_answers_in_a_family_variable_are_skipped() {
    let dataset = WaveDataset::from_columns(
        Wave::W2,
        vec![
            LabeledColumn::new(Column::new("q7".into(), ["A lot", "None"])),
            int_column("q1", &[1, 2]),
        ],
    )
    .unwrap();
    let out = harmonize(&dataset, &registry(), &HarmonizeOptions::default()).unwrap();
    assert!(out.dataset.column("q7_harm").is_none());
    assert_eq!(out.report.count_of(DiagnosticKind::NonNumericScale), 1);
    // Concept falls back to the raw variable.
    assert!(out.dataset.column("trust_executive").is_some());
}
