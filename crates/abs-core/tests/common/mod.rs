#![allow(dead_code)]

use std::collections::BTreeMap;

use abs_common::column_codes;
use abs_model::{CanonicalDirection, ConceptMapping, Domain, LabeledColumn, Wave, WaveDataset};
use abs_registry::{ConceptRegistry, parse_families_str};
use polars::prelude::{Column, DataFrame};

const FAMILIES: &str = r#"
[[family]]
name = "trust"
domain = "trust"

[family.waves.W2]
width = 4
direction = "ascending"

[family.waves.W3]
width = 4
direction = "descending"

[family.waves.W4]
width = 4
direction = "descending"

[family.waves.W5]
width = 6
direction = "descending"

[family.waves.W6]
width = 4
direction = "descending"
"#;

pub fn concept(
    name: &str,
    domain: Domain,
    scale_type: &str,
    vars: &[(Wave, &str)],
) -> ConceptMapping {
    ConceptMapping {
        concept: name.to_string(),
        domain,
        description: String::new(),
        variables: vars
            .iter()
            .map(|(wave, var)| (*wave, (*var).to_string()))
            .collect::<BTreeMap<_, _>>(),
        scale_type: scale_type.to_string(),
        canonical_direction: CanonicalDirection::HigherIsMorePositive,
        notes: String::new(),
    }
}

pub fn registry() -> ConceptRegistry {
    ConceptRegistry::new(
        vec![
            concept(
                "trust_executive",
                Domain::Trust,
                "trust",
                &[
                    (Wave::W2, "q7"),
                    (Wave::W3, "q7"),
                    (Wave::W4, "q8"),
                    (Wave::W5, "q8"),
                    (Wave::W6, "q8"),
                ],
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

pub fn int_column(name: &str, values: &[i64]) -> LabeledColumn {
    LabeledColumn::new(Column::new(name.into(), values.to_vec()))
}

pub fn wave(wave: Wave, columns: Vec<LabeledColumn>) -> WaveDataset {
    WaveDataset::from_columns(wave, columns).unwrap()
}

pub fn codes(frame: &DataFrame, column: &str) -> Vec<Option<i64>> {
    column_codes(frame.column(column).unwrap())
}

pub fn strings(frame: &DataFrame, column: &str) -> Vec<Option<String>> {
    frame
        .column(column)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}
