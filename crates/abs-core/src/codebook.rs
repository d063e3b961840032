//! Harmonization codebook: which raw variable backs each concept in each wave.

use abs_model::{Domain, Wave};
use abs_registry::ConceptRegistry;
use polars::prelude::{Column, DataFrame};
use serde::Serialize;

use crate::error::Result;

/// Marker for a wave without a variable in the text rendering.
pub const ABSENT_MARKER: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodebookRow {
    pub concept: String,
    pub domain: Domain,
    /// One entry per wave in canonical order.
    pub variables: Vec<Option<String>>,
}

pub fn codebook_rows(registry: &ConceptRegistry) -> Vec<CodebookRow> {
    registry
        .concepts()
        .iter()
        .map(|mapping| CodebookRow {
            concept: mapping.concept.clone(),
            domain: mapping.domain,
            variables: Wave::ALL
                .iter()
                .map(|wave| mapping.variable(*wave).map(str::to_string))
                .collect(),
        })
        .collect()
}

/// Codebook as a table `{concept, domain, W2, W3, W4, W5, W6}`; unmapped
/// waves are null.
pub fn codebook(registry: &ConceptRegistry) -> Result<DataFrame> {
    let rows = codebook_rows(registry);
    let mut columns = vec![
        Column::new(
            "concept".into(),
            rows.iter().map(|r| r.concept.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "domain".into(),
            rows.iter().map(|r| r.domain.as_str()).collect::<Vec<_>>(),
        ),
    ];
    for (idx, wave) in Wave::ALL.iter().enumerate() {
        let values: Vec<Option<&str>> = rows
            .iter()
            .map(|r| r.variables.get(idx).and_then(Option::as_deref))
            .collect();
        columns.push(Column::new(wave.as_str().into(), values));
    }
    Ok(DataFrame::new(columns)?)
}

/// Fixed-width text rendering of the codebook.
pub fn render_codebook(registry: &ConceptRegistry) -> String {
    let mut header = vec!["concept".to_string(), "domain".to_string()];
    header.extend(Wave::ALL.iter().map(|w| w.as_str().to_string()));

    let body: Vec<Vec<String>> = codebook_rows(registry)
        .into_iter()
        .map(|row| {
            let mut cells = vec![row.concept, row.domain.as_str().to_string()];
            cells.extend(
                row.variables
                    .into_iter()
                    .map(|v| v.unwrap_or_else(|| ABSENT_MARKER.to_string())),
            );
            cells
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(String::len).collect();
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.len());
        }
    }

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut out = String::new();
    for cells in std::iter::once(&header)
        .chain(std::iter::once(&rule))
        .chain(body.iter())
    {
        let line = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
