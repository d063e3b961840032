#![deny(unsafe_code)]

//! Concept registry CSV.
//!
//! ```text
//! concept,domain,description,W2_var,W3_var,W4_var,W5_var,W6_var,scale_type,direction,notes
//! trust_executive,trust,Trust in the executive,q7,q7,q8,q8,q8,trust,higher_is_more_positive,
//! ```
//!
//! One `<wave>_var` column per wave; a blank cell means the wave did not ask
//! the question. A `<token>_var` header naming anything other than W2..W6 is
//! rejected outright, so a typo such as `W7_var` fails the load instead of
//! silently dropping a wave.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use abs_model::{CanonicalDirection, ConceptMapping, Domain, Wave};

use crate::error::RegistryError;

const WAVE_COLUMN_SUFFIX: &str = "_var";

pub fn parse_concepts_csv(path: &Path) -> Result<Vec<ConceptMapping>, RegistryError> {
    let bytes = std::fs::read(path).map_err(|e| RegistryError::io(path, e))?;
    parse_concepts_reader(bytes.as_slice(), &path.display().to_string())
}

pub fn parse_concepts_reader<R: Read>(
    reader: R,
    source_name: &str,
) -> Result<Vec<ConceptMapping>, RegistryError> {
    let csv_error = |message: String| RegistryError::Csv {
        source_name: source_name.to_string(),
        message,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(e.to_string()))?
        .iter()
        .map(|h| h.trim_matches('\u{feff}').trim().to_string())
        .collect();

    let wave_columns = wave_columns(&headers, source_name)?;
    for required in ["concept", "domain"] {
        if !headers.iter().any(|h| h == required) {
            return Err(csv_error(format!("missing required column '{required}'")));
        }
    }
    if wave_columns.is_empty() {
        return Err(csv_error("no <wave>_var columns".to_string()));
    }

    let mut results = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| csv_error(e.to_string()))?;
        let line = row.position().map_or(0, csv::Position::line);
        if row.iter().all(str::is_empty) {
            continue;
        }

        let get = |name: &str| -> Option<String> {
            headers
                .iter()
                .position(|h| h == name)
                .and_then(|i| row.get(i))
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let malformed = |message: String| RegistryError::MalformedRow {
            source_name: source_name.to_string(),
            line,
            message,
        };

        let concept = get("concept").ok_or_else(|| malformed("missing concept".to_string()))?;
        let domain = get("domain")
            .ok_or_else(|| malformed(format!("{concept}: missing domain")))?
            .parse::<Domain>()
            .map_err(|e| malformed(format!("{concept}: {e}")))?;
        let canonical_direction = match get("direction") {
            Some(raw) => raw
                .parse::<CanonicalDirection>()
                .map_err(|e| malformed(format!("{concept}: {e}")))?,
            None => CanonicalDirection::default(),
        };

        let mut variables = BTreeMap::new();
        for (idx, wave) in &wave_columns {
            if let Some(variable) = row.get(*idx).filter(|s| !s.is_empty()) {
                variables.insert(*wave, variable.to_string());
            }
        }
        if variables.is_empty() {
            return Err(malformed(format!("{concept}: no variable in any wave")));
        }

        results.push(ConceptMapping {
            concept,
            domain,
            description: get("description").unwrap_or_default(),
            variables,
            scale_type: get("scale_type").unwrap_or_else(|| "unspecified".to_string()),
            canonical_direction,
            notes: get("notes").unwrap_or_default(),
        });
    }

    Ok(results)
}

fn wave_columns(headers: &[String], source_name: &str) -> Result<Vec<(usize, Wave)>, RegistryError> {
    let mut columns = Vec::new();
    for (idx, header) in headers.iter().enumerate() {
        let Some(token) = header.strip_suffix(WAVE_COLUMN_SUFFIX) else {
            continue;
        };
        let wave = token
            .parse::<Wave>()
            .map_err(|_| RegistryError::UnknownWaveColumn {
                source_name: source_name.to_string(),
                column: header.clone(),
            })?;
        columns.push((idx, wave));
    }
    Ok(columns)
}
