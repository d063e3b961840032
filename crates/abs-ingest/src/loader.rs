//! Wave loading: responses plus labels into a [`WaveDataset`].

use std::collections::BTreeMap;
use std::path::Path;

use abs_model::{CaseInsensitiveSet, ColumnMeta, Wave, WaveDataset};
use tracing::{info, info_span, warn};

use crate::discovery::{WaveFile, discover_waves, sidecar_path};
use crate::error::{IngestError, Result};
use crate::labels::read_labels;
use crate::reader::read_wave_csv;

/// Loads one wave file and its sidecar.
///
/// Sidecar entries are matched to columns ignoring case; entries for
/// variables the CSV does not have are logged and dropped.
pub fn load_wave(file: &WaveFile) -> Result<WaveDataset> {
    let span = info_span!("load_wave", wave = %file.wave, path = %file.path.display());
    let _guard = span.enter();

    let data = read_wave_csv(&file.path)?;
    let columns = CaseInsensitiveSet::new(data.get_column_names().iter().map(|n| n.as_str()));

    let mut metadata: BTreeMap<String, ColumnMeta> = BTreeMap::new();
    if let Some(labels_path) = &file.labels {
        for (variable, meta) in read_labels(labels_path)? {
            match columns.get(&variable) {
                Some(column) => {
                    metadata.insert(column.to_string(), meta);
                }
                None => warn!(variable = %variable, "labels for a variable not in the data"),
            }
        }
    }

    let dataset = WaveDataset::new(file.wave, data, metadata);
    info!(
        rows = dataset.row_count(),
        columns = dataset.data.width(),
        labeled = dataset.metadata.len(),
        "wave loaded"
    );
    Ok(dataset)
}

/// Discovers and loads every wave in a study folder, in canonical order.
pub fn load_study(dir: &Path) -> Result<Vec<WaveDataset>> {
    discover_waves(dir)?.iter().map(load_wave).collect()
}

/// Loads a single CSV as the given wave, with its sidecar when present.
pub fn load_wave_path(path: &Path, wave: Wave) -> Result<WaveDataset> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let labels = Some(sidecar_path(path)).filter(|p| p.is_file());
    load_wave(&WaveFile {
        wave,
        path: path.to_path_buf(),
        labels,
    })
}
