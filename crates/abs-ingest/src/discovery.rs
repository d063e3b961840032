//! Wave file discovery in a study folder.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use abs_model::Wave;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Suffix of the label sidecar that sits next to a wave CSV.
pub const SIDECAR_SUFFIX: &str = ".labels.json";

/// A wave's response file and, when present, its label sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveFile {
    pub wave: Wave,
    pub path: PathBuf,
    pub labels: Option<PathBuf>,
}

/// Lists all CSV files in a directory, sorted by filename.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Path of the label sidecar for a wave CSV (`w4.csv` -> `w4.labels.json`).
pub fn sidecar_path(csv: &Path) -> PathBuf {
    let stem = csv
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    csv.with_file_name(format!("{stem}{SIDECAR_SUFFIX}"))
}

/// Finds one CSV per wave, keyed by the wave token in its file name.
///
/// Files without a wave token are ignored. Two files naming the same wave
/// is an error; so is a folder without any wave file.
pub fn discover_waves(dir: &Path) -> Result<Vec<WaveFile>> {
    let mut found: BTreeMap<Wave, WaveFile> = BTreeMap::new();
    for path in list_csv_files(dir)? {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let Some(wave) = Wave::find_in(&stem) else {
            debug!(path = %path.display(), "no wave token, skipping");
            continue;
        };
        if let Some(existing) = found.get(&wave) {
            return Err(IngestError::DuplicateWave {
                wave,
                first: existing.path.clone(),
                second: path,
            });
        }
        let labels = Some(sidecar_path(&path)).filter(|p| p.is_file());
        found.insert(wave, WaveFile { wave, path, labels });
    }

    if found.is_empty() {
        return Err(IngestError::NoWaveFiles {
            path: dir.to_path_buf(),
        });
    }
    Ok(found.into_values().collect())
}
