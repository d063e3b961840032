//! Wave ingestion for a study folder.
//!
//! A study folder holds one CSV per wave, named with a wave token
//! (`abs_w2.csv`, `wave4.csv`), each optionally accompanied by a
//! `<stem>.labels.json` sidecar with variable descriptions and value labels.

pub mod discovery;
pub mod error;
pub mod labels;
pub mod loader;
pub mod reader;

pub use discovery::{SIDECAR_SUFFIX, WaveFile, discover_waves, list_csv_files, sidecar_path};
pub use error::{IngestError, Result};
pub use labels::{parse_labels, read_labels};
pub use loader::{load_study, load_wave, load_wave_path};
pub use reader::read_wave_csv;
