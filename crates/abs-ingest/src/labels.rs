//! JSON label sidecars.
//!
//! ```json
//! {
//!   "q7": {
//!     "description": "Trust in the president",
//!     "value_labels": { "1": "A great deal of trust", "98": "Don't know" }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use abs_model::ColumnMeta;

use crate::error::{IngestError, Result};

/// Reads a sidecar into per-variable metadata.
pub fn read_labels(path: &Path) -> Result<BTreeMap<String, ColumnMeta>> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::read(path, e))?;
    parse_labels(&text).map_err(|source| IngestError::Sidecar {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_labels(text: &str) -> serde_json::Result<BTreeMap<String, ColumnMeta>> {
    serde_json::from_str(text)
}
