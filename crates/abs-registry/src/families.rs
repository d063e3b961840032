#![deny(unsafe_code)]

//! Scale-family TOML.
//!
//! ```toml
//! [[family]]
//! name = "trust"
//! domain = "trust"
//! missing_policy = "numeric"
//!
//! [family.waves.W2]
//! width = 4
//! direction = "ascending"
//! ```

use std::path::Path;

use abs_model::ScaleFamily;
use serde::Deserialize;

use crate::error::RegistryError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FamiliesFile {
    #[serde(rename = "family", default)]
    families: Vec<ScaleFamily>,
}

pub fn parse_families_toml(path: &Path) -> Result<Vec<ScaleFamily>, RegistryError> {
    let contents = std::fs::read_to_string(path).map_err(|e| RegistryError::io(path, e))?;
    parse_families_str(&contents, &path.display().to_string())
}

pub fn parse_families_str(
    contents: &str,
    source_name: &str,
) -> Result<Vec<ScaleFamily>, RegistryError> {
    let file: FamiliesFile = toml::from_str(contents).map_err(|e| RegistryError::Toml {
        source_name: source_name.to_string(),
        source: e,
    })?;
    Ok(file.families)
}

#[cfg(test)]
mod tests {
    use abs_model::{Direction, MissingPolicyKind, ScaleWidth, Wave};

    use super::*;

    #[test]
    fn parses_family_tables() {
        let text = r#"
[[family]]
name = "economic"
domain = "economic"
sentinels = [0, 7, 8, 9]

[family.waves.W2]
width = 5
direction = "descending"

[[family]]
name = "trust"
domain = "trust"
missing_policy = "label"

[family.waves.W4]
width = 4
direction = "descending"
"#;
        let families = parse_families_str(text, "inline").unwrap();
        assert_eq!(families.len(), 2);
        let economic = &families[0];
        assert_eq!(economic.missing_policy, MissingPolicyKind::Numeric);
        assert_eq!(
            economic.sentinels.as_ref().map(|s| s.len()),
            Some(4)
        );
        let spec = economic.spec_for(Wave::W2).unwrap();
        assert_eq!(spec.width, ScaleWidth::Five);
        assert_eq!(spec.direction_in_wave, Direction::Descending);
        assert_eq!(families[1].missing_policy, MissingPolicyKind::Label);
    }

    #[test]
    fn rejects_bad_width() {
        let text = r#"
[[family]]
name = "trust"
domain = "trust"
[family.waves.W2]
width = 7
direction = "ascending"
"#;
        assert!(matches!(
            parse_families_str(text, "inline"),
            Err(RegistryError::Toml { .. })
        ));
    }

    #[test]
    fn rejects_unknown_top_level_tables() {
        assert!(parse_families_str("[[familly]]\nname = \"x\"\n", "inline").is_err());
    }
}
