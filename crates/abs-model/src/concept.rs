//! Concept registry rows and harmonization families.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::scale::{Direction, MissingPolicyKind, ScaleSpec, ScaleWidth};
use crate::wave::Wave;

/// Thematic battery a concept belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Trust,
    Economic,
    Democracy,
    Politics,
    Governance,
    Social,
    Covid,
    Demographic,
}

impl Domain {
    pub const ALL: [Domain; 8] = [
        Domain::Trust,
        Domain::Economic,
        Domain::Democracy,
        Domain::Politics,
        Domain::Governance,
        Domain::Social,
        Domain::Covid,
        Domain::Demographic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Trust => "trust",
            Domain::Economic => "economic",
            Domain::Democracy => "democracy",
            Domain::Politics => "politics",
            Domain::Governance => "governance",
            Domain::Social => "social",
            Domain::Covid => "covid",
            Domain::Demographic => "demographic",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Domain::ALL
            .into_iter()
            .find(|domain| domain.as_str() == key)
            .ok_or_else(|| ModelError::UnknownDomain(s.trim().to_string()))
    }
}

/// Direction every harmonized column is brought into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalDirection {
    #[default]
    HigherIsMorePositive,
}

impl CanonicalDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalDirection::HigherIsMorePositive => "higher_is_more_positive",
        }
    }
}

impl fmt::Display for CanonicalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "higher_is_more_positive" => Ok(CanonicalDirection::HigherIsMorePositive),
            other => Err(format!("unsupported canonical direction '{other}'")),
        }
    }
}

/// One registry row: a construct and the raw variable measuring it in each wave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptMapping {
    /// Unique key, also used as the concept column name.
    pub concept: String,
    pub domain: Domain,
    pub description: String,
    /// Raw variable per wave. Waves without an entry do not ask the question.
    pub variables: BTreeMap<Wave, String>,
    /// Harmonization family name, or a free-form type such as `binary`.
    pub scale_type: String,
    pub canonical_direction: CanonicalDirection,
    pub notes: String,
}

impl ConceptMapping {
    pub fn variable(&self, wave: Wave) -> Option<&str> {
        self.variables.get(&wave).map(String::as_str)
    }

    /// Waves with a mapping, in canonical order.
    pub fn waves(&self) -> impl Iterator<Item = Wave> + '_ {
        self.variables.keys().copied()
    }

    pub fn is_mapped_in(&self, wave: Wave) -> bool {
        self.variables.contains_key(&wave)
    }
}

/// Per-wave scale metadata of a harmonization family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyWave {
    pub width: ScaleWidth,
    pub direction: Direction,
    /// Battery variables harmonized with the family but not tied to a concept.
    #[serde(default)]
    pub members: Vec<String>,
}

impl FamilyWave {
    pub fn spec(&self) -> ScaleSpec {
        ScaleSpec::new(self.width, self.direction)
    }
}

/// A group of questions that share width and polarity within each wave.
///
/// Holding the wave table here replaces "if wave is X or Y, reverse"
/// branching with a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleFamily {
    pub name: String,
    pub domain: Domain,
    #[serde(default)]
    pub missing_policy: MissingPolicyKind,
    /// Overrides the run-wide sentinel codes for this family.
    #[serde(default)]
    pub sentinels: Option<BTreeSet<i64>>,
    #[serde(default)]
    pub waves: BTreeMap<Wave, FamilyWave>,
}

impl ScaleFamily {
    pub fn spec_for(&self, wave: Wave) -> Option<ScaleSpec> {
        self.waves.get(&wave).map(FamilyWave::spec)
    }

    pub fn extra_members(&self, wave: Wave) -> &[String] {
        self.waves
            .get(&wave)
            .map(|entry| entry.members.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_round_trips_through_str() {
        for domain in Domain::ALL {
            assert_eq!(domain.as_str().parse::<Domain>().unwrap(), domain);
        }
        assert!("weather".parse::<Domain>().is_err());
    }

    #[test]
    fn family_rejects_unknown_wave_keys() {
        let text = r#"
name = "trust"
domain = "trust"
[waves.W9]
width = 4
direction = "ascending"
"#;
        assert!(toml::from_str::<ScaleFamily>(text).is_err());
    }

    #[test]
    fn family_reads_wave_table() {
        let text = r#"
name = "trust"
domain = "trust"
missing_policy = "numeric_then_label"
[waves.W2]
width = 4
direction = "ascending"
[waves.W5]
width = 6
direction = "descending"
members = ["q19"]
"#;
        let family: ScaleFamily = toml::from_str(text).unwrap();
        assert_eq!(family.missing_policy, MissingPolicyKind::NumericThenLabel);
        assert!(!family.spec_for(Wave::W2).unwrap().needs_reversal());
        assert_eq!(family.spec_for(Wave::W5).unwrap().width, ScaleWidth::Six);
        assert_eq!(family.extra_members(Wave::W5), ["q19".to_string()]);
        assert!(family.spec_for(Wave::W3).is_none());
    }
}
