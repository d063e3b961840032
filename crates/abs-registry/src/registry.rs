#![deny(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use abs_model::{ConceptMapping, Domain, ScaleFamily, ScaleSpec, Wave};
use serde::Serialize;
use tracing::debug;

use crate::csv::concepts::parse_concepts_csv;
use crate::error::RegistryError;
use crate::families::parse_families_toml;
use crate::hash::sha256_hex;

/// A raw variable harmonized by a family in one wave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyVariable {
    pub variable: String,
    /// Registry concept backed by this variable, if any.
    pub concept: Option<String>,
}

/// Immutable concept registry.
///
/// Built once per run and passed by reference to every harmonization and
/// accessor call. Construction validates the whole table, so lookups never
/// have to.
#[derive(Debug, Clone)]
pub struct ConceptRegistry {
    concepts: Vec<ConceptMapping>,
    by_concept: BTreeMap<String, usize>,
    families: Vec<ScaleFamily>,
    by_family: BTreeMap<String, usize>,
}

#[derive(Serialize)]
struct FingerprintInput<'a> {
    concepts: &'a [ConceptMapping],
    families: &'a [ScaleFamily],
}

impl ConceptRegistry {
    pub fn new(
        concepts: Vec<ConceptMapping>,
        families: Vec<ScaleFamily>,
    ) -> Result<Self, RegistryError> {
        let mut by_concept = BTreeMap::new();
        for (idx, mapping) in concepts.iter().enumerate() {
            if mapping.variables.is_empty() {
                return Err(RegistryError::UnmappedConcept {
                    concept: mapping.concept.clone(),
                });
            }
            if by_concept.insert(mapping.concept.clone(), idx).is_some() {
                return Err(RegistryError::DuplicateConcept {
                    concept: mapping.concept.clone(),
                });
            }
        }

        let mut by_family = BTreeMap::new();
        for (idx, family) in families.iter().enumerate() {
            if by_family.insert(family.name.clone(), idx).is_some() {
                return Err(RegistryError::DuplicateFamily {
                    name: family.name.clone(),
                });
            }
        }

        let registry = Self {
            concepts,
            by_concept,
            families,
            by_family,
        };
        registry.check_family_claims()?;
        debug!(
            concepts = registry.concepts.len(),
            families = registry.families.len(),
            "concept registry built"
        );
        Ok(registry)
    }

    /// Loads a registry from a concept CSV and a scale-family TOML file.
    pub fn from_paths(concepts_csv: &Path, families_toml: &Path) -> Result<Self, RegistryError> {
        let concepts = parse_concepts_csv(concepts_csv)?;
        let families = parse_families_toml(families_toml)?;
        Self::new(concepts, families)
    }

    /// Every raw variable is harmonized by at most one family per wave.
    fn check_family_claims(&self) -> Result<(), RegistryError> {
        let mut claims: BTreeMap<(Wave, String), &str> = BTreeMap::new();
        for family in &self.families {
            for wave in Wave::ALL {
                for member in self.family_variables(&family.name, wave) {
                    let key = (wave, member.variable.to_ascii_uppercase());
                    match claims.get(&key) {
                        Some(first) if *first != family.name => {
                            return Err(RegistryError::ConflictingFamilies {
                                wave,
                                variable: member.variable,
                                first: (*first).to_string(),
                                second: family.name.clone(),
                            });
                        }
                        Some(_) => {}
                        None => {
                            claims.insert(key, family.name.as_str());
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn concepts(&self) -> &[ConceptMapping] {
        &self.concepts
    }

    pub fn families(&self) -> &[ScaleFamily] {
        &self.families
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn contains(&self, concept: &str) -> bool {
        self.by_concept.contains_key(concept)
    }

    pub fn get(&self, concept: &str) -> Result<&ConceptMapping, RegistryError> {
        self.by_concept
            .get(concept)
            .map(|idx| &self.concepts[*idx])
            .ok_or_else(|| RegistryError::UnknownConcept {
                concept: concept.to_string(),
            })
    }

    /// Raw variable for a concept in a wave.
    ///
    /// Unknown concepts are an error; a known concept the wave did not ask is `None`.
    pub fn variable_for(&self, concept: &str, wave: Wave) -> Result<Option<&str>, RegistryError> {
        Ok(self.get(concept)?.variable(wave))
    }

    pub fn concepts_in_domain(&self, domain: Domain) -> BTreeSet<&str> {
        self.concepts
            .iter()
            .filter(|m| m.domain == domain)
            .map(|m| m.concept.as_str())
            .collect()
    }

    pub fn concepts_in_wave(&self, wave: Wave) -> BTreeSet<&str> {
        self.concepts
            .iter()
            .filter(|m| m.is_mapped_in(wave))
            .map(|m| m.concept.as_str())
            .collect()
    }

    /// Waves with a mapping for the concept, in canonical order.
    pub fn availability(&self, concept: &str) -> Result<BTreeSet<Wave>, RegistryError> {
        Ok(self.get(concept)?.waves().collect())
    }

    pub fn family(&self, name: &str) -> Option<&ScaleFamily> {
        self.by_family.get(name).map(|idx| &self.families[*idx])
    }

    /// The harmonization family a concept belongs to, if its scale type names one.
    pub fn family_of(&self, concept: &str) -> Result<Option<&ScaleFamily>, RegistryError> {
        Ok(self.family(&self.get(concept)?.scale_type))
    }

    /// Scale of a concept's question in a wave, via its family.
    pub fn scale_for(&self, concept: &str, wave: Wave) -> Result<Option<ScaleSpec>, RegistryError> {
        let mapping = self.get(concept)?;
        if !mapping.is_mapped_in(wave) {
            return Ok(None);
        }
        Ok(self
            .family(&mapping.scale_type)
            .and_then(|family| family.spec_for(wave)))
    }

    /// Raw variables a family harmonizes in a wave: its concepts' variables
    /// followed by the family's extra battery members, without duplicates.
    ///
    /// Empty when the family has no scale entry for the wave.
    pub fn family_variables(&self, family: &str, wave: Wave) -> Vec<FamilyVariable> {
        let Some(entry) = self.family(family) else {
            return Vec::new();
        };
        if entry.spec_for(wave).is_none() {
            return Vec::new();
        }

        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for mapping in self.concepts.iter().filter(|m| m.scale_type == family) {
            if let Some(variable) = mapping.variable(wave)
                && seen.insert(variable.to_ascii_uppercase())
            {
                out.push(FamilyVariable {
                    variable: variable.to_string(),
                    concept: Some(mapping.concept.clone()),
                });
            }
        }
        for member in entry.extra_members(wave) {
            if seen.insert(member.to_ascii_uppercase()) {
                out.push(FamilyVariable {
                    variable: member.clone(),
                    concept: None,
                });
            }
        }
        out
    }

    /// SHA-256 over the registry contents; names the registry version a
    /// derived dataset was built from.
    pub fn fingerprint(&self) -> String {
        let input = FingerprintInput {
            concepts: &self.concepts,
            families: &self.families,
        };
        let bytes = serde_json::to_vec(&input).unwrap_or_default();
        sha256_hex(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use abs_model::{CanonicalDirection, Direction, FamilyWave, MissingPolicyKind, ScaleWidth};

    use super::*;

    fn concept(name: &str, scale_type: &str, vars: &[(Wave, &str)]) -> ConceptMapping {
        ConceptMapping {
            concept: name.to_string(),
            domain: Domain::Trust,
            description: String::new(),
            variables: vars
                .iter()
                .map(|(w, v)| (*w, (*v).to_string()))
                .collect(),
            scale_type: scale_type.to_string(),
            canonical_direction: CanonicalDirection::HigherIsMorePositive,
            notes: String::new(),
        }
    }

    fn family(name: &str, waves: &[(Wave, Vec<&str>)]) -> ScaleFamily {
        ScaleFamily {
            name: name.to_string(),
            domain: Domain::Trust,
            missing_policy: MissingPolicyKind::Numeric,
            sentinels: None,
            waves: waves
                .iter()
                .map(|(w, members)| {
                    (
                        *w,
                        FamilyWave {
                            width: ScaleWidth::Four,
                            direction: Direction::Ascending,
                            members: members.iter().map(|m| (*m).to_string()).collect(),
                        },
                    )
                })
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn family_variables_merge_concepts_and_members() {
        let registry = ConceptRegistry::new(
            vec![
                concept("trust_executive", "trust", &[(Wave::W2, "q7")]),
                concept("trust_courts", "trust", &[(Wave::W2, "q8"), (Wave::W3, "q8")]),
            ],
            vec![family("trust", &[(Wave::W2, vec!["Q7", "q19"])])],
        )
        .unwrap();

        let vars = registry.family_variables("trust", Wave::W2);
        let names: Vec<&str> = vars.iter().map(|v| v.variable.as_str()).collect();
        assert_eq!(names, vec!["q7", "q8", "q19"]);
        assert_eq!(vars[2].concept, None);
        assert!(registry.family_variables("trust", Wave::W3).is_empty());
        assert!(registry.family_variables("economic", Wave::W2).is_empty());
    }

    #[test]
    fn conflicting_family_claims_fail() {
        let err = ConceptRegistry::new(
            vec![concept("trust_executive", "trust", &[(Wave::W2, "q7")])],
            vec![
                family("trust", &[(Wave::W2, vec![])]),
                family("social_trust", &[(Wave::W2, vec!["q7"])]),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::ConflictingFamilies { wave: Wave::W2, .. }));
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = ConceptRegistry::new(
            vec![concept("trust_executive", "trust", &[(Wave::W2, "q7")])],
            vec![],
        )
        .unwrap();
        let b = ConceptRegistry::new(
            vec![concept("trust_executive", "trust", &[(Wave::W2, "q8")])],
            vec![],
        )
        .unwrap();
        assert_eq!(a.fingerprint(), a.clone().fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }
}
