//! Run-wide harmonization settings.

use std::collections::BTreeSet;

use abs_model::{MissingPolicyKind, ScaleFamily};
use serde::{Deserialize, Serialize};

use crate::missing::{DEFAULT_MISSING_LABELS, DEFAULT_SENTINELS, MissingPolicy};

/// Options shared by every wave of a harmonization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonizeOptions {
    /// Sentinel codes for the numeric missing policy.
    pub sentinels: BTreeSet<i64>,
    /// Value-label texts for the label missing policy.
    pub missing_labels: BTreeSet<String>,
    /// Harmonize waves on the rayon pool instead of one after another.
    pub parallel: bool,
}

impl Default for HarmonizeOptions {
    fn default() -> Self {
        Self {
            sentinels: DEFAULT_SENTINELS.into_iter().collect(),
            missing_labels: DEFAULT_MISSING_LABELS
                .iter()
                .map(|label| (*label).to_string())
                .collect(),
            parallel: false,
        }
    }
}

impl HarmonizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sentinels(mut self, sentinels: impl IntoIterator<Item = i64>) -> Self {
        self.sentinels = sentinels.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_missing_labels<S: Into<String>>(
        mut self,
        labels: impl IntoIterator<Item = S>,
    ) -> Self {
        self.missing_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Label-text policy built from the run's catalog.
    pub fn label_policy(&self) -> MissingPolicy {
        MissingPolicy::Label {
            labels: self.missing_labels.clone(),
        }
    }

    /// The missing policy a family declares, with the family's own
    /// sentinels taking precedence over the run-wide set.
    pub fn policy_for(&self, family: &ScaleFamily) -> MissingPolicy {
        let sentinels = family
            .sentinels
            .clone()
            .unwrap_or_else(|| self.sentinels.clone());
        match family.missing_policy {
            MissingPolicyKind::Numeric => MissingPolicy::Numeric { sentinels },
            MissingPolicyKind::Label => self.label_policy(),
            MissingPolicyKind::NumericThenLabel => MissingPolicy::NumericThenLabel {
                sentinels,
                labels: self.missing_labels.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use abs_model::Domain;

    use super::*;

    fn family(kind: MissingPolicyKind, sentinels: Option<BTreeSet<i64>>) -> ScaleFamily {
        ScaleFamily {
            name: "trust".to_string(),
            domain: Domain::Trust,
            missing_policy: kind,
            sentinels,
            waves: BTreeMap::new(),
        }
    }

    #[test]
    fn family_sentinels_override_run_defaults() {
        let options = HarmonizeOptions::default();
        let custom: BTreeSet<i64> = [9].into_iter().collect();
        let policy = options.policy_for(&family(MissingPolicyKind::Numeric, Some(custom.clone())));
        assert_eq!(policy.sentinels(), Some(&custom));

        let policy = options.policy_for(&family(MissingPolicyKind::NumericThenLabel, None));
        assert_eq!(policy.sentinels(), Some(&options.sentinels));
        assert!(policy.labels().unwrap().contains("Don't know"));
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: HarmonizeOptions = serde_json::from_str(r#"{"parallel": true}"#).unwrap();
        assert!(options.parallel);
        assert_eq!(options.sentinels, HarmonizeOptions::default().sentinels);
    }
}
