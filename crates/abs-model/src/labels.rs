//! Labeled columns: response values plus description and value labels.

use std::collections::BTreeMap;

use polars::prelude::Column;
use serde::{Deserialize, Serialize};

/// Code → text dictionary attached to a column (e.g. `98 → "Don't know"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueLabels(BTreeMap<i64, String>);

impl ValueLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: i64, label: impl Into<String>) {
        self.0.insert(code, label.into());
    }

    pub fn get(&self, code: i64) -> Option<&str> {
        self.0.get(&code).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.0.iter().map(|(code, label)| (*code, label.as_str()))
    }

    /// Rebuilds the dictionary through a code transform, dropping codes the
    /// transform sends to absent.
    pub fn remap(&self, mut f: impl FnMut(i64) -> Option<i64>) -> ValueLabels {
        let mut out = ValueLabels::new();
        for (code, label) in &self.0 {
            if let Some(mapped) = f(*code) {
                out.0.insert(mapped, label.clone());
            }
        }
        out
    }
}

impl<S: Into<String>> FromIterator<(i64, S)> for ValueLabels {
    fn from_iter<T: IntoIterator<Item = (i64, S)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(code, label)| (code, label.into()))
                .collect(),
        )
    }
}

/// Side tables for one column of a wave dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub value_labels: Option<ValueLabels>,
}

/// A column of raw or derived responses with its descriptive metadata.
#[derive(Debug, Clone)]
pub struct LabeledColumn {
    pub data: Column,
    pub description: Option<String>,
    pub value_labels: Option<ValueLabels>,
}

impl LabeledColumn {
    pub fn new(data: Column) -> Self {
        Self {
            data,
            description: None,
            value_labels: None,
        }
    }

    pub fn with_meta(data: Column, meta: ColumnMeta) -> Self {
        Self {
            data,
            description: meta.description,
            value_labels: meta.value_labels,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_value_labels(mut self, labels: ValueLabels) -> Self {
        self.value_labels = Some(labels);
        self
    }

    pub fn name(&self) -> &str {
        self.data.name().as_str()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.len() == 0
    }

    pub fn absent_count(&self) -> usize {
        self.data.null_count()
    }

    /// Value labels, treating an empty dictionary as none.
    pub fn labels(&self) -> Option<&ValueLabels> {
        self.value_labels.as_ref().filter(|labels| !labels.is_empty())
    }

    pub fn meta(&self) -> ColumnMeta {
        ColumnMeta {
            description: self.description.clone(),
            value_labels: self.value_labels.clone(),
        }
    }

    /// Same metadata, new name.
    #[must_use]
    pub fn renamed(&self, name: &str) -> LabeledColumn {
        LabeledColumn {
            data: self.data.clone().with_name(name.into()),
            description: self.description.clone(),
            value_labels: self.value_labels.clone(),
        }
    }
}
