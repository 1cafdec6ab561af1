//! Typed view of a tree-model export
//!
//! The export is a single JSON document written by the tree-fitting step.
//! It is validated once here; everything downstream works on typed records.

use crate::error::{DtvisError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Importance score of one input attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
pub struct FeatureImportance {
    pub attribute: String,
    pub importance: f64,
}

impl FeatureImportance {
    pub fn new(attribute: impl Into<String>, importance: f64) -> Self {
        Self {
            attribute: attribute.into(),
            importance,
        }
    }
}

/// Summary stored for a leaf: a single value or per-class observation counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
#[cfg_attr(feature = "ts-rs", derive(ts_rs::TS))]
pub enum LeafValue {
    Scalar(f64),
    Counts(Vec<f64>),
}

impl LeafValue {
    /// Value used when ranking leaves by `class`.
    ///
    /// A scalar summary answers for every class; a count list answers for the
    /// classes it has an entry for.
    pub fn class_value(&self, class: usize) -> Option<f64> {
        match self {
            LeafValue::Scalar(value) => Some(*value),
            LeafValue::Counts(counts) => counts.get(class).copied(),
        }
    }
}

/// Leaf identifier to leaf summary, iterated in identifier order
pub type LeafValues = BTreeMap<String, LeafValue>;

/// One root-to-leaf path; the last step is the leaf identifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionPath {
    /// Opaque key the path was stored under in the export
    pub key: String,
    pub steps: Vec<String>,
}

impl DecisionPath {
    pub fn new<S: Into<String>>(key: impl Into<String>, steps: impl IntoIterator<Item = S>) -> Self {
        Self {
            key: key.into(),
            steps: steps.into_iter().map(Into::into).collect(),
        }
    }

    /// Terminal element of the path
    pub fn leaf_id(&self) -> Option<&str> {
        self.steps.last().map(String::as_str)
    }

    /// Split steps before the leaf
    pub fn splits(&self) -> &[String] {
        match self.steps.split_last() {
            Some((_, splits)) => splits,
            None => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[derive(Deserialize)]
struct RawExport {
    decision_paths: Option<Map<String, Value>>,
    leaf_values: Option<Map<String, Value>>,
    #[serde(rename = "classLabels")]
    class_labels: Option<Vec<String>>,
    x: Option<RawWidget>,
    #[serde(default)]
    importances: Vec<FeatureImportance>,
}

#[derive(Deserialize)]
struct RawWidget {
    opts: Option<RawOptions>,
}

#[derive(Deserialize)]
struct RawOptions {
    #[serde(rename = "classLabels")]
    class_labels: Option<Vec<String>>,
}

/// Validated export: decision paths in insertion order, leaf summaries,
/// class labels and feature importances.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeExport {
    decision_paths: Vec<DecisionPath>,
    leaf_values: LeafValues,
    class_labels: Vec<String>,
    importances: Vec<FeatureImportance>,
}

impl TreeExport {
    /// Build an export from already-typed parts, checking that every path
    /// ends in a known leaf and that count lists line up with the classes.
    pub fn new(
        decision_paths: Vec<DecisionPath>,
        leaf_values: LeafValues,
        class_labels: Vec<String>,
        importances: Vec<FeatureImportance>,
    ) -> Result<Self> {
        for path in &decision_paths {
            let leaf = path.leaf_id().ok_or_else(|| {
                DtvisError::schema(format!("decision path `{}` is empty", path.key))
            })?;
            if !leaf_values.contains_key(leaf) {
                return Err(DtvisError::schema(format!(
                    "decision path `{}` ends in `{}`, which has no entry in `leaf_values`",
                    path.key, leaf
                )));
            }
        }

        for (leaf, value) in &leaf_values {
            if let LeafValue::Counts(counts) = value {
                if counts.len() != class_labels.len() {
                    return Err(DtvisError::schema(format!(
                        "leaf `{}` has {} class counts but there are {} class labels",
                        leaf,
                        counts.len(),
                        class_labels.len()
                    )));
                }
            }
        }

        Ok(Self {
            decision_paths,
            leaf_values,
            class_labels,
            importances,
        })
    }

    /// Parse an export document
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Validate an already-parsed export document
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawExport = serde_json::from_value(value)
            .map_err(|e| DtvisError::schema(format!("unexpected export layout: {}", e)))?;

        let paths = raw
            .decision_paths
            .ok_or_else(|| DtvisError::schema("missing `decision_paths`"))?;
        let leaves = raw
            .leaf_values
            .ok_or_else(|| DtvisError::schema("missing `leaf_values`"))?;
        let class_labels = raw
            .class_labels
            .or_else(|| raw.x.and_then(|x| x.opts).and_then(|opts| opts.class_labels))
            .ok_or_else(|| DtvisError::schema("missing `classLabels`"))?;

        let decision_paths = paths
            .into_iter()
            .map(|(key, steps)| {
                let steps: Vec<String> = serde_json::from_value(steps).map_err(|_| {
                    DtvisError::schema(format!("decision path `{}` must be a list of strings", key))
                })?;
                Ok(DecisionPath { key, steps })
            })
            .collect::<Result<Vec<_>>>()?;

        let leaf_values = leaves
            .into_iter()
            .map(|(leaf, value)| {
                let value: LeafValue = serde_json::from_value(value).map_err(|_| {
                    DtvisError::schema(format!(
                        "leaf `{}` must be a number or a list of numbers",
                        leaf
                    ))
                })?;
                Ok((leaf, value))
            })
            .collect::<Result<LeafValues>>()?;

        Self::new(decision_paths, leaf_values, class_labels, raw.importances)
    }

    /// Read and validate an export file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| DtvisError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let export = Self::from_json(&contents)?;
        debug!(
            path = %path.display(),
            paths = export.decision_paths.len(),
            leaves = export.leaf_values.len(),
            classes = export.class_labels.len(),
            importances = export.importances.len(),
            "tree export loaded"
        );
        Ok(export)
    }

    pub fn decision_paths(&self) -> &[DecisionPath] {
        &self.decision_paths
    }

    pub fn leaf_values(&self) -> &LeafValues {
        &self.leaf_values
    }

    pub fn class_labels(&self) -> &[String] {
        &self.class_labels
    }

    pub fn importances(&self) -> &[FeatureImportance] {
        &self.importances
    }
}
