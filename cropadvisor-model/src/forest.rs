//! Random-forest classifier loaded from a JSON artifact.
//!
//! Artifact shape:
//!
//! ```json
//! {
//!   "classes": ["apple", "banana"],
//!   "trees": [
//!     { "nodes": [
//!         { "feature": 6, "threshold": 120.5, "left": 1, "right": 2 },
//!         { "value": [10.0, 0.0] },
//!         { "value": [1.0, 30.0] }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Node 0 is the root. A sample goes left when `x[feature] <= threshold`.
//! Leaf weights are normalized per tree, averaged over the forest, and the
//! most probable class wins.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::sample::{SoilSample, FEATURE_COUNT};
use crate::{CropClassifier, ModelError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    pub classes: Vec<String>,
    pub trees: Vec<Tree>,
}

impl ForestModel {
    /// Read and validate an artifact from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_json_str(&raw)?;
        info!(
            path = %path.display(),
            classes = model.classes.len(),
            trees = model.trees.len(),
            "loaded crop model"
        );
        Ok(model)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_str(raw)?;
        model.validate()?;
        Ok(model)
    }

    /// Check the structural invariants `predict` relies on.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.classes.is_empty() {
            return Err(invalid("no classes"));
        }
        if self.trees.is_empty() {
            return Err(invalid("no trees"));
        }
        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(invalid(format!("tree {t} has no nodes")));
            }
            let len = tree.nodes.len();
            for (i, node) in tree.nodes.iter().enumerate() {
                match node {
                    Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if *feature >= FEATURE_COUNT {
                            return Err(invalid(format!(
                                "tree {t} node {i}: feature {feature} out of range"
                            )));
                        }
                        if !threshold.is_finite() {
                            return Err(invalid(format!("tree {t} node {i}: bad threshold")));
                        }
                        // Children must come after their parent, which rules out cycles.
                        for child in [*left, *right] {
                            if child <= i || child >= len {
                                return Err(invalid(format!(
                                    "tree {t} node {i}: child {child} out of range"
                                )));
                            }
                        }
                    }
                    Node::Leaf { value } => {
                        if value.len() != self.classes.len() {
                            return Err(invalid(format!(
                                "tree {t} node {i}: expected {} class weights, got {}",
                                self.classes.len(),
                                value.len()
                            )));
                        }
                        if value.iter().any(|w| !w.is_finite() || *w < 0.0) {
                            return Err(invalid(format!("tree {t} node {i}: bad weight")));
                        }
                        if value.iter().sum::<f64>() <= 0.0 {
                            return Err(invalid(format!("tree {t} node {i}: empty leaf")));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Averaged class probabilities for one sample.
    pub fn predict_proba(&self, sample: &SoilSample) -> Vec<f64> {
        let x = sample.features();
        let mut proba = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let leaf = tree.leaf_for(&x);
            let total: f64 = leaf.iter().sum();
            for (p, w) in proba.iter_mut().zip(leaf) {
                *p += w / total;
            }
        }
        let n = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n);
        proba
    }
}

impl Tree {
    fn leaf_for(&self, x: &[f64; FEATURE_COUNT]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

impl CropClassifier for ForestModel {
    fn predict(&self, sample: &SoilSample) -> Result<String, ModelError> {
        let proba = self.predict_proba(sample);
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        Ok(self.classes[best].to_lowercase())
    }
}

fn invalid(msg: impl Into<String>) -> ModelError {
    ModelError::Invalid(msg.into())
}
