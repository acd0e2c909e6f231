//! Classifier artifacts exported from the training environment.
//!
//! Two shapes are supported, selected by the `kind` field of the JSON file:
//! a linear model (logistic regression, linear SVM) and a forest of decision
//! trees in the flat array layout used by common tree learners.

use serde::{Deserialize, Serialize};

use super::Classifier;
use crate::error::PredictionError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ClassifierArtifact {
    Linear(LinearClassifier),
    Forest(ForestClassifier),
}

impl ClassifierArtifact {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Linear(model) => model.validate(),
            Self::Forest(model) => model.validate(),
        }
    }
}

impl Classifier for ClassifierArtifact {
    fn n_features_in(&self) -> usize {
        match self {
            Self::Linear(model) => model.n_features_in(),
            Self::Forest(model) => model.n_features_in(),
        }
    }

    fn predict(&self, features: &[f64]) -> Result<i64, PredictionError> {
        match self {
            Self::Linear(model) => model.predict(features),
            Self::Forest(model) => model.predict(features),
        }
    }
}

fn check_input(features: &[f64], expected: usize) -> Result<(), PredictionError> {
    if features.len() != expected {
        return Err(PredictionError::Classification(format!(
            "X has {} features, but the classifier is expecting {} features as input",
            features.len(),
            expected
        )));
    }
    if features.iter().any(|v| !v.is_finite()) {
        return Err(PredictionError::Classification(
            "Input contains NaN or infinity".to_string(),
        ));
    }
    Ok(())
}

/// Index of the largest score; ties resolve to the lowest index.
fn argmax(scores: &[f64]) -> usize {
    scores
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best_i, best), (i, &s)| {
            if s > best {
                (i, s)
            } else {
                (best_i, best)
            }
        })
        .0
}

/// `decision = coef · x + intercept`, one row per class. A binary model has a
/// single row whose positive side is `classes[1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub n_features_in: usize,
    pub classes: Vec<i64>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl LinearClassifier {
    pub fn validate(&self) -> Result<(), String> {
        if self.classes.len() < 2 {
            return Err(format!(
                "need at least 2 classes, found {}",
                self.classes.len()
            ));
        }
        let expected_rows = if self.classes.len() == 2 {
            1
        } else {
            self.classes.len()
        };
        if self.coef.len() != expected_rows {
            return Err(format!(
                "coef has {} rows, expected {} for {} classes",
                self.coef.len(),
                expected_rows,
                self.classes.len()
            ));
        }
        if self.intercept.len() != self.coef.len() {
            return Err(format!(
                "intercept has {} entries but coef has {} rows",
                self.intercept.len(),
                self.coef.len()
            ));
        }
        for (i, row) in self.coef.iter().enumerate() {
            if row.len() != self.n_features_in {
                return Err(format!(
                    "coef row {} has {} weights, expected {}",
                    i,
                    row.len(),
                    self.n_features_in
                ));
            }
        }
        Ok(())
    }

    fn decision_function(&self, features: &[f64]) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect()
    }
}

impl Classifier for LinearClassifier {
    fn n_features_in(&self) -> usize {
        self.n_features_in
    }

    fn predict(&self, features: &[f64]) -> Result<i64, PredictionError> {
        check_input(features, self.n_features_in)?;

        let scores = self.decision_function(features);
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(PredictionError::Classification(
                "decision function overflowed".to_string(),
            ));
        }

        let index = match scores.as_slice() {
            [single] => usize::from(*single > 0.0),
            _ => argmax(&scores),
        };

        self.classes.get(index).copied().ok_or_else(|| {
            PredictionError::Classification(format!("class index {} out of range", index))
        })
    }
}

/// One decision tree in flat-array form. Node `i` is a leaf when both child
/// entries are `-1`; otherwise samples with `x[feature[i]] <= threshold[i]`
/// go to `children_left[i]`, the rest to `children_right[i]`. `value[i]` holds
/// per-class weights at the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

const LEAF: i64 = -1;

impl DecisionTree {
    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let n_nodes = self.children_left.len();
        if n_nodes == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.children_right.len() != n_nodes
            || self.feature.len() != n_nodes
            || self.threshold.len() != n_nodes
            || self.value.len() != n_nodes
        {
            return Err("tree arrays have different lengths".to_string());
        }

        for node in 0..n_nodes {
            if self.value[node].len() != n_classes {
                return Err(format!(
                    "node {} has {} class weights, expected {}",
                    node,
                    self.value[node].len(),
                    n_classes
                ));
            }

            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF && right == LEAF {
                continue;
            }
            // Children strictly after their parent keeps traversal acyclic
            for child in [left, right] {
                if child <= node as i64 || child >= n_nodes as i64 {
                    return Err(format!("node {} has invalid child {}", node, child));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature >= n_features as i64 {
                return Err(format!("node {} splits on unknown feature {}", node, feature));
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf and return its normalized class weights.
    ///
    /// Every index is checked so that a tree that skipped `validate` yields an
    /// error instead of a panic or an endless walk.
    fn leaf_distribution(&self, features: &[f64]) -> Result<Vec<f64>, PredictionError> {
        let malformed = |node: usize, what: &str| {
            PredictionError::Classification(format!("node {} {}", node, what))
        };

        let mut node = 0usize;
        loop {
            let left = *self
                .children_left
                .get(node)
                .ok_or_else(|| malformed(node, "is out of range"))?;
            if left == LEAF {
                break;
            }

            let feature = self
                .feature
                .get(node)
                .and_then(|&f| usize::try_from(f).ok())
                .ok_or_else(|| malformed(node, "has no split feature"))?;
            let x = features
                .get(feature)
                .ok_or_else(|| malformed(node, "splits on an unknown feature"))?;
            let threshold = self
                .threshold
                .get(node)
                .ok_or_else(|| malformed(node, "has no threshold"))?;

            let next = if x <= threshold {
                left
            } else {
                *self
                    .children_right
                    .get(node)
                    .ok_or_else(|| malformed(node, "has no right child"))?
            };
            // Children strictly after their parent keeps the walk finite
            node = usize::try_from(next)
                .ok()
                .filter(|&child| child > node)
                .ok_or_else(|| malformed(node, "has an invalid child"))?;
        }

        let weights = self
            .value
            .get(node)
            .ok_or_else(|| malformed(node, "has no class weights"))?;
        let total: f64 = weights.iter().sum();
        if total > 0.0 {
            Ok(weights.iter().map(|w| w / total).collect())
        } else {
            Ok(weights.clone())
        }
    }
}

/// Soft-voting ensemble: the predicted class has the highest mean leaf
/// distribution across trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestClassifier {
    pub n_features_in: usize,
    pub classes: Vec<i64>,
    pub trees: Vec<DecisionTree>,
}

impl ForestClassifier {
    pub fn validate(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("forest has no classes".to_string());
        }
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features_in, self.classes.len())
                .map_err(|reason| format!("tree {}: {}", i, reason))?;
        }
        Ok(())
    }

    pub fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, PredictionError> {
        check_input(features, self.n_features_in)?;

        if self.trees.is_empty() {
            return Err(PredictionError::Classification(
                "forest has no trees".to_string(),
            ));
        }

        let mut totals = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (total, p) in totals.iter_mut().zip(tree.leaf_distribution(features)?) {
                *total += p;
            }
        }
        let n_trees = self.trees.len() as f64;
        Ok(totals.into_iter().map(|t| t / n_trees).collect())
    }
}

impl Classifier for ForestClassifier {
    fn n_features_in(&self) -> usize {
        self.n_features_in
    }

    fn predict(&self, features: &[f64]) -> Result<i64, PredictionError> {
        let proba = self.predict_proba(features)?;
        let index = argmax(&proba);
        self.classes.get(index).copied().ok_or_else(|| {
            PredictionError::Classification(format!("class index {} out of range", index))
        })
    }
}
