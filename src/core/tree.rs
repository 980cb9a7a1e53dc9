// File: src/core/tree.rs
//! CART decision tree trained on Gini impurity.
//!
//! Nodes live in a flat array and children are referenced by index, so a
//! fitted tree serializes as a single vector. Leaves keep the class
//! proportions of the training rows that reached them, which is what the
//! forest averages into probabilities.

use crate::core::types::{FeatureVector, LabelId};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A node in the decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Feature index to split on. `None` for leaves.
    pub feature: Option<usize>,
    /// Samples with `x[feature] <= threshold` go left.
    pub threshold: f64,
    pub left_child: usize,
    pub right_child: usize,
    /// Class proportions of the training rows in this leaf. Empty for
    /// split nodes.
    pub distribution: Vec<f64>,
}

impl TreeNode {
    fn leaf(distribution: Vec<f64>) -> Self {
        Self {
            feature: None,
            threshold: 0.0,
            left_child: 0,
            right_child: 0,
            distribution,
        }
    }

    pub const fn is_leaf(&self) -> bool {
        self.feature.is_none()
    }
}

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// Non-constant features examined per split.
    pub max_features: usize,
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

struct Builder<'a, R: Rng> {
    x: &'a [FeatureVector],
    y: &'a [LabelId],
    n_classes: usize,
    n_features: usize,
    params: TreeParams,
    rng: &'a mut R,
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Fits a tree on `rows` of `x`. Rows may repeat, which is how the
    /// forest passes bootstrap samples.
    pub fn fit<R: Rng>(
        x: &[FeatureVector],
        y: &[LabelId],
        rows: &[usize],
        n_classes: usize,
        params: TreeParams,
        rng: &mut R,
    ) -> Self {
        let n_features = x.first().map_or(0, Vec::len);
        let mut builder = Builder {
            x,
            y,
            n_classes,
            n_features,
            params,
            rng,
            nodes: Vec::new(),
        };
        let mut rows = rows.to_vec();
        builder.grow(&mut rows, 0);
        Self {
            nodes: builder.nodes,
        }
    }

    /// Class proportions of the leaf `features` lands in.
    pub fn predict_proba(&self, features: &[f64]) -> &[f64] {
        let mut idx = 0usize;
        loop {
            let node = &self.nodes[idx];
            match node.feature {
                None => return &node.distribution,
                Some(feature) => {
                    let value = features.get(feature).copied().unwrap_or(0.0);
                    idx = if value <= node.threshold {
                        node.left_child
                    } else {
                        node.right_child
                    };
                }
            }
        }
    }

    /// Most probable class; ties go to the lower class index.
    pub fn predict(&self, features: &[f64]) -> LabelId {
        argmax(self.predict_proba(features))
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        self.node_depth(0)
    }

    fn node_depth(&self, idx: usize) -> usize {
        let node = &self.nodes[idx];
        if node.is_leaf() {
            return 0;
        }
        1 + self
            .node_depth(node.left_child)
            .max(self.node_depth(node.right_child))
    }
}

impl<R: Rng> Builder<'_, R> {
    /// Appends the subtree for `rows` and returns its root index.
    fn grow(&mut self, rows: &mut [usize], depth: usize) -> usize {
        let counts = self.class_counts(rows);
        let node_idx = self.nodes.len();
        self.nodes.push(TreeNode::leaf(Vec::new()));

        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let too_small = rows.len() < self.params.min_samples_split;
        let too_deep = self.params.max_depth.is_some_and(|max| depth >= max);

        let split = if pure || too_small || too_deep {
            None
        } else {
            self.best_split(rows, &counts)
        };

        let Some(split) = split else {
            self.nodes[node_idx].distribution = proportions(&counts, rows.len());
            return node_idx;
        };

        let x = self.x;
        let mid = partition(rows, |&r| x[r][split.feature] <= split.threshold);
        let (left_rows, right_rows) = rows.split_at_mut(mid);
        let left = self.grow(left_rows, depth + 1);
        let right = self.grow(right_rows, depth + 1);

        let node = &mut self.nodes[node_idx];
        node.feature = Some(split.feature);
        node.threshold = split.threshold;
        node.left_child = left;
        node.right_child = right;
        node_idx
    }

    /// Scans features in random order until `max_features` non-constant
    /// ones have been tried, keeping the lowest weighted Gini split.
    fn best_split(&mut self, rows: &[usize], parent_counts: &[usize]) -> Option<Split> {
        let mut order: Vec<usize> = (0..self.n_features).collect();
        order.shuffle(&mut *self.rng);

        let n = rows.len() as f64;
        let mut best: Option<Split> = None;
        let mut tried = 0usize;
        let mut column: Vec<(f64, LabelId)> = Vec::with_capacity(rows.len());

        for feature in order {
            if tried >= self.params.max_features {
                break;
            }
            column.clear();
            column.extend(rows.iter().map(|&r| (self.x[r][feature], self.y[r])));
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            let (first, last) = (column[0].0, column[column.len() - 1].0);
            if first >= last {
                continue;
            }
            tried += 1;

            let mut left = vec![0usize; self.n_classes];
            let mut right = parent_counts.to_vec();
            for i in 0..column.len() - 1 {
                let (value, label) = column[i];
                left[label] += 1;
                right[label] -= 1;

                let next = column[i + 1].0;
                if value >= next {
                    continue;
                }
                let n_left = (i + 1) as f64;
                let n_right = n - n_left;
                let impurity = (n_left * gini(&left, n_left) + n_right * gini(&right, n_right)) / n;
                if best.map_or(true, |b| impurity < b.impurity) {
                    best = Some(Split {
                        feature,
                        threshold: value + (next - value) / 2.0,
                        impurity,
                    });
                }
            }
        }
        best
    }

    fn class_counts(&self, rows: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &r in rows {
            counts[self.y[r]] += 1;
        }
        counts
    }
}

fn gini(counts: &[usize], total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

fn proportions(counts: &[usize], total: usize) -> Vec<f64> {
    if total == 0 {
        return vec![0.0; counts.len()];
    }
    counts.iter().map(|&c| c as f64 / total as f64).collect()
}

/// Moves elements matching `pred` to the front; returns how many matched.
fn partition<F: Fn(&usize) -> bool>(rows: &mut [usize], pred: F) -> usize {
    let mut mid = 0;
    for i in 0..rows.len() {
        if pred(&rows[i]) {
            rows.swap(i, mid);
            mid += 1;
        }
    }
    mid
}

pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}
