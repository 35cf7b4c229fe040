//! Decision-tree classifier
//!
//! CART-style tree over numeric features with gini impurity. Growth is
//! unconstrained: nodes split until pure or until no split improves
//! impurity. Ties between equally good splits are broken by the injected
//! RNG, which is the intended source of run-to-run variance that the
//! ensemble averages away.

use std::collections::HashMap;

use rand::Rng;

use crate::{HoopsError, Result};

/// Gains closer than this are treated as tied splits.
const GAIN_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        label: u32,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A fitted decision-tree classifier.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    root: Node,
    n_features: usize,
}

impl DecisionTree {
    /// Fit a tree on feature rows and their class labels.
    ///
    /// The RNG only resolves ties between splits with equal impurity gain;
    /// pass a seeded RNG to make the fit reproducible.
    pub fn fit<R: Rng>(features: &[Vec<f64>], labels: &[u32], rng: &mut R) -> Result<Self> {
        if features.is_empty() || features.len() != labels.len() {
            return Err(HoopsError::EmptyCorpus);
        }
        let n_features = features[0].len();
        if features.iter().any(|row| row.len() != n_features) {
            return Err(HoopsError::Config(
                "training rows have inconsistent feature counts".to_string(),
            ));
        }

        let indices: Vec<usize> = (0..features.len()).collect();
        let root = build_node(features, labels, &indices, rng);
        Ok(DecisionTree { root, n_features })
    }

    /// Predicted class label for one feature row.
    pub fn predict(&self, row: &[f64]) -> u32 {
        debug_assert_eq!(row.len(), self.n_features);
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { label } => return *label,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

fn build_node<R: Rng>(
    features: &[Vec<f64>],
    labels: &[u32],
    indices: &[usize],
    rng: &mut R,
) -> Node {
    let counts = label_counts(labels, indices);
    if counts.len() == 1 {
        return Node::Leaf {
            label: labels[indices[0]],
        };
    }

    match best_split(features, labels, indices, &counts, rng) {
        Some((feature, threshold)) => {
            let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .copied()
                .partition(|&i| features[i][feature] <= threshold);
            Node::Split {
                feature,
                threshold,
                left: Box::new(build_node(features, labels, &left_idx, rng)),
                right: Box::new(build_node(features, labels, &right_idx, rng)),
            }
        }
        // Indistinguishable rows with mixed labels: fall back to majority.
        None => Node::Leaf {
            label: majority_label(&counts),
        },
    }
}

/// Find the (feature, threshold) split with the highest gini gain.
///
/// Candidate thresholds are midpoints between adjacent distinct feature
/// values. Equal-gain candidates are sampled uniformly via reservoir choice.
fn best_split<R: Rng>(
    features: &[Vec<f64>],
    labels: &[u32],
    indices: &[usize],
    parent_counts: &HashMap<u32, usize>,
    rng: &mut R,
) -> Option<(usize, f64)> {
    let n = indices.len() as f64;
    let parent_gini = gini(parent_counts, indices.len());

    let mut best: Option<(usize, f64)> = None;
    let mut best_gain = GAIN_EPSILON;
    let mut tie_count = 0usize;

    let n_features = features[indices[0]].len();
    for feature in 0..n_features {
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_by(|&a, &b| {
            features[a][feature]
                .partial_cmp(&features[b][feature])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Sweep the sorted rows, moving one row at a time into the left side.
        let mut left_counts: HashMap<u32, usize> = HashMap::new();
        let mut right_counts = parent_counts.clone();
        for (pos, &idx) in sorted.iter().enumerate().take(sorted.len() - 1) {
            *left_counts.entry(labels[idx]).or_insert(0) += 1;
            if let Some(c) = right_counts.get_mut(&labels[idx]) {
                *c -= 1;
            }

            let value = features[idx][feature];
            let next_value = features[sorted[pos + 1]][feature];
            if next_value <= value {
                continue;
            }

            let left_n = pos + 1;
            let right_n = sorted.len() - left_n;
            let weighted = (left_n as f64 / n) * gini(&left_counts, left_n)
                + (right_n as f64 / n) * gini(&right_counts, right_n);
            let gain = parent_gini - weighted;

            if gain > best_gain + GAIN_EPSILON {
                best = Some((feature, (value + next_value) / 2.0));
                best_gain = gain;
                tie_count = 1;
            } else if gain > best_gain - GAIN_EPSILON && best.is_some() {
                // Reservoir sample among tied candidates.
                tie_count += 1;
                if rng.gen_range(0..tie_count) == 0 {
                    best = Some((feature, (value + next_value) / 2.0));
                }
            }
        }
    }

    best
}

fn label_counts(labels: &[u32], indices: &[usize]) -> HashMap<u32, usize> {
    let mut counts = HashMap::new();
    for &i in indices {
        *counts.entry(labels[i]).or_insert(0) += 1;
    }
    counts
}

fn gini(counts: &HashMap<u32, usize>, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    1.0 - counts
        .values()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

/// Most frequent label; smallest label wins a frequency tie so the
/// fallback stays deterministic.
fn majority_label(counts: &HashMap<u32, usize>) -> u32 {
    counts
        .iter()
        .max_by_key(|(label, count)| (**count, std::cmp::Reverse(**label)))
        .map(|(label, _)| *label)
        .unwrap_or(0)
}
