//! Density detection with a one-dimensional isolation forest
//!
//! Points that random splits isolate in few steps are outliers. The RNG is
//! seeded from configuration so the same series always scores the same.

use crate::config::IsolationForestConfig;
use crate::series::CostSeries;
use crate::stats::{mean, quantile};
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::detector::DetectionContext;
use super::statistical::deviation_percent;
use super::types::*;

/// Euler–Mascheroni constant
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

#[derive(Debug, Clone)]
enum Node {
    Leaf { size: usize },
    Split { threshold: f64, left: Box<Node>, right: Box<Node> },
}

/// Ensemble of isolation trees over scalar values
#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<Node>,
    subsample_size: usize,
}

impl IsolationForest {
    /// Grow the forest; `None` below two values
    pub fn fit(values: &[f64], config: &IsolationForestConfig) -> Option<Self> {
        if values.len() < 2 || config.trees == 0 {
            return None;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let subsample_size = config.subsample_size.clamp(2, values.len());
        let max_depth = (subsample_size as f64).log2().ceil() as usize;

        let trees = (0..config.trees)
            .map(|_| {
                let picked: Vec<f64> = sample(&mut rng, values.len(), subsample_size)
                    .into_iter()
                    .map(|i| values[i])
                    .collect();
                grow(picked, 0, max_depth, &mut rng)
            })
            .collect();

        Some(Self {
            trees,
            subsample_size,
        })
    }

    /// Normalized anomaly score `2^(-E[h(x)] / c(ψ))`
    ///
    /// Close to 1 for clear outliers, around 0.5 or below for inliers.
    pub fn score(&self, value: f64) -> f64 {
        let total: f64 = self
            .trees
            .iter()
            .map(|tree| path_length(tree, value, 0))
            .sum();
        let average_path = total / self.trees.len() as f64;

        let normalizer = average_path_length(self.subsample_size);
        if normalizer == 0.0 {
            return 0.5;
        }
        2f64.powf(-average_path / normalizer)
    }
}

fn grow(values: Vec<f64>, depth: usize, max_depth: usize, rng: &mut ChaCha8Rng) -> Node {
    if depth >= max_depth || values.len() <= 1 {
        return Node::Leaf { size: values.len() };
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min >= max {
        return Node::Leaf { size: values.len() };
    }

    let threshold = rng.gen_range(min..max);
    let (left, right): (Vec<f64>, Vec<f64>) = values.into_iter().partition(|&v| v < threshold);

    Node::Split {
        threshold,
        left: Box::new(grow(left, depth + 1, max_depth, rng)),
        right: Box::new(grow(right, depth + 1, max_depth, rng)),
    }
}

fn path_length(node: &Node, value: f64, depth: usize) -> f64 {
    match node {
        Node::Leaf { size } => depth as f64 + average_path_length(*size),
        Node::Split {
            threshold,
            left,
            right,
        } => {
            if value < *threshold {
                path_length(left, value, depth + 1)
            } else {
                path_length(right, value, depth + 1)
            }
        }
    }
}

/// Average path length of an unsuccessful BST search over `n` points
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Flag the `contamination` share of days with the highest isolation score
///
/// Only runs when the series has more than one distinct value.
pub fn detect(series: &CostSeries, ctx: &DetectionContext<'_>) -> Vec<Anomaly> {
    if series.distinct_values() <= 1 {
        return Vec::new();
    }

    let values = series.costs();
    let Some(forest) = IsolationForest::fit(&values, &ctx.config.isolation_forest) else {
        return Vec::new();
    };

    let scores: Vec<f64> = values.iter().map(|&v| forest.score(v)).collect();
    let cutoff = quantile(&scores, 1.0 - ctx.params.contamination);
    let strong = ctx.config.isolation_forest.strong_outlier_score;
    let avg = mean(&values);

    series
        .samples()
        .iter()
        .zip(scores)
        .filter(|(_, score)| *score > cutoff)
        .map(|(sample, score)| Anomaly {
            date: sample.date,
            actual_cost: sample.cost,
            evidence: AnomalyEvidence::Score {
                anomaly_score: score,
            },
            severity: if score > strong {
                Severity::High
            } else {
                Severity::Medium
            },
            method: DetectionMethod::Density,
            anomaly_type: AnomalyType::classify(sample.cost, avg),
            deviation_percent: deviation_percent(sample.cost, avg),
        })
        .collect()
}
