// src/model/gbdt.rs
//
// Gradient-boosted regression trees on the squared-error objective.
// Exact greedy split search, depth-limited trees, learning rate folded
// into the leaf values at fit time. Training is fully deterministic:
// no sampling, and ties in the split scan resolve by feature then
// threshold order.

use crate::errors::AppError;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbdtConfig {
    pub n_trees: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    pub min_leaf_rows: usize,
}

impl Default for GbdtConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            learning_rate: 0.3,
            max_depth: 6,
            min_leaf_rows: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TreeNode {
    feature: usize,
    threshold: f64,
    /// Indices into the tree's node list; unused on leaves.
    left: usize,
    right: usize,
    /// Leaf output, already multiplied by the learning rate.
    value: f64,
    is_leaf: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    fn predict_row(&self, row: &[f64]) -> f64 {
        let mut node = &self.nodes[0];
        while !node.is_leaf {
            node = if row[node.feature] <= node.threshold {
                &self.nodes[node.left]
            } else {
                &self.nodes[node.right]
            };
        }
        node.value
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbdtRegressor {
    base_score: f64,
    trees: Vec<Tree>,
}

impl GbdtRegressor {
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, cfg: &GbdtConfig) -> Result<Self, AppError> {
        let (rows, _) = x.dim();
        if rows == 0 {
            return Err(AppError::TrainError("no rows to fit on".into()));
        }
        if rows != y.len() {
            return Err(AppError::TrainError(format!(
                "feature rows ({rows}) and target rows ({}) differ",
                y.len()
            )));
        }

        let base_score = y.sum() / rows as f64;
        let mut predictions = vec![base_score; rows];
        let mut trees = Vec::with_capacity(cfg.n_trees);

        for _ in 0..cfg.n_trees {
            // Negative gradient of squared error: the residuals.
            let residuals: Vec<f64> = y
                .iter()
                .zip(predictions.iter())
                .map(|(t, p)| t - p)
                .collect();

            let mut builder = TreeBuilder {
                x,
                residuals: &residuals,
                cfg,
                nodes: Vec::new(),
            };
            let indices: Vec<usize> = (0..rows).collect();
            builder.build(indices, 0);
            let tree = Tree {
                nodes: builder.nodes,
            };

            for (i, pred) in predictions.iter_mut().enumerate() {
                let row: Vec<f64> = x.row(i).iter().copied().collect();
                *pred += tree.predict_row(&row);
            }
            trees.push(tree);
        }

        Ok(Self { base_score, trees })
    }

    pub fn predict_row(&self, row: &[f64]) -> f64 {
        self.base_score
            + self
                .trees
                .iter()
                .map(|tree| tree.predict_row(row))
                .sum::<f64>()
    }

    pub fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        let rows = x.nrows();
        let mut out = Array1::zeros(rows);
        for i in 0..rows {
            let row: Vec<f64> = x.row(i).iter().copied().collect();
            out[i] = self.predict_row(&row);
        }
        out
    }
}

struct TreeBuilder<'a> {
    x: &'a Array2<f64>,
    residuals: &'a [f64],
    cfg: &'a GbdtConfig,
    nodes: Vec<TreeNode>,
}

struct Split {
    feature: usize,
    threshold: f64,
    gain: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

impl TreeBuilder<'_> {
    /// Grows the subtree for `indices` and returns its node index.
    fn build(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        let split = if depth < self.cfg.max_depth {
            self.best_split(&indices)
        } else {
            None
        };

        match split {
            Some(split) => {
                let slot = self.nodes.len();
                self.nodes.push(TreeNode {
                    feature: split.feature,
                    threshold: split.threshold,
                    left: 0,
                    right: 0,
                    value: 0.0,
                    is_leaf: false,
                });
                let left = self.build(split.left, depth + 1);
                let right = self.build(split.right, depth + 1);
                self.nodes[slot].left = left;
                self.nodes[slot].right = right;
                slot
            }
            None => {
                let value = self.leaf_value(&indices);
                self.nodes.push(TreeNode {
                    feature: 0,
                    threshold: 0.0,
                    left: 0,
                    right: 0,
                    value,
                    is_leaf: true,
                });
                self.nodes.len() - 1
            }
        }
    }

    fn leaf_value(&self, indices: &[usize]) -> f64 {
        let sum: f64 = indices.iter().map(|&i| self.residuals[i]).sum();
        self.cfg.learning_rate * sum / indices.len() as f64
    }

    /// Exact greedy search over every feature and cut point, maximizing
    /// the squared-error reduction. `None` when nothing improves on the
    /// parent or the leaf-size floor cannot be met.
    fn best_split(&self, indices: &[usize]) -> Option<Split> {
        let n = indices.len();
        if n < 2 * self.cfg.min_leaf_rows.max(1) {
            return None;
        }

        let total_sum: f64 = indices.iter().map(|&i| self.residuals[i]).sum();
        let total_sq: f64 = indices
            .iter()
            .map(|&i| self.residuals[i] * self.residuals[i])
            .sum();
        let parent_sse = total_sq - total_sum * total_sum / n as f64;

        let mut best: Option<Split> = None;
        let n_features = self.x.ncols();

        for feature in 0..n_features {
            let mut order: Vec<usize> = indices.to_vec();
            order.sort_by(|&a, &b| {
                self.x[[a, feature]]
                    .partial_cmp(&self.x[[b, feature]])
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.cmp(&b))
            });

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for pos in 1..n {
                let prev = order[pos - 1];
                left_sum += self.residuals[prev];
                left_sq += self.residuals[prev] * self.residuals[prev];

                let left_n = pos;
                let right_n = n - pos;
                if left_n < self.cfg.min_leaf_rows || right_n < self.cfg.min_leaf_rows {
                    continue;
                }

                let lo = self.x[[prev, feature]];
                let hi = self.x[[order[pos], feature]];
                if lo == hi {
                    // No threshold separates equal values.
                    continue;
                }

                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / left_n as f64)
                    + (right_sq - right_sum * right_sum / right_n as f64);
                let gain = parent_sse - sse;

                if gain > 1e-12 && best.as_ref().map_or(true, |b| gain > b.gain) {
                    best = Some(Split {
                        feature,
                        threshold: (lo + hi) / 2.0,
                        gain,
                        left: order[..pos].to_vec(),
                        right: order[pos..].to_vec(),
                    });
                }
            }
        }
        best
    }
}
