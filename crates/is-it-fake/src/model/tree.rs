use ndarray::{Array2, ArrayView1};
use rand::{Rng, seq::index::sample};

use super::Classifier;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
enum Node {
    Leaf {
        proba: [f64; 2],
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Clone, Copy, Debug)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub max_features: usize,
}

/// CART classification tree with Gini impurity, stored as a flat node arena.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    n_features: usize,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

fn gini(counts: [usize; 2]) -> f64 {
    let total = (counts[0] + counts[1]) as f64;
    if total == 0.0 {
        return 0.0;
    }
    let p0 = counts[0] as f64 / total;
    let p1 = counts[1] as f64 / total;
    1.0 - p0 * p0 - p1 * p1
}

fn class_counts(y: &[usize], samples: &[usize]) -> [usize; 2] {
    let mut counts = [0, 0];
    for &s in samples {
        counts[usize::from(y[s] == 1)] += 1;
    }
    counts
}

impl DecisionTree {
    /// Fit on `samples`, a list of row indices that may repeat (bootstrap).
    pub fn fit<R: Rng>(
        x: &Array2<f64>,
        y: &[usize],
        samples: Vec<usize>,
        params: TreeParams,
        rng: &mut R,
    ) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            n_features: x.ncols(),
        };
        tree.grow(x, y, samples, 0, params, rng);
        tree
    }

    fn grow<R: Rng>(
        &mut self,
        x: &Array2<f64>,
        y: &[usize],
        mut samples: Vec<usize>,
        depth: usize,
        params: TreeParams,
        rng: &mut R,
    ) -> usize {
        let counts = class_counts(y, &samples);
        let node_idx = self.nodes.len();
        let total = samples.len().max(1) as f64;
        self.nodes.push(Node::Leaf {
            proba: [counts[0] as f64 / total, counts[1] as f64 / total],
        });

        let pure = counts[0] == 0 || counts[1] == 0;
        if pure || depth >= params.max_depth || samples.len() < params.min_samples_split {
            return node_idx;
        }
        let Some(best) = self.best_split(x, y, &mut samples, counts, params.max_features, rng) else {
            return node_idx;
        };

        let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&s| x[[s, best.feature]] <= best.threshold);
        let left = self.grow(x, y, left_samples, depth + 1, params, rng);
        let right = self.grow(x, y, right_samples, depth + 1, params, rng);
        self.nodes[node_idx] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        node_idx
    }

    fn best_split<R: Rng>(
        &self,
        x: &Array2<f64>,
        y: &[usize],
        samples: &mut [usize],
        counts: [usize; 2],
        max_features: usize,
        rng: &mut R,
    ) -> Option<BestSplit> {
        let n = samples.len();
        if n < 2 || self.n_features == 0 {
            return None;
        }
        let parent = gini(counts);
        let mut best: Option<BestSplit> = None;

        let n_candidates = max_features.clamp(1, self.n_features);
        for feature in sample(rng, self.n_features, n_candidates) {
            samples.sort_unstable_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));

            let mut left = [0usize, 0usize];
            for i in 0..n - 1 {
                left[usize::from(y[samples[i]] == 1)] += 1;
                let current = x[[samples[i], feature]];
                let next = x[[samples[i + 1], feature]];
                if current == next {
                    continue;
                }
                let right = [counts[0] - left[0], counts[1] - left[1]];
                let n_left = (i + 1) as f64;
                let n_right = (n - i - 1) as f64;
                let impurity = (n_left * gini(left) + n_right * gini(right)) / n as f64;
                if impurity < parent && best.as_ref().is_none_or(|b| impurity < b.impurity) {
                    best = Some(BestSplit {
                        feature,
                        threshold: (current + next) / 2.0,
                        impurity,
                    });
                }
            }
        }
        best
    }
}

impl Classifier for DecisionTree {
    fn predict_proba(&self, x: ArrayView1<f64>) -> [f64; 2] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { proba } => return *proba,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}
