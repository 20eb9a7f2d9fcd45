use ndarray::{Array2, ArrayView1};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::debug;

use super::{
    Classifier,
    tree::{DecisionTree, TreeParams},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 50,
            max_depth: 10,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

/// Bagged Gini trees, each considering `sqrt(n_features)` candidates per split.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
}

impl RandomForest {
    pub fn fit(x: &Array2<f64>, y: &[usize], params: &ForestParams) -> Self {
        let (n_samples, n_features) = x.dim();
        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            max_features: ((n_features as f64).sqrt() as usize).max(1),
        };

        // Seeds are drawn up front so the result does not depend on thread scheduling.
        let mut master = ChaCha8Rng::seed_from_u64(params.seed);
        let seeds = (0..params.n_trees).map(|_| master.r#gen::<u64>()).collect::<Vec<_>>();

        let trees = seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let bootstrap = (0..n_samples)
                    .map(|_| rng.gen_range(0..n_samples))
                    .collect::<Vec<_>>();
                DecisionTree::fit(x, y, bootstrap, tree_params, &mut rng)
            })
            .collect::<Vec<_>>();
        debug!(n_trees = trees.len(), n_samples, n_features, "Fitted random forest");

        Self { trees, n_features }
    }
}

impl Classifier for RandomForest {
    fn predict_proba(&self, x: ArrayView1<f64>) -> [f64; 2] {
        if self.trees.is_empty() {
            return [0.5, 0.5];
        }
        let sum = self.trees.iter().fold([0.0, 0.0], |acc, tree| {
            let p = tree.predict_proba(x);
            [acc[0] + p[0], acc[1] + p[1]]
        });
        let n = self.trees.len() as f64;
        [sum[0] / n, sum[1] / n]
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn data() -> (Array2<f64>, Vec<usize>) {
        let x = array![
            [0.0, 1.0, 0.2],
            [0.5, 0.0, 0.1],
            [1.0, 1.0, 0.3],
            [0.2, 0.5, 0.0],
            [9.0, 1.0, 0.2],
            [9.5, 0.0, 0.1],
            [10.0, 1.0, 0.3],
            [9.2, 0.5, 0.0]
        ];
        (x, vec![0, 0, 0, 0, 1, 1, 1, 1])
    }

    #[test]
    fn test_forest_is_deterministic_for_a_seed() {
        let (x, y) = data();
        let params = ForestParams {
            n_trees: 10,
            ..ForestParams::default()
        };
        let a = RandomForest::fit(&x, &y, &params);
        let b = RandomForest::fit(&x, &y, &params);
        for row in x.outer_iter() {
            assert_eq!(a.predict_proba(row), b.predict_proba(row));
        }
    }

    #[test]
    fn test_forest_probabilities_sum_to_one() {
        let (x, y) = data();
        let forest = RandomForest::fit(&x, &y, &ForestParams::default());
        assert_eq!(forest.trees.len(), 50);
        for row in x.outer_iter() {
            let p = forest.predict_proba(row);
            assert!((p[0] + p[1] - 1.0).abs() < 1e-9);
        }
    }
}
