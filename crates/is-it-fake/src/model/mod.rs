pub mod artifacts;
mod ensemble;
mod forest;
mod logistic;
mod tree;

use ndarray::{Array2, ArrayView1};

pub use ensemble::SoftVotingEnsemble;
pub use forest::{ForestParams, RandomForest};
pub use logistic::{LogisticParams, LogisticRegression, StandardScaler};
pub use tree::DecisionTree;

use crate::config::Variant;

/// A fitted binary classifier over dense feature rows.
pub trait Classifier {
    /// `[P(FAKE), P(REAL)]` for one feature row.
    fn predict_proba(&self, x: ArrayView1<f64>) -> [f64; 2];

    /// Width of the feature rows the classifier was fitted on.
    fn n_features(&self) -> usize;
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ModelParams {
    pub logistic: LogisticParams,
    pub forest: ForestParams,
}

/// The fitted classifier of either variant.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub enum Model {
    Logistic(LogisticRegression),
    Ensemble(SoftVotingEnsemble),
}

impl Model {
    /// Fit the classifier the variant calls for.
    pub fn fit(variant: Variant, x: &Array2<f64>, y: &[usize], params: &ModelParams) -> Self {
        match variant {
            Variant::Baseline => Self::Logistic(LogisticRegression::fit(x, y, &params.logistic)),
            Variant::Enhanced => Self::Ensemble(SoftVotingEnsemble::fit(x, y, params)),
        }
    }

    /// Fraction of rows whose arg-max class equals `y`.
    pub fn accuracy(&self, x: &Array2<f64>, y: &[usize]) -> f64 {
        if y.is_empty() {
            return 0.0;
        }
        let correct = x
            .outer_iter()
            .zip(y)
            .filter(|(row, label)| {
                let p = self.predict_proba(row.view());
                usize::from(p[1] > p[0]) == **label
            })
            .count();
        correct as f64 / y.len() as f64
    }
}

impl Classifier for Model {
    fn predict_proba(&self, x: ArrayView1<f64>) -> [f64; 2] {
        match self {
            Self::Logistic(model) => model.predict_proba(x),
            Self::Ensemble(model) => model.predict_proba(x),
        }
    }

    fn n_features(&self) -> usize {
        match self {
            Self::Logistic(model) => model.n_features(),
            Self::Ensemble(model) => model.n_features(),
        }
    }
}
