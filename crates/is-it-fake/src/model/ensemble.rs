use ndarray::{Array2, ArrayView1};
use tracing::info;

use super::{
    Classifier, ModelParams,
    forest::RandomForest,
    logistic::LogisticRegression,
};

/// Logistic regression and random forest with averaged class probabilities.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SoftVotingEnsemble {
    logistic: LogisticRegression,
    forest: RandomForest,
}

impl SoftVotingEnsemble {
    pub fn fit(x: &Array2<f64>, y: &[usize], params: &ModelParams) -> Self {
        let (logistic, forest) = rayon::join(
            || LogisticRegression::fit(x, y, &params.logistic),
            || RandomForest::fit(x, y, &params.forest),
        );
        info!(n_features = x.ncols(), "Fitted soft-voting ensemble");
        Self { logistic, forest }
    }
}

impl Classifier for SoftVotingEnsemble {
    fn predict_proba(&self, x: ArrayView1<f64>) -> [f64; 2] {
        let lr = self.logistic.predict_proba(x);
        let rf = self.forest.predict_proba(x);
        [(lr[0] + rf[0]) / 2.0, (lr[1] + rf[1]) / 2.0]
    }

    fn n_features(&self) -> usize {
        self.logistic.n_features()
    }
}
