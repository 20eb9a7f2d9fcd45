use ndarray::{Array1, Array2, ArrayView1, Axis};
use tracing::debug;

use super::Classifier;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LogisticParams {
    pub max_iter: usize,
    /// Inverse regularization strength, as in `C` of the usual formulation.
    pub c: f64,
    /// Stop once the largest absolute gradient component drops below this.
    pub tol: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            max_iter: 2000,
            c: 1.0,
            tol: 1e-6,
        }
    }
}

/// Per-column standardization fitted on the training matrix.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(x: &Array2<f64>) -> Self {
        let n = x.nrows().max(1) as f64;
        let mean = x.sum_axis(Axis(0)) / n;
        let scale = x
            .axis_iter(Axis(1))
            .zip(mean.iter())
            .map(|(col, &m)| {
                let var = col.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n;
                // Constant columns pass through centred but unscaled.
                if var > 0.0 { var.sqrt() } else { 1.0 }
            })
            .collect();
        Self {
            mean: mean.to_vec(),
            scale,
        }
    }

    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        let mut out = x.to_owned();
        for mut row in out.axis_iter_mut(Axis(0)) {
            for ((v, m), s) in row.iter_mut().zip(&self.mean).zip(&self.scale) {
                *v = (*v - m) / s;
            }
        }
        out
    }

    pub fn transform_row(&self, x: ArrayView1<f64>) -> Array1<f64> {
        x.iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .map(|((v, m), s)| (v - m) / s)
            .collect()
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }
}

/// L2-regularized binary logistic regression trained by batch gradient descent.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LogisticRegression {
    scaler: StandardScaler,
    weights: Vec<f64>,
    bias: f64,
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl LogisticRegression {
    /// `y` holds class indices, 1 being the positive class.
    pub fn fit(x: &Array2<f64>, y: &[usize], params: &LogisticParams) -> Self {
        let scaler = StandardScaler::fit(x);
        let xs = scaler.transform(x);
        let (n_samples, n_features) = xs.dim();
        let n = n_samples.max(1) as f64;
        let targets = y.iter().map(|&label| if label == 1 { 1.0 } else { 0.0 }).collect::<Array1<f64>>();

        let l2 = 1.0 / (params.c * n);
        // Step size from the Lipschitz bound of the mean log-loss gradient.
        let mean_sq_norm = xs.iter().map(|v| v * v).sum::<f64>() / n;
        let step = 1.0 / (0.25 * (mean_sq_norm + 1.0) + l2);

        let mut weights = Array1::<f64>::zeros(n_features);
        let mut bias = 0.0;
        let mut iterations = 0;
        for iter in 0..params.max_iter {
            iterations = iter + 1;
            let logits = xs.dot(&weights) + bias;
            let residual = logits.mapv(sigmoid) - &targets;
            let grad_w = xs.t().dot(&residual) / n + &weights * l2;
            let grad_b = residual.sum() / n;

            weights.scaled_add(-step, &grad_w);
            bias -= step * grad_b;

            let max_grad = grad_w.iter().fold(grad_b.abs(), |acc, g| acc.max(g.abs()));
            if max_grad < params.tol {
                break;
            }
        }
        debug!(iterations, n_samples, n_features, "Fitted logistic regression");

        Self {
            scaler,
            weights: weights.to_vec(),
            bias,
        }
    }
}

impl Classifier for LogisticRegression {
    fn predict_proba(&self, x: ArrayView1<f64>) -> [f64; 2] {
        let xs = self.scaler.transform_row(x);
        let z = xs.iter().zip(&self.weights).map(|(v, w)| v * w).sum::<f64>() + self.bias;
        let p_real = sigmoid(z);
        [1.0 - p_real, p_real]
    }

    fn n_features(&self) -> usize {
        self.scaler.n_features()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn test_scaler_centres_and_scales() {
        let x = array![[1.0, 5.0], [3.0, 5.0]];
        let scaler = StandardScaler::fit(&x);
        let xs = scaler.transform(&x);
        assert!((xs[[0, 0]] + 1.0).abs() < 1e-12);
        assert!((xs[[1, 0]] - 1.0).abs() < 1e-12);
        // constant column
        assert!(xs[[0, 1]].abs() < 1e-12);
    }

    #[test]
    fn test_separable_data_is_learned() {
        let x = array![
            [-2.0, -1.0],
            [-1.5, -2.0],
            [-1.0, -1.5],
            [1.0, 1.5],
            [1.5, 2.0],
            [2.0, 1.0]
        ];
        let y = [0, 0, 0, 1, 1, 1];
        let model = LogisticRegression::fit(&x, &y, &LogisticParams::default());
        for (row, &label) in x.outer_iter().zip(&y) {
            let proba = model.predict_proba(row);
            assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
            assert_eq!(usize::from(proba[1] > proba[0]), label);
        }
        assert_eq!(model.n_features(), 2);
    }

    #[test]
    fn test_sigmoid_is_stable_for_large_inputs() {
        assert!((sigmoid(1000.0) - 1.0).abs() < 1e-12);
        assert!(sigmoid(-1000.0).abs() < 1e-12);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
    }
}
