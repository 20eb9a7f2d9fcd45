use ahash::HashMap;
use sprs::CsMat;
use tracing::debug;

use super::{count_vectorizer::CountVectorizer, params::VectorizerParams};

/// Word-level TF-IDF vectorizer.
///
/// A value of this type only exists once fitted: [`TfidfVectorizer::fit`] is the
/// sole constructor (besides deserialization), so the vocabulary is immutable
/// for the lifetime of the instance.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TfidfVectorizer {
    count_vectorizer: CountVectorizer,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn fit<T: AsRef<str> + Sync>(texts: &[T], count_vectorizer_params: VectorizerParams) -> Self {
        Self::fit_transform(texts, count_vectorizer_params).0
    }

    pub fn transform<T: AsRef<str> + Sync>(&self, texts: &[T]) -> CsMat<f64> {
        debug!(
            num_texts = texts.len(),
            "Transforming texts using TfidfVectorizer"
        );
        let tf_matrix = self.count_vectorizer.transform(texts);
        self.apply_idf(tf_matrix)
    }

    /// Fit on `texts` and return their TF-IDF matrix without re-tokenizing.
    pub fn fit_transform<T: AsRef<str> + Sync>(
        texts: &[T],
        count_vectorizer_params: VectorizerParams,
    ) -> (Self, CsMat<f64>) {
        debug!(num_texts = texts.len(), "Fitting TfidfVectorizer");
        let (count_vectorizer, tf_matrix) =
            CountVectorizer::fit_transform(texts, count_vectorizer_params);
        debug!("Calculating IDF values");

        // Smoothed IDF: ln((n_docs + 1) / (df + 1)) + 1
        let n_docs = texts.len() as f64;
        let mut df = vec![0usize; count_vectorizer.num_features()];
        for row_vec in tf_matrix.outer_iterator() {
            for (col_idx, _val) in row_vec.iter() {
                df[col_idx] += 1;
            }
        }
        let idf = df
            .iter()
            .map(|&doc_freq| ((n_docs + 1.0) / (doc_freq as f64 + 1.0)).ln() + 1.0)
            .collect();
        debug!("IDF calculation complete");

        let vectorizer = Self {
            count_vectorizer,
            idf,
        };
        let transformed = vectorizer.apply_idf(tf_matrix);
        (vectorizer, transformed)
    }

    fn apply_idf(&self, mut tf_matrix: CsMat<f64>) -> CsMat<f64> {
        for mut row_vec in tf_matrix.outer_iterator_mut() {
            for (col_idx, val) in row_vec.iter_mut() {
                *val *= self.idf[col_idx];
            }
            // L2 normalization
            let norm = row_vec.iter().map(|(_, &v)| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for (_, val) in row_vec.iter_mut() {
                    *val /= norm;
                }
            }
        }
        tf_matrix
    }

    /// Dense TF-IDF weights for a single text, one entry per vocabulary column.
    pub fn transform_dense(&self, text: &str) -> Vec<f64> {
        let matrix = self.transform(&[text]);
        let mut dense = vec![0.0; self.num_features()];
        if let Some(row) = matrix.outer_view(0) {
            for (col_idx, &val) in row.iter() {
                dense[col_idx] = val;
            }
        }
        dense
    }

    pub fn num_features(&self) -> usize {
        self.count_vectorizer.num_features()
    }

    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        self.count_vectorizer.vocabulary()
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: [&str; 4] = [
        "Aliens have landed on Earth according to secret NASA documents!",
        "The government announced a new policy to support farmers.",
        "Scientists published research findings on climate change.",
        "This LEAKED document exposes the secret truth!",
    ];

    #[test]
    fn test_rows_are_l2_normalized() {
        let (_, matrix) = TfidfVectorizer::fit_transform(&CORPUS, VectorizerParams::default());
        for row in matrix.outer_iterator() {
            let norm = row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rarer_terms_get_higher_idf() {
        let vectorizer = TfidfVectorizer::fit(&CORPUS, VectorizerParams::default());
        let vocab = vectorizer.vocabulary();
        let secret = vectorizer.idf()[vocab["secret"]];
        let aliens = vectorizer.idf()[vocab["aliens"]];
        assert!(aliens > secret);
        // df = 2 of 4 documents
        assert!((secret - ((5.0_f64 / 3.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_vocabulary_text_is_all_zero() {
        let vectorizer = TfidfVectorizer::fit(&CORPUS, VectorizerParams::default());
        let dense = vectorizer.transform_dense("zebra xylophone quokka");
        assert_eq!(dense.len(), vectorizer.num_features());
        assert!(dense.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_transform_dense_has_vocabulary_width() {
        let vectorizer = TfidfVectorizer::fit(&CORPUS, VectorizerParams::default());
        let first = vectorizer.transform_dense("secret government documents");
        let second = vectorizer.transform_dense("secret government documents");
        assert_eq!(first.len(), vectorizer.num_features());
        assert_eq!(first, second);
        assert!(first.iter().any(|&v| v > 0.0));
    }
}
