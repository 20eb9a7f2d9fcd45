//! Concatenates lexical (TF-IDF) and linguistic features into the single dense
//! representation fed to the classifiers.

use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use tracing::debug;

use crate::{
    linguistic::{FeatureSet, LinguisticExtractor, LinguisticFeatures},
    pre_processor::TfidfVectorizer,
};

const MIN_TEXTS_FOR_PROGRESS: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error("vectorizer has not been fitted")]
    NotFitted,
    #[error("sentiment lexicon line {line}: {reason}")]
    Lexicon { line: usize, reason: String },
}

/// Which blocks make up a feature vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureLayout {
    /// TF-IDF weights only.
    LexicalOnly,
    /// TF-IDF weights followed by the linguistic features of the given shape.
    Combined(FeatureSet),
}

impl FeatureLayout {
    /// Number of columns appended after the vocabulary.
    #[must_use]
    pub fn linguistic_width(self) -> usize {
        match self {
            Self::LexicalOnly => 0,
            Self::Combined(set) => set.width(),
        }
    }
}

/// Builds feature vectors from a fitted vectorizer and a linguistic extractor.
#[derive(Clone, Debug)]
pub struct FeatureCombiner {
    vectorizer: Option<TfidfVectorizer>,
    extractor: LinguisticExtractor,
    layout: FeatureLayout,
}

impl FeatureCombiner {
    /// Combiner for [`FeatureLayout::Combined`] using the extractor's feature set.
    #[must_use]
    pub fn new(vectorizer: TfidfVectorizer, extractor: LinguisticExtractor) -> Self {
        let layout = FeatureLayout::Combined(extractor.feature_set());
        Self {
            vectorizer: Some(vectorizer),
            extractor,
            layout,
        }
    }

    /// Combiner that only emits TF-IDF weights.
    #[must_use]
    pub fn lexical_only(vectorizer: TfidfVectorizer) -> Self {
        Self {
            vectorizer: Some(vectorizer),
            extractor: LinguisticExtractor::basic(),
            layout: FeatureLayout::LexicalOnly,
        }
    }

    /// A combiner with no fitted vectorizer; every `combine` fails with [`FeatureError::NotFitted`].
    #[must_use]
    pub fn unfitted(extractor: LinguisticExtractor) -> Self {
        let layout = FeatureLayout::Combined(extractor.feature_set());
        Self {
            vectorizer: None,
            extractor,
            layout,
        }
    }

    #[must_use]
    pub fn layout(&self) -> FeatureLayout {
        self.layout
    }

    /// Total feature dimension, `None` until fitted.
    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.vectorizer
            .as_ref()
            .map(|v| v.num_features() + self.layout.linguistic_width())
    }

    pub fn combine(&self, text: &str) -> Result<Array1<f64>, FeatureError> {
        self.combine_with_features(text).map(|(vector, _)| vector)
    }

    /// Like [`FeatureCombiner::combine`] but also hands back the linguistic features,
    /// so callers explaining a verdict do not extract them twice.
    pub fn combine_with_features(
        &self,
        text: &str,
    ) -> Result<(Array1<f64>, LinguisticFeatures), FeatureError> {
        let vectorizer = self.vectorizer.as_ref().ok_or(FeatureError::NotFitted)?;
        let mut values = vectorizer.transform_dense(text);
        let features = self.extractor.extract(text);
        if let FeatureLayout::Combined(_) = self.layout {
            values.extend(features.values());
        }
        Ok((Array1::from_vec(values), features))
    }

    /// Feature matrix for a batch of texts, one row per text.
    pub fn combine_batch<T: AsRef<str> + Sync>(&self, texts: &[T]) -> Result<Array2<f64>, FeatureError> {
        let vectorizer = self.vectorizer.as_ref().ok_or(FeatureError::NotFitted)?;
        let n_lexical = vectorizer.num_features();
        let n_cols = n_lexical + self.layout.linguistic_width();
        debug!(num_texts = texts.len(), n_cols, "Building feature matrix");

        let tfidf = vectorizer.transform(texts);
        let mut matrix = Array2::<f64>::zeros((texts.len(), n_cols));
        for (row_idx, row_vec) in tfidf.outer_iterator().enumerate() {
            for (col_idx, &val) in row_vec.iter() {
                matrix[[row_idx, col_idx]] = val;
            }
        }

        if let FeatureLayout::Combined(_) = self.layout {
            let pb = if texts.len() < MIN_TEXTS_FOR_PROGRESS {
                ProgressBar::hidden()
            } else {
                ProgressBar::new(texts.len() as u64)
            };
            if let Ok(style) = ProgressStyle::default_bar().template("{msg} [{bar:40.cyan/blue}] {pos}/{len}") {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb.set_message("Extracting linguistic features");
            let linguistic = texts
                .par_iter()
                .progress_with(pb.clone())
                .map(|text| self.extractor.extract(text.as_ref()).values())
                .collect::<Vec<_>>();
            pb.finish_and_clear();

            for (row_idx, values) in linguistic.into_iter().enumerate() {
                for (offset, value) in values.into_iter().enumerate() {
                    matrix[[row_idx, n_lexical + offset]] = value;
                }
            }
        }
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pre_processor::VectorizerParams;

    const CORPUS: [&str; 4] = [
        "Aliens have landed on Earth according to secret NASA documents!",
        "The government announced a new policy to support farmers.",
        "Scientists published research findings on climate change.",
        "You won't believe this one weird trick that doctors hate!",
    ];

    fn vectorizer() -> TfidfVectorizer {
        TfidfVectorizer::fit(&CORPUS, VectorizerParams::default())
    }

    #[test]
    fn test_dimension_is_vocabulary_plus_linguistic() {
        let vectorizer = vectorizer();
        let vocab = vectorizer.num_features();
        let combiner = FeatureCombiner::new(vectorizer, LinguisticExtractor::basic());
        assert_eq!(combiner.dimension(), Some(vocab + 9));

        let vector = combiner.combine("Aliens are real!").expect("fitted combiner");
        assert_eq!(vector.len(), vocab + 9);
    }

    #[test]
    fn test_dimension_is_stable_across_calls() {
        let combiner = FeatureCombiner::new(
            vectorizer(),
            LinguisticExtractor::resolve(FeatureSet::Enriched),
        );
        let dims = ["", "short", "A much LONGER text with many words!!! and www.example.com"]
            .iter()
            .map(|text| combiner.combine(text).expect("fitted combiner").len())
            .collect::<Vec<_>>();
        assert!(dims.iter().all(|&d| Some(d) == combiner.dimension()));
    }

    #[test]
    fn test_linguistic_block_is_appended_last() {
        let vectorizer = vectorizer();
        let vocab = vectorizer.num_features();
        let combiner = FeatureCombiner::new(vectorizer, LinguisticExtractor::basic());
        let text = "BREAKING!!! URGENT ALERT!!!";
        let (vector, features) = combiner.combine_with_features(text).expect("fitted combiner");
        assert_eq!(vector.slice(ndarray::s![vocab..]).to_vec(), features.values());
    }

    #[test]
    fn test_lexical_only_layout() {
        let vectorizer = vectorizer();
        let vocab = vectorizer.num_features();
        let combiner = FeatureCombiner::lexical_only(vectorizer);
        assert_eq!(combiner.layout(), FeatureLayout::LexicalOnly);
        assert_eq!(combiner.combine("aliens").expect("fitted").len(), vocab);
    }

    #[test]
    fn test_unfitted_combiner_fails() {
        let combiner = FeatureCombiner::unfitted(LinguisticExtractor::basic());
        assert!(matches!(combiner.combine("text"), Err(FeatureError::NotFitted)));
        assert_eq!(combiner.dimension(), None);
    }

    #[test]
    fn test_batch_rows_match_single_combine() {
        let combiner = FeatureCombiner::new(vectorizer(), LinguisticExtractor::basic());
        let matrix = combiner.combine_batch(&CORPUS).expect("fitted combiner");
        assert_eq!(matrix.nrows(), CORPUS.len());
        for (row, text) in matrix.outer_iter().zip(CORPUS) {
            let single = combiner.combine(text).expect("fitted combiner");
            for (a, b) in row.iter().zip(single.iter()) {
                assert!((a - b).abs() < 1e-12);
            }
        }
    }
}
