//! Training orchestration: corpus loading, split, fit, evaluate, persist.

mod corpus;

use std::path::Path;

use is_it_fake_preprocessing::{FeatureCombiner, FeatureLayout, LinguisticExtractor, TfidfVectorizer};
use rand::{SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

pub use corpus::{
    Corpus, CorpusError, CorpusOrigin, CorpusSource, CsvCorpus, EmbeddedCorpus, FAKE_FILE,
    REAL_FILE, TEXT_COLUMN,
};

use crate::{
    config::{TrainingConfig, Variant},
    error::Result,
    model::{
        Model,
        artifacts::{ArtifactPaths, TrainedModel},
    },
    pipeline::Label,
};

/// Articles run through a freshly trained model as a smoke check, with the label
/// each is expected to receive.
pub const SANITY_ARTICLES: [(&str, Label); 4] = [
    (
        "You won't BELIEVE what scientists discovered! Doctors HATE this one simple trick!",
        Label::Fake,
    ),
    (
        "The Federal Reserve announced an interest rate increase of 0.25 percent today.",
        Label::Real,
    ),
    (
        "BREAKING: URGENT ALERT! Government conspiracy EXPOSED in leaked documents!",
        Label::Fake,
    ),
    (
        "Researchers at Stanford University published findings in the Journal of Medicine.",
        Label::Real,
    ),
];

/// Outcome of one training run.
#[derive(Clone, Debug, serde::Serialize)]
pub struct TrainingReport {
    pub variant: Variant,
    pub origin: CorpusOrigin,
    pub layout: FeatureLayout,
    pub n_train: usize,
    pub n_test: usize,
    pub vocab_size: usize,
    pub dimension: usize,
    /// Held-out accuracy; `None` when the corpus was too small to hold any out.
    pub accuracy: Option<f64>,
}

pub struct Trainer {
    config: TrainingConfig,
    variant: Variant,
    extractor: LinguisticExtractor,
}

impl Trainer {
    /// `extractor` fixes the linguistic feature shape baked into the artifacts;
    /// it is ignored for [`Variant::Baseline`].
    #[must_use]
    pub fn new(config: TrainingConfig, variant: Variant, extractor: LinguisticExtractor) -> Self {
        Self {
            config,
            variant,
            extractor,
        }
    }

    /// Load the corpus, falling back to the embedded sample set when the source
    /// is unavailable.
    fn load_corpus(source: &dyn CorpusSource) -> (Corpus, CorpusOrigin) {
        match source.load() {
            Ok(corpus) if !corpus.is_empty() => {
                let origin = CorpusOrigin::Source {
                    description: source.describe(),
                };
                (corpus, origin)
            }
            Ok(_) => {
                let reason = format!("{} is empty", source.describe());
                warn!(%reason, "Falling back to embedded sample corpus");
                (Corpus::embedded(), CorpusOrigin::Fallback { reason })
            }
            Err(e) => {
                let reason = e.to_string();
                warn!(%reason, "Falling back to embedded sample corpus");
                (Corpus::embedded(), CorpusOrigin::Fallback { reason })
            }
        }
    }

    /// Shuffled train/test index split; the test side gets `ceil(fraction * n)`
    /// rows but never all of them.
    fn split(&self, n: usize) -> (Vec<usize>, Vec<usize>) {
        let mut indices = (0..n).collect::<Vec<_>>();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        indices.shuffle(&mut rng);
        let n_test = ((n as f64 * self.config.test_fraction).ceil() as usize).min(n.saturating_sub(1));
        let train = indices.split_off(n_test);
        (train, indices)
    }

    /// Fit a vectorizer and classifier without touching disk.
    pub fn fit(&self, source: &dyn CorpusSource) -> Result<(TrainedModel, TrainingReport)> {
        let (corpus, origin) = Self::load_corpus(source);
        info!(
            samples = corpus.len(),
            fake = corpus.count(Label::Fake),
            real = corpus.count(Label::Real),
            %origin,
            "Loaded training corpus"
        );

        let (train_idx, test_idx) = self.split(corpus.len());
        let select = |indices: &[usize]| {
            let texts = indices.iter().map(|&i| corpus.texts[i].as_str()).collect::<Vec<_>>();
            let labels = indices.iter().map(|&i| corpus.labels[i].index()).collect::<Vec<_>>();
            (texts, labels)
        };
        let (train_texts, y_train) = select(&train_idx);
        let (test_texts, y_test) = select(&test_idx);

        info!("Fitting TF-IDF vectorizer on training split");
        let vectorizer = TfidfVectorizer::fit(&train_texts, self.config.vectorizer.clone());
        let combiner = match self.variant {
            Variant::Baseline => FeatureCombiner::lexical_only(vectorizer.clone()),
            Variant::Enhanced => FeatureCombiner::new(vectorizer.clone(), self.extractor.clone()),
        };

        let x_train = combiner.combine_batch(&train_texts)?;
        info!(
            rows = x_train.nrows(),
            dimension = x_train.ncols(),
            variant = %self.variant,
            "Training classifier"
        );
        let model = Model::fit(self.variant, &x_train, &y_train, &self.config.model);

        let accuracy = if test_texts.is_empty() {
            None
        } else {
            let x_test = combiner.combine_batch(&test_texts)?;
            Some(model.accuracy(&x_test, &y_test))
        };
        if let Some(accuracy) = accuracy {
            info!("Held-out accuracy: {:.2}%", accuracy * 100.0);
        }

        let trained = TrainedModel {
            variant: self.variant,
            layout: combiner.layout(),
            vectorizer,
            model,
        };
        let report = TrainingReport {
            variant: self.variant,
            origin,
            layout: trained.layout,
            n_train: train_texts.len(),
            n_test: test_texts.len(),
            vocab_size: trained.vectorizer.num_features(),
            dimension: trained.dimension(),
            accuracy,
        };
        Ok((trained, report))
    }

    /// Fit and persist the artifact pair under `artifacts_dir`.
    ///
    /// A running [`crate::Detector`] keeps serving its old artifacts until it is
    /// loaded again.
    pub fn train(
        &self,
        source: &dyn CorpusSource,
        artifacts_dir: &Path,
    ) -> Result<(TrainedModel, TrainingReport)> {
        let (trained, report) = self.fit(source)?;
        trained.save(&ArtifactPaths::new(artifacts_dir, self.variant))?;
        Ok((trained, report))
    }
}

#[cfg(test)]
mod tests {
    use is_it_fake_preprocessing::FeatureSet;

    use super::*;
    use crate::model::{Classifier, ForestParams, ModelParams};

    fn fast_config() -> TrainingConfig {
        TrainingConfig {
            model: ModelParams {
                forest: ForestParams {
                    n_trees: 10,
                    ..ForestParams::default()
                },
                ..ModelParams::default()
            },
            ..TrainingConfig::default()
        }
    }

    struct BrokenSource;

    impl CorpusSource for BrokenSource {
        fn load(&self) -> std::result::Result<Corpus, CorpusError> {
            Err(CorpusError::Missing("nowhere/fake.csv".into()))
        }

        fn describe(&self) -> String {
            "broken".to_string()
        }
    }

    /// Every row carries its own `markerN` token.
    struct MarkedSource;

    impl CorpusSource for MarkedSource {
        fn load(&self) -> std::result::Result<Corpus, CorpusError> {
            let mut corpus = Corpus::default();
            for i in 0..20 {
                if i % 2 == 0 {
                    corpus.push(format!("marker{i} shocking secret aliens exposed"), Label::Fake);
                } else {
                    corpus.push(format!("marker{i} congress passed budget report"), Label::Real);
                }
            }
            Ok(corpus)
        }

        fn describe(&self) -> String {
            "marked".to_string()
        }
    }

    #[test]
    fn test_vectorizer_sees_training_rows_only() {
        let trainer = Trainer::new(fast_config(), Variant::Enhanced, LinguisticExtractor::basic());
        let (trained, report) = trainer.fit(&MarkedSource).expect("training succeeds");
        let corpus = MarkedSource.load().expect("marked corpus");
        let (train_idx, test_idx) = trainer.split(corpus.len());
        assert_eq!(test_idx.len(), 4);

        let vocab = trained.vectorizer.vocabulary();
        for i in &test_idx {
            assert!(!vocab.contains_key(&format!("marker{i}")), "held-out row {i} leaked");
        }
        for i in &train_idx {
            assert!(vocab.contains_key(&format!("marker{i}")), "training row {i} missing");
        }

        let train_texts = train_idx.iter().map(|&i| corpus.texts[i].as_str()).collect::<Vec<_>>();
        let expected = TfidfVectorizer::fit(&train_texts, trainer.config.vectorizer.clone());
        assert_eq!(report.vocab_size, expected.num_features());
    }

    #[test]
    fn test_split_is_eighty_twenty() {
        let trainer = Trainer::new(fast_config(), Variant::Enhanced, LinguisticExtractor::basic());
        let (train, test) = trainer.split(14);
        assert_eq!(test.len(), 3);
        assert_eq!(train.len(), 11);
        let mut all = train.iter().chain(&test).copied().collect::<Vec<_>>();
        all.sort_unstable();
        assert_eq!(all, (0..14).collect::<Vec<_>>());
        assert_eq!(trainer.split(14), (train, test));
    }

    #[test]
    fn test_split_keeps_a_training_row() {
        let trainer = Trainer::new(fast_config(), Variant::Baseline, LinguisticExtractor::basic());
        let (train, test) = trainer.split(1);
        assert_eq!(train.len(), 1);
        assert!(test.is_empty());
    }

    #[test]
    fn test_broken_source_falls_back_to_embedded() {
        let trainer = Trainer::new(fast_config(), Variant::Enhanced, LinguisticExtractor::basic());
        let (trained, report) = trainer.fit(&BrokenSource).expect("fallback training");
        assert!(matches!(report.origin, CorpusOrigin::Fallback { .. }));
        assert_eq!(report.n_train + report.n_test, 14);
        assert_eq!(trained.model.n_features(), report.dimension);
        assert_eq!(report.layout, FeatureLayout::Combined(FeatureSet::Basic));
        assert!(report.accuracy.is_some_and(|a| (0.0..=1.0).contains(&a)));
    }

    #[test]
    fn test_baseline_uses_lexical_features_only() {
        let trainer = Trainer::new(fast_config(), Variant::Baseline, LinguisticExtractor::basic());
        let (trained, report) = trainer.fit(&EmbeddedCorpus).expect("training succeeds");
        assert!(matches!(report.origin, CorpusOrigin::Source { .. }));
        assert_eq!(report.layout, FeatureLayout::LexicalOnly);
        assert_eq!(report.dimension, report.vocab_size);
        assert!(matches!(trained.model, Model::Logistic(_)));
    }

    #[test]
    fn test_train_writes_artifact_pair() {
        let dir = tempfile::tempdir().expect("temp dir");
        let trainer = Trainer::new(fast_config(), Variant::Enhanced, LinguisticExtractor::basic());
        trainer.train(&EmbeddedCorpus, dir.path()).expect("training succeeds");
        assert!(ArtifactPaths::new(dir.path(), Variant::Enhanced).exist());
        assert!(!ArtifactPaths::new(dir.path(), Variant::Baseline).exist());
    }
}
