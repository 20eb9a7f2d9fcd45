//! # is-it-fake
//!
//! Explainable fake news detection: TF-IDF and linguistic features scored by a
//! logistic regression / random forest soft-voting ensemble, with heuristic
//! confidence adjustment and link credibility analysis.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use is_it_fake::{Detector, DetectorConfig};
//!
//! // Load artifacts produced by `is-it-fake train`
//! let detector = Detector::load(DetectorConfig::default());
//!
//! let verdict = detector.analyze("BREAKING!!! Shocking secret EXPOSED!!!")?;
//! println!("{} ({:.1}%)", verdict.label, verdict.confidence * 100.0);
//! for warning in &verdict.warning_signs {
//!     println!("  - {warning}");
//! }
//! # Ok::<(), is_it_fake::DetectorError>(())
//! ```
//!
//! ## Training
//!
//! ```rust,no_run
//! use is_it_fake::{TrainingConfig, Variant, training::{CsvCorpus, Trainer}};
//! use is_it_fake_preprocessing::{FeatureSet, LinguisticExtractor};
//!
//! let config = TrainingConfig::default();
//! let source = CsvCorpus::new(&config.data_dir, config.sample_per_class, config.seed);
//! let trainer = Trainer::new(
//!     config,
//!     Variant::Enhanced,
//!     LinguisticExtractor::resolve(FeatureSet::Enriched),
//! );
//! let (_, report) = trainer.train(&source, "model_artifacts".as_ref())?;
//! println!("accuracy: {:?}", report.accuracy);
//! # Ok::<(), is_it_fake::DetectorError>(())
//! ```

#[cfg(feature = "cli")]
pub mod cli;

pub mod adjuster;
pub mod api;
pub mod config;
mod error;
pub mod model;
mod pipeline;
pub mod training;

use is_it_fake_preprocessing::{
    FeatureCombiner, FeatureLayout, FeatureSet, LinguisticExtractor, analyze_links,
};
use tracing::{debug, info, warn};

pub use config::{DetectorConfig, TrainingConfig, Variant};
pub use error::{DetectorError, Result};
pub use pipeline::{Label, Prediction, Verdict};

use crate::model::{
    Classifier, Model,
    artifacts::{ArtifactPaths, TrainedModel},
};

/// Whether the detector has usable artifacts, and why not if it doesn't.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded,
    Unavailable { reason: String },
}

/// A loaded classifier plus the matching feature pipeline, per variant.
#[derive(Clone, Debug)]
pub enum Scorer {
    /// TF-IDF features and logistic regression; bare label and rounded confidence.
    Baseline { combiner: FeatureCombiner, model: Model },
    /// Combined features and the soft-voting ensemble; adjusted confidence with
    /// warning signs and link analysis.
    Enhanced { combiner: FeatureCombiner, model: Model },
}

impl Scorer {
    /// Pair a trained model with a feature pipeline of the same shape.
    ///
    /// Fails when the model's feature set is not the one `extractor` provides.
    pub fn from_trained(trained: TrainedModel, extractor: &LinguisticExtractor) -> Result<Self> {
        match (trained.variant, trained.layout) {
            (Variant::Baseline, FeatureLayout::LexicalOnly) => Ok(Self::Baseline {
                combiner: FeatureCombiner::lexical_only(trained.vectorizer),
                model: trained.model,
            }),
            (Variant::Enhanced, FeatureLayout::Combined(feature_set)) => {
                if feature_set != extractor.feature_set() {
                    return Err(DetectorError::ModelUnavailable(format!(
                        "model was trained with {feature_set} features but {} are available",
                        extractor.feature_set()
                    )));
                }
                Ok(Self::Enhanced {
                    combiner: FeatureCombiner::new(trained.vectorizer, extractor.clone()),
                    model: trained.model,
                })
            }
            (variant, layout) => Err(DetectorError::ModelUnavailable(format!(
                "{variant} model cannot use feature layout {layout:?}"
            ))),
        }
    }

    #[must_use]
    pub fn variant(&self) -> Variant {
        match self {
            Self::Baseline { .. } => Variant::Baseline,
            Self::Enhanced { .. } => Variant::Enhanced,
        }
    }

    fn parts(&self) -> (&FeatureCombiner, &Model) {
        match self {
            Self::Baseline { combiner, model } | Self::Enhanced { combiner, model } => (combiner, model),
        }
    }

    fn score(
        &self,
        text: &str,
    ) -> Result<(Prediction, is_it_fake_preprocessing::LinguisticFeatures)> {
        let (combiner, model) = self.parts();
        let (features, linguistic) = combiner.combine_with_features(text)?;
        if features.len() != model.n_features() {
            return Err(DetectorError::ModelUnavailable(format!(
                "feature dimension {} does not match model dimension {}",
                features.len(),
                model.n_features()
            )));
        }
        Ok((Prediction::from(model.predict_proba(features.view())), linguistic))
    }

    pub fn predict(&self, text: &str) -> Result<Prediction> {
        self.score(text).map(|(prediction, _)| prediction)
    }

    pub fn analyze(&self, text: &str) -> Result<Verdict> {
        let (prediction, linguistic) = self.score(text)?;
        let label = prediction.label();
        let verdict = match self {
            Self::Baseline { .. } => Verdict {
                label,
                confidence: (prediction.confidence() * 100.0).round() / 100.0,
                warning_signs: Vec::new(),
                links: Vec::new(),
                link_summary: is_it_fake_preprocessing::LinkSummary::default(),
                linguistic_features: None,
            },
            Self::Enhanced { .. } => {
                let report = analyze_links(text);
                let adjustment =
                    adjuster::adjust(label, prediction.confidence(), &linguistic, &report.summary);
                Verdict {
                    label,
                    confidence: adjustment.confidence,
                    warning_signs: adjustment.warning_signs,
                    links: report.links,
                    link_summary: report.summary,
                    linguistic_features: Some(linguistic),
                }
            }
        };
        debug!(
            label = %verdict.label,
            confidence = verdict.confidence,
            warnings = verdict.warning_signs.len(),
            "Analyzed text"
        );
        Ok(verdict)
    }
}

/// The process-wide detector: constructed once at start-up and shared by
/// reference with every request handler.
///
/// Artifacts are read only in [`Detector::load`]; retraining writes new files
/// but does not affect an existing `Detector`.
#[derive(Clone, Debug)]
pub struct Detector {
    variant: Variant,
    feature_set: FeatureSet,
    scorer: Option<Scorer>,
    status: LoadStatus,
}

impl Detector {
    /// Resolve the enrichment capability and load the configured variant's artifacts.
    ///
    /// Never fails: missing or rejected artifacts leave the detector unloaded and
    /// every prediction then returns [`DetectorError::ModelUnavailable`].
    #[must_use]
    pub fn load(config: DetectorConfig) -> Self {
        let extractor = LinguisticExtractor::resolve(config.enrichment);
        let paths = ArtifactPaths::new(&config.artifacts_dir, config.variant);
        let loaded = TrainedModel::load(&paths, config.variant)
            .and_then(|trained| Scorer::from_trained(trained, &extractor));
        match loaded {
            Ok(scorer) => {
                info!(
                    variant = %config.variant,
                    features = %extractor.feature_set(),
                    dir = %config.artifacts_dir.display(),
                    "Model loaded"
                );
                Self::with_scorer(scorer, extractor.feature_set())
            }
            Err(e) => {
                warn!(error = %e, variant = %config.variant, "Model not loaded");
                Self::unloaded(config.variant, extractor.feature_set(), e.to_string())
            }
        }
    }

    /// A detector serving an in-memory model, e.g. straight after training.
    pub fn from_trained(trained: TrainedModel, extractor: &LinguisticExtractor) -> Result<Self> {
        Ok(Self::with_scorer(
            Scorer::from_trained(trained, extractor)?,
            extractor.feature_set(),
        ))
    }

    fn with_scorer(scorer: Scorer, feature_set: FeatureSet) -> Self {
        Self {
            variant: scorer.variant(),
            feature_set,
            scorer: Some(scorer),
            status: LoadStatus::Loaded,
        }
    }

    #[must_use]
    pub fn unloaded(variant: Variant, feature_set: FeatureSet, reason: impl Into<String>) -> Self {
        Self {
            variant,
            feature_set,
            scorer: None,
            status: LoadStatus::Unavailable {
                reason: reason.into(),
            },
        }
    }

    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// The linguistic feature set resolved at start-up.
    #[must_use]
    pub fn feature_set(&self) -> FeatureSet {
        self.feature_set
    }

    #[must_use]
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.scorer.is_some()
    }

    fn scorer(&self, text: &str) -> Result<&Scorer> {
        if text.trim().is_empty() {
            return Err(DetectorError::InvalidInput("No text provided".to_string()));
        }
        self.scorer
            .as_ref()
            .ok_or_else(|| DetectorError::ModelUnavailable("model not loaded".to_string()))
    }

    /// Raw classifier probabilities for `text`.
    pub fn predict(&self, text: &str) -> Result<Prediction> {
        self.scorer(text)?.predict(text)
    }

    /// Label, confidence and, for the enhanced variant, the explanation.
    pub fn analyze(&self, text: &str) -> Result<Verdict> {
        self.scorer(text)?.analyze(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{ForestParams, ModelParams},
        training::{EmbeddedCorpus, Trainer},
    };

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

    fn trained_detector(variant: Variant) -> Detector {
        let extractor = LinguisticExtractor::basic();
        let trainer = Trainer::new(fast_config(), variant, extractor.clone());
        let (trained, _) = trainer.fit(&EmbeddedCorpus).expect("training succeeds");
        Detector::from_trained(trained, &extractor).expect("matching feature set")
    }

    #[test]
    fn test_predict_before_load_is_unavailable() {
        let dir = tempfile::tempdir().expect("temp dir");
        let detector = Detector::load(DetectorConfig {
            artifacts_dir: dir.path().to_path_buf(),
            ..DetectorConfig::default()
        });
        assert!(!detector.is_loaded());
        assert!(matches!(detector.status(), LoadStatus::Unavailable { .. }));
        let err = detector.predict("Some text").expect_err("no model");
        assert!(matches!(err, DetectorError::ModelUnavailable(_)));
    }

    #[test]
    fn test_empty_text_is_invalid_input() {
        let detector = trained_detector(Variant::Enhanced);
        let err = detector.analyze("   ").expect_err("blank text");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_prediction_is_a_label_with_bounded_confidence() {
        let detector = trained_detector(Variant::Enhanced);
        for text in ["Aliens are among us!", "The council approved the budget.", "zzz qqq"] {
            let verdict = detector.analyze(text).expect("loaded detector");
            assert!(matches!(verdict.label, Label::Fake | Label::Real));
            assert!((0.0..=1.0).contains(&verdict.confidence));
            let prediction = detector.predict(text).expect("loaded detector");
            assert!((prediction.fake_probability() + prediction.real_probability() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_enhanced_verdict_explains_links() {
        let detector = trained_detector(Variant::Enhanced);
        let verdict = detector
            .analyze("Visit http://bbc.com/news and www.fakehoaxsite.com")
            .expect("loaded detector");
        assert_eq!(verdict.links.len(), 2);
        assert_eq!(verdict.link_summary.suspicious, 1);
        assert!(verdict.linguistic_features.is_some());
        assert!(verdict.warning_signs.contains(&"Contains 1 suspicious link(s)".to_string()));
    }

    #[test]
    fn test_baseline_rounds_confidence() {
        let detector = trained_detector(Variant::Baseline);
        let verdict = detector.analyze("Stock markets showed mixed results").expect("loaded detector");
        let scaled = verdict.confidence * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-9);
        assert!(verdict.warning_signs.is_empty());
        assert!(verdict.linguistic_features.is_none());
    }

    #[test]
    fn test_train_save_reload_agrees_on_dimension() {
        let dir = tempfile::tempdir().expect("temp dir");
        let extractor = LinguisticExtractor::basic();
        let trainer = Trainer::new(fast_config(), Variant::Enhanced, extractor.clone());
        let (trained, report) = trainer.train(&EmbeddedCorpus, dir.path()).expect("training succeeds");

        let detector = Detector::load(DetectorConfig {
            artifacts_dir: dir.path().to_path_buf(),
            variant: Variant::Enhanced,
            enrichment: FeatureSet::Basic,
        });
        assert_eq!(detector.status(), &LoadStatus::Loaded);
        assert_eq!(trained.dimension(), report.dimension);

        let before = Detector::from_trained(trained, &extractor).expect("matching feature set");
        let text = "BREAKING!!! URGENT ALERT!!! Shocking secret EXPOSED!!!";
        assert_eq!(
            detector.predict(text).expect("reloaded"),
            before.predict(text).expect("in memory")
        );
    }

    #[test]
    fn test_feature_set_mismatch_leaves_detector_unloaded() {
        let dir = tempfile::tempdir().expect("temp dir");
        let trainer = Trainer::new(fast_config(), Variant::Enhanced, LinguisticExtractor::basic());
        trainer.train(&EmbeddedCorpus, dir.path()).expect("training succeeds");

        let detector = Detector::load(DetectorConfig {
            artifacts_dir: dir.path().to_path_buf(),
            variant: Variant::Enhanced,
            enrichment: FeatureSet::Enriched,
        });
        assert!(!detector.is_loaded());
        assert!(matches!(
            detector.predict("text"),
            Err(DetectorError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_detector_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Detector>();
    }
}
