use std::{fmt, path::PathBuf};

use is_it_fake_preprocessing::{FeatureSet, VectorizerParams};

use crate::model::ModelParams;

pub const DEFAULT_ARTIFACTS_DIR: &str = "model_artifacts";
pub const DEFAULT_DATA_DIR: &str = "data";

/// Which scorer a deployment runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// TF-IDF features scored by logistic regression alone.
    Baseline,
    /// TF-IDF plus linguistic features scored by the soft-voting ensemble, with
    /// confidence adjustment and link analysis.
    #[default]
    Enhanced,
}

impl Variant {
    #[must_use]
    pub fn vectorizer_file(self) -> &'static str {
        match self {
            Self::Baseline => "tfidf_vectorizer.bin",
            Self::Enhanced => "tfidf_vectorizer_ai.bin",
        }
    }

    #[must_use]
    pub fn classifier_file(self) -> &'static str {
        match self {
            Self::Baseline => "fake_news_model.bin",
            Self::Enhanced => "fake_news_model_ai.bin",
        }
    }

    /// Human-readable description reported alongside enhanced verdicts.
    #[must_use]
    pub fn model_type(self) -> &'static str {
        match self {
            Self::Baseline => "TF-IDF Logistic Regression",
            Self::Enhanced => "AI-Enhanced Ensemble (Logistic + Linguistic + Link Analysis)",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Baseline => write!(f, "baseline"),
            Self::Enhanced => write!(f, "enhanced"),
        }
    }
}

/// Inference-side settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub artifacts_dir: PathBuf,
    pub variant: Variant,
    /// Requested linguistic feature shape; ignored by [`Variant::Baseline`].
    pub enrichment: FeatureSet,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            variant: Variant::default(),
            enrichment: FeatureSet::Enriched,
        }
    }
}

/// Training-side settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub data_dir: PathBuf,
    /// Upper bound on rows sampled from each class file.
    pub sample_per_class: usize,
    pub test_fraction: f64,
    pub seed: u64,
    pub vectorizer: VectorizerParams,
    pub model: ModelParams,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            sample_per_class: 500,
            test_fraction: 0.2,
            seed: 42,
            vectorizer: VectorizerParams::default(),
            model: ModelParams::default(),
        }
    }
}
