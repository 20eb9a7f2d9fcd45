//! Paired persistence of the vectorizer and classifier blobs.
//!
//! The classifier blob records the CRC32 of the vectorizer blob it was trained
//! against, the vocabulary size, the feature layout and the variant. Loading
//! refuses any pair that disagrees on one of them.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use is_it_fake_preprocessing::{TfidfVectorizer, features::FeatureLayout};
use tracing::{debug, info};

use super::{Classifier, Model};
use crate::{
    config::Variant,
    error::{DetectorError, Result},
};

/// Bumped whenever the encoded layout of either blob changes.
pub const FORMAT_VERSION: u32 = 1;

fn bincode_config() -> bincode::config::Configuration {
    bincode::config::standard()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub vectorizer: PathBuf,
    pub classifier: PathBuf,
}

impl ArtifactPaths {
    pub fn new(dir: impl AsRef<Path>, variant: Variant) -> Self {
        let dir = dir.as_ref();
        Self {
            vectorizer: dir.join(variant.vectorizer_file()),
            classifier: dir.join(variant.classifier_file()),
        }
    }

    #[must_use]
    pub fn exist(&self) -> bool {
        self.vectorizer.is_file() && self.classifier.is_file()
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
struct ClassifierArtifact {
    format_version: u32,
    variant: Variant,
    layout: FeatureLayout,
    vocab_size: usize,
    vectorizer_checksum: u32,
    model: Model,
}

/// A vectorizer and classifier known to belong together.
#[derive(Clone, Debug)]
pub struct TrainedModel {
    pub variant: Variant,
    pub layout: FeatureLayout,
    pub vectorizer: TfidfVectorizer,
    pub model: Model,
}

impl TrainedModel {
    /// Width of the feature rows the classifier expects.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.vectorizer.num_features() + self.layout.linguistic_width()
    }

    fn check_consistency(&self) -> std::result::Result<(), String> {
        match (self.variant, self.layout) {
            (Variant::Baseline, FeatureLayout::LexicalOnly)
            | (Variant::Enhanced, FeatureLayout::Combined(_)) => {}
            (variant, layout) => {
                return Err(format!("{variant} model cannot use feature layout {layout:?}"));
            }
        }
        if self.model.n_features() != self.dimension() {
            return Err(format!(
                "classifier expects {} features but vectorizer and layout give {}",
                self.model.n_features(),
                self.dimension()
            ));
        }
        Ok(())
    }

    /// Write both blobs, vectorizer first, each via a temporary sibling file.
    pub fn save(&self, paths: &ArtifactPaths) -> Result<()> {
        self.check_consistency()
            .map_err(|reason| DetectorError::artifact(&paths.classifier, reason))?;

        let vectorizer_bytes = bincode::serde::encode_to_vec(&self.vectorizer, bincode_config())
            .map_err(|e| DetectorError::artifact(&paths.vectorizer, e))?;
        let artifact = ClassifierArtifact {
            format_version: FORMAT_VERSION,
            variant: self.variant,
            layout: self.layout,
            vocab_size: self.vectorizer.num_features(),
            vectorizer_checksum: crc32fast::hash(&vectorizer_bytes),
            model: self.model.clone(),
        };
        let classifier_bytes = bincode::serde::encode_to_vec(&artifact, bincode_config())
            .map_err(|e| DetectorError::artifact(&paths.classifier, e))?;

        write_atomically(&paths.vectorizer, &vectorizer_bytes)?;
        write_atomically(&paths.classifier, &classifier_bytes)?;
        info!(
            vectorizer = %paths.vectorizer.display(),
            classifier = %paths.classifier.display(),
            "Saved model artifacts"
        );
        Ok(())
    }

    /// Load and cross-check a pair of blobs written by [`TrainedModel::save`].
    ///
    /// Every failure is reported as [`DetectorError::ModelUnavailable`].
    pub fn load(paths: &ArtifactPaths, variant: Variant) -> Result<Self> {
        let unavailable = |reason: String| DetectorError::ModelUnavailable(reason);

        let vectorizer_bytes = fs::read(&paths.vectorizer)
            .map_err(|e| unavailable(format!("{}: {e}", paths.vectorizer.display())))?;
        let classifier_bytes = fs::read(&paths.classifier)
            .map_err(|e| unavailable(format!("{}: {e}", paths.classifier.display())))?;

        let (artifact, _): (ClassifierArtifact, usize) =
            bincode::serde::decode_from_slice(&classifier_bytes, bincode_config())
                .map_err(|e| unavailable(format!("corrupt classifier blob: {e}")))?;
        if artifact.format_version != FORMAT_VERSION {
            return Err(unavailable(format!(
                "classifier blob has format version {}, expected {FORMAT_VERSION}",
                artifact.format_version
            )));
        }
        if artifact.variant != variant {
            return Err(unavailable(format!(
                "classifier blob was trained for the {} variant, not {variant}",
                artifact.variant
            )));
        }
        if crc32fast::hash(&vectorizer_bytes) != artifact.vectorizer_checksum {
            return Err(unavailable(
                "vectorizer blob does not match the classifier it was trained with".to_string(),
            ));
        }

        let (vectorizer, _): (TfidfVectorizer, usize) =
            bincode::serde::decode_from_slice(&vectorizer_bytes, bincode_config())
                .map_err(|e| unavailable(format!("corrupt vectorizer blob: {e}")))?;
        if vectorizer.num_features() != artifact.vocab_size {
            return Err(unavailable(format!(
                "vectorizer has {} terms, classifier recorded {}",
                vectorizer.num_features(),
                artifact.vocab_size
            )));
        }

        let trained = Self {
            variant: artifact.variant,
            layout: artifact.layout,
            vectorizer,
            model: artifact.model,
        };
        trained.check_consistency().map_err(unavailable)?;
        debug!(
            variant = %trained.variant,
            dimension = trained.dimension(),
            "Loaded model artifacts"
        );
        Ok(trained)
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .map_err(|e| DetectorError::artifact(path, e.error))?;
    Ok(())
}
