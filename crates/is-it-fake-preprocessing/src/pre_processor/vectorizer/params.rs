use std::ops::RangeInclusive;

pub const DEFAULT_MIN_NGRAM: usize = 1;
pub const DEFAULT_MAX_NGRAM: usize = 1;
/// Vocabulary cap used by both detector variants.
pub const DEFAULT_MAX_FEATURES: usize = 5000;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamsError {
    #[error("ngram_range must contain at least one positive value")]
    NgramRange,
    #[error("min_df must be positive (proportion in (0.0, 1.0) or absolute count >= 1.0), got {0}")]
    MinDf(f64),
    #[error("max_df must be positive (proportion in (0.0, 1.0] or absolute count > 1.0), got {0}")]
    MaxDf(f64),
}

/// Deserialized parameters are validated exactly like [`VectorizerParams::new`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "UncheckedParams")]
pub struct VectorizerParams {
    ngram_range: Vec<usize>,
    /// Minimum document frequency for filtering vocabulary.
    /// - If `min_df` is in (0.0, 1.0), it's a proportion of documents
    /// - If `min_df` >= 1.0, it's an absolute document count
    min_df: f64,
    /// Maximum document frequency for filtering vocabulary.
    /// - If `max_df` is in (0.0, 1.0], it's a proportion of documents
    /// - If `max_df` > 1.0, it's an absolute document count
    max_df: f64,
    /// Keep only the `max_features` terms with the highest corpus frequency.
    max_features: Option<usize>,
    /// Drop English stop words before counting.
    stop_words: bool,
}

/// Wire shape of [`VectorizerParams`]; missing fields take the defaults.
#[derive(serde::Deserialize)]
#[serde(default)]
struct UncheckedParams {
    ngram_range: Vec<usize>,
    min_df: f64,
    max_df: f64,
    max_features: Option<usize>,
    stop_words: bool,
}

impl Default for UncheckedParams {
    fn default() -> Self {
        let VectorizerParams {
            ngram_range,
            min_df,
            max_df,
            max_features,
            stop_words,
        } = VectorizerParams::default();
        Self {
            ngram_range,
            min_df,
            max_df,
            max_features,
            stop_words,
        }
    }
}

impl TryFrom<UncheckedParams> for VectorizerParams {
    type Error = ParamsError;

    fn try_from(raw: UncheckedParams) -> Result<Self, Self::Error> {
        let params = Self {
            ngram_range: raw.ngram_range,
            min_df: raw.min_df,
            max_df: raw.max_df,
            max_features: raw.max_features,
            stop_words: raw.stop_words,
        };
        params.validate()?;
        Ok(params)
    }
}

impl VectorizerParams {
    /// # Panics
    ///
    /// If the n-gram range is empty or contains zero, or either document
    /// frequency bound is not positive.
    pub fn new(
        ngram_range: impl Into<RangeInclusive<usize>>,
        min_df: f64,
        max_df: f64,
        max_features: Option<usize>,
    ) -> Self {
        let params = Self {
            ngram_range: ngram_range.into().collect(),
            min_df,
            max_df,
            max_features,
            stop_words: true,
        };
        if let Err(e) = params.validate() {
            panic!("{e}");
        }
        params
    }

    fn validate(&self) -> Result<(), ParamsError> {
        if self.ngram_range.is_empty() || self.ngram_range.contains(&0) {
            return Err(ParamsError::NgramRange);
        }
        if self.min_df.is_nan() || self.min_df <= 0.0 {
            return Err(ParamsError::MinDf(self.min_df));
        }
        if self.max_df.is_nan() || self.max_df <= 0.0 {
            return Err(ParamsError::MaxDf(self.max_df));
        }
        Ok(())
    }

    #[must_use]
    pub fn ngram_counts(&self) -> &[usize] {
        &self.ngram_range
    }

    #[must_use]
    pub fn max_features(&self) -> Option<usize> {
        self.max_features
    }

    #[must_use]
    pub fn stop_words(&self) -> bool {
        self.stop_words
    }

    /// Resolve `min_df`/`max_df` into absolute document counts for a corpus of `n_docs`.
    #[must_use]
    pub(crate) fn df_bounds(&self, n_docs: usize) -> (usize, usize) {
        let min = if self.min_df < 1.0 {
            (self.min_df * n_docs as f64).ceil() as usize
        } else {
            self.min_df as usize
        };
        let max = if self.max_df <= 1.0 {
            (self.max_df * n_docs as f64).floor() as usize
        } else {
            self.max_df as usize
        };
        let min = min.max(1);
        (min, max.max(min))
    }
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self::new(
            DEFAULT_MIN_NGRAM..=DEFAULT_MAX_NGRAM,
            1.0,
            1.0,
            Some(DEFAULT_MAX_FEATURES),
        )
    }
}
