//! Surface-level linguistic signals: length, punctuation, capitalization,
//! clickbait/sensationalism lexicon hits and, when enabled, sentiment.

mod lexicon;
mod sentiment;

use std::fmt;

use tracing::{debug, warn};

pub use lexicon::{CLICKBAIT_TERMS, SENSATIONAL_TERMS};
pub use sentiment::{Sentiment, SentimentAnalyzer};

/// Which linguistic feature shape a deployment uses.
///
/// Resolved once at start-up and recorded in trained artifacts: training and
/// inference must agree on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureSet {
    /// The nine statistics and lexicon counts.
    #[default]
    Basic,
    /// Basic plus sentiment polarity and subjectivity.
    Enriched,
}

const BASIC_NAMES: [&str; 9] = [
    "text_length",
    "word_count",
    "avg_word_length",
    "exclamation_count",
    "question_count",
    "caps_ratio",
    "digit_ratio",
    "clickbait_score",
    "sensational_score",
];

const ENRICHED_NAMES: [&str; 11] = [
    "text_length",
    "word_count",
    "avg_word_length",
    "exclamation_count",
    "question_count",
    "caps_ratio",
    "digit_ratio",
    "clickbait_score",
    "sensational_score",
    "sentiment_polarity",
    "sentiment_subjectivity",
];

impl FeatureSet {
    /// Feature names in vector order.
    #[must_use]
    pub fn names(self) -> &'static [&'static str] {
        match self {
            Self::Basic => &BASIC_NAMES,
            Self::Enriched => &ENRICHED_NAMES,
        }
    }

    #[must_use]
    pub fn width(self) -> usize {
        self.names().len()
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Enriched => write!(f, "enriched"),
        }
    }
}

/// Linguistic features of one document, in a fixed key order.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LinguisticFeatures {
    pub text_length: usize,
    pub word_count: usize,
    pub avg_word_length: f64,
    pub exclamation_count: usize,
    pub question_count: usize,
    pub caps_ratio: f64,
    pub digit_ratio: f64,
    pub clickbait_score: usize,
    pub sensational_score: usize,
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
}

impl LinguisticFeatures {
    #[must_use]
    pub fn feature_set(&self) -> FeatureSet {
        if self.sentiment.is_some() {
            FeatureSet::Enriched
        } else {
            FeatureSet::Basic
        }
    }

    /// Values in the order given by [`FeatureSet::names`].
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        let mut values = vec![
            self.text_length as f64,
            self.word_count as f64,
            self.avg_word_length,
            self.exclamation_count as f64,
            self.question_count as f64,
            self.caps_ratio,
            self.digit_ratio,
            self.clickbait_score as f64,
            self.sensational_score as f64,
        ];
        if let Some(sentiment) = self.sentiment {
            values.push(sentiment.sentiment_polarity);
            values.push(sentiment.sentiment_subjectivity);
        }
        values
    }

    /// `(name, value)` pairs in vector order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        self.feature_set().names().iter().copied().zip(self.values())
    }
}

/// Derives [`LinguisticFeatures`] from raw text.
#[derive(Clone, Debug)]
pub struct LinguisticExtractor {
    sentiment: Option<SentimentAnalyzer>,
}

impl LinguisticExtractor {
    #[must_use]
    pub fn basic() -> Self {
        Self { sentiment: None }
    }

    /// Resolve the requested capability.
    ///
    /// If enrichment cannot be initialised the extractor falls back to
    /// [`FeatureSet::Basic`]; the failure is logged and the caller can see the
    /// effective shape via [`LinguisticExtractor::feature_set`].
    #[must_use]
    pub fn resolve(requested: FeatureSet) -> Self {
        match requested {
            FeatureSet::Basic => Self::basic(),
            FeatureSet::Enriched => match SentimentAnalyzer::new() {
                Ok(analyzer) => Self::with_sentiment(analyzer),
                Err(e) => {
                    warn!(error = %e, "Sentiment enrichment unavailable, using basic features");
                    Self::basic()
                }
            },
        }
    }

    #[must_use]
    pub fn with_sentiment(analyzer: SentimentAnalyzer) -> Self {
        Self {
            sentiment: Some(analyzer),
        }
    }

    #[must_use]
    pub fn feature_set(&self) -> FeatureSet {
        if self.sentiment.is_some() {
            FeatureSet::Enriched
        } else {
            FeatureSet::Basic
        }
    }

    pub fn extract(&self, text: &str) -> LinguisticFeatures {
        let text_length = text.chars().count();
        let (word_count, total_word_chars) = text
            .split_whitespace()
            .fold((0usize, 0usize), |(count, chars), word| {
                (count + 1, chars + word.chars().count())
            });
        let avg_word_length = if word_count == 0 {
            0.0
        } else {
            total_word_chars as f64 / word_count as f64
        };

        let mut exclamation_count = 0;
        let mut question_count = 0;
        let mut upper = 0usize;
        let mut digits = 0usize;
        for c in text.chars() {
            match c {
                '!' => exclamation_count += 1,
                '?' => question_count += 1,
                c if c.is_uppercase() => upper += 1,
                c if c.is_numeric() => digits += 1,
                _ => {}
            }
        }
        let denominator = text_length.max(1) as f64;

        let lowered = text.to_lowercase();
        let features = LinguisticFeatures {
            text_length,
            word_count,
            avg_word_length,
            exclamation_count,
            question_count,
            caps_ratio: upper as f64 / denominator,
            digit_ratio: digits as f64 / denominator,
            clickbait_score: lexicon::CLICKBAIT.distinct_hits(&lowered),
            sensational_score: lexicon::SENSATIONAL.distinct_hits(&lowered),
            sentiment: self.sentiment.as_ref().map(|analyzer| analyzer.analyze(text)),
        };
        debug!(
            text_length,
            clickbait = features.clickbait_score,
            sensational = features.sensational_score,
            "Extracted linguistic features"
        );
        features
    }
}

impl Default for LinguisticExtractor {
    fn default() -> Self {
        Self::basic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_no_division_by_zero() {
        let features = LinguisticExtractor::basic().extract("");
        assert_eq!(features.text_length, 0);
        assert_eq!(features.word_count, 0);
        assert!(features.avg_word_length.abs() < f64::EPSILON);
        assert!(features.caps_ratio.abs() < f64::EPSILON);
        assert!(features.digit_ratio.abs() < f64::EPSILON);
    }

    #[test]
    fn test_counts_and_ratios() {
        let features = LinguisticExtractor::basic().extract("Is 5G SAFE? Yes!");
        assert_eq!(features.text_length, 16);
        assert_eq!(features.word_count, 4);
        assert!((features.avg_word_length - 13.0 / 4.0).abs() < 1e-12);
        assert_eq!(features.exclamation_count, 1);
        assert_eq!(features.question_count, 1);
        // I, G, S, A, F, E, Y
        assert!((features.caps_ratio - 7.0 / 16.0).abs() < 1e-12);
        assert!((features.digit_ratio - 1.0 / 16.0).abs() < 1e-12);
    }

    #[test]
    fn test_sensational_headline_scores() {
        let text = "BREAKING!!! URGENT ALERT!!! Shocking secret EXPOSED!!!";
        let features = LinguisticExtractor::basic().extract(text);
        assert_eq!(features.clickbait_score, 3);
        assert_eq!(features.sensational_score, 3);
        assert_eq!(features.exclamation_count, 9);
        assert!(features.caps_ratio > 0.15);
    }

    #[test]
    fn test_basic_shape_has_nine_values() {
        let features = LinguisticExtractor::basic().extract("Stock markets showed mixed results today.");
        assert_eq!(features.feature_set(), FeatureSet::Basic);
        assert_eq!(features.values().len(), FeatureSet::Basic.width());
        let names = features.iter().map(|(name, _)| name).collect::<Vec<_>>();
        assert_eq!(names, FeatureSet::Basic.names());
    }

    #[test]
    fn test_enriched_shape_appends_sentiment() {
        let extractor = LinguisticExtractor::resolve(FeatureSet::Enriched);
        assert_eq!(extractor.feature_set(), FeatureSet::Enriched);
        let features = extractor.extract("What a terrible, horrible disaster");
        assert_eq!(features.values().len(), FeatureSet::Enriched.width());
        let sentiment = features.sentiment.expect("enriched features carry sentiment");
        assert!(sentiment.sentiment_polarity < 0.0);
    }
}
