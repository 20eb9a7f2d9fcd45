//! # is-it-fake-preprocessing
//!
//! Everything that turns raw text into numbers for the detector:
//!
//! - [`pre_processor`]: the word-level TF-IDF vectorizer (the lexical features),
//! - [`linguistic`]: surface statistics, clickbait/sensationalism lexicon hits and
//!   the optional sentiment enrichment,
//! - [`features`]: the combiner that concatenates both into one dense vector,
//! - [`links`]: URL extraction and credibility scoring.

pub mod features;
pub mod linguistic;
pub mod links;
pub mod pre_processor;

pub use features::{FeatureCombiner, FeatureError, FeatureLayout};
pub use linguistic::{FeatureSet, LinguisticExtractor, LinguisticFeatures};
pub use links::{Credibility, Link, LinkReport, LinkSummary, analyze_links};
pub use pre_processor::{DEFAULT_MAX_FEATURES, TfidfVectorizer, VectorizerParams};
