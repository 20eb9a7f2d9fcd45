//! Pre-processing module for is-it-fake
//!
//! This module provides text vectorization using TF-IDF over lowercased word n-grams.

mod vectorizer;

pub use vectorizer::{
    DEFAULT_MAX_FEATURES, DEFAULT_MAX_NGRAM, DEFAULT_MIN_NGRAM, ParamsError, TfidfVectorizer,
    VectorizerParams,
};
