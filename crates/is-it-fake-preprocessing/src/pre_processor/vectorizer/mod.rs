mod count_vectorizer;
mod ngrams;
mod params;
mod stop_words;
mod tfidf_vectorizer;
mod tokenizer;

pub use params::{
    DEFAULT_MAX_FEATURES, DEFAULT_MAX_NGRAM, DEFAULT_MIN_NGRAM, ParamsError, VectorizerParams,
};
pub use tfidf_vectorizer::TfidfVectorizer;
