use ahash::AHashMap as HashMap;
use dashmap::DashMap;
use rayon::prelude::*;

/// Corpus-level statistics for one term.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TermStats {
    /// Number of documents containing the term.
    pub doc_freq: usize,
    /// Total occurrences across the corpus.
    pub term_freq: usize,
}

/// Count the word n-grams of one document; n-gram words are joined with a single space.
pub fn count_ngrams(tokens: &[String], ngram_range: &[usize]) -> HashMap<String, usize> {
    let mut ngram_counter = HashMap::new();

    for &n in ngram_range {
        for window in tokens.windows(n) {
            *ngram_counter.entry(window.join(" ")).or_insert(0) += 1;
        }
    }
    ngram_counter
}

pub fn build_vocabulary(
    ngram_maps: &[HashMap<String, usize>],
) -> DashMap<String, TermStats, ahash::RandomState> {
    let vocab = DashMap::with_hasher(ahash::RandomState::default());

    ngram_maps.par_iter().for_each(|ngrams| {
        for (term, &count) in ngrams {
            let mut stats = vocab.entry(term.clone()).or_insert_with(TermStats::default);
            stats.doc_freq += 1;
            stats.term_freq += count;
        }
    });
    vocab
}
