use ahash::{AHashMap, HashMap};
use sprs::CsMat;
use tracing::debug;

use super::{
    ngrams::{self, TermStats},
    params::VectorizerParams,
    tokenizer,
};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CountVectorizer {
    params: VectorizerParams,
    /// Vocabulary mapping a term (word n-gram) to its column index
    vocab: HashMap<String, usize>,
}

impl CountVectorizer {
    fn count_all<T: AsRef<str> + Sync>(
        texts: &[T],
        params: &VectorizerParams,
    ) -> Vec<AHashMap<String, usize>> {
        tokenizer::tokenize(texts, params.stop_words())
            .iter()
            .map(|tokens| ngrams::count_ngrams(tokens, params.ngram_counts()))
            .collect()
    }

    /// Build the vocabulary from per-document n-gram counts.
    ///
    /// Terms outside the `min_df`/`max_df` window are dropped, then the
    /// `max_features` most frequent terms (ties broken alphabetically) are kept.
    /// Column indices follow alphabetical order of the surviving terms.
    fn fit_from_ngrams(ngram_maps: &[AHashMap<String, usize>], params: VectorizerParams) -> Self {
        debug!("Building vocabulary from n-gram counts");
        let vocab_stats = ngrams::build_vocabulary(ngram_maps);
        let vocab_size = vocab_stats.len();

        let (min_df, max_df) = params.df_bounds(ngram_maps.len());
        debug!(min_df, max_df, "Applying document frequency filtering");
        let mut candidates = vocab_stats
            .into_iter()
            .filter(|(_, stats)| stats.doc_freq >= min_df && stats.doc_freq <= max_df)
            .collect::<Vec<(String, TermStats)>>();
        debug!(
            original_size = vocab_size,
            filtered_size = candidates.len(),
            "Vocabulary filtered by document frequency"
        );

        if let Some(max_features) = params.max_features() {
            if candidates.len() > max_features {
                candidates.sort_by(|(term_a, a), (term_b, b)| {
                    b.term_freq.cmp(&a.term_freq).then_with(|| term_a.cmp(term_b))
                });
                candidates.truncate(max_features);
                debug!(max_features, "Vocabulary capped at max_features");
            }
        }

        let mut sorted_terms = candidates
            .into_iter()
            .map(|(term, _)| term)
            .collect::<Vec<_>>();
        sorted_terms.sort();
        let vocab = sorted_terms
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term, idx))
            .collect::<HashMap<String, usize>>();

        debug!(vocab_size = vocab.len(), "CountVectorizer fitting complete");

        Self { params, vocab }
    }

    pub fn transform<T: AsRef<str> + Sync>(&self, texts: &[T]) -> CsMat<f64> {
        debug!(
            num_texts = texts.len(),
            "Transforming texts using CountVectorizer"
        );
        let ngram_maps = Self::count_all(texts, &self.params);
        self.transform_from_ngrams(&ngram_maps)
    }

    /// Build the CSR term-count matrix directly from per-document n-gram counts.
    fn transform_from_ngrams(&self, ngram_maps: &[AHashMap<String, usize>]) -> CsMat<f64> {
        let mut indptr = Vec::with_capacity(ngram_maps.len() + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();

        indptr.push(0);

        for ngrams in ngram_maps {
            let mut row_entries = ngrams
                .iter()
                .filter_map(|(term, &count)| {
                    self.vocab
                        .get(term)
                        .map(|&col_idx| (col_idx, count as f64))
                })
                .collect::<Vec<_>>();

            row_entries.sort_by_key(|(col_idx, _)| *col_idx);
            for (col_idx, count) in row_entries {
                indices.push(col_idx);
                data.push(count);
            }
            indptr.push(indices.len());
        }

        debug!(
            non_zero_entries = data.len(),
            "Text transformation complete"
        );
        CsMat::new((ngram_maps.len(), self.num_features()), indptr, indices, data)
    }

    /// Fit and transform while tokenizing and counting n-grams only once.
    pub fn fit_transform<T: AsRef<str> + Sync>(
        texts: &[T],
        params: VectorizerParams,
    ) -> (Self, CsMat<f64>) {
        debug!(
            num_texts = texts.len(),
            "fit_transform: tokenizing and computing n-grams once"
        );
        let ngram_maps = Self::count_all(texts, &params);
        let vectorizer = Self::fit_from_ngrams(&ngram_maps, params);
        let transformed = vectorizer.transform_from_ngrams(&ngram_maps);
        (vectorizer, transformed)
    }

    pub fn num_features(&self) -> usize {
        self.vocab.len()
    }

    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocab
    }
}
