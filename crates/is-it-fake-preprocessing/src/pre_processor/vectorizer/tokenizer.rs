use std::{borrow::Cow, sync::LazyLock};

use indicatif::{ParallelProgressIterator, ProgressBar, ProgressIterator, ProgressStyle};
use rayon::prelude::*;
use regex::Regex;
use tracing::debug;

use super::stop_words::is_stop_word;

/// Minimum number of texts to consider parallelization
const MIN_TEXTS_FOR_PARALLEL: usize = 100;

/// Minimum total character count to consider parallelization
const MIN_CHARS_FOR_PARALLEL: usize = 10_000;

/// Below this many texts no progress bar is drawn (single-document inference).
const MIN_TEXTS_FOR_PROGRESS: usize = 50;

/// Words of two or more word characters.
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is a valid regex"));

fn progress_bar_setup(len: usize, message: impl Into<Cow<'static, str>>) -> ProgressBar {
    if len < MIN_TEXTS_FOR_PROGRESS {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})") {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(message);
    pb
}

/// Lowercase and split a single document, optionally dropping stop words.
pub fn tokenize_one(text: &str, drop_stop_words: bool) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !(drop_stop_words && is_stop_word(token)))
        .map(str::to_owned)
        .collect()
}

fn tokenize_texts_par<T: AsRef<str> + Sync>(texts: &[T], drop_stop_words: bool) -> Vec<Vec<String>> {
    debug!(num_texts = texts.len(), "Using parallel tokenization");
    let pb = progress_bar_setup(texts.len(), "Tokenizing texts in parallel");
    let result = texts
        .par_iter()
        .progress_with(pb.clone())
        .map(|text| tokenize_one(text.as_ref(), drop_stop_words))
        .collect();
    pb.finish_with_message("Parallel tokenization complete");
    result
}

fn tokenize_texts<T: AsRef<str>>(texts: &[T], drop_stop_words: bool) -> Vec<Vec<String>> {
    debug!(num_texts = texts.len(), "Using sequential tokenization");
    let pb = progress_bar_setup(texts.len(), "Tokenizing texts");

    let result = texts
        .iter()
        .progress_with(pb.clone())
        .map(|text| tokenize_one(text.as_ref(), drop_stop_words))
        .collect();
    pb.finish_with_message("Tokenization complete");
    result
}

/// Determine if parallel processing should be used based on workload characteristics.
///
/// Parallelization is beneficial when:
/// - There are many texts (>= 100), OR
/// - The total character count is large (>= 10,000 chars)
#[inline]
fn should_use_parallel<T: AsRef<str>>(texts: &[T]) -> bool {
    let num_texts = texts.len();

    if num_texts >= MIN_TEXTS_FOR_PARALLEL {
        return true;
    }

    // Estimate from the first 20 texts when there are more than that
    let total_chars: usize = if num_texts > 20 {
        let sample_chars: usize = texts.iter().take(20).map(|s| s.as_ref().len()).sum();
        (sample_chars * num_texts) / 20
    } else {
        texts.iter().map(|s| s.as_ref().len()).sum()
    };

    total_chars >= MIN_CHARS_FOR_PARALLEL
}

pub fn tokenize<T: AsRef<str> + Sync>(texts: &[T], drop_stop_words: bool) -> Vec<Vec<String>> {
    if should_use_parallel(texts) {
        tokenize_texts_par(texts, drop_stop_words)
    } else {
        tokenize_texts(texts, drop_stop_words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_drops_short_tokens() {
        let tokens = tokenize_one("BREAKING: a 5G Tower!", false);
        assert_eq!(tokens, vec!["breaking", "5g", "tower"]);
    }

    #[test]
    fn test_tokenize_drops_stop_words() {
        let tokens = tokenize_one("The government is hiding the cure", true);
        assert_eq!(tokens, vec!["government", "hiding", "cure"]);
    }

    #[test]
    fn test_tokenize_batch_matches_single() {
        let texts = ["Stock markets showed mixed results today.", ""];
        let batch = tokenize(&texts, true);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], tokenize_one(texts[0], true));
        assert!(batch[1].is_empty());
    }
}
