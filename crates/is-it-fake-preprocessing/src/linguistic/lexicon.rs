use std::sync::LazyLock;

use aho_corasick::AhoCorasick;

/// Phrases typical of clickbait headlines.
pub const CLICKBAIT_TERMS: &[&str] = &[
    "shocking",
    "unbelievable",
    "you wont believe",
    "you won't believe",
    "this one trick",
    "doctors hate",
    "secret",
    "revealed",
    "exposed",
];

/// Words typical of sensationalist framing.
pub const SENSATIONAL_TERMS: &[&str] = &[
    "breaking",
    "urgent",
    "alert",
    "warning",
    "exclusive",
    "leaked",
    "bombshell",
    "scandal",
];

pub static CLICKBAIT: LazyLock<LexiconMatcher> =
    LazyLock::new(|| LexiconMatcher::new(CLICKBAIT_TERMS));

pub static SENSATIONAL: LazyLock<LexiconMatcher> =
    LazyLock::new(|| LexiconMatcher::new(SENSATIONAL_TERMS));

/// Counts how many distinct lexicon terms occur as substrings of a lowercased text.
pub struct LexiconMatcher {
    automaton: AhoCorasick,
    len: usize,
}

impl LexiconMatcher {
    fn new(terms: &[&str]) -> Self {
        let automaton = AhoCorasick::new(terms).expect("Unable to build lexicon matcher");
        Self {
            automaton,
            len: terms.len(),
        }
    }

    /// Each term contributes at most once, however often it repeats.
    pub fn distinct_hits(&self, lowercased: &str) -> usize {
        let mut seen = vec![false; self.len];
        for m in self.automaton.find_overlapping_iter(lowercased) {
            seen[m.pattern().as_usize()] = true;
        }
        seen.into_iter().filter(|&hit| hit).count()
    }
}
