//! Lexicon-based sentiment scoring used by the enriched feature set.
//!
//! Each lexicon entry carries a polarity in [-1, 1] and a subjectivity in
//! [0, 1]. A document's scores are the means over matched words, with simple
//! negation and intensifier handling on the preceding word.

use std::sync::LazyLock;

use ahash::HashMap;
use regex::Regex;

use crate::features::FeatureError;

/// `word<TAB>polarity<TAB>subjectivity`, one entry per line.
const EMBEDDED_LEXICON: &str = "\
good\t0.7\t0.6
great\t0.8\t0.75
excellent\t1.0\t1.0
amazing\t0.6\t0.9
incredible\t0.9\t0.9
wonderful\t1.0\t1.0
best\t1.0\t0.3
happy\t0.8\t1.0
positive\t0.23\t0.55
success\t0.3\t0.4
successful\t0.75\t0.95
safe\t0.5\t0.5
hope\t0.4\t0.6
love\t0.5\t0.6
beautiful\t0.85\t1.0
miracle\t0.6\t0.8
bad\t-0.7\t0.67
terrible\t-1.0\t1.0
horrible\t-1.0\t1.0
awful\t-1.0\t1.0
worst\t-1.0\t1.0
evil\t-1.0\t1.0
dangerous\t-0.6\t0.9
deadly\t-0.7\t0.8
shocking\t-1.0\t1.0
outrageous\t-0.8\t0.9
disgusting\t-1.0\t1.0
scary\t-0.5\t1.0
terrifying\t-1.0\t1.0
angry\t-0.5\t1.0
furious\t-0.8\t1.0
hate\t-0.8\t0.9
crazy\t-0.6\t0.9
insane\t-1.0\t1.0
unbelievable\t-0.5\t0.9
corrupt\t-0.5\t0.8
lie\t-0.5\t0.7
lies\t-0.5\t0.7
fake\t-0.5\t1.0
wrong\t-0.5\t0.9
sad\t-0.5\t1.0
poor\t-0.4\t0.6
fear\t-0.6\t0.8
panic\t-0.6\t0.9
disaster\t-0.8\t0.8
catastrophic\t-0.9\t1.0
stable\t0.1\t0.2
mixed\t0.0\t0.1
official\t0.0\t0.0
reported\t0.0\t0.0
";

const NEGATIONS: &[&str] = &["not", "never", "no", "nor", "dont", "don't", "isn't", "wasn't", "aren't"];

const INTENSIFIERS: &[&str] = &["very", "really", "extremely", "so", "totally", "absolutely", "incredibly"];

const NEGATION_FACTOR: f64 = -0.5;
const INTENSIFIER_FACTOR: f64 = 1.3;

static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z]+(?:'[a-z]+)?").expect("word pattern is a valid regex"));

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sentiment {
    pub sentiment_polarity: f64,
    pub sentiment_subjectivity: f64,
}

#[derive(Clone, Debug)]
pub struct SentimentAnalyzer {
    lexicon: HashMap<String, (f64, f64)>,
}

impl SentimentAnalyzer {
    /// Build the analyzer from the embedded lexicon.
    pub fn new() -> Result<Self, FeatureError> {
        Self::from_lexicon(EMBEDDED_LEXICON)
    }

    /// Parse a tab-separated lexicon (`word, polarity, subjectivity`).
    pub fn from_lexicon(source: &str) -> Result<Self, FeatureError> {
        let mut lexicon = HashMap::default();
        for (line_no, line) in source.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split('\t');
            let (Some(word), Some(polarity), Some(subjectivity), None) =
                (fields.next(), fields.next(), fields.next(), fields.next())
            else {
                return Err(FeatureError::Lexicon {
                    line: line_no + 1,
                    reason: "expected three tab-separated fields".to_string(),
                });
            };
            let parse = |value: &str, name: &str| {
                value.trim().parse::<f64>().map_err(|e| FeatureError::Lexicon {
                    line: line_no + 1,
                    reason: format!("invalid {name} {value:?}: {e}"),
                })
            };
            let polarity = parse(polarity, "polarity")?;
            let subjectivity = parse(subjectivity, "subjectivity")?;
            if !(-1.0..=1.0).contains(&polarity) || !(0.0..=1.0).contains(&subjectivity) {
                return Err(FeatureError::Lexicon {
                    line: line_no + 1,
                    reason: "scores out of range".to_string(),
                });
            }
            lexicon.insert(word.to_lowercase(), (polarity, subjectivity));
        }
        if lexicon.is_empty() {
            return Err(FeatureError::Lexicon {
                line: 0,
                reason: "lexicon is empty".to_string(),
            });
        }
        Ok(Self { lexicon })
    }

    pub fn analyze(&self, text: &str) -> Sentiment {
        let lowered = text.to_lowercase();
        let words = WORD_PATTERN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .collect::<Vec<_>>();

        let mut polarity_sum = 0.0;
        let mut subjectivity_sum = 0.0;
        let mut matched = 0usize;

        for (idx, word) in words.iter().enumerate() {
            let Some(&(base_polarity, base_subjectivity)) = self.lexicon.get(*word) else {
                continue;
            };
            let (mut polarity, mut subjectivity) = (base_polarity, base_subjectivity);
            if let Some(previous) = idx.checked_sub(1).map(|i| words[i]) {
                if INTENSIFIERS.contains(&previous) {
                    polarity *= INTENSIFIER_FACTOR;
                    subjectivity *= INTENSIFIER_FACTOR;
                }
                if NEGATIONS.contains(&previous) {
                    polarity *= NEGATION_FACTOR;
                }
            }
            polarity_sum += polarity.clamp(-1.0, 1.0);
            subjectivity_sum += subjectivity.clamp(0.0, 1.0);
            matched += 1;
        }

        if matched == 0 {
            return Sentiment::default();
        }
        Sentiment {
            sentiment_polarity: (polarity_sum / matched as f64).clamp(-1.0, 1.0),
            sentiment_subjectivity: (subjectivity_sum / matched as f64).clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> SentimentAnalyzer {
        SentimentAnalyzer::new().expect("embedded lexicon parses")
    }

    #[test]
    fn test_neutral_text_scores_zero() {
        let sentiment = analyzer().analyze("Congress passed an infrastructure bill on Tuesday.");
        assert_eq!(sentiment, Sentiment::default());
    }

    #[test]
    fn test_emotional_text_is_polar_and_subjective() {
        let sentiment = analyzer().analyze("This is a shocking, terrifying and disgusting disaster!");
        assert!(sentiment.sentiment_polarity < -0.5);
        assert!(sentiment.sentiment_subjectivity > 0.8);
    }

    #[test]
    fn test_negation_flips_and_dampens() {
        let plain = analyzer().analyze("good");
        let negated = analyzer().analyze("not good");
        assert!(plain.sentiment_polarity > 0.0);
        assert!(negated.sentiment_polarity < 0.0);
        assert!(negated.sentiment_polarity.abs() < plain.sentiment_polarity);
    }

    #[test]
    fn test_scores_stay_in_range() {
        let sentiment = analyzer().analyze("extremely excellent, really wonderful, absolutely best");
        assert!((-1.0..=1.0).contains(&sentiment.sentiment_polarity));
        assert!((0.0..=1.0).contains(&sentiment.sentiment_subjectivity));
    }

    #[test]
    fn test_malformed_lexicon_is_rejected() {
        let err = SentimentAnalyzer::from_lexicon("good\tvery\t0.5").expect_err("bad polarity");
        assert!(matches!(err, FeatureError::Lexicon { line: 1, .. }));
        assert!(SentimentAnalyzer::from_lexicon("\n\n").is_err());
    }
}
