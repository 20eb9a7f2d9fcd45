use core::fmt;

use is_it_fake_preprocessing::{Link, LinkSummary, LinguisticFeatures};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Fake,
    Real,
}

impl Label {
    /// Class index used by the classifiers: 0 = FAKE, 1 = REAL.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Fake => 0,
            Self::Real => 1,
        }
    }

    #[must_use]
    pub fn is_fake(self) -> bool {
        matches!(self, Self::Fake)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fake => write!(f, "FAKE"),
            Self::Real => write!(f, "REAL"),
        }
    }
}

/// Class probabilities from a classifier.
/// 0: P(FAKE), 1: P(REAL)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction([f64; 2]);

impl Prediction {
    pub(crate) fn new(probabilities: [f64; 2]) -> Self {
        debug_assert!(
            (probabilities[0] + probabilities[1] - 1.0).abs() < 1e-6,
            "Probabilities must sum to 1.0"
        );
        Self(probabilities)
    }

    #[must_use]
    pub fn fake_probability(&self) -> f64 {
        self.0[0]
    }

    #[must_use]
    pub fn real_probability(&self) -> f64 {
        self.0[1]
    }

    /// Arg-max label; ties go to FAKE.
    #[must_use]
    pub fn label(&self) -> Label {
        if self.0[1] > self.0[0] {
            Label::Real
        } else {
            Label::Fake
        }
    }

    /// Probability of the predicted label, in [0.5, 1].
    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.0[self.label().index()]
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P(FAKE)={:.3}, P(REAL)={:.3}", self.0[0], self.0[1])
    }
}

impl From<[f64; 2]> for Prediction {
    fn from(probabilities: [f64; 2]) -> Self {
        Self::new(probabilities)
    }
}

/// The explained outcome of analyzing one text.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Verdict {
    #[serde(rename = "prediction")]
    pub label: Label,
    pub confidence: f64,
    pub warning_signs: Vec<String>,
    pub links: Vec<Link>,
    pub link_summary: LinkSummary,
    /// Absent for the baseline scorer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linguistic_features: Option<LinguisticFeatures>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_encoding() {
        assert_eq!(Label::Fake.index(), 0);
        assert_eq!(Label::Real.index(), 1);
        assert_eq!(Label::Fake.to_string(), "FAKE");
    }

    #[test]
    fn test_label_serializes_uppercase() {
        let json = serde_json::to_string(&Label::Real).expect("serializable");
        assert_eq!(json, "\"REAL\"");
    }

    #[test]
    fn test_prediction_confidence_is_winning_probability() {
        let prediction = Prediction::from([0.3, 0.7]);
        assert_eq!(prediction.label(), Label::Real);
        assert!((prediction.confidence() - 0.7).abs() < 1e-12);

        let prediction = Prediction::from([0.8, 0.2]);
        assert_eq!(prediction.label(), Label::Fake);
        assert!((prediction.confidence() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_tie_goes_to_fake() {
        let prediction = Prediction::from([0.5, 0.5]);
        assert_eq!(prediction.label(), Label::Fake);
    }
}
