//! Heuristic confidence adjustment and warning signs.
//!
//! Increments only ever raise the confidence of a FAKE verdict, which is then
//! capped at [`CONFIDENCE_CEILING`]; a raw FAKE confidence above the ceiling is
//! lowered to it. A REAL verdict keeps its raw confidence, though its warning
//! signs are still reported.

use is_it_fake_preprocessing::{LinguisticFeatures, LinkSummary};

use crate::pipeline::Label;

pub const CONFIDENCE_CEILING: f64 = 0.99;

const CLICKBAIT_THRESHOLD: usize = 2;
const SENSATIONAL_THRESHOLD: usize = 2;
const CAPS_RATIO_THRESHOLD: f64 = 0.15;
const EXCLAMATION_THRESHOLD: usize = 3;
const EMOTIONAL_POLARITY_THRESHOLD: f64 = 0.5;

const CLICKBAIT_INCREMENT: f64 = 0.05;
const SENSATIONAL_INCREMENT: f64 = 0.05;
const CAPS_INCREMENT: f64 = 0.03;
const EXCLAMATION_INCREMENT: f64 = 0.03;
const SUSPICIOUS_LINK_INCREMENT: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct Adjustment {
    pub confidence: f64,
    pub warning_signs: Vec<String>,
}

pub fn adjust(
    label: Label,
    base_confidence: f64,
    features: &LinguisticFeatures,
    links: &LinkSummary,
) -> Adjustment {
    let mut warning_signs = Vec::new();
    let mut increment = 0.0;
    let mut trigger = |fired: bool, amount: f64, warning: String| {
        if fired {
            warning_signs.push(warning);
            increment += amount;
        }
    };

    trigger(
        features.clickbait_score > CLICKBAIT_THRESHOLD,
        CLICKBAIT_INCREMENT,
        "High clickbait language detected".to_string(),
    );
    trigger(
        features.sensational_score > SENSATIONAL_THRESHOLD,
        SENSATIONAL_INCREMENT,
        "Sensationalist language present".to_string(),
    );
    trigger(
        features.caps_ratio > CAPS_RATIO_THRESHOLD,
        CAPS_INCREMENT,
        "Excessive capitalization".to_string(),
    );
    trigger(
        features.exclamation_count > EXCLAMATION_THRESHOLD,
        EXCLAMATION_INCREMENT,
        "Excessive exclamation marks".to_string(),
    );
    trigger(
        links.suspicious > 0,
        SUSPICIOUS_LINK_INCREMENT,
        format!("Contains {} suspicious link(s)", links.suspicious),
    );
    trigger(
        links.total > 0 && links.trusted == 0,
        0.0,
        "No trusted news sources linked".to_string(),
    );
    trigger(
        features
            .sentiment
            .is_some_and(|s| s.sentiment_polarity.abs() > EMOTIONAL_POLARITY_THRESHOLD),
        0.0,
        "Highly emotional tone".to_string(),
    );

    let confidence = if label.is_fake() {
        (base_confidence + increment).min(CONFIDENCE_CEILING)
    } else {
        base_confidence
    };
    Adjustment {
        confidence,
        warning_signs,
    }
}
