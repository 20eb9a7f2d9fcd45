//! Transport-agnostic JSON request handling.
//!
//! Every outcome, including failures, becomes an [`ApiResponse`] with a status
//! code and a JSON body; nothing here panics or returns an error to the caller.

use serde_json::{Value, json};
use tracing::{error, warn};

use crate::{Detector, DetectorError, LoadStatus, Variant, Verdict};

#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self {
            status: 400,
            body: json!({ "error": message }),
        }
    }

    fn server_error(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self {
            status: 500,
            body: json!({
                "error": message,
                "prediction": "ERROR",
                "confidence": 0.0,
            }),
        }
    }
}

impl From<DetectorError> for ApiResponse {
    fn from(err: DetectorError) -> Self {
        match err {
            DetectorError::InvalidInput(message) => Self::bad_request(message),
            DetectorError::ModelUnavailable(reason) => {
                warn!(%reason, "Rejected request: model unavailable");
                Self::server_error("Model not loaded")
            }
            other => {
                error!(error = %other, "Analysis failed");
                Self::server_error(other.to_string())
            }
        }
    }
}

fn verdict_body(variant: Variant, verdict: &Verdict) -> Value {
    match variant {
        Variant::Baseline => json!({
            "prediction": verdict.label,
            "confidence": verdict.confidence,
        }),
        Variant::Enhanced => json!({
            "prediction": verdict.label,
            "confidence": verdict.confidence,
            "ai_powered": true,
            "warning_signs": verdict.warning_signs,
            "model_type": variant.model_type(),
            "links": verdict.links,
            "link_summary": verdict.link_summary,
        }),
    }
}

/// Handle an analyze request whose body is `{"text": "..."}`.
pub fn handle_analyze(detector: &Detector, body: &str) -> ApiResponse {
    let request = match serde_json::from_str::<Value>(body) {
        Ok(request) => request,
        Err(e) => return ApiResponse::bad_request(format!("Invalid JSON: {e}")),
    };
    let Some(text) = request
        .get("text")
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
    else {
        return ApiResponse::bad_request("No text provided");
    };

    match detector.analyze(text) {
        Ok(verdict) => ApiResponse::ok(verdict_body(detector.variant(), &verdict)),
        Err(e) => e.into(),
    }
}

/// Liveness and model status.
pub fn health(detector: &Detector) -> ApiResponse {
    let mut body = json!({
        "status": "ok",
        "model_loaded": detector.is_loaded(),
        "variant": detector.variant(),
        "features": detector.feature_set(),
    });
    if let LoadStatus::Unavailable { reason } = detector.status() {
        body["reason"] = json!(reason);
    }
    ApiResponse::ok(body)
}
