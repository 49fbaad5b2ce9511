//! Records returned by the classification service.

use serde::{Deserialize, Serialize};

/// Label the service uses for healthy tissue. Compared case-insensitively.
pub const NORMAL_LABEL: &str = "normal";

/// Body of a successful `POST /predict`.
///
/// `prediction` is required; a body without it is rejected as an invalid
/// response. Everything else is display-only and may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Class label, e.g. `"Normal"` or `"Tumor"`.
    pub prediction: String,

    /// Server-side inference time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,

    /// Model confidence in `[0, 1]`, when the backend reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Backend status string, normally `"success"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ClassificationResult {
    /// `true` when the label is the normal class (case-insensitive).
    /// Every other label selects the non-normal branch.
    pub fn is_normal(&self) -> bool {
        self.prediction.eq_ignore_ascii_case(NORMAL_LABEL)
    }
}

/// Body of `GET /model-info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub input_size: String,
    #[serde(default)]
    pub classes: Vec<String>,
    pub framework: String,
    pub version: String,
}

/// Body of `POST /train`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingStatus {
    pub message: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_prediction_parses() {
        let r: ClassificationResult = serde_json::from_str(r#"{"prediction":"Tumor"}"#).unwrap();
        assert_eq!(r.prediction, "Tumor");
        assert_eq!(r.processing_time, None);
        assert!(!r.is_normal());
    }

    #[test]
    fn full_prediction_parses_and_ignores_extras() {
        let r: ClassificationResult = serde_json::from_str(
            r#"{"prediction":"Normal","processing_time":1.27,"confidence":0.93,"status":"success","extra":1}"#,
        )
        .unwrap();
        assert!(r.is_normal());
        assert_eq!(r.processing_time, Some(1.27));
        assert_eq!(r.confidence, Some(0.93));
        assert_eq!(r.status.as_deref(), Some("success"));
    }

    #[test]
    fn missing_prediction_is_rejected() {
        let r = serde_json::from_str::<ClassificationResult>(r#"{"processing_time":1.0}"#);
        assert!(r.is_err());
    }

    #[test]
    fn normal_match_is_case_insensitive() {
        for label in ["normal", "NORMAL", "Normal", "nOrMaL"] {
            let r = ClassificationResult {
                prediction: label.into(),
                processing_time: None,
                confidence: None,
                status: None,
            };
            assert!(r.is_normal(), "{label:?}");
        }
    }

    #[test]
    fn model_info_parses() {
        let info: ModelInfo = serde_json::from_str(
            r#"{"model_type":"CNN with VGG16 Transfer Learning","input_size":"224x224x3",
                "classes":["Normal","Tumor"],"framework":"TensorFlow/Keras","version":"1.0.0"}"#,
        )
        .unwrap();
        assert_eq!(info.classes, vec!["Normal", "Tumor"]);
    }
}
