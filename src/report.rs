//! User-facing text for each view state.
//!
//! Centralising every string here keeps the CLI, JSON output and any other
//! front end saying the same thing, and lets unit tests pin the wording
//! without a service to talk to.

use crate::output::ClassificationResult;
use crate::view::{ConnectivityStatus, ViewState};
use serde::Serialize;
use std::fmt::Write as _;

/// Shown with every result.
pub const DISCLAIMER: &str = "This AI tool is for educational and research purposes only. \
It should not be used as a substitute for professional medical diagnosis or treatment. \
Always consult with qualified healthcare professionals for medical decisions.";

/// Model family reported in the technical details.
pub const MODEL_LABEL: &str = "CNN + VGG16";

/// Shown while `Idle` with no advisory.
pub const IDLE_PROMPT: &str = "Upload a CT scan image to see analysis results";

/// Shown while `Uploading`.
pub const UPLOADING_MESSAGE: &str = "Analyzing image: processing your CT scan...";

/// Which presentation branch a result selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Normal,
    /// Any label other than the normal one.
    Abnormal,
}

impl Verdict {
    pub fn of(result: &ClassificationResult) -> Self {
        if result.is_normal() {
            Verdict::Normal
        } else {
            Verdict::Abnormal
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Verdict::Normal => "Normal Kidney Tissue",
            Verdict::Abnormal => "Tumor Detected",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Verdict::Normal => {
                "The AI analysis indicates normal kidney tissue with no signs of tumors or abnormalities."
            }
            Verdict::Abnormal => {
                "The AI analysis has detected potential tumor presence in the kidney tissue."
            }
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            Verdict::Normal => "Continue regular health checkups and maintain a healthy lifestyle.",
            Verdict::Abnormal => {
                "Please consult with a medical professional immediately for further evaluation and treatment options."
            }
        }
    }
}

/// A rendered success view, also the `--json` output shape.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub verdict: Verdict,
    pub classification: String,
    pub title: &'static str,
    pub description: &'static str,
    pub recommendation: &'static str,
    pub processing_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub model: &'static str,
    pub disclaimer: &'static str,
}

impl Report {
    pub fn new(result: &ClassificationResult) -> Self {
        let verdict = Verdict::of(result);
        Self {
            verdict,
            classification: result.prediction.clone(),
            title: verdict.title(),
            description: verdict.description(),
            recommendation: verdict.recommendation(),
            processing_time: format_processing_time(result.processing_time),
            confidence: result.confidence,
            model: MODEL_LABEL,
            disclaimer: DISCLAIMER,
        }
    }
}

/// `"1.27s"`, or `"N/A"` when the server sent no (or a zero) timing.
pub fn format_processing_time(secs: Option<f64>) -> String {
    match secs {
        Some(t) if t != 0.0 && t.is_finite() => format!("{t}s"),
        _ => "N/A".to_string(),
    }
}

pub fn connectivity_label(status: ConnectivityStatus) -> &'static str {
    match status {
        ConnectivityStatus::Checking => "Checking...",
        ConnectivityStatus::Connected => "API Connected",
        ConnectivityStatus::Disconnected => "API Disconnected",
    }
}

/// Plain-text rendering of a view state.
pub fn render_text(state: &ViewState) -> String {
    match state {
        ViewState::Idle => IDLE_PROMPT.to_string(),
        ViewState::Uploading => UPLOADING_MESSAGE.to_string(),
        ViewState::Error(message) => format!("Error: {message}"),
        ViewState::Success(result) => render_report(&Report::new(result)),
    }
}

fn render_report(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", report.title);
    let _ = writeln!(out, "Classification: {}", report.classification);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", report.description);
    let _ = writeln!(out);
    let _ = writeln!(out, "Recommendation: {}", report.recommendation);
    let _ = writeln!(out);
    let _ = writeln!(out, "Processing Time: {}", report.processing_time);
    if let Some(c) = report.confidence {
        let _ = writeln!(out, "Confidence:      {:.1}%", c * 100.0);
    }
    let _ = writeln!(out, "Model Type:      {}", report.model);
    let _ = writeln!(out);
    let _ = write!(out, "Medical Disclaimer: {}", report.disclaimer);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(label: &str, t: Option<f64>) -> ClassificationResult {
        ClassificationResult {
            prediction: label.into(),
            processing_time: t,
            confidence: None,
            status: None,
        }
    }

    #[test]
    fn normal_branch_is_case_insensitive() {
        assert_eq!(Verdict::of(&result("Normal", None)), Verdict::Normal);
        assert_eq!(Verdict::of(&result("NORMAL", None)), Verdict::Normal);
    }

    #[test]
    fn any_other_label_is_abnormal() {
        for label in ["Tumor", "Cyst", "Stone", "", "Unknown"] {
            assert_eq!(Verdict::of(&result(label, None)), Verdict::Abnormal, "{label:?}");
        }
    }

    #[test]
    fn processing_time_formatting() {
        assert_eq!(format_processing_time(Some(1.27)), "1.27s");
        assert_eq!(format_processing_time(Some(2.0)), "2s");
        assert_eq!(format_processing_time(Some(0.0)), "N/A");
        assert_eq!(format_processing_time(None), "N/A");
    }

    #[test]
    fn render_success_normal() {
        let text = render_text(&ViewState::Success(result("Normal", Some(0.84))));
        assert!(text.starts_with("Normal Kidney Tissue"), "{text}");
        assert!(text.contains("Classification: Normal"));
        assert!(text.contains("Processing Time: 0.84s"));
        assert!(text.contains(MODEL_LABEL));
        assert!(text.contains("Medical Disclaimer"));
    }

    #[test]
    fn render_success_tumor() {
        let text = render_text(&ViewState::Success(result("Tumor", None)));
        assert!(text.starts_with("Tumor Detected"), "{text}");
        assert!(text.contains("Processing Time: N/A"));
        assert!(text.contains("consult with a medical professional"));
    }

    #[test]
    fn render_other_states() {
        assert_eq!(render_text(&ViewState::Idle), IDLE_PROMPT);
        assert_eq!(render_text(&ViewState::Uploading), UPLOADING_MESSAGE);
        assert_eq!(
            render_text(&ViewState::Error("model unavailable".into())),
            "Error: model unavailable"
        );
    }

    #[test]
    fn report_json_shape() {
        let mut r = result("Tumor", Some(1.5));
        r.confidence = Some(0.9);
        let json = serde_json::to_value(Report::new(&r)).unwrap();
        assert_eq!(json["verdict"], "abnormal");
        assert_eq!(json["classification"], "Tumor");
        assert_eq!(json["processing_time"], "1.5s");
        assert_eq!(json["confidence"], 0.9);
    }

    #[test]
    fn connectivity_labels() {
        assert_eq!(connectivity_label(ConnectivityStatus::Checking), "Checking...");
        assert_eq!(connectivity_label(ConnectivityStatus::Connected), "API Connected");
        assert_eq!(
            connectivity_label(ConnectivityStatus::Disconnected),
            "API Disconnected"
        );
    }
}
