//! Comparison report
//!
//! Collects per-artifact statuses and the semantic model results of one run,
//! decides the overall verdict, and renders the text report.

use crate::diagnostic::Diagnostic;
use crate::diff::{HeaderComparison, ModelComparison};
use serde::{Deserialize, Serialize};

/// Build-provenance file. It always differs between builds and never counts.
pub const PROVENANCE_FILE: &str = "Origin.xml";

/// Section label of the semantic document
pub const MODEL_FILE: &str = "model.xml";

/// Outcome of comparing one package artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ArtifactStatus {
    /// Both sides are equivalent
    Identical,

    /// Not compared, with the reason
    Skipped(String),

    /// Only the baseline has this file
    MissingInCandidate,

    /// Only the candidate has this file
    MissingInBaseline,

    /// Both sides have the file and it differs; detail lines
    Different(Vec<String>),
}

impl ArtifactStatus {
    /// Identical or skipped
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Identical | Self::Skipped(_))
    }
}

/// Status of one labelled artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactResult {
    /// File name or synthetic label such as `(unexpected files)`
    pub label: String,
    pub status: ArtifactStatus,
}

impl ArtifactResult {
    pub fn new(label: impl Into<String>, status: ArtifactStatus) -> Self {
        Self {
            label: label.into(),
            status,
        }
    }
}

/// Full result of comparing two packages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Timestamp (RFC 3339); only written to the JSON form
    pub generated_at: String,

    /// Per-artifact results in report order
    pub artifacts: Vec<ArtifactResult>,

    /// Header comparison, absent when a side has no semantic document
    pub header: Option<HeaderComparison>,

    /// Element comparison, absent when a side has no semantic document
    pub model: Option<ModelComparison>,

    /// Non-fatal anomalies
    pub diagnostics: Vec<Diagnostic>,
}

impl ComparisonReport {
    pub fn new(
        artifacts: Vec<ArtifactResult>,
        header: Option<HeaderComparison>,
        model: Option<ModelComparison>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            artifacts,
            header,
            model,
            diagnostics,
        }
    }

    /// Whether anything other than the provenance file differs
    pub fn has_differences(&self) -> bool {
        let artifacts_differ = self
            .artifacts
            .iter()
            .filter(|a| a.label != PROVENANCE_FILE)
            .any(|a| !a.status.is_ok());

        let header_differs = self.header.as_ref().is_some_and(|h| !h.is_identical());
        let model_differs = self.model.as_ref().is_some_and(|m| m.has_differences());

        artifacts_differ || header_differs || model_differs
    }

    /// Render the text report. `max_lines` bounds every diff block; 0 disables truncation.
    pub fn render(&self, max_lines: usize) -> String {
        let mut out: Vec<String> = Vec::new();
        out.push("=== Schema Package Comparison Report ===".to_string());
        out.push(String::new());

        for artifact in &self.artifacts {
            out.push(format!("--- {} ---", artifact.label));
            match &artifact.status {
                ArtifactStatus::Identical => out.push("OK (identical)".to_string()),
                ArtifactStatus::Skipped(reason) => out.push(format!("OK ({})", reason)),
                ArtifactStatus::MissingInCandidate => {
                    out.push("  File missing in candidate package".to_string())
                }
                ArtifactStatus::MissingInBaseline => {
                    out.push("  File missing in baseline package".to_string())
                }
                ArtifactStatus::Different(lines) => out.extend(truncate(lines, max_lines)),
            }
            out.push(String::new());
        }

        if let Some(header) = &self.header {
            out.push(format!("--- {}: Header ---", MODEL_FILE));
            if header.is_identical() {
                out.push("OK (identical)".to_string());
            } else {
                out.extend(truncate(&header.lines(), max_lines));
            }
            out.push(String::new());
        }

        if let Some(model) = &self.model {
            render_model(model, max_lines, &mut out);
        }

        let mut text = out.join("\n");
        text.push('\n');
        text
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save the JSON form to a file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

fn render_model(model: &ModelComparison, max_lines: usize, out: &mut Vec<String>) {
    out.push(format!("--- {}: Elements ---", MODEL_FILE));
    out.push(format!(
        "Total elements: candidate={}, baseline={}",
        model.total_candidate, model.total_baseline
    ));
    out.push(String::new());

    out.push(format!("Missing in candidate ({}):", model.missing_in_candidate.len()));
    push_keys(&model.missing_in_candidate, out);
    out.push(String::new());

    out.push(format!("Extra in candidate ({}):", model.extra_in_candidate.len()));
    push_keys(&model.extra_in_candidate, out);
    out.push(String::new());

    out.push(format!("Differences ({}):", model.differences.len()));
    if model.differences.is_empty() {
        out.push("  (none)".to_string());
    }
    for difference in &model.differences {
        out.push(format!("  {}:", difference.key));
        let lines: Vec<String> = difference.diffs.iter().map(|d| format!("    {}", d)).collect();
        out.extend(truncate(&lines, max_lines));
    }
    out.push(String::new());

    out.push(format!(
        "Summary: {} missing, {} extra, {} different",
        model.missing_in_candidate.len(),
        model.extra_in_candidate.len(),
        model.differences.len()
    ));
}

fn push_keys(keys: &[crate::key::ElementKey], out: &mut Vec<String>) {
    if keys.is_empty() {
        out.push("  (none)".to_string());
    }
    for key in keys {
        out.push(format!("  {}", key));
    }
}

/// First `limit` lines plus a `... (N more lines)` marker
fn truncate(lines: &[String], limit: usize) -> Vec<String> {
    if limit == 0 || lines.len() <= limit {
        return lines.to_vec();
    }

    let mut shown = lines[..limit].to_vec();
    shown.push(format!("  ... ({} more lines)", lines.len() - limit));
    shown
}
