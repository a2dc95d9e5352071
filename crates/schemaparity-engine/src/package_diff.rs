//! Whole-package comparison
//!
//! Walks the fixed package layout, dispatches every artifact to the right
//! comparer and assembles the [`ComparisonReport`].

use crate::canonical::compare_simple_xml;
use crate::header_diff::diff_headers;
use crate::model_diff::diff_models;
use crate::text_diff::compare_text;
use schemaparity_core::{
    ArtifactResult, ArtifactStatus, ComparisonReport, Diagnostic, DiagnosticCode, HeaderComparison,
    ModelComparison, Severity, Side, MODEL_FILE, PROVENANCE_FILE,
};
use schemaparity_package::{parse_model_document, parse_xml, PackageContents, Result};
use std::borrow::Cow;
use std::collections::BTreeSet;

/// Simple XML artifacts, compared order-independently
const SIMPLE_XML_FILES: &[&str] = &["DacMetadata.xml", "[Content_Types].xml"];

/// Deployment scripts, compared line by line
const SCRIPT_FILES: &[&str] = &["predeploy.sql", "postdeploy.sql"];

/// Every file name with a dedicated comparison
const KNOWN_FILES: &[&str] = &[
    PROVENANCE_FILE,
    "DacMetadata.xml",
    "[Content_Types].xml",
    "predeploy.sql",
    "postdeploy.sql",
    MODEL_FILE,
];

const PROVENANCE_REASON: &str = "skipped - contains timestamps/identifiers";

/// Compares two opened packages
pub struct PackageComparison;

impl PackageComparison {
    /// Compare `candidate` against `baseline`.
    ///
    /// Differences end up in the report; only unreadable or malformed known
    /// artifacts are errors.
    pub fn compare(
        candidate: &PackageContents,
        baseline: &PackageContents,
    ) -> Result<ComparisonReport> {
        let mut artifacts = vec![ArtifactResult::new(
            PROVENANCE_FILE,
            ArtifactStatus::Skipped(PROVENANCE_REASON.to_string()),
        )];
        let mut diagnostics = Vec::new();

        for &name in SIMPLE_XML_FILES {
            let status = match (candidate.text(name)?, baseline.text(name)?) {
                (None, None) => continue,
                (None, Some(_)) => ArtifactStatus::MissingInCandidate,
                (Some(_), None) => ArtifactStatus::MissingInBaseline,
                (Some(c), Some(b)) => {
                    let c = parse_xml(&side_label(name, Side::Candidate), c)?;
                    let b = parse_xml(&side_label(name, Side::Baseline), b)?;
                    compare_simple_xml(&c, &b)
                }
            };
            tracing::debug!(artifact = name, ok = status.is_ok(), "compared simple XML");
            artifacts.push(ArtifactResult::new(name, status));
        }

        for &name in SCRIPT_FILES {
            let status = match (candidate.text(name)?, baseline.text(name)?) {
                (None, None) => continue,
                (None, Some(_)) => ArtifactStatus::MissingInCandidate,
                (Some(_), None) => ArtifactStatus::MissingInBaseline,
                (Some(c), Some(b)) => compare_text(c, b),
            };
            tracing::debug!(artifact = name, ok = status.is_ok(), "compared script");
            artifacts.push(ArtifactResult::new(name, status));
        }

        Self::compare_unexpected_files(candidate, baseline, &mut artifacts, &mut diagnostics);

        let (header, model) = match (candidate.text(MODEL_FILE)?, baseline.text(MODEL_FILE)?) {
            (Some(c), Some(b)) => {
                let (header, model) = Self::compare_models(c, b)?;
                diagnostics.extend(Self::duplicate_diagnostics(&model));
                (Some(header), Some(model))
            }
            (None, Some(_)) => {
                artifacts.push(ArtifactResult::new(MODEL_FILE, ArtifactStatus::MissingInCandidate));
                (None, None)
            }
            (Some(_), None) => {
                artifacts.push(ArtifactResult::new(MODEL_FILE, ArtifactStatus::MissingInBaseline));
                (None, None)
            }
            (None, None) => (None, None),
        };

        Ok(ComparisonReport::new(artifacts, header, model, diagnostics))
    }

    /// Parse both semantic documents and compare headers and elements
    fn compare_models(
        candidate: &str,
        baseline: &str,
    ) -> Result<(HeaderComparison, ModelComparison)> {
        let candidate = parse_model_document(&side_label(MODEL_FILE, Side::Candidate), candidate)?;
        let baseline = parse_model_document(&side_label(MODEL_FILE, Side::Baseline), baseline)?;
        tracing::debug!(
            candidate_elements = candidate.elements.len(),
            baseline_elements = baseline.elements.len(),
            "parsed semantic documents"
        );

        let header = diff_headers(&candidate.header, &baseline.header);
        let model = diff_models(&candidate, &baseline);
        Ok((header, model))
    }

    /// Files outside the known layout: one-sided names are listed, shared
    /// names are text-diffed and reported only when they differ
    fn compare_unexpected_files(
        candidate: &PackageContents,
        baseline: &PackageContents,
        artifacts: &mut Vec<ArtifactResult>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let unknown = |contents: &PackageContents| -> BTreeSet<String> {
            contents
                .file_names()
                .filter(|name| !KNOWN_FILES.contains(name))
                .map(str::to_string)
                .collect()
        };
        let in_candidate = unknown(candidate);
        let in_baseline = unknown(baseline);

        let only_candidate: Vec<&str> =
            in_candidate.difference(&in_baseline).map(String::as_str).collect();
        let only_baseline: Vec<&str> =
            in_baseline.difference(&in_candidate).map(String::as_str).collect();

        if !only_candidate.is_empty() {
            artifacts.push(ArtifactResult::new(
                "(unexpected files)",
                ArtifactStatus::Different(vec![format!(
                    "  Only in candidate: {}",
                    only_candidate.join(", ")
                )]),
            ));
        }
        if !only_baseline.is_empty() {
            let label = if only_candidate.is_empty() {
                "(unexpected files)"
            } else {
                "(unexpected files in baseline)"
            };
            artifacts.push(ArtifactResult::new(
                label,
                ArtifactStatus::Different(vec![format!(
                    "  Only in baseline: {}",
                    only_baseline.join(", ")
                )]),
            ));
        }

        for name in in_candidate.intersection(&in_baseline) {
            let (Some(c), Some(b)) = (candidate.bytes(name), baseline.bytes(name)) else {
                continue;
            };
            if c == b {
                continue;
            }

            let c = decode_lossy(name, c, Side::Candidate, diagnostics);
            let b = decode_lossy(name, b, Side::Baseline, diagnostics);
            let status = compare_text(&c, &b);
            tracing::debug!(artifact = %name, ok = status.is_ok(), "compared unexpected file");
            if !status.is_ok() {
                artifacts.push(ArtifactResult::new(name.as_str(), status));
            }
        }
    }

    fn duplicate_diagnostics(model: &ModelComparison) -> Vec<Diagnostic> {
        model
            .duplicates
            .iter()
            .map(|duplicate| {
                Diagnostic::new(
                    DiagnosticCode::DuplicateElementKey,
                    Severity::Warn,
                    format!(
                        "{} has more than one element with key {}; the later one was compared",
                        duplicate.side, duplicate.key
                    ),
                )
                .with_artifact(MODEL_FILE)
            })
            .collect()
    }
}

/// Name used in parse errors so they say which input failed
fn side_label(name: &str, side: Side) -> String {
    format!("{} ({})", name, side)
}

fn decode_lossy<'a>(
    name: &str,
    data: &'a [u8],
    side: Side,
    diagnostics: &mut Vec<Diagnostic>,
) -> Cow<'a, str> {
    let text = String::from_utf8_lossy(data);
    if let Cow::Owned(_) = text {
        diagnostics.push(
            Diagnostic::new(
                DiagnosticCode::LossyTextDecode,
                Severity::Info,
                format!("{} copy is not valid UTF-8, compared after lossy decoding", side),
            )
            .with_artifact(name),
        );
    }
    text
}
